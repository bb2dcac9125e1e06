//! Payroll engine server binary.
//!
//! Configuration comes from the environment:
//! - `PAYROLL_BIND_ADDR` - listen address (default `0.0.0.0:3000`)
//! - `PAYROLL_TEMPLATES_DIR` - rule template directory (default `./config/templates`)
//! - `PAYROLL_JWT_SECRET` - token signing secret (required outside development)
//! - `PAYROLL_ACCESS_TTL_SECS` - access token lifetime (default 3600)
//! - `PAYROLL_REFRESH_TTL_SECS` - refresh token lifetime (default 604800)

use std::env;

use tracing::{info, warn};

use payroll_engine::api::{AppState, create_router};
use payroll_engine::auth::AuthService;
use payroll_engine::config::TemplateLoader;
use payroll_engine::store::PayrollStore;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_usize_or(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let bind_addr = env_or("PAYROLL_BIND_ADDR", "0.0.0.0:3000");
    let templates_dir = env_or("PAYROLL_TEMPLATES_DIR", "./config/templates");
    let secret = match env::var("PAYROLL_JWT_SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            warn!("PAYROLL_JWT_SECRET not set, using a development-only secret");
            "development-secret-do-not-use-in-production".to_string()
        }
    };
    let access_ttl = env_usize_or("PAYROLL_ACCESS_TTL_SECS", 3600);
    let refresh_ttl = env_usize_or("PAYROLL_REFRESH_TTL_SECS", 604_800);

    let templates = TemplateLoader::load(&templates_dir)?;
    info!(
        templates = templates.len(),
        dir = %templates_dir,
        "Loaded rule templates"
    );

    let state = AppState::new(
        PayrollStore::new(),
        templates,
        AuthService::new(secret, access_ttl, refresh_ttl),
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Payroll engine listening");
    axum::serve(listener, app).await?;

    Ok(())
}
