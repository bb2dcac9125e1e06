//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::TemplateLoader;
use crate::store::PayrollStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// payroll store, the loaded rule templates, and the auth service.
#[derive(Clone)]
pub struct AppState {
    store: Arc<PayrollStore>,
    templates: Arc<TemplateLoader>,
    auth: Arc<AuthService>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(store: PayrollStore, templates: TemplateLoader, auth: AuthService) -> Self {
        Self {
            store: Arc::new(store),
            templates: Arc::new(templates),
            auth: Arc::new(auth),
        }
    }

    /// Returns a reference to the payroll store.
    pub fn store(&self) -> &PayrollStore {
        &self.store
    }

    /// Returns a reference to the loaded templates.
    pub fn templates(&self) -> &TemplateLoader {
        &self.templates
    }

    /// Returns a reference to the auth service.
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}
