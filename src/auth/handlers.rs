//! HTTP request handlers for the auth endpoints.
//!
//! These share the payroll API's envelope and rejection handling; all the
//! account logic lives in [`AuthService`].

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::payroll::parse_json;
use crate::api::{ApiErrorResponse, ApiResponse, AppState};

use super::error::{AuthError, AuthResult};
use super::service::{ProfileUpdate, RegisterInput};
use super::users::UserProfile;

/// The routes under /auth/.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register/", post(register_handler))
        .route("/auth/login/", post(login_handler))
        .route("/auth/logout/", post(logout_handler))
        .route("/auth/token/refresh/", post(refresh_handler))
        .route("/auth/token/verify/", get(verify_handler))
        .route(
            "/auth/profile/",
            get(profile_handler)
                .put(update_profile_handler)
                .patch(update_profile_handler),
        )
        .route("/auth/check-username/", get(check_username_handler))
        .route("/auth/check-email/", get(check_email_handler))
        .route("/auth/dashboard/", get(dashboard_handler))
        .route("/auth/password/change/", post(change_password_handler))
        .route("/auth/password/reset/", post(reset_request_handler))
        .route("/auth/password/reset/confirm/", post(reset_confirm_handler))
        .route("/auth/registration/google/", post(social_handler))
        .route("/auth/social/", post(social_handler))
}

/// Pulls the bearer token out of the Authorization header.
fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)
}

/// Verifies the caller's access token and returns their profile.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<UserProfile, ApiErrorResponse> {
    let token = bearer_token(headers).map_err(ApiErrorResponse::from)?;
    state
        .auth()
        .verify_access(token)
        .map_err(ApiErrorResponse::from)
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    password_confirm: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    /// Username or email.
    identity: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct RefreshRequest {
    refresh: String,
}

#[derive(Debug, Deserialize)]
struct ProfileUpdateRequest {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
}

#[derive(Debug, Deserialize)]
struct ResetRequest {
    email: String,
}

#[derive(Debug, Deserialize)]
struct ResetConfirmRequest {
    token: String,
    new_password: String,
}

#[derive(Debug, Deserialize)]
struct SocialRequest {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UsernameQuery {
    username: String,
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: String,
}

/// Handler for POST /auth/register/.
async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    let input = RegisterInput {
        username: request.username,
        email: request.email,
        password: request.password,
        password_confirm: request.password_confirm,
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
    };

    match state.auth().register(input) {
        Ok((profile, tokens)) => {
            info!(correlation_id = %correlation_id, user_id = %profile.id, "Registered");
            (
                StatusCode::CREATED,
                Json(ApiResponse::ok(
                    "Registration successful",
                    json!({ "user": profile, "tokens": tokens }),
                )),
            )
                .into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Registration rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /auth/login/.
async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    match state.auth().login(&request.identity, &request.password) {
        Ok((profile, tokens)) => Json(ApiResponse::ok(
            "Login successful",
            json!({ "user": profile, "tokens": tokens }),
        ))
        .into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, identity = %request.identity, error = %err, "Login rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /auth/logout/.
async fn logout_handler(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    match state.auth().logout(&request.refresh) {
        Ok(()) => Json(ApiResponse::message("Logged out")).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Logout rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /auth/token/refresh/.
async fn refresh_handler(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    match state.auth().refresh(&request.refresh) {
        Ok(tokens) => Json(ApiResponse::ok(
            "Token refreshed",
            json!({ "tokens": tokens }),
        ))
        .into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Refresh rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /auth/token/verify/.
async fn verify_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok(profile) => Json(ApiResponse::ok(
            "Token is valid",
            json!({ "user": profile }),
        ))
        .into_response(),
        Err(response) => response.into_response(),
    }
}

/// Handler for GET /auth/profile/.
async fn profile_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok(profile) => {
            Json(ApiResponse::ok("Profile", json!({ "user": profile }))).into_response()
        }
        Err(response) => response.into_response(),
    }
}

/// Handler for PUT and PATCH /auth/profile/.
async fn update_profile_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProfileUpdateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match authenticate(&state, &headers) {
        Ok(profile) => profile,
        Err(response) => return response.into_response(),
    };
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    let update = ProfileUpdate {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        phone: request.phone,
    };

    match state.auth().update_profile(caller.id, update) {
        Ok(profile) => {
            info!(correlation_id = %correlation_id, user_id = %profile.id, "Profile updated");
            Json(ApiResponse::ok("Profile updated", json!({ "user": profile }))).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, user_id = %caller.id, error = %err, "Profile update rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /auth/check-username/?username=...
async fn check_username_handler(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> Response {
    let available = state.auth().username_available(&query.username);
    Json(ApiResponse::ok(
        "Username availability",
        json!({ "username": query.username, "available": available }),
    ))
    .into_response()
}

/// Handler for GET /auth/check-email/?email=...
async fn check_email_handler(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Response {
    let available = state.auth().email_available(&query.email);
    Json(ApiResponse::ok(
        "Email availability",
        json!({ "email": query.email, "available": available }),
    ))
    .into_response()
}

/// Handler for GET /auth/dashboard/.
async fn dashboard_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let caller = match authenticate(&state, &headers) {
        Ok(profile) => profile,
        Err(response) => return response.into_response(),
    };

    match state.auth().dashboard(caller.id) {
        Ok(data) => Json(ApiResponse::ok("Dashboard", data)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /auth/password/change/.
async fn change_password_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match authenticate(&state, &headers) {
        Ok(profile) => profile,
        Err(response) => return response.into_response(),
    };
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    match state
        .auth()
        .change_password(caller.id, &request.old_password, &request.new_password)
    {
        Ok(()) => Json(ApiResponse::message("Password changed")).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, user_id = %caller.id, error = %err, "Password change rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /auth/password/reset/.
///
/// Always responds with success so the endpoint cannot be used to probe
/// registered emails.
async fn reset_request_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    state.auth().request_password_reset(&request.email);
    Json(ApiResponse::message(
        "If the email is registered, a reset token has been sent",
    ))
    .into_response()
}

/// Handler for POST /auth/password/reset/confirm/.
async fn reset_confirm_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResetConfirmRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    match state
        .auth()
        .confirm_password_reset(&request.token, &request.new_password)
    {
        Ok(()) => Json(ApiResponse::message("Password has been reset")).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Reset confirmation rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /auth/registration/google/ (and its /auth/social/
/// alias).
async fn social_handler(
    State(state): State<AppState>,
    payload: Result<Json<SocialRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response.into_response(),
    };

    match state.auth().social_login(&request.access_token) {
        Ok((profile, tokens)) => Json(ApiResponse::ok(
            "Login successful",
            json!({ "user": profile, "tokens": tokens }),
        ))
        .into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Social login rejected");
            ApiErrorResponse::from(err).into_response()
        }
    }
}
