//! Error types for the auth subsystem.

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::api::ApiErrorResponse;

/// Errors produced by authentication and account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The username/email and password pair did not match any account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The token's signature or structure is invalid.
    #[error("Invalid token")]
    TokenInvalid,

    /// The token has expired.
    #[error("Token has expired")]
    TokenExpired,

    /// The token was revoked (logout or rotation).
    #[error("Token has been revoked")]
    TokenRevoked,

    /// An access token was presented where a refresh token was required,
    /// or vice versa.
    #[error("Wrong token type for this operation")]
    WrongTokenType,

    /// No Authorization bearer header was present.
    #[error("Authentication credentials were not provided")]
    MissingToken,

    /// Token signing failed.
    #[error("Failed to create token: {message}")]
    TokenCreation {
        /// The underlying signing error.
        message: String,
    },

    /// The username is already registered.
    #[error("Username is already taken")]
    UsernameTaken,

    /// The email is already registered.
    #[error("Email is already registered")]
    EmailTaken,

    /// No user matches the given identity.
    #[error("User not found")]
    UserNotFound,

    /// One or more request fields failed validation.
    #[error("Validation failed")]
    Validation {
        /// Field name to error message map.
        errors: Value,
    },

    /// Password hashing or verification failed internally.
    #[error("Password processing failed")]
    PasswordHash,

    /// The password reset token is unknown, used, or expired.
    #[error("Invalid or expired reset token")]
    ResetTokenInvalid,

    /// No third-party credential exchanger is configured.
    #[error("Social authentication is not configured")]
    SocialNotConfigured,
}

/// A convenience alias for auth results.
pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for ApiErrorResponse {
    fn from(error: AuthError) -> Self {
        let message = error.to_string();
        match error {
            AuthError::Validation { errors } => ApiErrorResponse::validation(message, errors),
            AuthError::InvalidCredentials
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::TokenRevoked
            | AuthError::WrongTokenType
            | AuthError::MissingToken => {
                ApiErrorResponse::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
            }
            AuthError::UsernameTaken => {
                ApiErrorResponse::new(StatusCode::BAD_REQUEST, "USERNAME_TAKEN", message)
            }
            AuthError::EmailTaken => {
                ApiErrorResponse::new(StatusCode::BAD_REQUEST, "EMAIL_TAKEN", message)
            }
            AuthError::UserNotFound => {
                ApiErrorResponse::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND", message)
            }
            AuthError::ResetTokenInvalid => {
                ApiErrorResponse::new(StatusCode::BAD_REQUEST, "RESET_TOKEN_INVALID", message)
            }
            AuthError::SocialNotConfigured => {
                ApiErrorResponse::new(StatusCode::NOT_IMPLEMENTED, "SOCIAL_NOT_CONFIGURED", message)
            }
            AuthError::TokenCreation { .. } | AuthError::PasswordHash => {
                ApiErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
            }
        }
    }
}
