//! Accounts and authentication for the payroll engine.
//!
//! Stateless JWT pairs (access + refresh) with an in-memory revocation
//! denylist, Argon2 password hashing, profile management, and password
//! reset delivered through a pluggable [`Mailer`]. Third-party sign-in is
//! supported through the [`CredentialExchanger`] capability; no concrete
//! provider ships with the engine.

mod error;
mod handlers;
mod mailer;
mod password;
mod service;
mod social;
mod token;
mod users;

pub use error::{AuthError, AuthResult};
pub use handlers::router;
pub use mailer::{LogMailer, Mailer};
pub use password::{MIN_PASSWORD_LENGTH, hash_password, verify_password};
pub use service::{AuthService, ProfileUpdate, RegisterInput};
pub use social::{CredentialExchanger, ExternalIdentity};
pub use token::{Claims, JwtTokenProvider, TokenPair, TokenType};
pub use users::{User, UserProfile, UserStore, is_valid_email, normalize_phone};
