//! The auth service: account registration, login, token lifecycle,
//! profile management, and password reset.
//!
//! Handlers stay thin; every business rule lives here so it can be tested
//! without HTTP plumbing.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};
use super::mailer::{LogMailer, Mailer};
use super::password::{MIN_PASSWORD_LENGTH, hash_password, verify_password};
use super::social::CredentialExchanger;
use super::token::{JwtTokenProvider, TokenPair, TokenType};
use super::users::{User, UserProfile, UserStore, is_valid_email, normalize_phone};

/// The fields accepted at registration.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Desired login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password repeated; must match.
    pub password_confirm: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Optional mobile number in a documented national format.
    pub phone: Option<String>,
}

/// Optional profile fields accepted by PUT/PATCH /auth/profile/.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New mobile number; an empty string clears it.
    pub phone: Option<String>,
}

/// Account registration, login, tokens, and profile operations.
pub struct AuthService {
    users: UserStore,
    tokens: JwtTokenProvider,
    mailer: Arc<dyn Mailer>,
    exchanger: Option<Arc<dyn CredentialExchanger>>,
}

impl AuthService {
    /// Creates a service with the given token secret and lifetimes, a
    /// logging mailer, and no social provider.
    pub fn new(secret: impl Into<String>, access_ttl_secs: usize, refresh_ttl_secs: usize) -> Self {
        Self {
            users: UserStore::new(),
            tokens: JwtTokenProvider::new(secret, access_ttl_secs, refresh_ttl_secs),
            mailer: Arc::new(LogMailer),
            exchanger: None,
        }
    }

    /// Replaces the mailer.
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    /// Installs a third-party credential exchanger.
    pub fn with_exchanger(mut self, exchanger: Arc<dyn CredentialExchanger>) -> Self {
        self.exchanger = Some(exchanger);
        self
    }

    /// Registers a new account and issues its first token pair.
    pub fn register(&self, input: RegisterInput) -> AuthResult<(UserProfile, TokenPair)> {
        let mut errors = Map::new();

        if input.username.trim().len() < 3 {
            errors.insert(
                "username".to_string(),
                json!("must be at least 3 characters"),
            );
        }
        if !is_valid_email(&input.email) {
            errors.insert("email".to_string(), json!("must be a valid email address"));
        }
        if input.password.len() < MIN_PASSWORD_LENGTH {
            errors.insert(
                "password".to_string(),
                json!(format!("must be at least {MIN_PASSWORD_LENGTH} characters")),
            );
        }
        if input.password != input.password_confirm {
            errors.insert("password_confirm".to_string(), json!("passwords do not match"));
        }

        let phone = match input.phone.as_deref().filter(|p| !p.is_empty()) {
            Some(raw) => match normalize_phone(raw) {
                Some(normalized) => Some(normalized),
                None => {
                    errors.insert(
                        "phone".to_string(),
                        json!("must be a valid mobile number (01XXXXXXXXX or +8801XXXXXXXXX)"),
                    );
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(AuthError::Validation {
                errors: Value::Object(errors),
            });
        }

        let user = User {
            id: Uuid::new_v4(),
            username: input.username.trim().to_string(),
            email: input.email.trim().to_string(),
            password_hash: hash_password(&input.password)?,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            phone,
            created_at: Utc::now(),
        };

        let profile = self.users.create(user)?;
        let pair = self.tokens.issue_pair(profile.id, &profile.username)?;
        info!(user_id = %profile.id, username = %profile.username, "Account registered");
        Ok((profile, pair))
    }

    /// Authenticates by username or email plus password.
    pub fn login(&self, identity: &str, password: &str) -> AuthResult<(UserProfile, TokenPair)> {
        let user = self
            .users
            .find_by_identity(identity)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            warn!(username = %user.username, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.tokens.issue_pair(user.id, &user.username)?;
        info!(user_id = %user.id, username = %user.username, "Login succeeded");
        Ok((UserProfile::from(&user), pair))
    }

    /// Revokes a refresh token, ending its session.
    pub fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        let claims = self.tokens.verify(refresh_token, TokenType::Refresh)?;
        self.tokens.revoke(&claims.jti);
        info!(user_id = %claims.user_id, "Session logged out");
        Ok(())
    }

    /// Rotates a token pair: the presented refresh token is revoked and a
    /// fresh pair issued.
    pub fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.tokens.verify(refresh_token, TokenType::Refresh)?;
        self.tokens.revoke(&claims.jti);
        self.tokens.issue_pair(claims.user_id, &claims.sub)
    }

    /// Verifies an access token and returns the account it belongs to.
    pub fn verify_access(&self, access_token: &str) -> AuthResult<UserProfile> {
        let claims = self.tokens.verify(access_token, TokenType::Access)?;
        let user = self.users.get(claims.user_id)?;
        Ok(UserProfile::from(&user))
    }

    /// Fetches a profile by account ID.
    pub fn profile(&self, user_id: Uuid) -> AuthResult<UserProfile> {
        Ok(UserProfile::from(&self.users.get(user_id)?))
    }

    /// Applies a partial profile update.
    pub fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AuthResult<UserProfile> {
        let mut errors = Map::new();

        if let Some(email) = update.email.as_deref() {
            if !is_valid_email(email) {
                errors.insert("email".to_string(), json!("must be a valid email address"));
            } else {
                let current = self.users.get(user_id)?;
                if !current.email.eq_ignore_ascii_case(email) && !self.users.email_available(email)
                {
                    errors.insert("email".to_string(), json!("is already registered"));
                }
            }
        }

        let phone = match update.phone.as_deref() {
            Some("") => Some(None),
            Some(raw) => match normalize_phone(raw) {
                Some(normalized) => Some(Some(normalized)),
                None => {
                    errors.insert(
                        "phone".to_string(),
                        json!("must be a valid mobile number (01XXXXXXXXX or +8801XXXXXXXXX)"),
                    );
                    None
                }
            },
            None => None,
        };

        if !errors.is_empty() {
            return Err(AuthError::Validation {
                errors: Value::Object(errors),
            });
        }

        self.users.update(user_id, |user| {
            if let Some(first_name) = update.first_name {
                user.first_name = first_name;
            }
            if let Some(last_name) = update.last_name {
                user.last_name = last_name;
            }
            if let Some(email) = update.email {
                user.email = email;
            }
            if let Some(phone) = phone {
                user.phone = phone;
            }
        })
    }

    /// Checks whether a username is free.
    pub fn username_available(&self, username: &str) -> bool {
        self.users.username_available(username)
    }

    /// Checks whether an email is free.
    pub fn email_available(&self, email: &str) -> bool {
        self.users.email_available(email)
    }

    /// Changes the password after verifying the old one.
    pub fn change_password(&self, user_id: Uuid, old: &str, new: &str) -> AuthResult<()> {
        let user = self.users.get(user_id)?;
        if !verify_password(old, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if new.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation {
                errors: json!({
                    "new_password": format!("must be at least {MIN_PASSWORD_LENGTH} characters")
                }),
            });
        }
        let hash = hash_password(new)?;
        self.users.update(user_id, |u| u.password_hash = hash)?;
        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Issues a reset token and hands it to the mailer.
    ///
    /// Always reports success so the endpoint cannot be used to probe
    /// which emails are registered.
    pub fn request_password_reset(&self, email: &str) {
        match self.users.issue_reset_token(email) {
            Ok(token) => self.mailer.send_password_reset(email, &token),
            Err(_) => {
                warn!(email = %email, "Password reset requested for unknown email");
            }
        }
    }

    /// Consumes a reset token and sets the new password.
    pub fn confirm_password_reset(&self, token: &str, new_password: &str) -> AuthResult<()> {
        if new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation {
                errors: json!({
                    "new_password": format!("must be at least {MIN_PASSWORD_LENGTH} characters")
                }),
            });
        }
        let user_id = self.users.consume_reset_token(token)?;
        let hash = hash_password(new_password)?;
        self.users.update(user_id, |u| u.password_hash = hash)?;
        info!(user_id = %user_id, "Password reset confirmed");
        Ok(())
    }

    /// Signs in through a configured third-party provider.
    ///
    /// The provider token is exchanged for a verified identity; a matching
    /// account is looked up by email, or created on first sign-in with an
    /// unusable random password.
    pub fn social_login(&self, external_token: &str) -> AuthResult<(UserProfile, TokenPair)> {
        let exchanger = self
            .exchanger
            .as_ref()
            .ok_or(AuthError::SocialNotConfigured)?;
        let identity = exchanger.exchange(external_token)?;

        let user = match self.users.find_by_identity(&identity.email) {
            Some(user) => user,
            None => {
                let user = User {
                    id: Uuid::new_v4(),
                    username: identity.email.clone(),
                    email: identity.email.clone(),
                    password_hash: hash_password(&Uuid::new_v4().to_string())?,
                    first_name: identity.first_name.clone(),
                    last_name: identity.last_name.clone(),
                    phone: None,
                    created_at: Utc::now(),
                };
                let id = user.id;
                self.users.create(user)?;
                info!(
                    user_id = %id,
                    provider = %exchanger.provider(),
                    "Account created from social sign-in"
                );
                self.users.get(id)?
            }
        };

        let pair = self.tokens.issue_pair(user.id, &user.username)?;
        Ok((UserProfile::from(&user), pair))
    }

    /// Dashboard data: the profile plus simple membership stats.
    pub fn dashboard(&self, user_id: Uuid) -> AuthResult<Value> {
        let profile = self.profile(user_id)?;
        let member_for_days = (Utc::now() - profile.created_at).num_days();
        Ok(json!({
            "user": profile,
            "stats": {
                "member_since": profile.created_at,
                "member_for_days": member_for_days,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn service() -> AuthService {
        AuthService::new("test-secret", 3600, 86_400)
    }

    fn input(username: &str, email: &str) -> RegisterInput {
        RegisterInput {
            username: username.to_string(),
            email: email.to_string(),
            password: "a-strong-password".to_string(),
            password_confirm: "a-strong-password".to_string(),
            first_name: "Rahim".to_string(),
            last_name: "Uddin".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_register_then_login_by_username_and_email() {
        let service = service();
        let (profile, _) = service.register(input("rahim", "rahim@example.com")).unwrap();
        assert_eq!(profile.username, "rahim");

        assert!(service.login("rahim", "a-strong-password").is_ok());
        assert!(service.login("rahim@example.com", "a-strong-password").is_ok());
    }

    #[test]
    fn test_login_with_wrong_password_fails() {
        let service = service();
        service.register(input("rahim", "rahim@example.com")).unwrap();

        let err = service.login("rahim", "wrong-password").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn test_register_collects_field_errors() {
        let service = service();
        let bad = RegisterInput {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            password_confirm: "different".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            phone: Some("123".to_string()),
        };

        let err = service.register(bad).unwrap_err();
        let AuthError::Validation { errors } = err else {
            panic!("expected validation error");
        };
        let fields = errors.as_object().unwrap();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("password_confirm"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_register_normalizes_phone() {
        let service = service();
        let mut req = input("rahim", "rahim@example.com");
        req.phone = Some("017 1234-5678".to_string());

        let (profile, _) = service.register(req).unwrap();
        assert_eq!(profile.phone.as_deref(), Some("01712345678"));
    }

    #[test]
    fn test_refresh_rotates_and_revokes() {
        let service = service();
        let (_, pair) = service.register(input("rahim", "rahim@example.com")).unwrap();

        let new_pair = service.refresh(&pair.refresh_token).unwrap();
        assert_ne!(new_pair.refresh_token, pair.refresh_token);

        // The used refresh token is dead
        let err = service.refresh(&pair.refresh_token).unwrap_err();
        assert!(matches!(err, AuthError::TokenRevoked));
    }

    #[test]
    fn test_logout_revokes_refresh_token() {
        let service = service();
        let (_, pair) = service.register(input("rahim", "rahim@example.com")).unwrap();

        service.logout(&pair.refresh_token).unwrap();
        assert!(matches!(
            service.refresh(&pair.refresh_token),
            Err(AuthError::TokenRevoked)
        ));
    }

    #[test]
    fn test_verify_access_returns_profile() {
        let service = service();
        let (profile, pair) = service.register(input("rahim", "rahim@example.com")).unwrap();

        let verified = service.verify_access(&pair.access_token).unwrap();
        assert_eq!(verified.id, profile.id);
    }

    #[test]
    fn test_change_password_requires_old_password() {
        let service = service();
        let (profile, _) = service.register(input("rahim", "rahim@example.com")).unwrap();

        assert!(matches!(
            service.change_password(profile.id, "wrong", "another-password"),
            Err(AuthError::InvalidCredentials)
        ));

        service
            .change_password(profile.id, "a-strong-password", "another-password")
            .unwrap();
        assert!(service.login("rahim", "another-password").is_ok());
        assert!(service.login("rahim", "a-strong-password").is_err());
    }

    #[test]
    fn test_password_reset_flow() {
        let captured = Arc::new(Mutex::new(Vec::<(String, String)>::new()));

        struct CapturingMailer(Arc<Mutex<Vec<(String, String)>>>);
        impl Mailer for CapturingMailer {
            fn send_password_reset(&self, email: &str, token: &str) {
                self.0
                    .lock()
                    .unwrap()
                    .push((email.to_string(), token.to_string()));
            }
        }

        let service = AuthService::new("test-secret", 3600, 86_400)
            .with_mailer(Arc::new(CapturingMailer(Arc::clone(&captured))));
        service.register(input("rahim", "rahim@example.com")).unwrap();

        service.request_password_reset("rahim@example.com");
        let token = captured.lock().unwrap()[0].1.clone();

        service
            .confirm_password_reset(&token, "reset-password-1")
            .unwrap();
        assert!(service.login("rahim", "reset-password-1").is_ok());

        // Single use
        assert!(matches!(
            service.confirm_password_reset(&token, "reset-password-2"),
            Err(AuthError::ResetTokenInvalid)
        ));
    }

    #[test]
    fn test_reset_for_unknown_email_does_not_leak() {
        let service = service();
        // Must not panic or error
        service.request_password_reset("ghost@example.com");
    }

    #[test]
    fn test_profile_update_validates_email_and_phone() {
        let service = service();
        let (profile, _) = service.register(input("rahim", "rahim@example.com")).unwrap();
        service.register(input("karim", "karim@example.com")).unwrap();

        // Taken email rejected
        let err = service
            .update_profile(
                profile.id,
                ProfileUpdate {
                    email: Some("karim@example.com".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation { .. }));

        // Valid update applies
        let updated = service
            .update_profile(
                profile.id,
                ProfileUpdate {
                    first_name: Some("Rahimuddin".to_string()),
                    phone: Some("+8801712345678".to_string()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(updated.first_name, "Rahimuddin");
        assert_eq!(updated.phone.as_deref(), Some("+8801712345678"));

        // Empty string clears the phone
        let cleared = service
            .update_profile(
                profile.id,
                ProfileUpdate {
                    phone: Some(String::new()),
                    ..ProfileUpdate::default()
                },
            )
            .unwrap();
        assert!(cleared.phone.is_none());
    }

    #[test]
    fn test_social_login_without_exchanger_fails() {
        let service = service();
        assert!(matches!(
            service.social_login("token"),
            Err(AuthError::SocialNotConfigured)
        ));
    }

    #[test]
    fn test_social_login_creates_account_once() {
        use crate::auth::social::{CredentialExchanger, ExternalIdentity};

        struct StaticExchanger;
        impl CredentialExchanger for StaticExchanger {
            fn provider(&self) -> &str {
                "test-provider"
            }
            fn exchange(&self, _token: &str) -> AuthResult<ExternalIdentity> {
                Ok(ExternalIdentity {
                    subject: "sub-1".to_string(),
                    email: "social@example.com".to_string(),
                    first_name: "Sana".to_string(),
                    last_name: "Akter".to_string(),
                })
            }
        }

        let service =
            AuthService::new("test-secret", 3600, 86_400).with_exchanger(Arc::new(StaticExchanger));

        let (first, _) = service.social_login("any").unwrap();
        let (second, _) = service.social_login("any").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.email, "social@example.com");
    }

    #[test]
    fn test_dashboard_reports_membership() {
        let service = service();
        let (profile, _) = service.register(input("rahim", "rahim@example.com")).unwrap();

        let dashboard = service.dashboard(profile.id).unwrap();
        assert_eq!(dashboard["user"]["username"], "rahim");
        assert!(dashboard["stats"]["member_for_days"].as_i64().unwrap() >= 0);
    }
}
