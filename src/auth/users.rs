//! User accounts and the in-memory user store.
//!
//! Also holds the field validators used at registration time, including
//! the Bangladeshi mobile number format the profile accepts.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// A registered user account.
///
/// The password hash never leaves the store; handlers expose accounts
/// through [`UserProfile`] instead.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique account ID.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 PHC hash of the password.
    pub password_hash: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Normalized mobile number, when provided.
    pub phone: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The public view of a user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique account ID.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Mobile number, when provided.
    pub phone: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            created_at: user.created_at,
        }
    }
}

/// Normalizes and validates a Bangladeshi mobile number.
///
/// Spaces, dashes, and parentheses are stripped, then the number must be
/// `01XXXXXXXXX` with operator digit 3-9, optionally prefixed with the
/// `+88` country code. Returns the cleaned number or `None` when invalid.
///
/// # Example
///
/// ```
/// use payroll_engine::auth::normalize_phone;
///
/// assert_eq!(normalize_phone("017 1234-5678"), Some("01712345678".to_string()));
/// assert_eq!(normalize_phone("+88 01712345678"), Some("+8801712345678".to_string()));
/// assert_eq!(normalize_phone("01212345678"), None); // operator digit 2
/// ```
pub fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    let national = cleaned.strip_prefix("+88").unwrap_or(&cleaned);
    if national.len() != 11 || !national.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !national.starts_with("01") {
        return None;
    }
    if !(b'3'..=b'9').contains(&national.as_bytes()[2]) {
        return None;
    }
    Some(cleaned)
}

/// A lenient structural email check: non-empty local part and a dotted
/// domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(' ')
}

struct ResetToken {
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

/// Thread-safe in-memory store of user accounts and reset tokens.
pub struct UserStore {
    users: RwLock<HashMap<Uuid, User>>,
    reset_tokens: RwLock<HashMap<String, ResetToken>>,
}

/// How long a password reset token stays valid.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            reset_tokens: RwLock::new(HashMap::new()),
        }
    }

    fn read_users(&self) -> RwLockReadGuard<'_, HashMap<Uuid, User>> {
        self.users.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_users(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, User>> {
        self.users.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Inserts a new account after checking username and email uniqueness.
    pub fn create(&self, user: User) -> AuthResult<UserProfile> {
        let mut users = self.write_users();
        if users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&user.username))
        {
            return Err(AuthError::UsernameTaken);
        }
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AuthError::EmailTaken);
        }
        let profile = UserProfile::from(&user);
        users.insert(user.id, user);
        Ok(profile)
    }

    /// Fetches an account by ID.
    pub fn get(&self, id: Uuid) -> AuthResult<User> {
        self.read_users()
            .get(&id)
            .cloned()
            .ok_or(AuthError::UserNotFound)
    }

    /// Finds an account by username or email, case-insensitively.
    pub fn find_by_identity(&self, identity: &str) -> Option<User> {
        self.read_users()
            .values()
            .find(|u| {
                u.username.eq_ignore_ascii_case(identity) || u.email.eq_ignore_ascii_case(identity)
            })
            .cloned()
    }

    /// Checks whether a username is free.
    pub fn username_available(&self, username: &str) -> bool {
        !self
            .read_users()
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(username))
    }

    /// Checks whether an email is free.
    pub fn email_available(&self, email: &str) -> bool {
        !self
            .read_users()
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Applies a mutation to an account and returns the updated profile.
    pub fn update<F>(&self, id: Uuid, mutate: F) -> AuthResult<UserProfile>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.write_users();
        let user = users.get_mut(&id).ok_or(AuthError::UserNotFound)?;
        mutate(user);
        Ok(UserProfile::from(&*user))
    }

    /// Issues a password reset token for the account owning `email`.
    pub fn issue_reset_token(&self, email: &str) -> AuthResult<String> {
        let user = self
            .find_by_identity(email)
            .ok_or(AuthError::UserNotFound)?;

        let token = Uuid::new_v4().to_string();
        self.reset_tokens
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                token.clone(),
                ResetToken {
                    user_id: user.id,
                    expires_at: Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS),
                },
            );
        Ok(token)
    }

    /// Consumes a reset token, returning the account it belongs to.
    ///
    /// Tokens are single use; a consumed or expired token is invalid.
    pub fn consume_reset_token(&self, token: &str) -> AuthResult<Uuid> {
        let mut tokens = self
            .reset_tokens
            .write()
            .unwrap_or_else(|e| e.into_inner());
        let entry = tokens.remove(token).ok_or(AuthError::ResetTokenInvalid)?;
        if entry.expires_at < Utc::now() {
            return Err(AuthError::ResetTokenInvalid);
        }
        Ok(entry.user_id)
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.read_users().len()
    }

    /// Returns true when no accounts exist.
    pub fn is_empty(&self) -> bool {
        self.read_users().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Rahim".to_string(),
            last_name: "Uddin".to_string(),
            phone: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_and_fetch_user() {
        let store = UserStore::new();
        let account = user("rahim", "rahim@example.com");
        let id = account.id;
        store.create(account).unwrap();

        let fetched = store.get(id).unwrap();
        assert_eq!(fetched.username, "rahim");
    }

    #[test]
    fn test_duplicate_username_rejected_case_insensitively() {
        let store = UserStore::new();
        store.create(user("rahim", "rahim@example.com")).unwrap();

        let err = store.create(user("RAHIM", "other@example.com")).unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = UserStore::new();
        store.create(user("rahim", "rahim@example.com")).unwrap();

        let err = store.create(user("karim", "Rahim@Example.com")).unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[test]
    fn test_find_by_username_or_email() {
        let store = UserStore::new();
        store.create(user("rahim", "rahim@example.com")).unwrap();

        assert!(store.find_by_identity("rahim").is_some());
        assert!(store.find_by_identity("rahim@example.com").is_some());
        assert!(store.find_by_identity("nobody").is_none());
    }

    #[test]
    fn test_availability_checks() {
        let store = UserStore::new();
        store.create(user("rahim", "rahim@example.com")).unwrap();

        assert!(!store.username_available("rahim"));
        assert!(store.username_available("karim"));
        assert!(!store.email_available("rahim@example.com"));
        assert!(store.email_available("karim@example.com"));
    }

    #[test]
    fn test_update_mutates_profile() {
        let store = UserStore::new();
        let account = user("rahim", "rahim@example.com");
        let id = account.id;
        store.create(account).unwrap();

        let profile = store
            .update(id, |u| u.first_name = "Rahimuddin".to_string())
            .unwrap();
        assert_eq!(profile.first_name, "Rahimuddin");
    }

    #[test]
    fn test_reset_token_is_single_use() {
        let store = UserStore::new();
        let account = user("rahim", "rahim@example.com");
        let id = account.id;
        store.create(account).unwrap();

        let token = store.issue_reset_token("rahim@example.com").unwrap();
        assert_eq!(store.consume_reset_token(&token).unwrap(), id);
        assert!(matches!(
            store.consume_reset_token(&token),
            Err(AuthError::ResetTokenInvalid)
        ));
    }

    #[test]
    fn test_reset_token_for_unknown_email_errors() {
        let store = UserStore::new();
        assert!(matches!(
            store.issue_reset_token("ghost@example.com"),
            Err(AuthError::UserNotFound)
        ));
    }

    #[test]
    fn test_normalize_phone_accepts_national_format() {
        assert_eq!(
            normalize_phone("01712345678"),
            Some("01712345678".to_string())
        );
        assert_eq!(
            normalize_phone("019-1234 5678"),
            Some("01912345678".to_string())
        );
    }

    #[test]
    fn test_normalize_phone_accepts_country_code() {
        assert_eq!(
            normalize_phone("+8801312345678"),
            Some("+8801312345678".to_string())
        );
        assert_eq!(
            normalize_phone("+88 (017) 1234-5678"),
            Some("+8801712345678".to_string())
        );
    }

    #[test]
    fn test_normalize_phone_rejects_bad_numbers() {
        assert_eq!(normalize_phone("01212345678"), None); // operator digit 2
        assert_eq!(normalize_phone("0171234567"), None); // too short
        assert_eq!(normalize_phone("017123456789"), None); // too long
        assert_eq!(normalize_phone("02712345678"), None); // not 01
        assert_eq!(normalize_phone("017abcd5678"), None); // letters
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("rahim@example.com"));
        assert!(is_valid_email("rahim.uddin@mail.example.org"));
        assert!(!is_valid_email("rahim"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("rahim@"));
        assert!(!is_valid_email("rahim@example"));
        assert!(!is_valid_email("rahim@.com"));
        assert!(!is_valid_email("ra him@example.com"));
    }
}
