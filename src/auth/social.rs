//! Third-party credential exchange capability.
//!
//! Social sign-in is abstracted behind [`CredentialExchanger`]: given an
//! external provider token, an implementation verifies it with the
//! provider and returns the external identity. No concrete OAuth provider
//! ships with the engine; deployments supply their own implementation.

use super::error::AuthResult;

/// The identity a provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// The provider's stable subject identifier.
    pub subject: String,
    /// The verified email address.
    pub email: String,
    /// Display name components, when the provider supplies them.
    pub first_name: String,
    /// Family name, when supplied.
    pub last_name: String,
}

/// Exchanges and manages third-party credentials.
pub trait CredentialExchanger: Send + Sync {
    /// The provider name (e.g., "google").
    fn provider(&self) -> &str;

    /// Verifies an external token and returns the identity it proves.
    fn exchange(&self, external_token: &str) -> AuthResult<ExternalIdentity>;

    /// Revokes an external token with the provider, when supported.
    fn revoke(&self, external_token: &str) -> AuthResult<()> {
        let _ = external_token;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::error::AuthError;

    struct StaticExchanger;

    impl CredentialExchanger for StaticExchanger {
        fn provider(&self) -> &str {
            "test-provider"
        }

        fn exchange(&self, external_token: &str) -> AuthResult<ExternalIdentity> {
            if external_token == "good-token" {
                Ok(ExternalIdentity {
                    subject: "subject-1".to_string(),
                    email: "rahim@example.com".to_string(),
                    first_name: "Rahim".to_string(),
                    last_name: "Uddin".to_string(),
                })
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    #[test]
    fn test_exchanger_is_object_safe() {
        let exchanger: Box<dyn CredentialExchanger> = Box::new(StaticExchanger);
        assert_eq!(exchanger.provider(), "test-provider");
        assert!(exchanger.exchange("good-token").is_ok());
        assert!(exchanger.exchange("bad-token").is_err());
    }

    #[test]
    fn test_default_revoke_is_a_no_op() {
        let exchanger = StaticExchanger;
        assert!(exchanger.revoke("anything").is_ok());
    }
}
