//! JWT access and refresh token issuance and verification.
//!
//! Tokens are HS256-signed. Every token carries a unique `jti`; revocation
//! (logout, refresh rotation) puts the `jti` on an in-memory denylist that
//! verification consults.

use std::collections::HashSet;
use std::sync::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};

/// Whether a token grants API access or only the right to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented as the bearer credential.
    Access,
    /// Longer-lived token exchanged for a fresh pair.
    Refresh,
}

/// The claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The account's unique ID.
    pub user_id: Uuid,
    /// The account's username.
    pub sub: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: usize,
    /// Unique token ID, used for revocation.
    pub jti: String,
    /// Access or refresh.
    pub token_type: TokenType,
}

/// An access/refresh token pair as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// The bearer credential for API calls.
    pub access_token: String,
    /// The credential for obtaining a fresh pair.
    pub refresh_token: String,
}

fn now_secs() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs() as usize
}

/// Issues, verifies, and revokes HS256 token pairs.
pub struct JwtTokenProvider {
    secret: String,
    access_ttl_secs: usize,
    refresh_ttl_secs: usize,
    revoked: RwLock<HashSet<String>>,
}

impl JwtTokenProvider {
    /// Creates a provider with the given signing secret and lifetimes.
    pub fn new(secret: impl Into<String>, access_ttl_secs: usize, refresh_ttl_secs: usize) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_secs,
            refresh_ttl_secs,
            revoked: RwLock::new(HashSet::new()),
        }
    }

    /// Issues a fresh access/refresh pair for a user.
    pub fn issue_pair(&self, user_id: Uuid, username: &str) -> AuthResult<TokenPair> {
        let access = self.sign(user_id, username, TokenType::Access, self.access_ttl_secs)?;
        let refresh = self.sign(user_id, username, TokenType::Refresh, self.refresh_ttl_secs)?;
        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
        })
    }

    fn sign(
        &self,
        user_id: Uuid,
        username: &str,
        token_type: TokenType,
        ttl: usize,
    ) -> AuthResult<String> {
        let claims = Claims {
            user_id,
            sub: username.to_string(),
            exp: now_secs() + ttl,
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation {
            message: e.to_string(),
        })
    }

    /// Verifies a token's signature, expiry, revocation state, and type.
    pub fn verify(&self, token: &str, expected: TokenType) -> AuthResult<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        })?;

        let claims = data.claims;
        if claims.token_type != expected {
            return Err(AuthError::WrongTokenType);
        }
        if self.is_revoked(&claims.jti) {
            return Err(AuthError::TokenRevoked);
        }
        Ok(claims)
    }

    /// Puts a token ID on the denylist.
    pub fn revoke(&self, jti: &str) {
        self.revoked
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(jti.to_string());
    }

    /// Checks whether a token ID has been revoked.
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(jti)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> JwtTokenProvider {
        JwtTokenProvider::new("test-secret", 3600, 86_400)
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let provider = provider();
        let user_id = Uuid::new_v4();
        let pair = provider.issue_pair(user_id, "rahim").unwrap();

        let claims = provider.verify(&pair.access_token, TokenType::Access).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.sub, "rahim");
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let provider = provider();
        let pair = provider.issue_pair(Uuid::new_v4(), "rahim").unwrap();

        let err = provider
            .verify(&pair.refresh_token, TokenType::Access)
            .unwrap_err();
        assert!(matches!(err, AuthError::WrongTokenType));
    }

    #[test]
    fn test_revoked_token_rejected() {
        let provider = provider();
        let pair = provider.issue_pair(Uuid::new_v4(), "rahim").unwrap();
        let claims = provider
            .verify(&pair.refresh_token, TokenType::Refresh)
            .unwrap();

        provider.revoke(&claims.jti);

        let err = provider
            .verify(&pair.refresh_token, TokenType::Refresh)
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenRevoked));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let provider = provider();
        let err = provider
            .verify("not.a.token", TokenType::Access)
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let pair = provider().issue_pair(Uuid::new_v4(), "rahim").unwrap();
        let other = JwtTokenProvider::new("different-secret", 3600, 86_400);

        let err = other
            .verify(&pair.access_token, TokenType::Access)
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid));
    }

    #[test]
    fn test_pair_tokens_are_distinct() {
        let pair = provider().issue_pair(Uuid::new_v4(), "rahim").unwrap();
        assert_ne!(pair.access_token, pair.refresh_token);
    }
}
