//! HS256 access token issuance and verification.
//!
//! Tokens are stateless — subject and expiry only, no revocation
//! list. The subject is the admin email; nothing scopes a token to a
//! specific organization.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — admin email.
    pub sub: String,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issue a signed HS256 token for the given subject, expiring after
/// the configured lifetime.
pub fn issue_token(subject: &str, config: &AuthConfig) -> Result<String, AuthError> {
    let claims = TokenClaims {
        sub: subject.to_string(),
        exp: Utc::now().timestamp() + config.token_lifetime_secs as i64,
    };

    let key = EncodingKey::from_secret(config.token_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("token encode: {e}")))
}

/// Decode and verify an HS256 token (signature and expiry, no leeway).
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.token_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["sub", "exp"]);

    jsonwebtoken::decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid(e.to_string()),
        })
}
