//! Admin authorization gate.
//!
//! The only authorization check in the system: verify the token, then
//! compare its subject to the organization's recorded admin email.

use provost_core::error::{ProvostError, ProvostResult};
use provost_core::models::organization::Organization;

use crate::config::AuthConfig;
use crate::token;

/// Authorize a destructive operation on `org`.
///
/// Any token failure (bad signature, expired, malformed) is
/// [`ProvostError::Auth`]; a valid token whose subject is not the
/// organization's admin is [`ProvostError::Forbidden`]. Returns the
/// verified subject email on success.
pub fn authorize_admin(
    token: &str,
    org: &Organization,
    config: &AuthConfig,
) -> ProvostResult<String> {
    let claims = token::decode_token(token, config)?;

    if claims.sub != org.admin_email {
        return Err(ProvostError::Forbidden {
            reason: "not the admin of this organization".into(),
        });
    }

    Ok(claims.sub)
}

/// Decode a bearer token and return its subject email.
///
/// Used where the caller identity is needed before any organization
/// lookup (e.g. step one of a delete).
pub fn subject(token: &str, config: &AuthConfig) -> ProvostResult<String> {
    Ok(token::decode_token(token, config)?.sub)
}
