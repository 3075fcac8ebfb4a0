//! PROVOST Auth — password hashing/verification, HS256 token
//! issuance/validation, and the admin authorization gate.

pub mod config;
pub mod error;
pub mod gate;
pub mod password;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use token::TokenClaims;
