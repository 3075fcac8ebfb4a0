//! Domain models for PROVOST.
//!
//! These are the core types shared across all crates.

pub mod admin;
pub mod organization;
pub mod tenant;
