//! PROVOST Server — HTTP surface and operational binaries.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
