//! Folio Core - Quote resolution and portfolio valuation.
//!
//! This crate contains the core business logic for Folio.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod portfolio;
pub mod quotes;

// Re-export common types from portfolio and quote modules
pub use portfolio::valuation::*;
pub use quotes::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
