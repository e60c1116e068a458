//! SQLite storage implementation for Folio.
//!
//! This crate provides the database side of quote persistence using Diesel
//! ORM with SQLite. It implements the `QuoteStore` trait defined in
//! `folio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - A single-writer actor that serializes all writes
//! - The quote row model and repository
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//! core (QuoteResolver)
//!        │ QuoteStore
//!        ▼
//! storage-sqlite (this crate)
//!        │
//!        ▼
//!    SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod market_data;
pub mod schema;
pub mod utils;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use market_data::SqliteQuoteStore;

// Re-export from folio-core for convenience
pub use folio_core::errors::{DatabaseError, Error, Result};
