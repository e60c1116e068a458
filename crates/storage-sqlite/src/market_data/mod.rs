//! SQLite storage implementation for last-known quotes.

mod model;
mod repository;

pub use model::QuoteDB;
pub use repository::SqliteQuoteStore;

// Re-export trait from core for convenience
pub use folio_core::quotes::QuoteStore;
