//! Quote storage trait.
//!
//! The store keeps the last successfully fetched quote per ticker so the
//! resolver has something to serve while providers are unavailable or the
//! cooldown is active. Implementations live in the storage crates.

use std::collections::HashMap;

use async_trait::async_trait;
use folio_market_data::Quote;

use crate::errors::Result;

/// Storage interface for last-known quotes.
///
/// At most one row exists per ticker. Reads are synchronous (a single
/// primary-key lookup); writes are async because they are queued behind a
/// single writer.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Loads the stored quote for `ticker`, if any.
    fn load(&self, ticker: &str) -> Result<Option<Quote>>;

    /// Loads stored quotes for `tickers`, keyed by ticker. Tickers without a
    /// row are simply absent from the map.
    fn load_many(&self, tickers: &[String]) -> Result<HashMap<String, Quote>>;

    /// Inserts or replaces the row for `quote.ticker`.
    async fn save(&self, quote: &Quote) -> Result<()>;

    /// Inserts or replaces a row per quote in one transaction.
    ///
    /// # Returns
    ///
    /// The number of rows written.
    async fn save_many(&self, quotes: &[Quote]) -> Result<usize>;
}
