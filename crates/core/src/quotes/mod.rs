//! Quote management module.
//!
//! This module provides the layered lookup of latest quotes:
//!
//! - [`cache`] - Bounded in-memory TTL cache
//! - [`store`] - Storage trait for the last-known quote per ticker
//! - [`resolver`] - Orchestrates cache, cooldown, providers and store
//!
//! # Architecture
//!
//! ```text
//! QuoteResolver → QuoteFetcher (ProviderRegistry, market-data crate)
//!       ↓                ↓
//!  QuoteCache      CooldownTracker
//!       ↓
//! QuoteStore (DB)
//! ```
//!
//! The resolver only depends on traits, so tests swap in mock fetchers and
//! stores and a manual clock.

pub mod cache;
pub mod resolver;
pub mod store;


pub use cache::QuoteCache;
pub use resolver::{QuoteFetcher, QuoteOrigin, QuoteResolver, ResolvedQuote};
pub use store::QuoteStore;
