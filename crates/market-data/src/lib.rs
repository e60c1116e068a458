//! Folio Market Data Crate
//!
//! Fetches last-known quotes for exchange-qualified tickers from external
//! providers, behind a priority-ordered fallback chain.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Batch and per-symbol providers (RapidAPI Yahoo, public Yahoo)
//! - Partial quotes: price, previous close and change are independently optional
//! - Client-side rate limiting and a process-wide rate-limit cooldown
//! - An injectable clock so time-dependent behavior can be tested
//!
//! # Architecture
//!
//! ```text
//!                          +------------------+
//!                          | ProviderRegistry |  (priority chain, token buckets)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (RapidAPI, Yahoo, ...)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Quote        |  (price, previous close, change)
//!                          +------------------+
//! ```
//!
//! The [`CooldownTracker`] sits beside the registry: callers check it before
//! going to the network and trigger it when a [`BatchFetch`] reports a rate
//! limit.
//!
//! # Core Types
//!
//! - [`Quote`] - Last-known price snapshot for a ticker
//! - [`MarketDataError`] - Typed provider failure with a [`RetryClass`]
//! - [`ProviderRegistry`] - The provider client used by the resolver
//! - [`Clock`] - Time source shared by everything time-dependent

pub mod clock;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{FailureKind, MarketDataError, RetryClass};

// Re-export all public types from models
pub use models::{normalize_ticker, ProviderId, Quote, DEFAULT_EXCHANGE_SUFFIX, NO_SOURCE};

// Re-export provider types
pub use provider::rapidapi::{RapidApiConfig, RapidApiQuotesProvider, RapidApiSummaryProvider};
pub use provider::yahoo::YahooPublicProvider;
pub use provider::{MarketDataProvider, ProviderCapabilities, RateLimit};

// Re-export registry types
pub use registry::{
    BatchFetch, CooldownTracker, ProviderRegistry, RateLimiter, DEFAULT_COOLDOWN_WINDOW,
};
