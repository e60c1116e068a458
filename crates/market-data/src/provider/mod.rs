//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities and rate limiting configuration
//! - Concrete providers: RapidAPI Yahoo (batch and summary) and public Yahoo
//!
//! Providers only translate tickers into HTTP calls and bodies into
//! [`Quote`](crate::models::Quote)s. Ordering, fallback and throttling live
//! in the registry.

mod capabilities;
pub(crate) mod http;
mod traits;

pub mod rapidapi;
pub mod yahoo;

// Re-exports
pub use capabilities::{ProviderCapabilities, RateLimit};
pub use traits::MarketDataProvider;
