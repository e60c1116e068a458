//! Market data models
//!
//! - `types` - Type aliases for common identifiers (ProviderId)
//! - `quote` - The optional-field quote snapshot (Quote)
//! - `ticker` - Ticker normalization

mod quote;
mod ticker;
mod types;

pub use quote::{Quote, NO_SOURCE};
pub use ticker::{normalize_ticker, DEFAULT_EXCHANGE_SUFFIX};
pub use types::ProviderId;
