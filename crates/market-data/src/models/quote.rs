use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Source tag for a quote that no provider, cache or store could supply.
pub const NO_SOURCE: &str = "NONE";

/// Last-known price snapshot for a ticker.
///
/// The three numeric fields are independently optional: a provider may
/// return any subset of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Exchange-qualified symbol (e.g., "BHP.AX")
    pub ticker: String,

    /// Current/last traded price
    pub price: Option<Decimal>,

    /// Previous session's closing price
    pub previous_close: Option<Decimal>,

    /// Absolute change since the previous close
    pub change: Option<Decimal>,

    /// When the snapshot was taken (market time if the provider supplied it)
    pub observed_at: DateTime<Utc>,

    /// Provider that produced the quote (RAPIDAPI_YAHOO, YAHOO_PUBLIC, etc.)
    pub source: String,
}

impl Quote {
    /// Create a quote with all price fields set.
    pub fn new(
        ticker: impl Into<String>,
        price: Option<Decimal>,
        previous_close: Option<Decimal>,
        change: Option<Decimal>,
        observed_at: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            price,
            previous_close,
            change,
            observed_at,
            source: source.into(),
        }
    }

    /// A fully-absent quote: every numeric field is `None`.
    pub fn empty(ticker: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self::new(ticker, None, None, None, observed_at, NO_SOURCE)
    }

    /// True when at least one numeric field is present.
    pub fn has_data(&self) -> bool {
        self.price.is_some() || self.previous_close.is_some() || self.change.is_some()
    }

    /// The `(price, previous_close, change)` triple.
    pub fn triple(&self) -> (Option<Decimal>, Option<Decimal>, Option<Decimal>) {
        (self.price, self.previous_close, self.change)
    }
}
