//! JSON shapes of the HTTP API.

use chrono::{DateTime, Utc};
use folio_core::{Holding, QuoteOrigin, ResolvedQuote};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub ticker: String,
    pub price: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub change: Option<Decimal>,
    pub observed_at: DateTime<Utc>,
    pub origin: QuoteOrigin,
}

impl From<ResolvedQuote> for QuoteResponse {
    fn from(r: ResolvedQuote) -> Self {
        Self {
            ticker: r.quote.ticker,
            price: r.quote.price,
            previous_close: r.quote.previous_close,
            change: r.quote.change,
            observed_at: r.quote.observed_at,
            origin: r.origin,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HoldingInput {
    pub ticker: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
}

impl HoldingInput {
    /// Converts to a core holding under an already-normalized ticker.
    pub fn into_holding(self, ticker: String) -> Holding {
        Holding::new(ticker, self.quantity, self.purchase_price)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ValuationRequest {
    #[serde(default)]
    pub cash_balance: Decimal,
    #[serde(default)]
    pub holdings: Vec<HoldingInput>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub cooling_down: bool,
}
