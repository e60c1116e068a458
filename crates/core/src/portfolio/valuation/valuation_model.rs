//! Portfolio valuation domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::quotes::QuoteOrigin;

/// A position as entered by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub ticker: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, quantity: Decimal, purchase_price: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            quantity,
            purchase_price,
        }
    }

    /// Rejects non-positive quantities and purchase prices.
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()).into());
        }
        if self.quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "quantity for {} must be positive",
                self.ticker
            ))
            .into());
        }
        if self.purchase_price <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "purchase price for {} must be positive",
                self.ticker
            ))
            .into());
        }
        Ok(())
    }
}

/// Which number the holding was valued at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PriceBasis {
    /// The quote's current price.
    Live,
    /// The previous session's close; no current price was available.
    PreviousClose,
    /// The user's purchase price; the quote had no usable price at all.
    PurchasePrice,
}

/// Valuation of a single holding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub ticker: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub price: Option<Decimal>,
    pub previous_close: Option<Decimal>,
    pub change: Option<Decimal>,
    pub effective_price: Decimal,
    pub price_basis: PriceBasis,
    pub origin: QuoteOrigin,
    pub market_value: Decimal,
    pub profit_total: Decimal,
    /// `None` when neither the change nor both prices were known
    pub daily_profit: Option<Decimal>,
    pub stale: bool,
}

impl HoldingValuation {
    /// True unless valued at a live price from fresh data.
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// Valuation of a whole portfolio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub cash_balance: Decimal,
    pub current_value: Decimal,
    pub total_profit: Decimal,
    /// Sum over holdings whose daily P/L is known
    pub daily_profit: Decimal,
    pub daily_profit_unknown: usize,
    pub holdings: Vec<HoldingValuation>,
}
