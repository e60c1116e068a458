//! Database model for the last-known quote per ticker.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::warn;
use rust_decimal::Decimal;
use std::str::FromStr;

use folio_market_data::Quote;

/// One row of the `quotes` table.
///
/// Decimals are stored as text so no precision is lost; timestamps are
/// RFC 3339 strings.
#[derive(Queryable, Identifiable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::quotes)]
#[diesel(primary_key(ticker))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteDB {
    pub ticker: String,
    pub price: Option<String>,
    pub previous_close: Option<String>,
    pub change: Option<String>,
    pub observed_at: String,
    pub source: String,
    pub updated_at: String,
}

impl QuoteDB {
    /// Builds the row for `quote`, stamped as written at `updated_at`.
    pub fn from_quote(quote: &Quote, updated_at: DateTime<Utc>) -> Self {
        QuoteDB {
            ticker: quote.ticker.clone(),
            price: quote.price.map(|d| d.to_string()),
            previous_close: quote.previous_close.map(|d| d.to_string()),
            change: quote.change.map(|d| d.to_string()),
            observed_at: quote.observed_at.to_rfc3339(),
            source: quote.source.clone(),
            updated_at: updated_at.to_rfc3339(),
        }
    }
}

// A corrupt cell degrades to an absent field instead of failing the row.
fn parse_decimal(ticker: &str, column: &str, value: Option<String>) -> Option<Decimal> {
    let raw = value?;
    match Decimal::from_str(&raw) {
        Ok(d) => Some(d),
        Err(e) => {
            warn!(
                "Ignoring unparseable {} '{}' stored for {}: {}",
                column, raw, ticker, e
            );
            None
        }
    }
}

impl From<QuoteDB> for Quote {
    fn from(db: QuoteDB) -> Self {
        let observed_at = DateTime::parse_from_rfc3339(&db.observed_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|e| {
                warn!(
                    "Unparseable observed_at '{}' stored for {}: {}",
                    db.observed_at, db.ticker, e
                );
                DateTime::<Utc>::default()
            });

        Quote {
            price: parse_decimal(&db.ticker, "price", db.price),
            previous_close: parse_decimal(&db.ticker, "previous_close", db.previous_close),
            change: parse_decimal(&db.ticker, "change", db.change),
            observed_at,
            source: db.source,
            ticker: db.ticker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_conversion_keeps_absent_fields_absent() {
        let observed = Utc.with_ymd_and_hms(2025, 6, 2, 6, 10, 0).unwrap();
        let quote = Quote::new(
            "BHP.AX",
            Some(dec!(45.12)),
            None,
            Some(dec!(-0.30)),
            observed,
            "YAHOO_PUBLIC",
        );

        let row = QuoteDB::from_quote(&quote, observed);
        assert_eq!(row.price.as_deref(), Some("45.12"));
        assert_eq!(row.previous_close, None);

        let back = Quote::from(row);
        assert_eq!(back, quote);
    }

    #[test]
    fn test_corrupt_cells_degrade_to_none() {
        let row = QuoteDB {
            ticker: "CBA.AX".to_string(),
            price: Some("not-a-number".to_string()),
            previous_close: Some("108.5".to_string()),
            change: None,
            observed_at: "yesterday".to_string(),
            source: "RAPIDAPI_YAHOO".to_string(),
            updated_at: Utc::now().to_rfc3339(),
        };

        let quote = Quote::from(row);
        assert_eq!(quote.price, None);
        assert_eq!(quote.previous_close, Some(dec!(108.5)));
        assert_eq!(quote.observed_at, DateTime::<Utc>::default());
    }
}
