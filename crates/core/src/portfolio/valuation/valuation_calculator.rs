use crate::errors::{Error, Result, ValidationError};
use crate::portfolio::valuation::{Holding, HoldingValuation, PortfolioValuation, PriceBasis};
use crate::quotes::{QuoteOrigin, ResolvedQuote};

use folio_market_data::Quote;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;

fn overflow(ticker: &str, what: &str) -> Error {
    ValidationError::InvalidInput(format!("{} for {} is out of range", what, ticker)).into()
}

/// Picks the price a holding is valued at.
///
/// Current price first, then the previous close, then the purchase price.
pub fn effective_price(quote: &Quote, purchase_price: Decimal) -> (Decimal, PriceBasis) {
    match (quote.price, quote.previous_close) {
        (Some(price), _) => (price, PriceBasis::Live),
        (None, Some(previous_close)) => (previous_close, PriceBasis::PreviousClose),
        (None, None) => (purchase_price, PriceBasis::PurchasePrice),
    }
}

/// Today's profit or loss for `quantity` units.
///
/// Uses the provider's change when present, else the price difference when
/// both prices are known. Unknown is `Ok(None)`, never zero. A result that
/// does not fit in a `Decimal` is an error.
pub fn daily_profit(quote: &Quote, quantity: Decimal) -> Result<Option<Decimal>> {
    let per_unit = match (quote.change, quote.price, quote.previous_close) {
        (Some(change), _, _) => change,
        (None, Some(price), Some(previous_close)) => price
            .checked_sub(previous_close)
            .ok_or_else(|| overflow(&quote.ticker, "daily change"))?,
        _ => return Ok(None),
    };
    per_unit
        .checked_mul(quantity)
        .map(Some)
        .ok_or_else(|| overflow(&quote.ticker, "daily profit"))
}

/// Values one holding against its resolved quote.
pub fn value_holding(holding: &Holding, resolved: &ResolvedQuote) -> Result<HoldingValuation> {
    let quote = &resolved.quote;
    let ticker = holding.ticker.as_str();
    let (effective_price, price_basis) = effective_price(quote, holding.purchase_price);

    let market_value = effective_price
        .checked_mul(holding.quantity)
        .ok_or_else(|| overflow(ticker, "market value"))?;
    let profit_total = effective_price
        .checked_sub(holding.purchase_price)
        .and_then(|gain| gain.checked_mul(holding.quantity))
        .ok_or_else(|| overflow(ticker, "total profit"))?;

    Ok(HoldingValuation {
        ticker: holding.ticker.clone(),
        quantity: holding.quantity,
        purchase_price: holding.purchase_price,
        price: quote.price,
        previous_close: quote.previous_close,
        change: quote.change,
        effective_price,
        price_basis,
        origin: resolved.origin,
        market_value,
        profit_total,
        daily_profit: daily_profit(quote, holding.quantity)?,
        stale: price_basis != PriceBasis::Live || !resolved.origin.is_live(),
    })
}

/// Values every holding and sums the portfolio.
///
/// A holding whose ticker is missing from `quotes` is valued as if its quote
/// were fully absent. Fails with a validation error when any amount or total
/// overflows.
pub fn value_portfolio(
    cash_balance: Decimal,
    holdings: &[Holding],
    quotes: &HashMap<String, ResolvedQuote>,
) -> Result<PortfolioValuation> {
    let mut valuations = Vec::with_capacity(holdings.len());
    let mut current_value = cash_balance;
    let mut total_profit = Decimal::ZERO;
    let mut daily_known = Decimal::ZERO;
    let mut daily_unknown = 0;

    for holding in holdings {
        let valuation = match quotes.get(&holding.ticker) {
            Some(resolved) => value_holding(holding, resolved)?,
            None => {
                debug!("No quote supplied for {}, valuing at cost", holding.ticker);
                let absent = ResolvedQuote {
                    quote: Quote::empty(holding.ticker.clone(), chrono::Utc::now()),
                    origin: QuoteOrigin::Missing,
                };
                value_holding(holding, &absent)?
            }
        };

        current_value = current_value
            .checked_add(valuation.market_value)
            .ok_or_else(|| overflow("portfolio", "current value"))?;
        total_profit = total_profit
            .checked_add(valuation.profit_total)
            .ok_or_else(|| overflow("portfolio", "total profit"))?;
        match valuation.daily_profit {
            Some(daily) => {
                daily_known = daily_known
                    .checked_add(daily)
                    .ok_or_else(|| overflow("portfolio", "daily profit"))?;
            }
            None => daily_unknown += 1,
        }
        valuations.push(valuation);
    }

    Ok(PortfolioValuation {
        cash_balance,
        current_value,
        total_profit,
        daily_profit: daily_known,
        daily_profit_unknown: daily_unknown,
        holdings: valuations,
    })
}
