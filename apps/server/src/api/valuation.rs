use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState, models::ValuationRequest};
use axum::{extract::State, routing::post, Json, Router};
use folio_core::errors::ValidationError;
use folio_core::{value_portfolio, Holding, PortfolioValuation};
use folio_market_data::normalize_ticker;

async fn value(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValuationRequest>,
) -> ApiResult<Json<PortfolioValuation>> {
    let mut holdings: Vec<Holding> = Vec::with_capacity(request.holdings.len());
    for input in request.holdings {
        let ticker = normalize_ticker(&input.ticker, &state.default_suffix)
            .ok_or_else(|| ValidationError::MissingField("ticker".to_string()))
            .map_err(folio_core::Error::from)?;
        let holding = input.into_holding(ticker);
        holding.validate()?;
        holdings.push(holding);
    }

    let tickers: Vec<String> = holdings.iter().map(|h| h.ticker.clone()).collect();
    let quotes = state.resolver.resolve_batch(&tickers).await;
    let valuation = value_portfolio(request.cash_balance, &holdings, &quotes)?;
    Ok(Json(valuation))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/valuation", post(value))
}
