use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::QuoteResponse,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use folio_market_data::normalize_ticker;
use serde::Deserialize;

#[derive(Deserialize)]
struct QuotesQuery {
    tickers: Option<String>,
}

/// Normalizes a comma-separated ticker list, dropping blanks and repeats
/// while keeping the caller's order.
pub(crate) fn parse_tickers(raw: &str, default_suffix: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .filter_map(|t| normalize_ticker(t, default_suffix))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

async fn get_quotes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuotesQuery>,
) -> ApiResult<Json<Vec<QuoteResponse>>> {
    let tickers = parse_tickers(query.tickers.as_deref().unwrap_or(""), &state.default_suffix);
    if tickers.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one ticker is required".to_string(),
        ));
    }

    let mut resolved = state.resolver.resolve_batch(&tickers).await;
    let quotes = tickers
        .iter()
        .filter_map(|t| resolved.remove(t))
        .map(QuoteResponse::from)
        .collect();
    Ok(Json(quotes))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/quotes", get(get_quotes))
}
