//! Shared HTTP plumbing for the JSON quote endpoints.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::MarketDataError;

/// Browser-like user agent; Yahoo rejects requests without one.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Longest body excerpt carried into an error message.
const MAX_ERROR_BODY: usize = 200;

/// Build an HTTP client with a fixed per-call timeout.
///
/// Fails when the TLS backend cannot be initialised.
pub(crate) fn build_client(provider: &str, timeout: Duration) -> Result<Client, MarketDataError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// Send `request` and decode a JSON body of type `T`.
///
/// An empty 200 body decodes to `T::default()`. Status codes map onto the
/// error taxonomy: 429 is a rate limit, 404 an unknown symbol, anything else
/// unsuccessful a provider error.
pub(crate) async fn get_json<T>(
    provider: &str,
    label: &str,
    request: RequestBuilder,
) -> Result<T, MarketDataError>
where
    T: DeserializeOwned + Default,
{
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| MarketDataError::from_transport(provider, e))?;

    let status = response.status();
    debug!("{} responded {} for {}", provider, status, label);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(MarketDataError::SymbolNotFound(label.to_string()));
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("HTTP {} - invalid or missing API key", status.as_u16()),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| MarketDataError::from_transport(provider, e))?;

    if !status.is_success() {
        let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
        return Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("HTTP {} - {}", status.as_u16(), excerpt),
        });
    }

    if body.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&body).map_err(|e| MarketDataError::MalformedResponse {
        provider: provider.to_string(),
        message: e.to_string(),
    })
}
