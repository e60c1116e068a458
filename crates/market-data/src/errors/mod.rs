//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The error enum returned by every provider call
//! - [`RetryClass`]: How the provider chain reacts to an error
//! - [`FailureKind`]: The three-way taxonomy the resolver degrades on

mod retry;

pub use retry::{FailureKind, RetryClass};

use thiserror::Error;

/// Errors that can occur while fetching quotes from a provider.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method and into a [`FailureKind`] via
/// [`kind`](Self::kind).
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The request never produced an HTTP response (DNS, connect, TLS, reset).
    #[error("Network error: {provider} - {message}")]
    Network {
        /// The provider being called
        provider: String,
        /// The underlying transport error
        message: String,
    },

    /// The provider answered, but the body could not be decoded.
    #[error("Malformed response: {provider} - {message}")]
    MalformedResponse {
        /// The provider that returned the body
        provider: String,
        /// The decode failure
        message: String,
    },

    /// A provider-specific error occurred (unexpected HTTP status, bad key).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// No providers are configured, or all of them were skipped.
    #[error("No providers available")]
    NoProvidersAvailable,
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "YAHOO_PUBLIC".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::Cooldown);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID.AX".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::NextProvider);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::RateLimited { .. } => RetryClass::Cooldown,

            Self::SymbolNotFound(_)
            | Self::Timeout { .. }
            | Self::Network { .. }
            | Self::MalformedResponse { .. }
            | Self::ProviderError { .. } => RetryClass::NextProvider,

            Self::NoProvidersAvailable => RetryClass::Never,
        }
    }

    /// Collapses this error into the caller-facing failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RateLimited { .. } => FailureKind::RateLimited,
            Self::SymbolNotFound(_) => FailureKind::NotFound,
            Self::Timeout { .. }
            | Self::Network { .. }
            | Self::MalformedResponse { .. }
            | Self::ProviderError { .. }
            | Self::NoProvidersAvailable => FailureKind::Unavailable,
        }
    }

    /// Maps a transport-level `reqwest` error for `provider`.
    ///
    /// Timeouts are kept distinct so they can be logged as such, but they
    /// degrade exactly like any other network failure.
    pub fn from_transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else if err.is_decode() {
            Self::MalformedResponse {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Network {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        }
    }
}
