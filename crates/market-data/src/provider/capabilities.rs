//! Provider capabilities and rate limiting configuration.

/// Describes how a provider can be called.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Maximum number of tickers one request may carry.
    ///
    /// Batch endpoints accept a comma-separated symbol list; per-symbol
    /// endpoints report `1` and the registry calls them once per ticker.
    pub max_batch_size: usize,

    /// Whether the provider needs an API key to be useful.
    pub requires_api_key: bool,
}

/// Client-side rate limiting configuration for a provider.
///
/// Keeps us under the upstream quota so we rarely see a 429 in the first
/// place. The global cooldown handles the case where we do.
#[derive(Clone, Debug)]
pub struct RateLimit {
    /// Sustained requests allowed per minute.
    pub requests_per_minute: u32,

    /// Requests that may be issued back to back before throttling.
    pub burst_capacity: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            burst_capacity: 10,
        }
    }
}
