/// Classification for how the provider chain reacts to an error.
///
/// # Behavior Summary
///
/// | Class | Try Next Provider? | Engage Global Cooldown? |
/// |-------|-------------------|-------------------------|
/// | `Never` | No | No |
/// | `Cooldown` | No (chain stops) | Yes |
/// | `NextProvider` | Yes | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Terminal for this request. Nothing else in the chain can help.
    Never,

    /// The upstream signalled quota exhaustion (HTTP 429).
    ///
    /// Rate limits are applied per client, not per symbol, so every further
    /// outbound call is suppressed until the cooldown window elapses. The
    /// chain stops at the provider that returned this error.
    Cooldown,

    /// This provider could not produce data (network failure, timeout,
    /// unparseable body, unknown symbol). A lower-priority provider might.
    NextProvider,
}

/// The caller-facing failure taxonomy.
///
/// Every [`MarketDataError`](super::MarketDataError) collapses into one of
/// these three kinds. None of them is ever surfaced to the end caller as a
/// hard error; they only decide how the resolver degrades.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// Provider-signalled quota exhaustion. Triggers the global cooldown.
    RateLimited,
    /// Network, timeout, parse or other provider failure.
    Unavailable,
    /// The ticker is unknown to every provider that was asked.
    NotFound,
}
