use std::time::Duration;

/// How long a cached quote counts as fresh
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Upper bound on cached tickers
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1024;

