use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use folio_core::constants::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL};
use folio_market_data::provider::rapidapi::{
    DEFAULT_RAPIDAPI_BASE_URL, DEFAULT_RAPIDAPI_HOST, DEFAULT_REGION,
};
use folio_market_data::provider::yahoo::DEFAULT_YAHOO_BASE_URL;
use folio_market_data::{DEFAULT_COOLDOWN_WINDOW, DEFAULT_EXCHANGE_SUFFIX};

/// Process configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub cooldown_window: Duration,
    pub provider_timeout: Duration,
    pub region: String,
    pub default_suffix: String,
    /// Enables the RapidAPI providers when set.
    pub rapidapi_key: Option<String>,
    pub rapidapi_base_url: String,
    pub rapidapi_host: String,
    pub yahoo_base_url: String,
    pub log_format: String,
}

impl Config {
    /// Loads `.env` if present, then reads `FOLIO_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Unset variables take their defaults; set but unparseable ones are an
    /// error.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let listen_addr: SocketAddr = parse(&lookup, "FOLIO_LISTEN_ADDR", "0.0.0.0:8080")?;
        let cache_ttl_secs: u64 =
            parse(&lookup, "FOLIO_CACHE_TTL_SECS", &DEFAULT_CACHE_TTL.as_secs().to_string())?;
        let cache_max_entries: usize = parse(
            &lookup,
            "FOLIO_CACHE_MAX_ENTRIES",
            &DEFAULT_CACHE_MAX_ENTRIES.to_string(),
        )?;
        if cache_max_entries == 0 {
            return Err(anyhow!("FOLIO_CACHE_MAX_ENTRIES must be at least 1"));
        }
        let cooldown_secs: u64 = parse(
            &lookup,
            "FOLIO_COOLDOWN_SECS",
            &DEFAULT_COOLDOWN_WINDOW.as_secs().to_string(),
        )?;
        let provider_timeout_secs: u64 = parse(&lookup, "FOLIO_PROVIDER_TIMEOUT_SECS", "6")?;
        let timeout_ms: u64 = parse(&lookup, "FOLIO_REQUEST_TIMEOUT_MS", "30000")?;

        let log_format = text("FOLIO_LOG_FORMAT", "text").to_lowercase();
        if log_format != "text" && log_format != "json" {
            return Err(anyhow!(
                "Invalid FOLIO_LOG_FORMAT '{}': expected 'text' or 'json'",
                log_format
            ));
        }

        let cors_allow = text("FOLIO_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            listen_addr,
            db_path: text("FOLIO_DB_PATH", "./db/quotes.db"),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_max_entries,
            cooldown_window: Duration::from_secs(cooldown_secs),
            provider_timeout: Duration::from_secs(provider_timeout_secs),
            region: text("FOLIO_REGION", DEFAULT_REGION),
            default_suffix: text("FOLIO_DEFAULT_SUFFIX", DEFAULT_EXCHANGE_SUFFIX),
            rapidapi_key: lookup("RAPIDAPI_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            rapidapi_base_url: text("FOLIO_RAPIDAPI_BASE_URL", DEFAULT_RAPIDAPI_BASE_URL),
            rapidapi_host: text("FOLIO_RAPIDAPI_HOST", DEFAULT_RAPIDAPI_HOST),
            yahoo_base_url: text("FOLIO_YAHOO_BASE_URL", DEFAULT_YAHOO_BASE_URL),
            log_format,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string());
    raw.parse::<T>()
        .with_context(|| format!("Invalid {} '{}'", key, raw))
}
