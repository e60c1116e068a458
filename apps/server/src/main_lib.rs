use std::sync::Arc;

use crate::config::Config;
use folio_core::quotes::{QuoteCache, QuoteFetcher, QuoteResolver, QuoteStore};
use folio_market_data::{
    CooldownTracker, MarketDataProvider, ProviderRegistry, RapidApiConfig, RapidApiQuotesProvider,
    RapidApiSummaryProvider, YahooPublicProvider,
};
use folio_storage_sqlite::{db, SqliteQuoteStore};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub resolver: Arc<QuoteResolver>,
    pub quote_store: Arc<dyn QuoteStore>,
    pub cooldown: Arc<CooldownTracker>,
    pub default_suffix: String,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Providers in fallback order. The RapidAPI pair needs a key; the public
/// endpoint is always last in the chain.
fn build_providers(config: &Config) -> anyhow::Result<Vec<Arc<dyn MarketDataProvider>>> {
    let mut providers: Vec<Arc<dyn MarketDataProvider>> = Vec::new();

    match &config.rapidapi_key {
        Some(key) => {
            let rapidapi = RapidApiConfig {
                api_key: key.clone(),
                host: config.rapidapi_host.clone(),
                base_url: config.rapidapi_base_url.clone(),
                region: config.region.clone(),
                timeout: config.provider_timeout,
            };
            providers.push(Arc::new(RapidApiQuotesProvider::new(rapidapi.clone())?));
            providers.push(Arc::new(RapidApiSummaryProvider::new(rapidapi)?));
        }
        None => tracing::warn!("RAPIDAPI_KEY not set; using the public Yahoo endpoint only"),
    }

    providers.push(Arc::new(YahooPublicProvider::new(
        config.yahoo_base_url.clone(),
        config.provider_timeout,
    )?));
    Ok(providers)
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());
    let quote_store: Arc<dyn QuoteStore> = Arc::new(SqliteQuoteStore::new(pool.clone(), writer));

    let registry = ProviderRegistry::new(build_providers(config)?);
    tracing::info!("Quote providers: {}", registry.provider_ids().join(" -> "));
    let fetcher: Arc<dyn QuoteFetcher> = Arc::new(registry);

    let cache = Arc::new(QuoteCache::new(config.cache_ttl, config.cache_max_entries));
    let cooldown = Arc::new(CooldownTracker::new(config.cooldown_window));
    let resolver = Arc::new(QuoteResolver::new(
        fetcher,
        quote_store.clone(),
        cache,
        cooldown.clone(),
    ));

    Ok(Arc::new(AppState {
        resolver,
        quote_store,
        cooldown,
        default_suffix: config.default_suffix.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_public_provider_only_without_key() {
        let providers = build_providers(&config_from(&[])).unwrap();
        let ids: Vec<_> = providers.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["YAHOO_PUBLIC"]);
    }

    #[test]
    fn test_key_enables_rapidapi_pair() {
        let providers = build_providers(&config_from(&[("RAPIDAPI_KEY", "secret")])).unwrap();
        let ids: Vec<_> = providers.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["RAPIDAPI_YAHOO", "RAPIDAPI_YAHOO_SUMMARY", "YAHOO_PUBLIC"]);
    }
}
