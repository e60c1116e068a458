use std::sync::Arc;
use std::time::Duration;

use httpmock::Method::GET;
use httpmock::MockServer;
use rust_decimal_macros::dec;

use folio_market_data::{
    MarketDataError, MarketDataProvider, ProviderRegistry, RapidApiConfig, RapidApiQuotesProvider,
    RapidApiSummaryProvider, RetryClass, YahooPublicProvider,
};

fn tickers(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

fn rapidapi_config(server: &MockServer) -> RapidApiConfig {
    let mut config = RapidApiConfig::new("test-key");
    config.base_url = server.base_url();
    config.timeout = Duration::from_secs(2);
    config
}

fn yahoo(server: &MockServer) -> YahooPublicProvider {
    YahooPublicProvider::new(server.base_url(), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn yahoo_v7_batch_happy_path() {
    let server = MockServer::start();

    let body = r#"{
      "quoteResponse": {
        "result": [
          {"symbol": "BHP.AX", "regularMarketPrice": 45.12, "regularMarketPreviousClose": 44.80, "regularMarketChange": 0.32},
          {"symbol": "CBA.AX", "regularMarketPrice": 110.5}
        ],
        "error": null
      }
    }"#;

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .query_param("symbols", "BHP.AX,CBA.AX");
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    });

    let quotes = yahoo(&server)
        .get_latest_quotes(&tickers(&["BHP.AX", "CBA.AX"]))
        .await
        .unwrap();
    mock.assert();

    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].ticker, "BHP.AX");
    assert_eq!(quotes[0].price, Some(dec!(45.12)));
    assert_eq!(quotes[0].previous_close, Some(dec!(44.80)));
    assert_eq!(quotes[0].change, Some(dec!(0.32)));
    assert_eq!(quotes[0].source, "YAHOO_PUBLIC");
    assert_eq!(quotes[1].previous_close, None);
}

#[tokio::test]
async fn yahoo_429_is_rate_limited() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v7/finance/quote");
        then.status(429).body("Too Many Requests");
    });

    let err = yahoo(&server)
        .get_latest_quotes(&tickers(&["BHP.AX"]))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::RateLimited { .. }));
    assert_eq!(err.retry_class(), RetryClass::Cooldown);
}

#[tokio::test]
async fn yahoo_404_is_symbol_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v7/finance/quote");
        then.status(404);
    });

    let err = yahoo(&server)
        .get_latest_quotes(&tickers(&["ZZZ.AX"]))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::SymbolNotFound(ref t) if t == "ZZZ.AX"));
}

#[tokio::test]
async fn server_error_is_provider_error_with_excerpt() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v7/finance/quote");
        then.status(503).body("upstream unavailable");
    });

    let err = yahoo(&server)
        .get_latest_quotes(&tickers(&["BHP.AX"]))
        .await
        .unwrap_err();
    match err {
        MarketDataError::ProviderError { provider, message } => {
            assert_eq!(provider, "YAHOO_PUBLIC");
            assert!(message.contains("503"));
            assert!(message.contains("upstream unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn garbage_body_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v7/finance/quote");
        then.status(200).body("<html>not json</html>");
    });

    let err = yahoo(&server)
        .get_latest_quotes(&tickers(&["BHP.AX"]))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::MalformedResponse { .. }));
    assert_eq!(err.retry_class(), RetryClass::NextProvider);
}

#[tokio::test]
async fn empty_bodies_yield_no_quotes() {
    for body in ["", "{}", r#"{"quoteResponse": {"result": []}}"#] {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v7/finance/quote");
            then.status(200).body(body);
        });

        let quotes = yahoo(&server)
            .get_latest_quotes(&tickers(&["BHP.AX"]))
            .await
            .unwrap();
        assert!(quotes.is_empty(), "body {body:?} produced quotes");
    }
}

#[tokio::test]
async fn rapidapi_sends_key_region_and_symbols() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/market/v2/get-quotes")
            .query_param("region", "AU")
            .query_param("symbols", "WES.AX")
            .header("x-rapidapi-key", "test-key")
            .header("x-rapidapi-host", "apidojo-yahoo-finance-v1.p.rapidapi.com");
        then.status(200).body(
            r#"{"quoteResponse": {"result": [{"symbol": "WES.AX", "regularMarketPrice": 71.2}]}}"#,
        );
    });

    let provider = RapidApiQuotesProvider::new(rapidapi_config(&server)).unwrap();
    let quotes = provider
        .get_latest_quotes(&tickers(&["WES.AX"]))
        .await
        .unwrap();
    mock.assert();

    assert_eq!(quotes[0].price, Some(dec!(71.2)));
    assert_eq!(quotes[0].source, "RAPIDAPI_YAHOO");
}

#[tokio::test]
async fn rapidapi_bad_key_is_provider_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/market/v2/get-quotes");
        then.status(403).body(r#"{"message":"You are not subscribed to this API."}"#);
    });

    let provider = RapidApiQuotesProvider::new(rapidapi_config(&server)).unwrap();
    let err = provider
        .get_latest_quotes(&tickers(&["WES.AX"]))
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::ProviderError { ref message, .. } if message.contains("API key")));
}

#[tokio::test]
async fn rapidapi_summary_reads_wrapped_numbers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/stock/v2/get-summary")
            .query_param("symbol", "NAB.AX")
            .query_param("region", "AU");
        then.status(200).body(
            r#"{"price": {"regularMarketPrice": {"raw": 35.1, "fmt": "35.10"}, "regularMarketPreviousClose": {"raw": 34.9}}}"#,
        );
    });

    let provider = RapidApiSummaryProvider::new(rapidapi_config(&server)).unwrap();
    let quotes = provider
        .get_latest_quotes(&tickers(&["NAB.AX"]))
        .await
        .unwrap();
    mock.assert();

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].ticker, "NAB.AX");
    assert_eq!(quotes[0].price, Some(dec!(35.1)));
    assert_eq!(quotes[0].previous_close, Some(dec!(34.9)));
    assert_eq!(quotes[0].change, None);
}

#[tokio::test]
async fn chain_falls_back_from_rapidapi_to_yahoo() {
    let server = MockServer::start();

    // Batch endpoint knows only BHP.AX; summary has nothing; Yahoo knows CBA.AX.
    let batch = server.mock(|when, then| {
        when.method(GET).path("/market/v2/get-quotes");
        then.status(200).body(
            r#"{"quoteResponse": {"result": [{"symbol": "BHP.AX", "regularMarketPrice": 45.0}]}}"#,
        );
    });
    let summary = server.mock(|when, then| {
        when.method(GET).path("/stock/v2/get-summary");
        then.status(200).body("{}");
    });
    let public = server.mock(|when, then| {
        when.method(GET)
            .path("/v7/finance/quote")
            .query_param("symbols", "CBA.AX");
        then.status(200).body(
            r#"{"quoteResponse": {"result": [{"symbol": "CBA.AX", "regularMarketPreviousClose": 110.0}]}}"#,
        );
    });

    let config = rapidapi_config(&server);
    let registry = ProviderRegistry::new(vec![
        Arc::new(yahoo(&server)),
        Arc::new(RapidApiQuotesProvider::new(config.clone()).unwrap()),
        Arc::new(RapidApiSummaryProvider::new(config).unwrap()),
    ]);

    let fetch = registry
        .fetch_batch(&tickers(&["BHP.AX", "CBA.AX"]))
        .await;

    batch.assert_calls(1);
    summary.assert_calls(1);
    public.assert_calls(1);

    assert!(fetch.failure.is_none());
    assert_eq!(fetch.quotes["BHP.AX"].source, "RAPIDAPI_YAHOO");
    assert_eq!(fetch.quotes["CBA.AX"].source, "YAHOO_PUBLIC");
    assert_eq!(fetch.quotes["CBA.AX"].previous_close, Some(dec!(110.0)));
}

#[tokio::test]
async fn chain_stops_on_rate_limit() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/market/v2/get-quotes");
        then.status(429);
    });
    let public = server.mock(|when, then| {
        when.method(GET).path("/v7/finance/quote");
        then.status(200).body(
            r#"{"quoteResponse": {"result": [{"symbol": "BHP.AX", "regularMarketPrice": 45.0}]}}"#,
        );
    });

    let registry = ProviderRegistry::new(vec![
        Arc::new(RapidApiQuotesProvider::new(rapidapi_config(&server)).unwrap()),
        Arc::new(yahoo(&server)),
    ]);

    let fetch = registry.fetch_batch(&tickers(&["BHP.AX"])).await;

    assert!(matches!(fetch.failure, Some(MarketDataError::RateLimited { .. })));
    assert!(fetch.quotes.is_empty());
    public.assert_calls(0);
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    // Nothing listens on port 9 of the loopback interface in test environments.
    let provider =
        YahooPublicProvider::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = provider
        .get_latest_quotes(&tickers(&["BHP.AX"]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MarketDataError::Network { .. } | MarketDataError::Timeout { .. }
    ));
}
