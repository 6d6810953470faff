#![cfg(feature = "rest")]

use chrono::DateTime;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use tnb_data::{
    crawl::{Crawler, parse_window_file_name, window_file_path},
    error::DataError,
    exchange::{ftx::FtxServer, poloniex::legacy::PoloniexLegacyServer},
    merge::{merge_window_files, to_training_columns},
    rest::{RestCandleClient, Window},
};
use tnb_instrument::pair::CurrencyPair;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const START: i64 = 1_495_032_490;

/// Fixture: `returnChartData` rows opening at `date`.
fn chart_data(date: i64) -> serde_json::Value {
    json!([{
        "date": date,
        "high": 1800.0,
        "low": 1790.0,
        "open": 1795.0,
        "close": 1798.0,
        "volume": 12.3,
        "quoteVolume": 0.0068,
        "weightedAverage": 1796.1
    }])
}

async fn mount_window(mock_server: &MockServer, window: Window, template: ResponseTemplate) {
    mount_market_window(mock_server, "USDT_BTC", window, template).await;
}

async fn mount_market_window(
    mock_server: &MockServer,
    market: &str,
    window: Window,
    template: ResponseTemplate,
) {
    Mock::given(method("GET"))
        .and(path("/public"))
        .and(query_param("command", "returnChartData"))
        .and(query_param("currencyPair", market))
        .and(query_param("period", "300"))
        .and(query_param("start", window.start.to_string()))
        .and(query_param("end", window.end.to_string()))
        .respond_with(template)
        .expect(1)
        .mount(mock_server)
        .await;
}

// ---------------------------------------------------------------------------
// Test 1: 200 bodies land on disk verbatim, rejected windows are reported
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_crawl_writes_window_files_then_merges() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // 300s x 10 per page: step 3000s -> 3 windows over 9500s
    let windows = [0, 1, 2].map(|n| Window::new(START + n * 3_000, START + (n + 1) * 3_000));

    mount_window(
        &mock_server,
        windows[0],
        ResponseTemplate::new(200).set_body_json(chart_data(windows[0].start)),
    )
    .await;
    mount_window(
        &mock_server,
        windows[1],
        ResponseTemplate::new(502).set_body_string("bad gateway"),
    )
    .await;
    mount_window(
        &mock_server,
        windows[2],
        ResponseTemplate::new(200).set_body_json(chart_data(windows[2].start)),
    )
    .await;

    let client =
        RestCandleClient::<PoloniexLegacyServer>::with_base_url(mock_server.uri()).unwrap();
    let crawler = Crawler::new(client, dir.path());

    let report = crawler
        .crawl(
            &CurrencyPair::new("btc", "usdt"),
            DateTime::from_timestamp(START, 0).unwrap(),
            DateTime::from_timestamp(START + 9_500, 0).unwrap(),
            300,
            10,
        )
        .await
        .unwrap();

    assert_eq!(report.market, "USDT_BTC");
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.missing.len(), 1);
    assert_eq!(report.missing[0].window, windows[1]);
    assert_eq!(report.missing[0].status, StatusCode::BAD_GATEWAY);

    let market_dir = dir.path().join("USDT_BTC");
    let written_windows = report
        .written
        .iter()
        .map(|path| {
            assert!(path.starts_with(&market_dir));
            parse_window_file_name(path.file_name().unwrap().to_str().unwrap()).unwrap()
        })
        .collect::<Vec<_>>();
    assert_eq!(written_windows, vec![windows[0], windows[2]]);

    // Body is persisted verbatim
    let body: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&report.written[0]).unwrap()).unwrap();
    assert_eq!(body, chart_data(windows[0].start));

    let merged = merge_window_files::<PoloniexLegacyServer>(&market_dir).unwrap();
    let table = to_training_columns(merged);
    assert_eq!(
        table.columns(),
        ["Date", "High", "Low", "Open", "Close", "Volume"]
    );
    assert_eq!(table.len(), 2);
    assert_eq!(table.value(0, "Date"), Some(&json!(windows[0].start)));
    assert_eq!(table.value(1, "Date"), Some(&json!(windows[2].start)));
}

// ---------------------------------------------------------------------------
// Test 2: FTX market names are made filesystem safe
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_crawl_ftx_market_dir() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/markets/ETH/USDT/candles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [{"time": 1.0, "close": 2.0}]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = RestCandleClient::<FtxServer>::with_base_url(mock_server.uri()).unwrap();
    let crawler = Crawler::new(client, dir.path());

    // 15s x 100 per page: step 1500s -> 2 windows over 4000s
    let report = crawler
        .crawl(
            &"eth/usdt".parse().unwrap(),
            DateTime::from_timestamp(START, 0).unwrap(),
            DateTime::from_timestamp(START + 4_000, 0).unwrap(),
            15,
            100,
        )
        .await
        .unwrap();

    assert_eq!(report.market, "ETH/USDT");
    assert_eq!(crawler.market_dir(&report.market), dir.path().join("ETH_USDT"));
    assert_eq!(report.written.len(), 2);

    let table = merge_window_files::<FtxServer>(&dir.path().join("ETH_USDT")).unwrap();
    assert_eq!(table.len(), 2);
}

// ---------------------------------------------------------------------------
// Test 3: an unsupported legacy period fails before any request is sent
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_crawl_rejects_unsupported_period() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client =
        RestCandleClient::<PoloniexLegacyServer>::with_base_url(mock_server.uri()).unwrap();
    let result = Crawler::new(client, dir.path())
        .crawl(
            &CurrencyPair::new("btc", "usdt"),
            DateTime::from_timestamp(START, 0).unwrap(),
            DateTime::from_timestamp(START + 9_500, 0).unwrap(),
            60,
            10,
        )
        .await;

    assert!(result.is_err());
    assert!(!dir.path().join("USDT_BTC").exists());
}

// ---------------------------------------------------------------------------
// Test 4: a timeout aborts only its own pair and keeps the files already written
// ---------------------------------------------------------------------------
#[tokio::test]
async fn test_crawl_pairs_timeout_aborts_one_pair_only() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // 300s x 10 per page: step 3000s -> 2 windows over 6500s
    let windows = [0, 1].map(|n| Window::new(START + n * 3_000, START + (n + 1) * 3_000));

    mount_market_window(
        &mock_server,
        "USDT_BTC",
        windows[0],
        ResponseTemplate::new(200).set_body_json(chart_data(windows[0].start)),
    )
    .await;
    mount_market_window(
        &mock_server,
        "USDT_BTC",
        windows[1],
        ResponseTemplate::new(200)
            .set_body_json(chart_data(windows[1].start))
            .set_delay(Duration::from_secs(2)),
    )
    .await;
    for window in windows {
        mount_market_window(
            &mock_server,
            "USDT_ETH",
            window,
            ResponseTemplate::new(200).set_body_json(chart_data(window.start)),
        )
        .await;
    }

    let client = RestCandleClient::<PoloniexLegacyServer>::with_base_url(mock_server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(200))
        .unwrap();
    let crawler = Crawler::new(client, dir.path());

    let result = crawler
        .crawl_pairs(
            &[CurrencyPair::new("btc", "usdt"), CurrencyPair::new("eth", "usdt")],
            DateTime::from_timestamp(START, 0).unwrap(),
            DateTime::from_timestamp(START + 6_500, 0).unwrap(),
            300,
            10,
        )
        .await;

    assert!(matches!(result, Err(DataError::Transport(_))));

    let btc_dir = dir.path().join("USDT_BTC");
    assert!(window_file_path(&btc_dir, windows[0]).exists());
    assert!(!window_file_path(&btc_dir, windows[1]).exists());

    let eth_dir = dir.path().join("USDT_ETH");
    for window in windows {
        assert!(window_file_path(&eth_dir, window).exists());
    }
    assert_eq!(
        merge_window_files::<PoloniexLegacyServer>(&eth_dir)
            .unwrap()
            .len(),
        2
    );
}
