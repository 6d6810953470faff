use chrono::{Duration, Utc};
use ndarray::Axis;
use std::path::Path;
use tnb_data::{
    dataset::CryptoCandleDataset, logging::init_logging, merge::to_training_columns,
    request::CryptoDataRequest,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise INFO Tracing log subscriber
    init_logging(None)?;

    let end = Utc::now();
    let start = end - Duration::days(7);

    // Fetch one week of 5 minute candles and persist them as CSV alongside the run
    let fetch = CryptoDataRequest::new()?
        .request_with_gaps(
            "BTC_USDT",
            start,
            end,
            "poloniex",
            300,
            Some(Path::new("btc_usdt_5m.csv")),
        )
        .await?;

    info!(
        rows = fetch.table.len(),
        missing = fetch.missing.len(),
        "fetched candles"
    );

    let table = to_training_columns(fetch.table);

    // Normalise every window by its first row so samples are scale free
    let dataset = CryptoCandleDataset::new(&table, 32, ["Open", "High", "Low", "Close"])?
        .with_transform(|window| {
            let first = window.index_axis(Axis(0), 0).to_owned();
            &window / &first
        });

    info!(samples = dataset.len(), "built dataset");

    if let Some(sample) = dataset.iter().next() {
        info!(shape = ?sample.shape(), "first sample");
    }

    Ok(())
}
