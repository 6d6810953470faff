use tnb_data::{
    config::CrawlConfig,
    crawl::crawl_exchange,
    error::DataError,
    exchange::{ftx::FtxServer, poloniex::legacy::PoloniexLegacyServer},
    logging::init_logging,
};
use tnb_instrument::exchange::ExchangeId;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CrawlConfig::from_env()?;

    // Initialise INFO Tracing log subscriber, mirrored to <output_dir>/log.log
    init_logging(Some(config.output_dir.as_path()))?;

    info!(
        exchange = %config.exchange,
        pairs = config.pairs.len(),
        start = %config.start,
        end = %config.end,
        resolution = config.resolution,
        "starting crawl"
    );

    let reports = match config.exchange {
        ExchangeId::Ftx => crawl_exchange::<FtxServer>(&config).await?,
        ExchangeId::PoloniexLegacy => crawl_exchange::<PoloniexLegacyServer>(&config).await?,
        other => return Err(DataError::UnsupportedExchange(other.to_string()).into()),
    };

    info!(pairs = reports.len(), "crawl finished");
    Ok(())
}
