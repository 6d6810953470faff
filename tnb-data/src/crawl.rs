use crate::{
    config::CrawlConfig,
    error::DataError,
    exchange::CandleServer,
    rest::{IntervalPaginator, MissingWindow, RestCandleClient, Window},
};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use tnb_instrument::pair::CurrencyPair;
use tracing::{Instrument, debug, error, info, warn};

/// Summary of one [`Crawler::crawl`] run.
#[derive(Clone, Debug, PartialEq)]
pub struct CrawlReport {
    pub market: String,
    /// Files written, in window order.
    pub written: Vec<PathBuf>,
    /// Windows skipped because the exchange rejected them.
    pub missing: Vec<MissingWindow>,
}

/// Dumps raw window responses to disk, one JSON file per window.
///
/// Files land at `<output_dir>/<market>/<start>-<end>.json`, with any `/` in the market name
/// replaced by `_`. Only HTTP 200 bodies are persisted; rejected windows leave no file behind and
/// are listed in [`CrawlReport::missing`] instead.
#[derive(Debug, Clone)]
pub struct Crawler<Server> {
    client: RestCandleClient<Server>,
    output_dir: PathBuf,
}

impl<Server> Crawler<Server>
where
    Server: CandleServer,
{
    pub fn new<P: Into<PathBuf>>(client: RestCandleClient<Server>, output_dir: P) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory that receives the window files of `market`.
    pub fn market_dir(&self, market: &str) -> PathBuf {
        self.output_dir.join(market.replace('/', "_"))
    }

    /// Crawl `pair` over `[start, end)`, one request per window, writing each 200 body verbatim.
    ///
    /// Non-200 windows are logged and listed in [`CrawlReport::missing`]. A transport fault
    /// aborts the crawl; files already written are kept.
    pub async fn crawl(
        &self,
        pair: &CurrencyPair,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resolution: u32,
        page_size: u32,
    ) -> Result<CrawlReport, DataError> {
        let market = pair.market(Server::ID);
        let span = tracing::info_span!("crawl", exchange = %Server::ID, market = %market);

        async {
            let windows =
                IntervalPaginator::from_range(start, end, resolution, page_size, Server::TIME_UNIT)?
                    .collect::<Vec<_>>();
            let total = windows.len();
            let market_dir = self.market_dir(&market);

            info!(windows = total, dir = %market_dir.display(), "start crawling");

            let mut report = CrawlReport {
                market: market.clone(),
                written: Vec::with_capacity(total),
                missing: Vec::new(),
            };

            for (index, window) in windows.into_iter().enumerate() {
                debug!(%window, index = index + 1, total, "current interval");

                let response = self
                    .client
                    .fetch_window(&market, window, resolution, page_size)
                    .await?;

                if response.status != StatusCode::OK {
                    warn!(%window, status = %response.status, "window rejected, skipping");
                    report.missing.push(MissingWindow {
                        window,
                        status: response.status,
                    });
                    continue;
                }

                let path = window_file_path(&market_dir, window);
                tokio::fs::create_dir_all(&market_dir).await?;
                tokio::fs::write(&path, &response.body).await?;
                report.written.push(path);
            }

            info!(
                written = report.written.len(),
                missing = report.missing.len(),
                "finished crawling"
            );

            Ok::<_, DataError>(report)
        }
        .instrument(span)
        .await
    }

    /// Crawl each pair in turn, one at a time.
    ///
    /// A fault aborts the remainder of that pair only, keeping whatever it already wrote. Once
    /// every pair has been attempted the first such error is returned, otherwise one report per
    /// pair.
    pub async fn crawl_pairs(
        &self,
        pairs: &[CurrencyPair],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        resolution: u32,
        page_size: u32,
    ) -> Result<Vec<CrawlReport>, DataError> {
        let mut reports = Vec::with_capacity(pairs.len());
        let mut first_error = None;

        for pair in pairs {
            match self.crawl(pair, start, end, resolution, page_size).await {
                Ok(report) => {
                    info!(
                        %pair,
                        written = report.written.len(),
                        missing = report.missing.len(),
                        "pair crawled"
                    );
                    reports.push(report);
                }
                Err(error) => {
                    error!(%pair, %error, "pair crawl aborted");
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(reports),
        }
    }
}

/// Crawl every configured pair from the `Server` production API into `config.output_dir`.
pub async fn crawl_exchange<Server>(config: &CrawlConfig) -> Result<Vec<CrawlReport>, DataError>
where
    Server: CandleServer,
{
    let client = RestCandleClient::<Server>::new()?.with_timeout(config.request_timeout)?;

    Crawler::new(client, config.output_dir.clone())
        .crawl_pairs(
            &config.pairs,
            config.start,
            config.end,
            config.resolution,
            config.page_size,
        )
        .await
}

/// `<dir>/<start>-<end>.json`
pub fn window_file_path(dir: &Path, window: Window) -> PathBuf {
    dir.join(format!("{window}.json"))
}

/// Parse a window back out of a `<start>-<end>.json` file name.
pub fn parse_window_file_name(name: &str) -> Option<Window> {
    let (start, end) = name.strip_suffix(".json")?.split_once('-')?;
    Some(Window::new(start.parse().ok()?, end.parse().ok()?))
}
