use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::{prelude::*, stream};
use indicatif::ProgressBar;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::tile::{Tile, TileRange};

/// Pause after every successful download. The OpenStreetMap tile usage
/// policy caps bulk clients at two requests per second.
const REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Identifies this client to the tile server, required by the usage policy.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Why a single tile could not be fetched.
///
/// These errors are reported and counted but never abort a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
}

/// What happened to a single tile.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The tile file was already on disk; no request was made.
    AlreadyPresent,
    /// The tile was fetched and written to disk.
    Downloaded,
    /// The request failed; nothing was written.
    Failed(FetchError),
}

/// Outcome counts aggregated over a whole run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Report {
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl Report {
    fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::AlreadyPresent => self.skipped += 1,
            FetchOutcome::Downloaded => self.downloaded += 1,
            FetchOutcome::Failed(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded, {} skipped (existing), {} failed",
            self.downloaded, self.skipped, self.failed
        )
    }
}

/// Fetches a single tile into `output_folder`, skipping the request when the
/// destination file already exists.
///
/// Network and HTTP errors end up in [`FetchOutcome::Failed`]; only
/// filesystem errors surface as `Err` and abort the run.
pub async fn fetch_one(
    tile: Tile,
    client: &Client,
    url_fmt: &str,
    output_folder: &Path,
) -> Result<FetchOutcome> {
    let mut tile_dir = output_folder.join(tile.z.to_string());
    tile_dir.push(tile.x.to_string());
    let tile_path = tile_dir.join(format!("{}.png", tile.y));

    if tile_path.exists() {
        return Ok(FetchOutcome::AlreadyPresent);
    }

    let tile_url = url_fmt
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
        .replace("{z}", &tile.z.to_string());

    let response = match client.get(&tile_url).send().await {
        Ok(response) => response,
        Err(e) => return Ok(FetchOutcome::Failed(e.into())),
    };

    if !response.status().is_success() {
        return Ok(FetchOutcome::Failed(FetchError::Status(response.status())));
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return Ok(FetchOutcome::Failed(e.into())),
    };

    fs::create_dir_all(&tile_dir).await.with_context(|| {
        format!(
            "failed creating output directory for tile {}x{}x{}",
            tile.x, tile.y, tile.z
        )
    })?;
    fs::write(&tile_path, &body).await.with_context(|| {
        format!("failed saving tile {}x{}x{} to disk", tile.x, tile.y, tile.z)
    })?;

    tokio::time::sleep(REQUEST_DELAY).await;

    Ok(FetchOutcome::Downloaded)
}

/// Asynchronously fetch all tiles selected by `cfg` and save them to the
/// file system, one zoom level at a time.
///
/// Tiles within a zoom level are fetched concurrently by up to `cfg.workers`
/// tasks; a zoom level is fully drained before the next one starts. Tiles
/// already on disk are skipped, so re-running over the same output folder
/// only fetches what is still missing.
///
/// # Example
/// ```rust,no_run
/// use offline_tiles::{fetch, BoundingBox, Config, DEFAULT_TIMEOUT, OSM_TILE_URL};
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = Config {
///     bounding_box: BoundingBox::algeria(),
///     min_zoom: 6,
///     max_zoom: 10,
///     output_folder: "./tiles".into(),
///     url: OSM_TILE_URL.to_owned(),
///     workers: 4,
///     timeout: DEFAULT_TIMEOUT,
/// };
///
/// let report = fetch(&config).await.expect("failed fetching tiles");
/// println!("{report}");
/// # }
/// ```
///
/// # Panics
/// Panics if the specified output folder exists and is not a folder but a file.
pub async fn fetch(cfg: &Config) -> Result<Report> {
    assert!(
        !cfg.output_folder.exists() || cfg.output_folder.is_dir(),
        "output must be a directory",
    );

    if !cfg.output_folder.exists() {
        fs::create_dir_all(&cfg.output_folder)
            .await
            .context("failed to create root output directory")?;
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(cfg.timeout)
        .build()
        .context("failed creating HTTP client")?;

    let pb = ProgressBar::new(cfg.count_tiles());
    let mut report = Report::default();

    for zoom in cfg.min_zoom..=cfg.max_zoom {
        let range = TileRange::covering(&cfg.bounding_box, zoom);
        info!(zoom, tiles = range.count(), "fetching zoom level");

        let mut outcomes = stream::iter(range.tiles())
            .map(|tile| {
                let http_client = client.clone();
                let url = cfg.url.as_str();
                let output_folder = cfg.output_folder.as_path();

                async move {
                    let outcome = fetch_one(tile, &http_client, url, output_folder).await;
                    (tile, outcome)
                }
            })
            .buffer_unordered(cfg.workers);

        while let Some((tile, outcome)) = outcomes.next().await {
            let outcome = outcome?;
            if let FetchOutcome::Failed(e) = &outcome {
                warn!("failed fetching tile {}x{}x{}: {e}", tile.x, tile.y, tile.z);
            }

            report.record(&outcome);
            pb.inc(1);
        }
    }

    pb.finish();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_outcomes() {
        let mut report = Report::default();
        report.record(&FetchOutcome::Downloaded);
        report.record(&FetchOutcome::Downloaded);
        report.record(&FetchOutcome::AlreadyPresent);
        report.record(&FetchOutcome::Failed(FetchError::Status(
            StatusCode::INTERNAL_SERVER_ERROR,
        )));

        assert_eq!(
            report,
            Report {
                downloaded: 2,
                skipped: 1,
                failed: 1,
            }
        );
    }

    #[test]
    fn report_renders_summary_line() {
        let report = Report {
            downloaded: 3,
            skipped: 2,
            failed: 1,
        };

        assert_eq!(report.to_string(), "3 downloaded, 2 skipped (existing), 1 failed");
    }
}
