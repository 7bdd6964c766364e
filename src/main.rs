use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dialoguer::Confirm;
use tracing_subscriber::EnvFilter;

use offline_tiles::{fetch, BoundingBox, Config, DEFAULT_TIMEOUT, OSM_TILE_URL};

/// Rough on-disk size of one tile, used for the pre-flight estimate.
const EST_TILE_BYTES: u64 = 4 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct Cli {
    /// The folder to output the tiles to
    #[arg(
        short,
        long,
        value_name = "OUTPUT_DIR",
        default_value = "public/tiles/algeria"
    )]
    output: PathBuf,

    /// Zoom levels to fetch, as a single level or an inclusive min-max range
    #[arg(short, long, value_name = "ZOOM", default_value = "6-10")]
    zoom: ZoomRange,

    /// Bounding box as south,west,north,east in degrees (defaults to Algeria)
    #[arg(short, long, value_name = "BBOX")]
    bbox: Option<BoundingBox>,

    /// The number of parallel download workers
    #[arg(short, long, value_name = "WORKERS", default_value = "4")]
    workers: NonZeroUsize,
}

/// An inclusive zoom level range, given on the CLI as `6-10` or `8`.
#[derive(Debug, Clone, Copy)]
struct ZoomRange {
    min: u8,
    max: u8,
}

impl FromStr for ZoomRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, String> {
        let (min, max) = match value.split_once('-') {
            Some((min, max)) => (min, max),
            None => (value, value),
        };

        let min = min
            .trim()
            .parse::<u8>()
            .map_err(|_| "zoom levels must be numeric".to_owned())?;
        let max = max
            .trim()
            .parse::<u8>()
            .map_err(|_| "zoom levels must be numeric".to_owned())?;

        if min > max {
            return Err("zoom range must be ascending".to_owned());
        }

        Ok(Self { min, max })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = Config {
        bounding_box: cli.bbox.unwrap_or_else(BoundingBox::algeria),
        min_zoom: cli.zoom.min,
        max_zoom: cli.zoom.max,
        output_folder: cli.output,
        url: OSM_TILE_URL.to_owned(),
        workers: cli.workers.get(),
        timeout: DEFAULT_TIMEOUT,
    };

    let total = config.count_tiles();

    println!("OpenStreetMap tile downloader");
    println!("  Output directory: {}", config.output_folder.display());
    println!("  Zoom levels:      {} to {}", config.min_zoom, config.max_zoom);
    println!("  Bounding box:     {}", config.bounding_box);
    println!("  Workers:          {}", config.workers);
    println!("  Tiles to fetch:   {total}");
    println!(
        "  Estimated size:   {:.1} MB",
        (total * EST_TILE_BYTES) as f64 / (1024.0 * 1024.0)
    );
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Start download?")
        .default(true)
        .interact()
        .context("failed reading confirmation")?;

    if !confirmed {
        bail!("download cancelled");
    }

    let report = fetch(&config).await?;
    println!("Download complete: {report}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_range_parses_single_level() {
        let range: ZoomRange = "8".parse().unwrap();
        assert_eq!((range.min, range.max), (8, 8));
    }

    #[test]
    fn zoom_range_parses_min_max() {
        let range: ZoomRange = "6-10".parse().unwrap();
        assert_eq!((range.min, range.max), (6, 10));
    }

    #[test]
    fn zoom_range_rejects_garbage() {
        assert!("six".parse::<ZoomRange>().is_err());
        assert!("10-6".parse::<ZoomRange>().is_err());
        assert!("-3".parse::<ZoomRange>().is_err());
    }

    #[test]
    fn cli_args_are_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
