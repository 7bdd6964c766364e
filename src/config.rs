use std::path::PathBuf;
use std::time::Duration;

use crate::bounding_box::BoundingBox;
use crate::tile::count_tiles;

/// The OpenStreetMap tile server URL with the replacement specifiers
/// `{z}`, `{x}` and `{y}`.
pub const OSM_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Default timeout for fetching a single tile.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tile fetching configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Bounding box to download tiles for.
    pub bounding_box: BoundingBox,

    /// The minimum zoom level to fetch.
    pub min_zoom: u8,

    /// The maximum zoom level to fetch.
    pub max_zoom: u8,

    /// The folder to output the tiles to.
    pub output_folder: PathBuf,

    /// The URL to download individual tiles from including the replacement
    /// specifiers `{x}`, `{y}` and `{z}`.
    pub url: String,

    /// Maximum number of parallel downloads within one zoom level.
    /// Must be at least 1.
    pub workers: usize,

    /// Timeout for fetching a single tile.
    pub timeout: Duration,
}

impl Config {
    /// Total number of tiles this configuration selects.
    pub fn count_tiles(&self) -> u64 {
        count_tiles(&self.bounding_box, self.min_zoom, self.max_zoom)
    }
}
