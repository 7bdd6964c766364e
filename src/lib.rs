//! Download OpenStreetMap-tiles to your disk en-masse for offline use.
//!
//! **Use with absolute caution.** Downloading tiles en-masse can hog
//! down a tile server easily. Keep the worker count low and leave the
//! built-in request delay in place, per the OSM tile usage policy.
//!
//! # CLI Example
//!
//! ```bash
//! offline-tiles \
//!   --bbox 19.0,-8.7,37.5,12.0 \
//!   --zoom 6-10 \
//!   --output ./tiles \
//!   --workers 4
//! ```
//!
//! # Library Example
//! ```rust,no_run
//! use offline_tiles::{fetch, BoundingBox, Config, DEFAULT_TIMEOUT, OSM_TILE_URL};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = Config {
//!     bounding_box: BoundingBox::new(37.5, 12.0, 19.0, -8.7),
//!     min_zoom: 6,
//!     max_zoom: 10,
//!     output_folder: "./tiles".into(),
//!     url: OSM_TILE_URL.to_owned(),
//!     workers: 4,
//!     timeout: DEFAULT_TIMEOUT,
//! };
//!
//! let report = fetch(&config).await.expect("failed fetching tiles");
//! println!("{report}");
//! # }
//! ```

mod bounding_box;
mod config;
mod fetch;
mod tile;

pub use bounding_box::BoundingBox;
pub use config::{Config, DEFAULT_TIMEOUT, OSM_TILE_URL};
pub use fetch::{fetch, fetch_one, FetchError, FetchOutcome, Report};
pub use tile::{count_tiles, Tile, TileRange};
