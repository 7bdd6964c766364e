use std::f64::consts::PI;
use std::fmt::Debug;

use crate::bounding_box::BoundingBox;

/// An OSM slippy-map tile with x, y and z-coordinate.
/// ref: <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tile {
    pub x: usize,
    pub y: usize,
    pub z: u8,
}

impl Tile {
    pub fn new(x: usize, y: usize, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Projects a coordinate given in degrees onto the tile grid of the
    /// given zoom level.
    ///
    /// Coordinates outside the Mercator domain (latitudes beyond roughly
    /// ±85°, longitudes beyond ±180°) produce out-of-range indices rather
    /// than an error.
    pub fn from_coords_and_zoom(lat_deg: f64, lon_deg: f64, zoom: u8) -> Self {
        // grid edge length
        let n = 2f64.powi(zoom as i32);

        let x = (lon_deg + 180f64) / 360f64 * n;
        let y = (1f64 - lat_deg.to_radians().tan().asinh() / PI) / 2f64 * n;

        Self::new(x as usize, y as usize, zoom)
    }
}

/// The inclusive tile index bounds covering a bounding box at one zoom level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TileRange {
    pub zoom: u8,
    pub x_min: usize,
    pub x_max: usize,
    pub y_min: usize,
    pub y_max: usize,
}

impl TileRange {
    /// Computes the range covering `bbox` at `zoom`.
    ///
    /// Row indices grow southward, so the north-west corner fixes the
    /// minimum column and row and the south-east corner the maximum.
    pub fn covering(bbox: &BoundingBox, zoom: u8) -> Self {
        let nw = Tile::from_coords_and_zoom(bbox.north(), bbox.west(), zoom);
        let se = Tile::from_coords_and_zoom(bbox.south(), bbox.east(), zoom);

        Self {
            zoom,
            x_min: nw.x,
            x_max: se.x,
            y_min: nw.y,
            y_max: se.y,
        }
    }

    /// Number of tiles in the range.
    pub fn count(&self) -> u64 {
        (self.x_max - self.x_min + 1) as u64 * (self.y_max - self.y_min + 1) as u64
    }

    /// Creates an iterator iterating over all tiles in the range.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + Debug {
        let Self {
            zoom,
            x_min,
            x_max,
            y_min,
            y_max,
        } = *self;

        (x_min..=x_max).flat_map(move |x| (y_min..=y_max).map(move |y| Tile::new(x, y, zoom)))
    }
}

/// Total number of tiles covering `bbox` over the zoom levels
/// `min_zoom..=max_zoom`.
pub fn count_tiles(bbox: &BoundingBox, min_zoom: u8, max_zoom: u8) -> u64 {
    (min_zoom..=max_zoom)
        .map(|zoom| TileRange::covering(bbox, zoom).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_matches_reference_values() {
        let tile = Tile::from_coords_and_zoom(50.7929, 6.0402, 18);
        assert_eq!((tile.x, tile.y), (135470, 87999));
    }

    #[test]
    fn projection_is_deterministic() {
        for (lat, lon) in [(-85.0, -180.0), (0.0, 0.0), (37.5, 12.0), (85.0, 179.9)] {
            let first = Tile::from_coords_and_zoom(lat, lon, 12);
            let second = Tile::from_coords_and_zoom(lat, lon, 12);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn zoom_zero_is_a_single_tile() {
        for (lat, lon) in [(-85.0, -180.0), (0.0, 0.0), (85.0, 179.9)] {
            let tile = Tile::from_coords_and_zoom(lat, lon, 0);
            assert_eq!((tile.x, tile.y), (0, 0));
        }
    }

    #[test]
    fn range_bounds_are_ordered() {
        let bbox = BoundingBox::algeria();
        for zoom in 0..=12 {
            let range = TileRange::covering(&bbox, zoom);
            assert!(range.x_min <= range.x_max);
            assert!(range.y_min <= range.y_max);
        }
    }

    #[test]
    fn algeria_range_at_zoom_six() {
        let range = TileRange::covering(&BoundingBox::algeria(), 6);
        assert_eq!((range.x_min, range.x_max), (30, 34));
        assert_eq!((range.y_min, range.y_max), (24, 28));
        assert_eq!(range.count(), 25);
    }

    #[test]
    fn unit_degree_bbox_at_zoom_five() {
        let bbox = BoundingBox::new(1.0, 1.0, 0.0, 0.0);
        let range = TileRange::covering(&bbox, 5);
        assert_eq!((range.x_min, range.x_max), (16, 16));
        assert_eq!((range.y_min, range.y_max), (15, 16));
        assert_eq!(range.count(), 2);
    }

    #[test]
    fn range_iterates_every_tile() {
        let range = TileRange {
            zoom: 3,
            x_min: 1,
            x_max: 2,
            y_min: 4,
            y_max: 6,
        };

        let tiles: Vec<Tile> = range.tiles().collect();
        assert_eq!(tiles.len() as u64, range.count());
        assert!(tiles.contains(&Tile::new(1, 4, 3)));
        assert!(tiles.contains(&Tile::new(2, 6, 3)));
    }

    #[test]
    fn count_tiles_sums_zoom_levels() {
        let bbox = BoundingBox::algeria();
        assert_eq!(count_tiles(&bbox, 6, 6), TileRange::covering(&bbox, 6).count());

        let summed: u64 = (6..=8).map(|z| TileRange::covering(&bbox, z).count()).sum();
        assert_eq!(count_tiles(&bbox, 6, 8), summed);
    }
}
