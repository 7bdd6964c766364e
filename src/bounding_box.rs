use std::fmt;
use std::str::FromStr;

/// A bounding box consisting of north, east, south and west coordinate
/// boundaries given in degrees.
///
/// # Example
/// ```rust
/// # use offline_tiles::BoundingBox;
/// let algeria = BoundingBox::new(37.5, 12.0, 19.0, -8.7);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    north: f64,
    west: f64,
    east: f64,
    south: f64,
}

impl BoundingBox {
    /// Create a new bounding box from coordinates specified in degrees
    /// (latitudes in [-90, 90], longitudes in [-180, 180]).
    ///
    /// # Example
    /// ```rust
    /// # use offline_tiles::BoundingBox;
    /// let algeria = BoundingBox::new(37.5, 12.0, 19.0, -8.7);
    /// ```
    ///
    /// # Panics
    /// Panics if a coordinate is outside its valid range, if `north <= south`
    /// or if `east <= west`.
    pub fn new(north: f64, east: f64, south: f64, west: f64) -> Self {
        assert!((-90.0..=90.0).contains(&north));
        assert!((-90.0..=90.0).contains(&south));
        assert!((-180.0..=180.0).contains(&east));
        assert!((-180.0..=180.0).contains(&west));
        assert!(north > south, "north boundary must be above south");
        assert!(east > west, "east boundary must be right of west");

        BoundingBox {
            north,
            east,
            south,
            west,
        }
    }

    /// The preset download region covering Algeria.
    pub fn algeria() -> Self {
        Self::new(37.5, 12.0, 19.0, -8.7)
    }

    /// Gets the north coordinate.
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Gets the east coordinate.
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Gets the south coordinate.
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Gets the west coordinate.
    pub fn west(&self) -> f64 {
        self.west
    }
}

impl FromStr for BoundingBox {
    type Err = String;

    /// Parses the CLI form `south,west,north,east` (degrees).
    fn from_str(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').collect();
        let [south, west, north, east] = parts[..] else {
            return Err("expected south,west,north,east".to_owned());
        };

        let mut coords = [0f64; 4];
        for (slot, part) in coords.iter_mut().zip([south, west, north, east]) {
            *slot = part
                .trim()
                .parse::<f64>()
                .map_err(|_| "coordinates must be numeric".to_owned())?;
        }
        let [south, west, north, east] = coords;

        if !(-90.0..=90.0).contains(&north) || !(-90.0..=90.0).contains(&south) {
            return Err("latitudes must be within -90..90°".to_owned());
        }
        if !(-180.0..=180.0).contains(&east) || !(-180.0..=180.0).contains(&west) {
            return Err("longitudes must be within -180..180°".to_owned());
        }
        if north <= south {
            return Err("north boundary must be above south".to_owned());
        }
        if east <= west {
            return Err("east boundary must be right of west".to_owned());
        }

        Ok(BoundingBox {
            north,
            east,
            south,
            west,
        })
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}°..{}° N, {}°..{}° E",
            self.south, self.north, self.west, self.east
        )
    }
}
