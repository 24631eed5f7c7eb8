//! Coordinates and their canonical cache identity.

use std::fmt;

use geo::Coord;

/// Number of decimal places kept by [`CoordinateKey`] and [`fallback_label`].
pub const KEY_PRECISION: usize = 6;

/// A latitude/longitude pair in degrees.
///
/// No range validation is performed; the provider decides what to make of
/// out-of-range values.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use sightline_core::Coordinate;
///
/// let sighting = Coordinate::new(-23.527, -46.933);
/// let coord: Coord = sighting.into();
/// assert_eq!(coord.x, -46.933);
/// assert_eq!(coord.y, -23.527);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinate {
    /// Construct a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Canonical key used for deduplication and caching.
    #[must_use]
    pub fn key(&self) -> CoordinateKey {
        CoordinateKey::from(*self)
    }
}

impl From<Coord> for Coordinate {
    fn from(coord: Coord) -> Self {
        Self::new(coord.y, coord.x)
    }
}

impl From<Coordinate> for Coord {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            x: coordinate.lng,
            y: coordinate.lat,
        }
    }
}

/// Canonical string identity of a [`Coordinate`].
///
/// Formed as `"{lat},{lng}"` with both values rounded to six decimal places.
/// Coordinates closer than the rounding step collapse onto the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateKey(String);

impl CoordinateKey {
    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Coordinate> for CoordinateKey {
    fn from(coordinate: Coordinate) -> Self {
        Self(format!(
            "{},{}",
            rounded(coordinate.lat),
            rounded(coordinate.lng)
        ))
    }
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CoordinateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Numeric label used when no address can be produced.
///
/// ```
/// use sightline_core::{Coordinate, fallback_label};
///
/// assert_eq!(
///     fallback_label(Coordinate::new(1.234567, 8.901234)),
///     "1.234567, 8.901234"
/// );
/// ```
#[must_use]
pub fn fallback_label(coordinate: Coordinate) -> String {
    format!(
        "{}, {}",
        rounded(coordinate.lat),
        rounded(coordinate.lng)
    )
}

/// Format `value` to [`KEY_PRECISION`] places, dropping the sign of a zero.
fn rounded(value: f64) -> String {
    let formatted = format!("{value:.prec$}", prec = KEY_PRECISION);
    match formatted.strip_prefix('-') {
        Some(unsigned) if unsigned.bytes().all(|byte| matches!(byte, b'0' | b'.')) => {
            unsigned.to_owned()
        }
        _ => formatted,
    }
}
