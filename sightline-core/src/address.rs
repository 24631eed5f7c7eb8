//! Compose short, two-line postal addresses from provider place details.
//!
//! The first line carries the street, house number and neighbourhood
//! (`"Rua A, 10 - Centro"`); the second carries postcode, city and state
//! (`"01000-000 São Paulo - SP"`). When neither line can be built the
//! provider's display name is truncated to three segments, and failing that
//! the coordinate itself is used.

use crate::coordinate::{Coordinate, fallback_label};

/// Number of comma-separated display-name segments kept as a fallback.
const DISPLAY_NAME_SEGMENTS: usize = 3;

/// Structured address fields returned by a reverse geocoder.
///
/// Every field is optional. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AddressComponents {
    /// House or building number; some providers spell the key `housenumber`.
    #[cfg_attr(feature = "serde", serde(alias = "housenumber"))]
    pub house_number: Option<String>,
    /// Road name.
    pub road: Option<String>,
    /// Street name, used by some providers instead of `road`.
    pub street: Option<String>,
    /// Pedestrian way.
    pub pedestrian: Option<String>,
    /// Residential way.
    pub residential: Option<String>,
    /// Neighbourhood name.
    pub neighbourhood: Option<String>,
    /// Suburb name.
    pub suburb: Option<String>,
    /// City district.
    pub city_district: Option<String>,
    /// Postal code.
    pub postcode: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// Town name.
    pub town: Option<String>,
    /// Village name.
    pub village: Option<String>,
    /// Hamlet name.
    pub hamlet: Option<String>,
    /// County name.
    pub county: Option<String>,
    /// State name or abbreviation.
    pub state: Option<String>,
    /// Region name.
    pub region: Option<String>,
    /// State district.
    pub state_district: Option<String>,
}

impl AddressComponents {
    fn house(&self) -> Option<&str> {
        first_present([&self.house_number])
    }

    fn road_name(&self) -> Option<&str> {
        first_present([
            &self.road,
            &self.street,
            &self.pedestrian,
            &self.residential,
            &self.neighbourhood,
        ])
    }

    fn district(&self) -> Option<&str> {
        first_present([&self.neighbourhood, &self.suburb, &self.city_district])
    }

    fn locality(&self) -> Option<&str> {
        first_present([
            &self.city,
            &self.town,
            &self.village,
            &self.hamlet,
            &self.county,
        ])
    }

    fn region_name(&self) -> Option<&str> {
        first_present([&self.state, &self.region, &self.state_district])
    }

    fn postal_code(&self) -> Option<&str> {
        first_present([&self.postcode])
    }

    /// `"{road}, {house} - {district}"`, omitting whatever is missing.
    fn street_line(&self) -> Option<String> {
        let road = self.road_name();
        let mut line = match (road, self.house()) {
            (Some(road), Some(house)) => Some(format!("{road}, {house}")),
            (Some(road), None) => Some(road.to_owned()),
            (None, _) => None,
        };
        // The district is skipped when it already stood in for the road.
        if let Some(district) = self.district().filter(|district| Some(*district) != road) {
            line = Some(match line {
                Some(street) => format!("{street} - {district}"),
                None => district.to_owned(),
            });
        }
        line
    }

    /// `"{postcode} {city} - {state}"`, omitting whatever is missing.
    fn locality_line(&self) -> Option<String> {
        let city_state = [self.locality(), self.region_name()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" - ");
        match (self.postal_code(), city_state.is_empty()) {
            (Some(postcode), false) => Some(format!("{postcode} {city_state}")),
            (Some(postcode), true) => Some(postcode.to_owned()),
            (None, false) => Some(city_state),
            (None, true) => None,
        }
    }
}

/// Provider-neutral result of a reverse geocoding request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaceDetails {
    /// Structured address, if the provider returned one.
    pub address: Option<AddressComponents>,
    /// Free-text description of the place.
    pub display_name: Option<String>,
}

impl PlaceDetails {
    /// Details carrying only a structured address.
    #[must_use]
    pub fn with_address(address: AddressComponents) -> Self {
        Self {
            address: Some(address),
            display_name: None,
        }
    }

    /// Details carrying only a display name.
    #[must_use]
    pub fn with_display_name(display_name: impl Into<String>) -> Self {
        Self {
            address: None,
            display_name: Some(display_name.into()),
        }
    }
}

/// Format `place` as a short address, falling back to `coordinate`.
///
/// # Examples
///
/// ```
/// use sightline_core::{AddressComponents, Coordinate, PlaceDetails, short_address};
///
/// let address = AddressComponents {
///     road: Some("Rua A".into()),
///     house_number: Some("10".into()),
///     neighbourhood: Some("Centro".into()),
///     postcode: Some("01000-000".into()),
///     city: Some("São Paulo".into()),
///     state: Some("SP".into()),
///     ..AddressComponents::default()
/// };
/// let place = PlaceDetails::with_address(address);
///
/// assert_eq!(
///     short_address(&place, Coordinate::new(-23.5, -46.6)),
///     "Rua A, 10 - Centro\n01000-000 São Paulo - SP"
/// );
/// ```
#[must_use]
pub fn short_address(place: &PlaceDetails, coordinate: Coordinate) -> String {
    let (street, locality) = place
        .address
        .as_ref()
        .map_or((None, None), |address| {
            (address.street_line(), address.locality_line())
        });
    match (street, locality) {
        (Some(street), Some(locality)) => format!("{street}\n{locality}"),
        (Some(line), None) | (None, Some(line)) => line,
        (None, None) => place
            .display_name
            .as_deref()
            .and_then(truncate_display_name)
            .unwrap_or_else(|| fallback_label(coordinate)),
    }
}

fn truncate_display_name(display_name: &str) -> Option<String> {
    let truncated = display_name
        .split(',')
        .take(DISPLAY_NAME_SEGMENTS)
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ");
    (!truncated.is_empty()).then_some(truncated)
}

fn first_present<const N: usize>(candidates: [&Option<String>; N]) -> Option<&str> {
    candidates
        .into_iter()
        .filter_map(Option::as_deref)
        .find(|value| !value.trim().is_empty())
}
