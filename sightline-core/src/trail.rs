//! Numbered, address-annotated listing of a dog's sightings.
//!
//! A trail keeps one row per input coordinate, duplicates included, in input
//! order. Addresses come from a single batch resolution; each row looks its
//! address up again by its own key.

use std::fmt;

use crate::coordinate::{Coordinate, fallback_label};
use crate::geocoder::ReverseGeocoder;
use crate::resolver::AddressResolver;

/// One row of a [`SightingTrail`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrailEntry {
    /// One-based position in the trail.
    pub index: usize,
    /// Coordinate as supplied by the caller.
    pub coordinate: Coordinate,
    /// Resolved address (possibly the numeric fallback).
    pub address: String,
}

impl fmt::Display for TrailEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = format!("{}. ", self.index);
        let indent = " ".repeat(prefix.len());
        let mut lines = self.address.lines();
        write!(f, "{prefix}{}", lines.next().unwrap_or_default())?;
        for line in lines {
            write!(f, "\n{indent}{line}")?;
        }
        write!(f, " ({})", fallback_label(self.coordinate))
    }
}

/// Sightings paired with their resolved addresses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SightingTrail {
    entries: Vec<TrailEntry>,
}

impl SightingTrail {
    /// Resolve `coordinates` through `resolver` and number the results.
    ///
    /// An empty slice yields an empty trail without touching the resolver.
    pub async fn resolve<G: ReverseGeocoder>(
        resolver: &AddressResolver<G>,
        coordinates: &[Coordinate],
    ) -> Self {
        if coordinates.is_empty() {
            return Self::default();
        }
        let addresses = resolver.resolve_batch(coordinates).await;
        let entries = coordinates
            .iter()
            .enumerate()
            .map(|(offset, coordinate)| TrailEntry {
                index: offset + 1,
                coordinate: *coordinate,
                address: addresses
                    .get(&coordinate.key())
                    .cloned()
                    .unwrap_or_else(|| fallback_label(*coordinate)),
            })
            .collect();
        Self { entries }
    }

    /// Rows in input order.
    #[must_use]
    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trail has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for SightingTrail {
    type Item = TrailEntry;
    type IntoIter = std::vec::IntoIter<TrailEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a SightingTrail {
    type Item = &'a TrailEntry;
    type IntoIter = std::slice::Iter<'a, TrailEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
