//! Filter engine — (listings, criteria) → matching subset.
//!
//! DESIGN
//! ======
//! `apply` is pure and stable: it never reorders and never mutates its
//! inputs. Every predicate is a conjunction term that only removes listings
//! it applies to. Enumerated criteria parse leniently: an unrecognized value
//! behaves like "any" so a half-edited form never empties the result list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::listing::{Listing, PropertyType};

/// Upper bound of the manual price slider and the initial price ceiling.
pub const PRICE_SLIDER_MAX: u64 = 2_000_000;
/// Manual price slider granularity.
pub const PRICE_SLIDER_STEP: u64 = 50_000;

// =============================================================================
// CRITERIA PARTS
// =============================================================================

/// Property type constraint. Wire form is `"any"` or the lower-cased type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyTypeFilter {
    #[default]
    Any,
    Only(PropertyType),
}

impl PropertyTypeFilter {
    /// Lenient parse: unknown values become [`PropertyTypeFilter::Any`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        PropertyType::from_label(raw).map_or(Self::Any, Self::Only)
    }

    #[must_use]
    pub fn matches(self, listing: &Listing) -> bool {
        match self {
            Self::Any => true,
            Self::Only(t) => listing.property_type == t,
        }
    }
}

impl fmt::Display for PropertyTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Only(t) => f.write_str(&t.label().to_ascii_lowercase()),
        }
    }
}

impl From<String> for PropertyTypeFilter {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<PropertyTypeFilter> for String {
    fn from(value: PropertyTypeFilter) -> Self {
        value.to_string()
    }
}

/// Minimum bedroom count. Wire form is `"any"`, `"1"`..`"4"` or `"5+"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BedroomThreshold {
    #[default]
    Any,
    AtLeast(u32),
}

impl BedroomThreshold {
    /// Threshold shown as `"5+"` and the ceiling for extracted counts.
    pub const TOP: u32 = 5;

    /// Lenient parse: `"5+"` means 5, integers mean themselves, anything
    /// else is [`BedroomThreshold::Any`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "5+" {
            return Self::AtLeast(Self::TOP);
        }
        raw.parse::<u32>().map_or(Self::Any, Self::AtLeast)
    }

    #[must_use]
    pub fn matches(self, listing: &Listing) -> bool {
        match self {
            Self::Any => true,
            Self::AtLeast(min) => listing.bedrooms >= min,
        }
    }
}

impl fmt::Display for BedroomThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::AtLeast(Self::TOP) => f.write_str("5+"),
            Self::AtLeast(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for BedroomThreshold {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<BedroomThreshold> for String {
    fn from(value: BedroomThreshold) -> Self {
        value.to_string()
    }
}

/// Inclusive price bound. `min <= max` is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u64; 2]", into = "[u64; 2]")]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    #[must_use]
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(self, price: u64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self { min: 0, max: PRICE_SLIDER_MAX }
    }
}

impl From<[u64; 2]> for PriceRange {
    fn from([min, max]: [u64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<PriceRange> for [u64; 2] {
    fn from(range: PriceRange) -> Self {
        [range.min, range.max]
    }
}

// =============================================================================
// CRITERIA
// =============================================================================

/// The active manual-search constraints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against city, state, or zip.
    pub location: String,
    pub property_type: PropertyTypeFilter,
    pub price_range: PriceRange,
    pub bedrooms: BedroomThreshold,
}

impl FilterCriteria {
    /// Merge a partial update field by field. Absent fields are untouched.
    pub fn merge(&mut self, patch: &CriteriaPatch) {
        if let Some(location) = &patch.location {
            self.location.clone_from(location);
        }
        if let Some(property_type) = patch.property_type {
            self.property_type = property_type;
        }
        if let Some(price_range) = patch.price_range {
            self.price_range = price_range;
        }
        if let Some(bedrooms) = patch.bedrooms {
            self.bedrooms = bedrooms;
        }
    }

    fn location_matches(&self, listing: &Listing) -> bool {
        if self.location.is_empty() {
            return true;
        }
        let needle = self.location.to_lowercase();
        let address = &listing.address;
        [&address.city, &address.state, &address.zip]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// `true` when every predicate keeps the listing.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        self.location_matches(listing)
            && self.property_type.matches(listing)
            && self.bedrooms.matches(listing)
            && self.price_range.contains(listing.price)
    }
}

/// Partial criteria: `Some` fields replace, `None` fields are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyTypeFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<BedroomThreshold>,
}

impl CriteriaPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.property_type.is_none() && self.price_range.is_none() && self.bedrooms.is_none()
    }

    #[must_use]
    pub fn location(location: impl Into<String>) -> Self {
        Self { location: Some(location.into()), ..Self::default() }
    }
}

/// Snap a slider value down to [`PRICE_SLIDER_STEP`] within
/// `0..=PRICE_SLIDER_MAX`.
#[must_use]
pub fn snap_to_slider(value: u64) -> u64 {
    let clamped = value.min(PRICE_SLIDER_MAX);
    clamped - clamped % PRICE_SLIDER_STEP
}

// =============================================================================
// ENGINE
// =============================================================================

/// Keep the listings matching every criterion, in input order.
#[must_use]
pub fn apply<'a>(listings: &'a [Listing], criteria: &FilterCriteria) -> Vec<&'a Listing> {
    listings.iter().filter(|l| criteria.matches(l)).collect()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
