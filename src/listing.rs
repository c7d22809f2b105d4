//! Listing store — the canonical set of property records.
//!
//! DESIGN
//! ======
//! Listings are immutable apart from `is_favorited`. The store owns the only
//! copy of each record; filtered and sorted views hold identifiers or fresh
//! clones computed after every transition, so a favorite flip is visible
//! everywhere on the next projection.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::ErrorCode;

// =============================================================================
// IDENTITY + CLASSIFICATION
// =============================================================================

/// Stable, session-unique listing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub u32);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Property classification as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
    Plot,
}

impl PropertyType {
    pub const ALL: [Self; 4] = [Self::House, Self::Apartment, Self::Condo, Self::Plot];

    /// Display name, e.g. `"House"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
            Self::Condo => "Condo",
            Self::Plot => "Plot",
        }
    }

    /// Case-insensitive lookup by display name.
    #[must_use]
    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// LISTING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// A single property record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub price: u64,
    pub address: Address,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub area_sqft: u32,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub description: String,
    #[serde(rename = "dateListed", with = "date_format")]
    pub date_listed: Date,
    #[serde(rename = "isFavorited", default)]
    pub is_favorited: bool,
}

/// `YYYY-MM-DD` on the wire. Malformed dates fail deserialization so they
/// never reach the sort engine.
mod date_format {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;
    use time::macros::format_description;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("duplicate listing id {0}")]
    DuplicateId(ListingId),
    #[error("listing {0} has non-positive area")]
    InvalidArea(ListingId),
    #[error("listing {0} has invalid bathroom count")]
    InvalidBathrooms(ListingId),
    #[error("listing payload parse failed: {0}")]
    Parse(String),
}

impl ErrorCode for ListingError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "E_DUPLICATE_LISTING",
            Self::InvalidArea(_) => "E_INVALID_AREA",
            Self::InvalidBathrooms(_) => "E_INVALID_BATHROOMS",
            Self::Parse(_) => "E_LISTING_PARSE",
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Canonical listing set, kept in load order with an id index.
#[derive(Debug, Clone, Default)]
pub struct ListingStore {
    listings: Vec<Listing>,
    index: HashMap<ListingId, usize>,
}

impl ListingStore {
    /// Build a store, rejecting duplicate ids and impossible dimensions.
    ///
    /// # Errors
    ///
    /// Returns a [`ListingError`] naming the first offending listing.
    pub fn new(listings: Vec<Listing>) -> Result<Self, ListingError> {
        let mut index = HashMap::with_capacity(listings.len());
        for (pos, listing) in listings.iter().enumerate() {
            if listing.area_sqft == 0 {
                return Err(ListingError::InvalidArea(listing.id));
            }
            if !listing.bathrooms.is_finite() || listing.bathrooms < 0.0 {
                return Err(ListingError::InvalidBathrooms(listing.id));
            }
            if index.insert(listing.id, pos).is_some() {
                return Err(ListingError::DuplicateId(listing.id));
            }
        }
        Ok(Self { listings, index })
    }

    /// Parse a JSON array of listings and build a store from it.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Parse`] for malformed JSON (including bad
    /// `dateListed` values) and the validation errors of [`Self::new`].
    pub fn from_json(json: &str) -> Result<Self, ListingError> {
        let listings: Vec<Listing> = serde_json::from_str(json).map_err(|e| ListingError::Parse(e.to_string()))?;
        Self::new(listings)
    }

    #[must_use]
    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ListingId) -> Option<&Listing> {
        self.index.get(&id).map(|&pos| &self.listings[pos])
    }

    #[must_use]
    pub fn contains(&self, id: ListingId) -> bool {
        self.index.contains_key(&id)
    }

    /// Flip the favorite flag. Returns the new value, or `None` for an
    /// unknown id.
    pub fn toggle_favorite(&mut self, id: ListingId) -> Option<bool> {
        let pos = *self.index.get(&id)?;
        let listing = &mut self.listings[pos];
        listing.is_favorited = !listing.is_favorited;
        Some(listing.is_favorited)
    }

    /// Drop a listing from the canonical set. Identifiers held elsewhere
    /// (e.g. the comparison set) become stale and resolve to nothing.
    #[cfg(test)]
    pub fn remove(&mut self, id: ListingId) -> Option<Listing> {
        let pos = self.index.remove(&id)?;
        let removed = self.listings.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;
