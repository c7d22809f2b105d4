//! Bundled seed data.

use crate::listing::{ListingError, ListingStore};

/// Location shortcuts offered under the search form.
pub const POPULAR_LOCATIONS: [&str; 4] = ["Los Angeles", "San Francisco", "San Diego", "Malibu"];

const SEED_LISTINGS: &str = include_str!("../data/listings.json");

/// Build the store the application starts with.
///
/// # Errors
///
/// Returns a [`ListingError`] if the bundled data is malformed.
pub fn seed_store() -> Result<ListingStore, ListingError> {
    ListingStore::from_json(SEED_LISTINGS)
}
