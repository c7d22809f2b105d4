//! Sort engine — (subset, key) → ordered sequence.
//!
//! Always a stable sort over a fresh vector, so equal keys keep the filter
//! engine's relative order and the input slice is never touched.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::listing::Listing;

/// Sort-menu choice. Wire names match the menu values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Ascending listing id.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    SizeAsc,
    SizeDesc,
    /// Most recently listed first.
    Newest,
}

impl SortKey {
    pub const ALL: [Self; 6] =
        [Self::Default, Self::Newest, Self::PriceAsc, Self::PriceDesc, Self::SizeDesc, Self::SizeAsc];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::SizeAsc => "size-asc",
            Self::SizeDesc => "size-desc",
            Self::Newest => "newest",
        }
    }

    /// Menu label, e.g. `"Price: Low to High"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "Default Order",
            Self::Newest => "Newest First",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::SizeDesc => "Size: Largest First",
            Self::SizeAsc => "Size: Smallest First",
        }
    }

    /// Lenient parse: unknown menu values fall back to [`SortKey::Default`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == raw.trim())
            .unwrap_or_default()
    }

    fn compare(self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            Self::Default => a.id.cmp(&b.id),
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::SizeAsc => a.area_sqft.cmp(&b.area_sqft),
            Self::SizeDesc => b.area_sqft.cmp(&a.area_sqft),
            Self::Newest => b.date_listed.cmp(&a.date_listed),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order a subset by `key`, returning a new vector.
#[must_use]
pub fn sort<'a>(listings: &[&'a Listing], key: SortKey) -> Vec<&'a Listing> {
    let mut ordered = listings.to_vec();
    ordered.sort_by(|a, b| key.compare(a, b));
    ordered
}

#[cfg(test)]
#[path = "sort_test.rs"]
mod tests;
