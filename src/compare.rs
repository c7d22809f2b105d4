//! Comparison set — up to four listings pinned for side-by-side review.
//!
//! DESIGN
//! ======
//! Members are stored as identifiers (insertion-ordered `Vec` + `HashSet`
//! for O(1) membership) so a selection survives re-filtering and re-sorting.
//! Resolution against the canonical store drops stale identifiers silently.

use std::collections::HashSet;

use crate::error::ErrorCode;
use crate::listing::{Listing, ListingId, ListingStore};

/// Maximum number of listings in the comparison set.
pub const COMPARE_LIMIT: usize = 4;

/// Minimum number of members before the comparison view can open.
pub const COMPARE_MIN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    #[error("You can only compare up to 4 properties at a time.")]
    LimitReached,
    #[error("select at least 2 properties to compare")]
    TooFew,
}

impl ErrorCode for CompareError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LimitReached => "E_COMPARE_LIMIT",
            Self::TooFew => "E_COMPARE_TOO_FEW",
        }
    }
}

/// Result of a successful toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonSet {
    order: Vec<ListingId>,
    members: HashSet<ListingId>,
}

impl ComparisonSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `id` if present, otherwise append it.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::LimitReached`] when adding to a full set; the
    /// set is left unchanged.
    pub fn toggle(&mut self, id: ListingId) -> Result<Toggled, CompareError> {
        if self.members.remove(&id) {
            self.order.retain(|m| *m != id);
            return Ok(Toggled::Removed);
        }
        if self.order.len() >= COMPARE_LIMIT {
            return Err(CompareError::LimitReached);
        }
        self.members.insert(id);
        self.order.push(id);
        Ok(Toggled::Added)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    #[must_use]
    pub fn contains(&self, id: ListingId) -> bool {
        self.members.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Stored identifiers in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[ListingId] {
        &self.order
    }

    /// Resolve identifiers to listings in insertion order, skipping ids no
    /// longer in the store.
    #[must_use]
    pub fn members<'a>(&self, store: &'a ListingStore) -> Vec<&'a Listing> {
        self.order.iter().filter_map(|id| store.get(*id)).collect()
    }

    /// Open slots left in the tray.
    #[must_use]
    pub fn remaining(&self) -> usize {
        COMPARE_LIMIT.saturating_sub(self.order.len())
    }
}

// =============================================================================
// COMPARISON TABLE
// =============================================================================

/// One row of the side-by-side table: a label and one cell per listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub cells: Vec<String>,
}

const ROW_LABELS: [&str; 6] = ["Price", "Property Type", "Address", "Bedrooms", "Bathrooms", "Area (sqft)"];

/// Build the feature rows for the comparison view.
#[must_use]
pub fn comparison_rows(listings: &[&Listing]) -> Vec<ComparisonRow> {
    ROW_LABELS
        .into_iter()
        .enumerate()
        .map(|(row, label)| ComparisonRow {
            label,
            cells: listings.iter().map(|l| cell(l, row)).collect(),
        })
        .collect()
}

fn cell(listing: &Listing, row: usize) -> String {
    match row {
        0 => format!("${}", group_thousands(listing.price)),
        1 => listing.property_type.label().to_string(),
        2 => listing.address.street.clone(),
        3 => listing.bedrooms.to_string(),
        4 => listing.bathrooms.to_string(),
        _ => group_thousands(u64::from(listing.area_sqft)),
    }
}

/// `1234567` → `"1,234,567"`.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "compare_test.rs"]
mod tests;
