//! View coordinator — one state container, one transition per user intent.
//!
//! DESIGN
//! ======
//! `ViewState` owns the canonical listings, live criteria, sort key,
//! comparison set, detail selection, and chat transcript. Every intent is an
//! [`Action`] applied by [`ViewState::dispatch`], which mutates the relevant
//! slice and then recomputes the filtered+sorted [`Projection`] before
//! returning. No transition leaves the projection stale.
//!
//! The projection stores identifiers, not copies, so favorite flips are
//! visible through it without a re-filter. It is still recomputed after
//! every action for uniformity.
//!
//! Chat is split into two actions: `ChatSubmitted` records the user's message
//! and raises the pending flag; `ChatResolved` carries the extraction result
//! back in. The async call between them lives in `session`.

use tracing::{debug, info, warn};

use crate::assistant::{self, AiExtraction, AssistantError};
use crate::chat::{APPLIED_REPLY, ChatRole, FAILED_REPLY, Transcript};
use crate::compare::{COMPARE_MIN, CompareError, ComparisonRow, ComparisonSet, comparison_rows};
use crate::error::ErrorCode;
use crate::filter::{self, CriteriaPatch, FilterCriteria, snap_to_slider};
use crate::listing::{Listing, ListingId, ListingStore};
use crate::sort::{self, SortKey};

// =============================================================================
// ACTIONS + NOTICES
// =============================================================================

/// A discrete intent from the presentation layer or a network completion.
#[derive(Debug)]
pub enum Action {
    /// Merge a partial criteria update.
    SetCriteria(CriteriaPatch),
    /// Replace the criteria wholesale.
    ReplaceCriteria(FilterCriteria),
    /// Manual price slider: sets the ceiling, keeps the floor.
    SetMaxPrice(u64),
    SetSort(SortKey),
    ToggleCompare(ListingId),
    ClearCompare,
    OpenComparison,
    CloseComparison,
    ToggleFavorite(ListingId),
    OpenDetail(ListingId),
    CloseDetail,
    /// Popular-location shortcut; sugar for a location-only `SetCriteria`.
    SelectLocation(String),
    OpenChat,
    CloseChat,
    /// User sent a chat message.
    ChatSubmitted(String),
    /// The extraction for the pending chat message finished.
    ChatResolved(Result<AiExtraction, AssistantError>),
}

/// Non-fatal outcome surfaced to the user (or silently dropped by the
/// front end). State is unchanged when a notice is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Notice {
    #[error(transparent)]
    Compare(#[from] CompareError),
    #[error("message is empty")]
    EmptyMessage,
    #[error("assistant is still working on the previous message")]
    ChatBusy,
    #[error("no listing with id {0}")]
    UnknownListing(ListingId),
}

impl ErrorCode for Notice {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Compare(e) => e.error_code(),
            Self::EmptyMessage => "E_EMPTY_MESSAGE",
            Self::ChatBusy => "E_CHAT_BUSY",
            Self::UnknownListing(_) => "E_UNKNOWN_LISTING",
        }
    }
}

// =============================================================================
// PROJECTION
// =============================================================================

/// The filtered-then-sorted listing ids plus the size of the canonical set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub ids: Vec<ListingId>,
    pub total: usize,
}

impl Projection {
    #[must_use]
    pub fn shown(&self) -> usize {
        self.ids.len()
    }

    /// "Showing N of M properties".
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Showing {} of {} properties", self.shown(), self.total)
    }
}

// =============================================================================
// VIEW STATE
// =============================================================================

#[derive(Debug, Clone)]
pub struct ViewState {
    store: ListingStore,
    criteria: FilterCriteria,
    sort_key: SortKey,
    compare: ComparisonSet,
    comparison_open: bool,
    detail: Option<ListingId>,
    transcript: Transcript,
    chat_open: bool,
    chat_pending: bool,
    projection: Projection,
}

impl ViewState {
    /// Start a session over `store` with default criteria and sort.
    #[must_use]
    pub fn new(store: ListingStore) -> Self {
        let mut state = Self {
            store,
            criteria: FilterCriteria::default(),
            sort_key: SortKey::default(),
            compare: ComparisonSet::new(),
            comparison_open: false,
            detail: None,
            transcript: Transcript::new(),
            chat_open: false,
            chat_pending: false,
            projection: Projection::default(),
        };
        state.reproject();
        state
    }

    /// Apply one transition and refresh the projection.
    ///
    /// # Errors
    ///
    /// Returns a [`Notice`] when the action is refused; nothing is mutated
    /// in that case.
    pub fn dispatch(&mut self, action: Action) -> Result<(), Notice> {
        debug!(?action, "state: dispatch");
        let result = self.apply(action);
        self.reproject();
        result
    }

    fn apply(&mut self, action: Action) -> Result<(), Notice> {
        match action {
            Action::SetCriteria(patch) => self.criteria.merge(&patch),
            Action::ReplaceCriteria(criteria) => self.criteria = criteria,
            Action::SetMaxPrice(value) => self.criteria.price_range.max = snap_to_slider(value),
            Action::SetSort(key) => self.sort_key = key,
            Action::ToggleCompare(id) => {
                // Stale members may still be removed; unknown ids never enter.
                if !self.compare.contains(id) && !self.store.contains(id) {
                    return Err(Notice::UnknownListing(id));
                }
                self.compare.toggle(id)?;
                if self.resolved_compare_count() < COMPARE_MIN {
                    self.comparison_open = false;
                }
            }
            Action::ClearCompare => {
                self.compare.clear();
                self.comparison_open = false;
            }
            Action::OpenComparison => {
                if self.resolved_compare_count() < COMPARE_MIN {
                    return Err(CompareError::TooFew.into());
                }
                self.comparison_open = true;
            }
            Action::CloseComparison => self.comparison_open = false,
            Action::ToggleFavorite(id) => {
                if let Some(now) = self.store.toggle_favorite(id) {
                    debug!(%id, favorited = now, "state: favorite toggled");
                }
            }
            Action::OpenDetail(id) => self.detail = self.store.contains(id).then_some(id),
            Action::CloseDetail => self.detail = None,
            Action::SelectLocation(location) => self.criteria.merge(&CriteriaPatch::location(location)),
            Action::OpenChat => {
                self.chat_open = true;
                self.transcript.greet_if_empty();
            }
            Action::CloseChat => self.chat_open = false,
            Action::ChatSubmitted(text) => {
                if text.trim().is_empty() {
                    return Err(Notice::EmptyMessage);
                }
                if self.chat_pending {
                    return Err(Notice::ChatBusy);
                }
                self.transcript.push(ChatRole::User, text);
                self.chat_pending = true;
            }
            Action::ChatResolved(result) => self.resolve_chat(result),
        }
        Ok(())
    }

    /// Criteria change only on a valid extraction; a failure leaves them
    /// untouched and appends exactly one assistant message.
    fn resolve_chat(&mut self, result: Result<AiExtraction, AssistantError>) {
        self.chat_pending = false;
        match result {
            Ok(extraction) => {
                let patch = assistant::to_criteria(&extraction, &self.criteria);
                info!(?patch, "state: applying extracted filters");
                self.criteria.merge(&patch);
                self.transcript.push(ChatRole::Assistant, APPLIED_REPLY);
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "state: extraction failed");
                self.transcript.push(ChatRole::Assistant, FAILED_REPLY);
            }
        }
    }

    fn resolved_compare_count(&self) -> usize {
        self.compare
            .ids()
            .iter()
            .filter(|id| self.store.contains(**id))
            .count()
    }

    fn reproject(&mut self) {
        let filtered = filter::apply(self.store.all(), &self.criteria);
        let ordered = sort::sort(&filtered, self.sort_key);
        self.projection = Projection { ids: ordered.iter().map(|l| l.id).collect(), total: self.store.len() };
    }

    // -------------------------------------------------------------------------
    // Read side
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn store(&self) -> &ListingStore {
        &self.store
    }

    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    #[must_use]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The projection resolved to listings, in display order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Listing> {
        self.projection
            .ids
            .iter()
            .filter_map(|id| self.store.get(*id))
            .collect()
    }

    #[must_use]
    pub fn comparison(&self) -> &ComparisonSet {
        &self.compare
    }

    /// Resolved comparison members, insertion ordered.
    #[must_use]
    pub fn comparison_members(&self) -> Vec<&Listing> {
        self.compare.members(&self.store)
    }

    #[must_use]
    pub fn comparison_rows(&self) -> Vec<ComparisonRow> {
        comparison_rows(&self.comparison_members())
    }

    /// The tray shows whenever anything is pinned.
    #[must_use]
    pub fn tray_visible(&self) -> bool {
        !self.compare.is_empty()
    }

    #[must_use]
    pub fn comparison_open(&self) -> bool {
        self.comparison_open
    }

    #[must_use]
    pub fn detail(&self) -> Option<&Listing> {
        self.detail.and_then(|id| self.store.get(id))
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn chat_open(&self) -> bool {
        self.chat_open
    }

    #[must_use]
    pub fn chat_pending(&self) -> bool {
        self.chat_pending
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
