use super::*;
use crate::chat::GREETING;
use crate::filter::{BedroomThreshold, PriceRange, PropertyTypeFilter};
use crate::listing::PropertyType;
use crate::listing::test_helpers::{listing, listing_in};
use crate::llm::LlmError;

/// Ten listings: ids 3 and 7 in Austin, the rest in Springfield.
fn ten_listings() -> ListingStore {
    let listings = (1..=10)
        .map(|id| {
            let mut l = if id == 3 || id == 7 { listing_in(id, "Austin", "TX", "78701") } else { listing(id) };
            l.price = 100_000 * u64::from(id);
            l.area_sqft = 1000 + 100 * id;
            l
        })
        .collect();
    ListingStore::new(listings).unwrap()
}

fn ids(state: &ViewState) -> Vec<u32> {
    state.projection().ids.iter().map(|id| id.0).collect()
}

// =============================================================================
// initial state + projection
// =============================================================================

#[test]
fn starts_with_everything_visible_in_id_order() {
    let state = ViewState::new(ten_listings());
    assert_eq!(state.criteria(), &FilterCriteria::default());
    assert_eq!(state.sort_key(), SortKey::Default);
    assert_eq!(ids(&state), (1..=10).collect::<Vec<_>>());
    assert_eq!(state.projection().summary(), "Showing 10 of 10 properties");
    assert!(!state.tray_visible());
    assert!(state.detail().is_none());
    assert!(state.transcript().is_empty());
}

#[test]
fn austin_filter_then_size_desc() {
    let mut state = ViewState::new(ten_listings());
    state
        .dispatch(Action::SetCriteria(CriteriaPatch::location("austin")))
        .unwrap();
    assert_eq!(state.projection().shown(), 2);
    assert_eq!(state.projection().total, 10);
    assert_eq!(state.projection().summary(), "Showing 2 of 10 properties");

    state.dispatch(Action::SetSort(SortKey::SizeDesc)).unwrap();
    let visible = state.visible();
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[0].id, ListingId(7));
    assert!(visible[0].area_sqft > visible[1].area_sqft);
}

#[test]
fn set_criteria_merges_fields() {
    let mut state = ViewState::new(ten_listings());
    state
        .dispatch(Action::SetCriteria(CriteriaPatch {
            bedrooms: Some(BedroomThreshold::AtLeast(3)),
            ..CriteriaPatch::default()
        }))
        .unwrap();
    state
        .dispatch(Action::SetCriteria(CriteriaPatch::location("springfield")))
        .unwrap();
    assert_eq!(state.criteria().bedrooms, BedroomThreshold::AtLeast(3));
    assert_eq!(state.criteria().location, "springfield");
    assert_eq!(state.projection().shown(), 8);
}

#[test]
fn replace_criteria_overwrites_everything() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::SelectLocation("Austin".into())).unwrap();
    let replacement = FilterCriteria {
        property_type: PropertyTypeFilter::Only(PropertyType::Condo),
        ..FilterCriteria::default()
    };
    state
        .dispatch(Action::ReplaceCriteria(replacement.clone()))
        .unwrap();
    assert_eq!(state.criteria(), &replacement);
    assert!(state.visible().is_empty());
}

#[test]
fn max_price_slider_keeps_floor_and_snaps() {
    let mut state = ViewState::new(ten_listings());
    state
        .dispatch(Action::SetCriteria(CriteriaPatch {
            price_range: Some(PriceRange::new(200_000, 2_000_000)),
            ..CriteriaPatch::default()
        }))
        .unwrap();
    state.dispatch(Action::SetMaxPrice(549_999)).unwrap();
    assert_eq!(state.criteria().price_range, PriceRange::new(200_000, 500_000));
    assert_eq!(ids(&state), vec![2, 3, 4, 5]);

    state.dispatch(Action::SetMaxPrice(9_000_000)).unwrap();
    assert_eq!(state.criteria().price_range.max, 2_000_000);
}

#[test]
fn popular_location_sets_location_only() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::SetSort(SortKey::PriceDesc)).unwrap();
    state.dispatch(Action::SelectLocation("Austin".into())).unwrap();
    assert_eq!(state.criteria().location, "Austin");
    assert_eq!(ids(&state), vec![7, 3]);
}

// =============================================================================
// compare
// =============================================================================

#[test]
fn compare_limit_is_a_notice() {
    let mut state = ViewState::new(ten_listings());
    for id in 1..=4 {
        state.dispatch(Action::ToggleCompare(ListingId(id))).unwrap();
    }
    let notice = state
        .dispatch(Action::ToggleCompare(ListingId(5)))
        .unwrap_err();
    assert_eq!(notice, Notice::Compare(CompareError::LimitReached));
    assert_eq!(notice.to_string(), "You can only compare up to 4 properties at a time.");
    assert_eq!(state.comparison().len(), 4);
    assert!(!state.comparison().contains(ListingId(5)));
}

#[test]
fn compare_selection_survives_refiltering() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::ToggleCompare(ListingId(1))).unwrap();
    state.dispatch(Action::ToggleCompare(ListingId(3))).unwrap();
    state.dispatch(Action::SelectLocation("Austin".into())).unwrap();
    let members: Vec<_> = state.comparison_members().iter().map(|l| l.id).collect();
    assert_eq!(members, vec![ListingId(1), ListingId(3)]);
    assert!(state.tray_visible());
}

#[test]
fn comparison_view_needs_two_members() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::ToggleCompare(ListingId(1))).unwrap();
    assert_eq!(state.dispatch(Action::OpenComparison), Err(Notice::Compare(CompareError::TooFew)));
    assert!(!state.comparison_open());

    state.dispatch(Action::ToggleCompare(ListingId(2))).unwrap();
    state.dispatch(Action::OpenComparison).unwrap();
    assert!(state.comparison_open());
    let rows = state.comparison_rows();
    assert_eq!(rows[0].label, "Price");
    assert_eq!(rows[0].cells, vec!["$100,000", "$200,000"]);

    // Dropping below two closes the view.
    state.dispatch(Action::ToggleCompare(ListingId(2))).unwrap();
    assert!(!state.comparison_open());
}

#[test]
fn unknown_listing_never_enters_comparison() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::ToggleCompare(ListingId(1))).unwrap();
    assert_eq!(
        state.dispatch(Action::ToggleCompare(ListingId(99))),
        Err(Notice::UnknownListing(ListingId(99)))
    );
    assert_eq!(state.comparison().ids(), &[ListingId(1)]);
    assert_eq!(state.dispatch(Action::OpenComparison), Err(Notice::Compare(CompareError::TooFew)));
    assert!(!state.comparison_open());

    // Unknown ids do not use up slots.
    for id in 96..=98 {
        assert!(state.dispatch(Action::ToggleCompare(ListingId(id))).is_err());
    }
    for id in 2..=4 {
        state.dispatch(Action::ToggleCompare(ListingId(id))).unwrap();
    }
    assert_eq!(state.comparison_members().len(), 4);
    state.dispatch(Action::OpenComparison).unwrap();
    assert!(state.comparison_rows().iter().all(|row| row.cells.len() == 4));
}

#[test]
fn clear_compare_empties_tray_and_closes_modal() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::ToggleCompare(ListingId(1))).unwrap();
    state.dispatch(Action::ToggleCompare(ListingId(2))).unwrap();
    state.dispatch(Action::OpenComparison).unwrap();
    state.dispatch(Action::ClearCompare).unwrap();
    assert!(!state.tray_visible());
    assert!(!state.comparison_open());
    state.dispatch(Action::CloseComparison).unwrap();
}

// =============================================================================
// favorites + detail
// =============================================================================

#[test]
fn favorite_visible_in_projection_and_detail() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::OpenDetail(ListingId(4))).unwrap();
    state.dispatch(Action::ToggleFavorite(ListingId(4))).unwrap();
    assert!(state.detail().unwrap().is_favorited);
    let shown = state.visible().into_iter().find(|l| l.id == ListingId(4)).unwrap();
    assert!(shown.is_favorited);
    assert!(state.store().get(ListingId(4)).unwrap().is_favorited);

    state.dispatch(Action::ToggleFavorite(ListingId(4))).unwrap();
    assert!(!state.detail().unwrap().is_favorited);
}

#[test]
fn unknown_ids_are_harmless() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::ToggleFavorite(ListingId(99))).unwrap();
    state.dispatch(Action::OpenDetail(ListingId(99))).unwrap();
    assert!(state.detail().is_none());
}

#[test]
fn close_detail_clears_selection() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::OpenDetail(ListingId(2))).unwrap();
    assert_eq!(state.detail().map(|l| l.id), Some(ListingId(2)));
    state.dispatch(Action::CloseDetail).unwrap();
    assert!(state.detail().is_none());
}

// =============================================================================
// chat
// =============================================================================

#[test]
fn opening_chat_greets_once() {
    let mut state = ViewState::new(ten_listings());
    state.dispatch(Action::OpenChat).unwrap();
    state.dispatch(Action::CloseChat).unwrap();
    state.dispatch(Action::OpenChat).unwrap();
    assert!(state.chat_open());
    assert_eq!(state.transcript().len(), 1);
    assert_eq!(state.transcript().messages()[0].content, GREETING);
}

#[test]
fn blank_and_busy_submissions_are_refused() {
    let mut state = ViewState::new(ten_listings());
    assert_eq!(state.dispatch(Action::ChatSubmitted("   ".into())), Err(Notice::EmptyMessage));
    assert!(state.transcript().is_empty());

    state
        .dispatch(Action::ChatSubmitted("houses in austin".into()))
        .unwrap();
    assert!(state.chat_pending());
    assert_eq!(state.dispatch(Action::ChatSubmitted("again".into())), Err(Notice::ChatBusy));
    assert_eq!(state.transcript().len(), 1);
}

#[test]
fn successful_extraction_updates_criteria_and_replies() {
    let mut state = ViewState::new(ten_listings());
    state
        .dispatch(Action::ChatSubmitted("austin under 500k".into()))
        .unwrap();
    let extraction = AiExtraction { location: Some("Austin".into()), max_price: Some(500_000), ..AiExtraction::default() };
    state.dispatch(Action::ChatResolved(Ok(extraction))).unwrap();

    assert!(!state.chat_pending());
    assert_eq!(state.criteria().location, "Austin");
    assert_eq!(state.criteria().price_range, PriceRange::new(0, 500_000));
    assert_eq!(ids(&state), vec![3]);
    let last = state.transcript().last().unwrap();
    assert_eq!(last.role, ChatRole::Assistant);
    assert_eq!(last.content, APPLIED_REPLY);
}

#[test]
fn failed_extraction_leaves_criteria_identical() {
    let mut state = ViewState::new(ten_listings());
    state
        .dispatch(Action::SetCriteria(CriteriaPatch {
            location: Some("springfield".into()),
            bedrooms: Some(BedroomThreshold::AtLeast(2)),
            price_range: Some(PriceRange::new(150_000, 900_000)),
            ..CriteriaPatch::default()
        }))
        .unwrap();
    let before = state.criteria().clone();
    let projection_before = state.projection().clone();

    state
        .dispatch(Action::ChatSubmitted("something".into()))
        .unwrap();
    let len_after_submit = state.transcript().len();
    let failure = AssistantError::Llm(LlmError::ApiRequest("network down".into()));
    state.dispatch(Action::ChatResolved(Err(failure))).unwrap();

    assert_eq!(state.criteria(), &before);
    assert_eq!(
        serde_json::to_string(state.criteria()).unwrap(),
        serde_json::to_string(&before).unwrap()
    );
    assert_eq!(state.projection(), &projection_before);
    assert_eq!(state.transcript().len(), len_after_submit + 1);
    let last = state.transcript().last().unwrap();
    assert_eq!(last.role, ChatRole::Assistant);
    assert_eq!(last.content, FAILED_REPLY);
    assert!(!state.chat_pending());
}
