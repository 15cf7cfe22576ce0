//! Result ordering tests.

mod common;

use common::*;
use radar_search::types::enums::{gate_state, gate_type, stage_type};
use radar_search::{FeatureSearch, SearchRequest, SortSpec};

async fn sorted_by(search: &FeatureSearch, query: &str, sort: &str) -> Vec<i64> {
    search
        .process_query(
            &SearchRequest::new(query).with_sort(SortSpec::parse(sort)),
            &anonymous_context(),
        )
        .await
        .unwrap()
        .ids()
}

#[tokio::test]
async fn test_direct_field_sort_both_directions() {
    let search = create_search(create_store([
        FeatureFixture::new(1, "One").with_star_count(5),
        FeatureFixture::new(2, "Two").with_star_count(1),
        FeatureFixture::new(3, "Three").with_star_count(9),
    ]));

    assert_eq!(sorted_by(&search, "", "star_count").await, vec![2, 1, 3]);
    assert_eq!(sorted_by(&search, "", "-star_count").await, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_sparse_keys_sort_last_by_id() {
    let search = create_search(create_store([
        FeatureFixture::new(4, "No year"),
        FeatureFixture::new(1, "No year either"),
        FeatureFixture::new(2, "2023").with_shipping_year(2023),
        FeatureFixture::new(3, "2021").with_shipping_year(2021),
    ]));

    assert_eq!(sorted_by(&search, "", "shipping_year").await, vec![3, 2, 1, 4]);
    assert_eq!(sorted_by(&search, "", "-shipping_year").await, vec![2, 3, 1, 4]);
}

#[tokio::test]
async fn test_equal_keys_are_deterministic() {
    let search = create_search(create_store([
        FeatureFixture::new(3, "C"),
        FeatureFixture::new(1, "A"),
        FeatureFixture::new(2, "B"),
    ]));

    let first = sorted_by(&search, "", "created.when").await;
    let second = sorted_by(&search, "", "created.when").await;
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_joined_field_sort_uses_first_stage() {
    let store = create_store([
        FeatureFixture::new(1, "A"),
        FeatureFixture::new(2, "B"),
        FeatureFixture::new(3, "C"),
    ]);
    store.insert_stage(stage(10, 1, stage_type::SHIPPING, 120));
    store.insert_stage(stage(11, 2, stage_type::SHIPPING, 100));
    store.insert_stage(stage(12, 1, stage_type::SHIPPING, 90));
    store.insert_stage(stage(13, 3, stage_type::ORIGIN_TRIAL, 80));
    let search = create_search(store);

    assert_eq!(
        sorted_by(&search, "", "browsers.chrome.desktop").await,
        vec![1, 2, 3]
    );
    assert_eq!(
        sorted_by(&search, "", "-browsers.chrome.desktop").await,
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn test_gate_function_sorts() {
    let store = create_store([
        FeatureFixture::new(1, "A"),
        FeatureFixture::new(2, "B"),
        FeatureFixture::new(3, "C"),
    ]);
    store.insert_gate(gate(
        1,
        1,
        gate_type::API_SHIP,
        gate_state::REVIEW_REQUESTED,
        Some(date(2024, 3, 1)),
        None,
    ));
    store.insert_gate(gate(
        2,
        2,
        gate_type::API_SHIP,
        gate_state::REVIEW_STARTED,
        Some(date(2024, 2, 1)),
        None,
    ));
    store.insert_gate(gate(
        3,
        3,
        gate_type::API_SHIP,
        gate_state::APPROVED,
        Some(date(2024, 1, 1)),
        Some(date(2024, 4, 1)),
    ));
    store.insert_gate(gate(
        4,
        1,
        gate_type::PRIVACY_SHIP,
        gate_state::DENIED,
        Some(date(2024, 1, 1)),
        Some(date(2024, 5, 1)),
    ));
    let search = create_search(store);

    assert_eq!(
        sorted_by(&search, "", "gate.requested_on").await,
        vec![2, 1, 3]
    );
    assert_eq!(
        sorted_by(&search, "", "-gate.reviewed_on").await,
        vec![1, 3, 2]
    );
}

#[tokio::test]
async fn test_unknown_sort_key_warns_and_sorts_by_id() {
    let search = create_search(create_store([
        FeatureFixture::new(3, "C").with_star_count(1),
        FeatureFixture::new(1, "A").with_star_count(3),
        FeatureFixture::new(2, "B").with_star_count(2),
    ]));
    let (warnings, _guard) = capture_warnings();

    assert_eq!(sorted_by(&search, "", "-bogus").await, vec![1, 2, 3]);
    assert_eq!(sorted_by(&search, "", "gate.created_on").await, vec![1, 2, 3]);
    assert_eq!(warnings.count(), 2);
}

#[tokio::test]
async fn test_unindexed_name_is_sortable() {
    let search = create_search(create_store([
        FeatureFixture::new(1, "Zeta"),
        FeatureFixture::new(2, "Alpha"),
        FeatureFixture::new(3, "Mu"),
    ]));
    let (warnings, _guard) = capture_warnings();

    assert_eq!(sorted_by(&search, "", "name").await, vec![2, 3, 1]);
    assert_eq!(sorted_by(&search, "", "-name").await, vec![1, 3, 2]);
    assert_eq!(warnings.count(), 0);
}

#[tokio::test]
async fn test_sort_applies_before_pagination() {
    let search = create_search(create_store([
        FeatureFixture::new(1, "A").with_star_count(10),
        FeatureFixture::new(2, "B").with_star_count(30),
        FeatureFixture::new(3, "C").with_star_count(20),
    ]));

    let request = SearchRequest::from_params("", Some("-star_count"), Some("0"), Some("2")).unwrap();
    let page = search
        .process_query(&request, &anonymous_context())
        .await
        .unwrap();
    assert_eq!(page.ids(), vec![2, 3]);
    assert_eq!(page.total_count, 3);
}
