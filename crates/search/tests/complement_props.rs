//! Property tests: negation equals subtraction from every visible feature,
//! including every field whose negation is answered by the complementary
//! operator.

mod common;

use std::collections::BTreeSet;

use proptest::prelude::*;
use radar_search::types::enums::category;

use common::*;

const OPERATORS: &[&str] = &["=", "!=", "<", "<=", ">", ">=", ":"];

fn run_blocking(search: &radar_search::FeatureSearch, query: &str) -> BTreeSet<i64> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime
        .block_on(run_query(search, query))
        .ids()
        .into_iter()
        .collect()
}

fn star_store(counts: &[i64]) -> radar_search::FeatureSearch {
    create_search(create_store(counts.iter().enumerate().map(|(i, count)| {
        FeatureFixture::new(i as i64 + 1, "Feature").with_star_count(*count)
    })))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn negated_star_count_is_complement(
        counts in proptest::collection::vec(0i64..6, 1..12),
        op in 0usize..OPERATORS.len(),
        value in 0i64..6,
    ) {
        let search = star_store(&counts);
        let term = format!("star_count{}{}", OPERATORS[op], value);

        let all = run_blocking(&search, "");
        let positive = run_blocking(&search, &term);
        let negated = run_blocking(&search, &format!("-{}", term));

        let expected: BTreeSet<i64> = all.difference(&positive).copied().collect();
        prop_assert_eq!(negated, expected);
    }

    #[test]
    fn negated_category_is_complement(
        categories in proptest::collection::vec(
            prop::sample::select(vec![category::CSS, category::DOM, category::SECURITY, category::MISC]),
            1..10,
        ),
        op in 0usize..OPERATORS.len(),
        value in prop::sample::select(vec!["CSS", "DOM", "Security", "Nonsense", "CSS,DOM"]),
    ) {
        let search = create_search(create_store(categories.iter().enumerate().map(|(i, c)| {
            FeatureFixture::new(i as i64 + 1, "Feature").with_category(*c)
        })));
        let term = format!("category{}{}", OPERATORS[op], value);

        let all = run_blocking(&search, "");
        let positive = run_blocking(&search, &term);
        let negated = run_blocking(&search, &format!("-{}", term));

        let expected: BTreeSet<i64> = all.difference(&positive).copied().collect();
        prop_assert_eq!(negated, expected);
    }

    #[test]
    fn negated_created_date_is_complement(
        days in proptest::collection::vec(1u32..8, 1..10),
        op in 0usize..OPERATORS.len(),
        day in 1u32..8,
    ) {
        let search = create_search(create_store(days.iter().enumerate().map(|(i, d)| {
            FeatureFixture::new(i as i64 + 1, "Feature").with_created(date(2024, 1, *d))
        })));
        let term = format!("created.when{}2024-01-{:02}", OPERATORS[op], day);

        let all = run_blocking(&search, "");
        let positive = run_blocking(&search, &term);
        let negated = run_blocking(&search, &format!("-{}", term));

        let expected: BTreeSet<i64> = all.difference(&positive).copied().collect();
        prop_assert_eq!(negated, expected);
    }

    #[test]
    fn negated_id_is_complement(
        len in 1i64..12,
        op in 0usize..OPERATORS.len(),
        value in 0i64..14,
    ) {
        let search = create_search(create_store(
            (1..=len).map(|id| FeatureFixture::new(id, "Feature")),
        ));
        let term = format!("id{}{}", OPERATORS[op], value);

        let all = run_blocking(&search, "");
        let positive = run_blocking(&search, &term);
        let negated = run_blocking(&search, &format!("-{}", term));

        let expected: BTreeSet<i64> = all.difference(&positive).copied().collect();
        prop_assert_eq!(negated, expected);
    }

    #[test]
    fn pagination_windows_the_full_order(
        counts in proptest::collection::vec(0i64..20, 0..15),
        start in 0usize..20,
        num in 0usize..20,
    ) {
        let search = star_store(&counts);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let full = runtime
            .block_on(search.process_query(
                &radar_search::SearchRequest::new("").with_sort(radar_search::SortSpec::parse("star_count")),
                &anonymous_context(),
            ))
            .unwrap();
        let page = runtime
            .block_on(search.process_query(
                &radar_search::SearchRequest::new("")
                    .with_sort(radar_search::SortSpec::parse("star_count"))
                    .with_pagination(radar_search::Pagination::new(start, Some(num))),
                &anonymous_context(),
            ))
            .unwrap();

        let expected: Vec<i64> = full.ids().into_iter().skip(start).take(num).collect();
        prop_assert_eq!(page.ids(), expected);
        prop_assert_eq!(page.total_count, counts.len());
    }
}
