//! Integration tests for CursorPaginator over the in-memory keyset store.

mod support;

use serde_json::json;
use storefront_paging::{
    total_pages, BackendError, CursorError, CursorPaginator, DocumentBackend, Operator, OrderBy,
    PageError, Predicate, QuerySpec, Step,
};
use support::{ids, newest_first, numbered, seeded, FlakyBackend, COLLECTION};

#[test]
fn five_items_two_per_page() {
    let backend = seeded(&["A", "B", "C", "D", "E"]);
    let mut pages = CursorPaginator::new(backend.clone(), newest_first(2));

    let first = pages.get_first_page().unwrap();
    assert_eq!(ids(&first.content), vec!["E", "D"]);
    assert_eq!(first.current_page, 1);
    assert!(first.has_next);
    assert!(!first.has_prev);

    let second = pages.get_next_page().unwrap();
    assert_eq!(ids(&second.content), vec!["C", "B"]);
    assert_eq!(second.current_page, 2);

    let third = pages.go_to_page(3).unwrap();
    assert_eq!(ids(&third.content), vec!["A"]);
    assert_eq!(third.total_pages, 3);
    assert!(!third.has_next);

    backend.reset_stats();
    let back = pages.go_to_page(1).unwrap();
    assert_eq!(ids(&back.content), vec!["E", "D"]);
    assert_eq!(backend.stats().fetch_calls, 0);
    assert_eq!(backend.stats().count_calls, 0);
}

#[test]
fn every_page_is_reachable_with_expected_length() {
    for page_size in 1..=4 {
        for total in 0..=11usize {
            let backend = numbered(total);
            let mut pages = CursorPaginator::new(backend, newest_first(page_size));
            let count = pages.get_total_count().unwrap();
            assert_eq!(count, total as u64);
            assert_eq!(pages.total_pages(), total_pages(count, page_size));

            for n in 1..=pages.total_pages() {
                let page = pages.go_to_page(n).unwrap();
                assert_eq!(pages.get_pagination_info().current_page, n);
                let expected = if n < pages.total_pages() {
                    page_size
                } else {
                    total - (n as usize - 1) * page_size
                };
                assert_eq!(page.content.len(), expected);
            }
        }
    }
}

#[test]
fn jumps_concatenate_to_the_full_ordering() {
    let backend = numbered(13);
    let mut walker = CursorPaginator::new(backend.clone(), newest_first(4));
    let mut seen = Vec::new();
    walker.get_total_count().unwrap();
    // Out of order on purpose: jumps must not depend on visit order.
    for n in [3, 1, 4, 2] {
        let page = walker.go_to_page(n).unwrap();
        seen.push((n, ids(&page.content)));
    }
    seen.sort();
    let flat: Vec<String> = seen.into_iter().flat_map(|(_, ids)| ids).collect();

    let expected: Vec<String> = (0..13).rev().map(|i| format!("o{:03}", i)).collect();
    assert_eq!(flat, expected);
}

#[test]
fn go_to_page_is_idempotent() {
    let backend = numbered(9);
    let mut pages = CursorPaginator::new(backend.clone(), newest_first(2));
    let once = pages.go_to_page(4).unwrap();

    backend.reset_stats();
    let twice = pages.go_to_page(4).unwrap();
    assert_eq!(once, twice);
    assert_eq!(backend.stats().fetch_calls, 0);
}

#[test]
fn next_then_previous_returns_to_first_page() {
    let backend = numbered(7);
    let mut pages = CursorPaginator::new(backend.clone(), newest_first(3));
    let first = pages.get_first_page().unwrap();
    pages.get_next_page().unwrap();

    backend.reset_stats();
    let back = pages.get_previous_page().unwrap();
    assert_eq!(back.content, first.content);
    assert_eq!(back.current_page, 1);
    assert_eq!(backend.stats().fetch_calls, 0);
}

#[test]
fn cache_grows_monotonically_until_reset() {
    let backend = numbered(20);
    let mut pages = CursorPaginator::new(backend, newest_first(3));
    let mut navigations = 0;

    pages.get_first_page().unwrap();
    navigations += 1;
    for n in [5, 2, 7, 5, 1] {
        let before = pages.cached_pages();
        pages.go_to_page(n).unwrap();
        navigations += 1;
        let after = pages.cached_pages();
        assert!(before.iter().all(|p| after.contains(p)));
        assert!(after.len() <= navigations);
    }
    assert_eq!(pages.cached_pages(), vec![1, 2, 5, 7]);

    pages.reset();
    assert!(pages.cached_pages().is_empty());
    assert_eq!(pages.get_pagination_info().current_page, 1);
    assert_eq!(pages.get_pagination_info().total, Some(20));
}

#[test]
fn boundaries_report_errors_and_keep_state() {
    let backend = numbered(4);
    let mut pages = CursorPaginator::new(backend, newest_first(2));

    let err = pages.get_previous_page().unwrap_err();
    assert!(matches!(
        err,
        PageError::OutOfRange {
            step: Step::Previous,
            current_page: 1,
            ..
        }
    ));

    pages.go_to_page(2).unwrap();
    let before = pages.get_pagination_info();
    let err = pages.get_next_page().unwrap_err();
    assert_eq!(
        err,
        PageError::OutOfRange {
            step: Step::Next,
            current_page: 2,
            total_pages: 2
        }
    );

    for bad in [0, 3, 99] {
        let err = pages.go_to_page(bad).unwrap_err();
        assert_eq!(
            err,
            PageError::InvalidPage {
                requested: bad,
                total_pages: 2
            }
        );
    }
    assert_eq!(pages.get_pagination_info(), before);
    assert_eq!(pages.cached_pages(), vec![2]);
}

#[test]
fn empty_collection_has_no_pages() {
    let backend = numbered(0);
    let mut pages = CursorPaginator::new(backend, newest_first(5));
    let first = pages.get_first_page().unwrap();
    assert!(first.content.is_empty());
    assert_eq!(first.total_pages, 0);
    assert!(!first.has_next && !first.has_prev);
    assert!(matches!(
        pages.go_to_page(1).unwrap_err(),
        PageError::InvalidPage { total_pages: 0, .. }
    ));
}

#[test]
fn duplicate_sort_keys_do_not_skip_or_repeat_rows() {
    let backend = storefront_paging::InMemoryBackend::new();
    for (id, ts) in [("a", 1), ("b", 1), ("c", 1), ("d", 2), ("e", 2), ("f", 3)] {
        backend
            .insert_json(COLLECTION, json!({"id": id, "created_at": ts}))
            .unwrap();
    }
    let mut pages = CursorPaginator::new(backend, newest_first(2));
    let mut all = ids(&pages.get_first_page().unwrap().content);
    while pages.get_pagination_info().current_page < pages.total_pages() {
        all.extend(ids(&pages.get_next_page().unwrap().content));
    }
    assert_eq!(all, vec!["f", "e", "d", "c", "b", "a"]);
}

#[test]
fn filtered_query_counts_and_pages_the_same_rows() {
    let backend = numbered(10);
    let spec = QuerySpec::new(COLLECTION, OrderBy::asc("created_at"), 3)
        .unwrap()
        .filter(Predicate::new("created_at", Operator::Gte, json!(4)));
    let mut pages = CursorPaginator::new(backend, spec);

    assert_eq!(pages.get_total_count().unwrap(), 6);
    let last = pages.go_to_page(2).unwrap();
    assert_eq!(ids(&last.content), vec!["o007", "o008", "o009"]);
    assert!(!last.has_next);
}

#[test]
fn unsupported_query_surfaces_as_backend_error() {
    let backend = numbered(3);
    let spec = newest_first(2).filter(Predicate::new("total", Operator::Gt, json!(10)));
    let mut pages = CursorPaginator::new(backend, spec);
    let err = pages.get_first_page().unwrap_err();
    assert!(matches!(
        err,
        PageError::BackendUnavailable(BackendError::UnsupportedQuery(_))
    ));
    assert_eq!(pages.get_pagination_info().total, None);
}

#[test]
fn failure_mid_jump_commits_nothing() {
    let flaky = FlakyBackend::new(numbered(12));
    let mut pages = CursorPaginator::new(&flaky, newest_first(3));
    pages.get_first_page().unwrap();
    let before = pages.get_pagination_info();

    // The prefix walk succeeds, the page fetch after it fails.
    flaky.fail_after(1);
    let err = pages.go_to_page(4).unwrap_err();
    assert!(matches!(
        err,
        PageError::BackendUnavailable(BackendError::Unavailable(_))
    ));
    assert_eq!(pages.get_pagination_info(), before);
    assert_eq!(pages.cached_pages(), vec![1]);

    flaky.fail_after(usize::MAX);
    let page = pages.go_to_page(4).unwrap();
    assert_eq!(ids(&page.content), vec!["o002", "o001", "o000"]);
}

#[test]
fn stale_total_is_kept_until_refresh() {
    let backend = numbered(4);
    let mut pages = CursorPaginator::new(backend.clone(), newest_first(2));
    pages.get_first_page().unwrap();
    backend.delete(COLLECTION, "o000").unwrap();
    backend.delete(COLLECTION, "o001").unwrap();

    // The count still says two pages; the second one is simply empty.
    let second = pages.get_next_page().unwrap();
    assert!(second.content.is_empty());
    assert_eq!(second.total, 4);

    assert_eq!(pages.refresh().unwrap(), 2);
    assert_eq!(pages.total_pages(), 1);
}

#[test]
fn issued_tokens_resume_after_the_same_row() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let backend = numbered(6);
    let mut pages = CursorPaginator::new(backend.clone(), newest_first(2));
    pages.get_first_page().unwrap();
    let second = pages.get_next_page().unwrap();

    let token = pages
        .cached_page(1)
        .and_then(|page| page.last_cursor.as_ref())
        .map(|cursor| cursor.token())
        .unwrap();
    let cursor = pages.resolve_token(&token).unwrap();
    assert_eq!(cursor.document_id(), "o004");

    let resumed = backend.fetch(pages.query(), Some(cursor), 2).unwrap();
    assert_eq!(resumed, second.content);
}

#[test]
fn tokens_not_issued_by_the_paginator_are_rejected() {
    let backend = numbered(6);
    let mut issuer = CursorPaginator::new(backend.clone(), newest_first(2));
    issuer.get_first_page().unwrap();
    let foreign = issuer
        .cached_page(1)
        .and_then(|page| page.last_cursor.as_ref())
        .map(|cursor| cursor.token())
        .unwrap();

    let mut pages = CursorPaginator::new(backend, newest_first(3));
    pages.get_first_page().unwrap();
    assert_eq!(pages.resolve_token(&foreign).unwrap_err(), CursorError::Unknown);
    assert!(matches!(
        pages.resolve_token("not base64!").unwrap_err(),
        CursorError::Encoding(_)
    ));
}

#[test]
fn jump_past_remaining_rows_serves_the_first_page() {
    let backend = numbered(6);
    let mut pages = CursorPaginator::new(backend.clone(), newest_first(2));
    pages.get_total_count().unwrap();
    for id in ["o000", "o001", "o002", "o003"] {
        backend.delete(COLLECTION, id).unwrap();
    }

    // The stale count still allows page 3, but only two rows exist now.
    let third = pages.go_to_page(3).unwrap();
    assert_eq!(ids(&third.content), vec!["o005", "o004"]);
    assert_eq!(third.current_page, 3);
    assert_eq!(pages.cached_pages(), vec![3]);
}

#[test]
fn recount_keeps_current_page_in_bounds() {
    let backend = numbered(6);
    let mut pages = CursorPaginator::new(backend.clone(), newest_first(2));
    pages.go_to_page(3).unwrap();
    for id in ["o000", "o001", "o002", "o003"] {
        backend.delete(COLLECTION, id).unwrap();
    }

    assert_eq!(pages.get_total_count().unwrap(), 2);
    let info = pages.get_pagination_info();
    assert_eq!(info.total_pages, 1);
    assert_eq!(info.current_page, 1);

    for id in ["o004", "o005"] {
        backend.delete(COLLECTION, id).unwrap();
    }
    assert_eq!(pages.get_total_count().unwrap(), 0);
    assert_eq!(pages.get_pagination_info().current_page, 1);
}
