// crates/caresync-gateway/src/view/tests.rs
// ============================================================================
// Module: View Query Tests
// Description: Unit tests for view query-string rendering.
// Purpose: Pin the store's view parameter grammar.
// Dependencies: caresync-gateway
// ============================================================================

//! Unit tests for view parameter encoding and key splitting.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use super::ViewKey;
use super::ViewQuery;

#[test]
fn stale_false_is_always_first() {
    assert_eq!(ViewQuery::default().to_query_string(), "?stale=false");
    let query = ViewQuery {
        stale: Some("ok".to_string()),
        limit: Some(10),
        ..ViewQuery::default()
    };
    assert_eq!(query.to_query_string(), "?stale=ok&limit=10");
}

#[test]
fn string_key_is_force_quoted() {
    let query = ViewQuery::for_key("resident-1");
    assert_eq!(query.to_query_string(), "?stale=false&key=\"resident-1\"");
}

#[test]
fn already_quoted_key_is_untouched() {
    let query = ViewQuery::for_key("\"resident-1\"");
    assert_eq!(query.to_query_string(), "?stale=false&key=\"resident-1\"");
}

#[test]
fn compound_key_renders_as_array_literal() {
    let query = ViewQuery {
        key: Some(ViewKey::Compound(vec!["a".to_string(), "b".to_string()])),
        ..ViewQuery::default()
    };
    assert_eq!(query.to_query_string(), "?stale=false&key=[\"a\",\"b\"]");
}

#[test]
fn scalar_keys_render_as_one_string_array() {
    let query = ViewQuery::for_keys(vec!["a".to_string(), "b".to_string()]);
    assert_eq!(query.to_query_string(), "?stale=false&keys=[\"a\",\"b\"]");
}

#[test]
fn compound_keys_render_as_nested_arrays() {
    let query = ViewQuery {
        keys: Some(vec![
            ViewKey::Compound(vec!["a".to_string(), "1".to_string()]),
            ViewKey::Compound(vec!["b".to_string(), "2".to_string()]),
        ]),
        ..ViewQuery::default()
    };
    assert_eq!(
        query.to_query_string(),
        "?stale=false&keys=[[\"a\",\"1\"],[\"b\",\"2\"]]"
    );
}

#[test]
fn endkey_gets_open_range_suffix_and_exact_does_not() {
    let range = ViewQuery {
        startkey: Some(ViewKey::Compound(vec!["acct".to_string()])),
        endkey: Some(ViewKey::Compound(vec!["acct".to_string()])),
        ..ViewQuery::default()
    };
    assert_eq!(
        range.to_query_string(),
        "?stale=false&startkey=[\"acct\"]&endkey=[\"acct\",{}]"
    );

    let exact = ViewQuery {
        endkey_exact: Some(ViewKey::Compound(vec!["acct".to_string()])),
        ..ViewQuery::default()
    };
    assert_eq!(exact.to_query_string(), "?stale=false&endkey=[\"acct\"]");
}

#[test]
fn scalar_range_keys_pass_through_verbatim() {
    let query = ViewQuery {
        startkey: Some(ViewKey::Single("0".to_string())),
        endkey: Some(ViewKey::Single("9999".to_string())),
        ..ViewQuery::default()
    };
    assert_eq!(query.to_query_string(), "?stale=false&startkey=0&endkey=9999");
}

#[test]
fn flag_parameters_render_in_order() {
    let query = ViewQuery {
        limit: Some(5),
        group: Some(true),
        group_level: Some(2),
        reduce: Some(false),
        inclusive_end: Some(true),
        ..ViewQuery::default()
    };
    assert_eq!(
        query.to_query_string(),
        "?stale=false&limit=5&group=true&group_level=2&reduce=false&inclusive_end=true"
    );
}

#[test]
fn split_keys_halves_preserve_order() {
    let query = ViewQuery::for_keys(vec![
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
        "d".to_string(),
        "e".to_string(),
    ]);
    let (first, second) = query.split_keys();
    assert_eq!(first.keys_len(), 2);
    assert_eq!(second.keys_len(), 3);
    assert_eq!(first.to_query_string(), "?stale=false&keys=[\"a\",\"b\"]");
    assert_eq!(second.to_query_string(), "?stale=false&keys=[\"c\",\"d\",\"e\"]");
}
