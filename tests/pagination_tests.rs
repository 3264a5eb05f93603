//! Integration tests for cursor pagination across transaction listings.
//!
//! Run with: cargo test --test pagination_tests

mod common;

use axum::http::Method;
use futures_util::{StreamExt, TryStreamExt};
use serde_json::{json, Value};

use common::MockServer;
use hcb_rs::api::{CardTransactionsQuery, MissingReceiptQuery, TransactionFilters, TransactionsQuery};
use hcb_rs::models::{Attachable, Organization, StripeCard};
use hcb_rs::ApiErrorKind;

const LEDGER: &str = "/api/v4/organizations/hq/transactions";

fn page(ids: &[&str], has_more: bool) -> Value {
    let data: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
    json!({"data": data, "total_count": 5, "has_more": has_more})
}

/// Three pages of two, two and one transactions.
fn script_ledger(server: &MockServer, base_query: &str) {
    let with = |after: Option<&str>| match after {
        Some(after) => base_query.replace("limit=2", &format!("limit=2&after={}", after)),
        None => base_query.to_string(),
    };
    server.on_query(Method::GET, LEDGER, &with(None), 200, page(&["a", "b"], true));
    server.on_query(Method::GET, LEDGER, &with(Some("b")), 200, page(&["c", "d"], true));
    server.on_query(Method::GET, LEDGER, &with(Some("d")), 200, page(&["e"], false));
}

fn ids<'a>(items: impl IntoIterator<Item = &'a hcb_rs::models::Transaction>) -> Vec<String> {
    items.into_iter().map(|t| t.id.clone()).collect()
}

#[tokio::test]
async fn test_auto_paginate_respects_page_cap() {
    let server = MockServer::start().await;
    script_ledger(&server, "limit=2");

    let org: Organization = server.client().stub("hq");
    let first = org
        .transactions(TransactionsQuery::default().limit(2))
        .await
        .unwrap();

    let items: Vec<_> = first.auto_paginate(Some(2)).try_collect().await.unwrap();
    assert_eq!(ids(&items), ["a", "b", "c", "d"]);

    // The first page plus exactly one follow-up; the third page is never requested.
    assert_eq!(server.requests_to(LEDGER).len(), 2);
}

#[tokio::test]
async fn test_all_follows_every_page() {
    let server = MockServer::start().await;
    script_ledger(&server, "limit=2");

    let first = server
        .client()
        .transactions()
        .list("hq", TransactionsQuery::default().limit(2))
        .await
        .unwrap();
    assert_eq!(first.total_count, Some(5));

    let all = first.all().await.unwrap();
    assert_eq!(ids(&all), ["a", "b", "c", "d", "e"]);
    assert!(all.iter().all(|t| t.is_attached()));
    assert!(all
        .iter()
        .all(|t| t.organization.as_ref().map(|o| o.id.as_str()) == Some("hq")));

    let queries: Vec<Option<String>> = server
        .requests_to(LEDGER)
        .into_iter()
        .map(|r| r.query)
        .collect();
    assert_eq!(
        queries,
        [
            Some("limit=2".to_string()),
            Some("limit=2&after=b".to_string()),
            Some("limit=2&after=d".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_next_page_keeps_filters() {
    let server = MockServer::start().await;
    script_ledger(&server, "limit=2&filters%5Bsearch%5D=pizza");

    let query = TransactionsQuery::default()
        .limit(2)
        .filters(TransactionFilters::default().search("pizza"));
    let first = server.client().transactions().list("hq", query).await.unwrap();

    let second = first.next_page().await.unwrap().unwrap();
    assert_eq!(ids(&second), ["c", "d"]);

    let third = second.next_page().await.unwrap().unwrap();
    assert_eq!(ids(&third), ["e"]);
    assert!(!third.has_more);

    // Last page: no request is made.
    assert!(third.next_page().await.unwrap().is_none());
    assert_eq!(server.requests_to(LEDGER).len(), 3);
}

#[tokio::test]
async fn test_each_page_is_lazy() {
    let server = MockServer::start().await;
    script_ledger(&server, "limit=2");

    let first = server
        .client()
        .transactions()
        .list("hq", TransactionsQuery::default().limit(2))
        .await
        .unwrap();

    let mut pages = first.each_page();
    let page_one = pages.next().await.unwrap().unwrap();
    assert_eq!(page_one.len(), 2);
    assert_eq!(server.requests_to(LEDGER).len(), 1);

    let page_two = pages.next().await.unwrap().unwrap();
    assert_eq!(ids(&page_two), ["c", "d"]);
    assert_eq!(server.requests_to(LEDGER).len(), 2);
}

#[tokio::test]
async fn test_error_ends_the_stream() {
    let server = MockServer::start().await;
    server.on_query(Method::GET, LEDGER, "limit=2", 200, page(&["a", "b"], true));
    server.on_query(
        Method::GET,
        LEDGER,
        "limit=2&after=b",
        500,
        json!({"error": "internal_server_error", "messages": ["Something went wrong"]}),
    );

    let first = server
        .client()
        .transactions()
        .list("hq", TransactionsQuery::default().limit(2))
        .await
        .unwrap();

    let results: Vec<_> = first.clone().auto_paginate(None).collect().await;
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    let err = results[2].as_ref().unwrap_err();
    assert_eq!(err.kind(), Some(ApiErrorKind::Server));

    let err = first.all().await.unwrap_err();
    assert_eq!(err.messages(), ["Something went wrong"]);
}

#[tokio::test]
async fn test_empty_page_with_more_stops() {
    let server = MockServer::start().await;
    server.on(Method::GET, LEDGER, 200, json!({"data": [], "has_more": true}));

    let first = server
        .client()
        .transactions()
        .list("hq", TransactionsQuery::default())
        .await
        .unwrap();

    assert!(first.is_empty());
    assert!(first.next_page().await.unwrap().is_none());
    assert!(first.all().await.unwrap().is_empty());
    assert_eq!(server.requests_to(LEDGER).len(), 1);
}

#[tokio::test]
async fn test_missing_receipt_listing_paginates() {
    let server = MockServer::start().await;
    let path = "/api/v4/user/transactions/missing_receipt";
    server.on_query(Method::GET, path, "limit=1", 200, page(&["a"], true));
    server.on_query(Method::GET, path, "limit=1&after=a", 200, page(&["b"], false));

    let first = server
        .client()
        .transactions()
        .missing_receipt(MissingReceiptQuery::default().limit(1))
        .await
        .unwrap();

    let all = first.all().await.unwrap();
    assert_eq!(ids(&all), ["a", "b"]);
    // Not listed through an organization, so none is assumed.
    assert!(all.iter().all(|t| t.organization.is_none()));
}

#[tokio::test]
async fn test_card_transactions_paginate() {
    let server = MockServer::start().await;
    let path = "/api/v4/cards/card_1/transactions";
    server.on_query(
        Method::GET,
        path,
        "limit=1&missing_receipts=true",
        200,
        page(&["a"], true),
    );
    server.on_query(
        Method::GET,
        path,
        "limit=1&after=a&missing_receipts=true",
        200,
        page(&["b"], false),
    );

    let card: StripeCard = server.client().stub("card_1");
    let first = card
        .transactions(CardTransactionsQuery::default().limit(1).missing_receipts(true))
        .await
        .unwrap();

    let items: Vec<_> = first.auto_paginate(None).try_collect().await.unwrap();
    assert_eq!(ids(&items), ["a", "b"]);
}

#[tokio::test]
async fn test_detached_page_does_not_paginate() {
    let list: hcb_rs::models::TransactionList =
        serde_json::from_value(page(&["a", "b"], true)).unwrap();

    assert!(!list.is_attached());
    assert!(list.next_page().await.unwrap().is_none());

    let items: Vec<_> = list.auto_paginate(None).try_collect().await.unwrap();
    assert_eq!(ids(&items), ["a", "b"]);
}
