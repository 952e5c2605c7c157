mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::{feed_json, transaction_json, MockRest, FUND_OK};
use pexcard::core::kernel::{RawResponse, RestRequest};
use pexcard::{CancellationFlag, CardFunding, Credential, PexConnector, PexError};
use rust_decimal::Decimal;

const FUND_ENDPOINT: &str = "/V4/Card/Fund/42";
const FEED_ENDPOINT: &str = "/V4/Details/TransactionDetails/42";
const NOTE_ENDPOINT: &str = "/v4/note";

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 17, 0, 10).unwrap()
}

fn token() -> Credential {
    Credential::new("ext-token")
}

fn amount() -> Decimal {
    Decimal::new(1250, 2)
}

/// Transport serving a funding flow: fund, feed and note answers
fn funding_mock(feed: String, note_status: u16) -> MockRest {
    MockRest::new(move |request: &RestRequest| {
        let response = match request.endpoint.as_str() {
            FUND_ENDPOINT => RawResponse::new(200, FUND_OK),
            FEED_ENDPOINT => RawResponse::new(200, feed.clone()),
            NOTE_ENDPOINT => RawResponse::new(note_status, "{}"),
            other => RawResponse::new(404, format!("unexpected {}", other)),
        };
        Ok(response)
    })
}

fn connector(mock: &MockRest) -> PexConnector<MockRest> {
    PexConnector::new(mock.clone()).with_clock(fixed_now)
}

#[tokio::test]
async fn test_fund_card_posts_amount() {
    let mock = funding_mock(feed_json(&[]), 200);
    let pex = connector(&mock);

    let funded = pex.fund_card(&token(), 42, amount()).await.unwrap();
    assert_eq!(funded.account_id, 42);
    assert_eq!(funded.available_balance, Decimal::new(1125, 1));

    let request = &mock.requests()[0];
    assert_eq!(request.endpoint, FUND_ENDPOINT);
    assert_eq!(request.body.as_ref().unwrap()["Amount"], 12.5);
}

#[tokio::test]
async fn test_fund_card_rejects_non_positive_amount() {
    let mock = funding_mock(feed_json(&[]), 200);
    let pex = connector(&mock);

    let err = pex.fund_card(&token(), 42, Decimal::ZERO).await.unwrap_err();
    assert!(matches!(err, PexError::InvalidParameters(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_fund_with_note_annotates_matching_funding() {
    let feed = feed_json(&[
        transaction_json(5, "Spend", "12.50", "2024-01-15T12:00:11"),
        transaction_json(6, "CardFunding", "10.00", "2024-01-15T12:00:12"),
        transaction_json(7, "CardFunding", "12.50", "2024-01-15T12:00:12"),
    ]);
    let mock = funding_mock(feed, 200);
    let pex = connector(&mock);

    let funded = pex
        .fund_card_with_note(&token(), 42, amount(), "weekly allowance", &CancellationFlag::new())
        .await
        .unwrap();
    assert_eq!(funded.account_id, 42);

    let requests = mock.requests();
    assert_eq!(mock.endpoints(), vec![FUND_ENDPOINT, FEED_ENDPOINT, NOTE_ENDPOINT]);

    // Window starts 30s before the clock, in Eastern time
    let search = &requests[1];
    assert_eq!(search.query_param("StartDate"), Some("2024-01-15T11:59:40"));
    assert_eq!(search.query_param("EndDate"), Some("2024-01-15T12:00:40"));

    let note = requests[2].body.as_ref().unwrap();
    assert_eq!(note["TransactionId"], 7);
    assert_eq!(note["NoteText"], "weekly allowance");
    assert_eq!(note["Pending"], false);
}

#[tokio::test]
async fn test_fund_with_note_picks_latest_of_equal_amounts() {
    let feed = feed_json(&[
        transaction_json(11, "CardFunding", "12.50", "2024-01-15T12:00:30"),
        transaction_json(10, "CardFunding", "12.50", "2024-01-15T11:59:45"),
    ]);
    let mock = funding_mock(feed, 200);
    let pex = connector(&mock);

    pex.fund_card_with_note(&token(), 42, amount(), "later", &CancellationFlag::new())
        .await
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests[2].body.as_ref().unwrap()["TransactionId"], 11);
}

#[tokio::test]
async fn test_fund_with_note_without_match_fails() {
    let feed = feed_json(&[transaction_json(6, "CardFunding", "10.00", "2024-01-15T12:00:12")]);
    let mock = funding_mock(feed, 200);
    let pex = connector(&mock);

    let err = pex
        .fund_card_with_note(&token(), 42, amount(), "note", &CancellationFlag::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PexError::NoMatchingTransaction { cardholder_account_id: 42, .. }
    ));
    assert_eq!(mock.endpoints(), vec![FUND_ENDPOINT, FEED_ENDPOINT]);
}

#[tokio::test]
async fn test_fund_with_note_swallows_note_failure() {
    let feed = feed_json(&[transaction_json(7, "CardFunding", "12.50", "2024-01-15T12:00:12")]);
    let mock = funding_mock(feed, 500);
    let pex = connector(&mock);

    let funded = pex
        .fund_card_with_note(&token(), 42, amount(), "note", &CancellationFlag::new())
        .await
        .unwrap();
    assert_eq!(funded.account_id, 42);
    assert_eq!(mock.requests().len(), 3);
}

#[tokio::test]
async fn test_fund_with_note_cancelled_skips_search_and_note() {
    let mock = funding_mock(feed_json(&[]), 200);
    let pex = connector(&mock);
    let cancel = CancellationFlag::new();
    cancel.cancel();

    let funded = pex
        .fund_card_with_note(&token(), 42, amount(), "note", &cancel)
        .await
        .unwrap();
    assert_eq!(funded.account_id, 42);
    assert_eq!(mock.endpoints(), vec![FUND_ENDPOINT]);
}

#[tokio::test]
async fn test_fund_with_note_stops_when_funding_fails() {
    let mock = MockRest::fixed(400, "Insufficient business balance");
    let pex = connector(&mock);

    let err = pex
        .fund_card_with_note(&token(), 42, amount(), "note", &CancellationFlag::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.body(), Some("Insufficient business balance"));
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_fund_with_note_propagates_feed_failure() {
    let mock = MockRest::new(|request: &RestRequest| {
        Ok(match request.endpoint.as_str() {
            FUND_ENDPOINT => RawResponse::new(200, FUND_OK),
            _ => RawResponse::new(502, "Bad Gateway"),
        })
    });
    let pex = connector(&mock);

    let err = pex
        .fund_card_with_note(&token(), 42, amount(), "note", &CancellationFlag::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(mock.endpoints(), vec![FUND_ENDPOINT, FEED_ENDPOINT]);
}

#[tokio::test]
async fn test_fund_with_note_cancelled_during_search_skips_note() {
    let cancel = CancellationFlag::new();
    let feed = feed_json(&[transaction_json(7, "CardFunding", "12.50", "2024-01-15T12:00:12")]);
    let flag = cancel.clone();
    let mock = MockRest::new(move |request: &RestRequest| {
        Ok(match request.endpoint.as_str() {
            FUND_ENDPOINT => RawResponse::new(200, FUND_OK),
            FEED_ENDPOINT => {
                flag.cancel();
                RawResponse::new(200, feed.clone())
            }
            _ => RawResponse::new(200, "{}"),
        })
    });
    let pex = connector(&mock);

    let funded = pex
        .fund_card_with_note(&token(), 42, amount(), "note", &cancel)
        .await
        .unwrap();
    assert_eq!(funded.account_id, 42);
    assert!(cancel.is_cancelled());
    assert_eq!(mock.endpoints(), vec![FUND_ENDPOINT, FEED_ENDPOINT]);
}
