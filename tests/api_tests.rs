mod common;

use chrono::{FixedOffset, TimeZone};
use common::{feed_json, transaction_json, MockRest};
use futures_util::future::join_all;
use pexcard::core::kernel::{Authorization, TokenKind};
use pexcard::pex::types::{CustomFieldType, ExchangeTokenRequest, TransactionQuery};
use pexcard::{
    AccountInfo, Credential, PexConnector, PexError, TagConfiguration, TokenManagement,
    TransactionFeed,
};
use reqwest::Method;
use rust_decimal::Decimal;

fn token() -> Credential {
    Credential::new("ext-token")
}

#[tokio::test]
async fn test_ping_sends_no_authorization() {
    let mock = MockRest::fixed(200, "");
    let pex = PexConnector::new(mock.clone());

    assert!(pex.ping().await.unwrap());

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].endpoint, "/v4/ping");
    assert_eq!(requests[0].authorization, Authorization::None);
}

#[tokio::test]
async fn test_ping_reports_unavailable_on_error_status() {
    let pex = PexConnector::new(MockRest::fixed(503, "maintenance"));
    assert!(!pex.ping().await.unwrap());
}

#[tokio::test]
async fn test_balance_uses_token_scheme() {
    let mock = MockRest::fixed(200, r#"{"BusinessAccountBalance":1520.75}"#);
    let pex = PexConnector::new(mock.clone());

    let balance = pex.get_business_balance(&token()).await.unwrap();
    assert_eq!(balance, Decimal::new(152075, 2));

    let request = &mock.requests()[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.endpoint, "/V4/Business/Balance");
    assert_eq!(request.authorization.kind(), Some(TokenKind::Token));
    let header = request.authorization.header_value().unwrap().unwrap();
    assert_eq!(header.to_str().unwrap(), "token ext-token");
}

#[tokio::test]
async fn test_empty_balance_body_reads_as_zero() {
    for body in ["{}", "", "null"] {
        let pex = PexConnector::new(MockRest::fixed(200, body));
        let balance = pex.get_business_balance(&token()).await.unwrap();
        assert_eq!(balance, Decimal::ZERO, "body {:?}", body);
    }
}

#[tokio::test]
async fn test_error_status_keeps_status_and_body() {
    let pex = PexConnector::new(MockRest::fixed(401, "Unauthorized token"));

    let err = pex.get_business_balance(&token()).await.unwrap_err();
    assert!(matches!(err, PexError::ApiError { status: 401, .. }));
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.body(), Some("Unauthorized token"));
}

#[tokio::test]
async fn test_empty_credential_is_rejected_before_sending() {
    let mock = MockRest::fixed(200, "{}");
    let pex = PexConnector::new(mock.clone());

    let err = pex
        .get_business_details(&Credential::new("  "))
        .await
        .unwrap_err();
    assert!(matches!(err, PexError::AuthError(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_exchange_uses_bearer_scheme() {
    let mock = MockRest::fixed(200, r#""ext-issued""#);
    let pex = PexConnector::new(mock.clone());
    let request = ExchangeTokenRequest {
        app_id: "app".to_string(),
        app_secret: "secret".to_string(),
    };

    let issued = pex
        .exchange_jwt_for_api_token(&Credential::new("jwt-value"), &request)
        .await
        .unwrap();
    assert_eq!(issued, "ext-issued");

    let sent = &mock.requests()[0];
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.endpoint, "/Internal/V4/Account/Token/Exchange");
    let header = sent.authorization.header_value().unwrap().unwrap();
    assert_eq!(header.to_str().unwrap(), "Bearer jwt-value");
    let body = sent.body.as_ref().unwrap();
    assert_eq!(body["AppId"], "app");
    assert_eq!(body["AppSecret"], "secret");
}

#[tokio::test]
async fn test_exchange_without_token_is_auth_error() {
    let pex = PexConnector::new(MockRest::fixed(200, ""));
    let request = ExchangeTokenRequest {
        app_id: "app".to_string(),
        app_secret: "secret".to_string(),
    };

    let err = pex
        .exchange_jwt_for_api_token(&Credential::new("jwt-value"), &request)
        .await
        .unwrap_err();
    assert!(matches!(err, PexError::AuthError(_)));
}

#[tokio::test]
async fn test_concurrent_calls_keep_their_own_credentials() {
    let mock = MockRest::new(|request| {
        let id = request.endpoint.rsplit('/').next().unwrap_or_default();
        Ok(pexcard::core::kernel::RawResponse::new(
            200,
            format!(r#"{{"AccountId":{}}}"#, id),
        ))
    });
    let pex = PexConnector::new(mock.clone());

    let tokens: Vec<Credential> = (1..=8).map(|i| Credential::new(format!("tok-{}", i))).collect();
    let calls = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| pex.get_cardholder_details(token, i as i64 + 1));
    let results = join_all(calls).await;
    assert!(results.iter().all(Result::is_ok));

    let requests = mock.requests();
    assert_eq!(requests.len(), 8);
    for request in requests {
        let id = request.endpoint.rsplit('/').next().unwrap();
        let expected = Authorization::token(&Credential::new(format!("tok-{}", id))).unwrap();
        assert_eq!(request.authorization, expected, "endpoint {}", request.endpoint);
    }
}

#[tokio::test]
async fn test_missing_attachments_are_absent() {
    let mock = MockRest::fixed(404, "Not Found");
    let pex = PexConnector::new(mock.clone());

    let attachments = pex.get_transaction_attachments(&token(), 991).await.unwrap();
    assert!(attachments.is_none());
    assert_eq!(mock.endpoints(), vec!["/V4/Transactions/991/Attachments"]);

    let attachment = pex
        .get_transaction_attachment(&token(), 991, "a-1")
        .await
        .unwrap();
    assert!(attachment.is_none());
}

#[tokio::test]
async fn test_attachments_other_errors_propagate() {
    let pex = PexConnector::new(MockRest::fixed(500, "boom"));
    let err = pex
        .get_transaction_attachments(&token(), 991)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_attachment_content_decodes() {
    let pex = PexConnector::new(MockRest::fixed(
        200,
        r#"{"AttachmentId":"a-1","ContentType":"text/plain","Content":"cmVjZWlwdA=="}"#,
    ));
    let attachment = pex
        .get_transaction_attachment(&token(), 991, "a-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(attachment.decode_content().unwrap(), b"receipt");
}

#[tokio::test]
async fn test_tags_forbidden_means_disabled() {
    let pex = PexConnector::new(MockRest::fixed(403, "Tags are not enabled"));
    assert!(!pex.is_tags_enabled(&token()).await.unwrap());
    assert!(!pex
        .is_tags_available(&token(), CustomFieldType::Dropdown)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_tags_server_error_is_not_disabled() {
    let pex = PexConnector::new(MockRest::fixed(500, "boom"));
    let err = pex.is_tags_enabled(&token()).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_tags_availability_server_error_propagates() {
    let pex = PexConnector::new(MockRest::fixed(500, "boom"));
    let err = pex
        .is_tags_available(&token(), CustomFieldType::Text)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.body(), Some("boom"));
}

#[tokio::test]
async fn test_tags_available_by_type() {
    let pex = PexConnector::new(MockRest::fixed(
        200,
        r#"[{"Id":"t1","Name":"Project","Type":"Dropdown","IsEnabled":true}]"#,
    ));
    assert!(pex.is_tags_enabled(&token()).await.unwrap());
    assert!(pex
        .is_tags_available(&token(), CustomFieldType::Dropdown)
        .await
        .unwrap());
    assert!(!pex
        .is_tags_available(&token(), CustomFieldType::YesNo)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_tag_id_with_slash_is_rejected() {
    let mock = MockRest::fixed(200, "{}");
    let pex = PexConnector::new(mock.clone());

    let err = pex.delete_dropdown_tag(&token(), "a/b").await.unwrap_err();
    assert!(matches!(err, PexError::InvalidParameters(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_business_listing_keeps_input_offset() {
    let mock = MockRest::fixed(200, &feed_json(&[]));
    let pex = PexConnector::new(mock.clone());
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let query = TransactionQuery::new(
        offset.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap(),
        offset.with_ymd_and_hms(2024, 7, 1, 11, 0, 0).unwrap(),
    )
    .unwrap();

    pex.get_business_account_transactions(&token(), &query)
        .await
        .unwrap();

    let request = &mock.requests()[0];
    assert_eq!(request.endpoint, "/V4/Details/TransactionDetails");
    assert_eq!(request.query_param("StartDate"), Some("2024-07-01T10:00:00"));
    assert_eq!(request.query_param("EndDate"), Some("2024-07-01T11:00:00"));
    assert_eq!(request.query_param("IncludePendings"), Some("False"));
    assert_eq!(request.query_param("IncludeDeclines"), Some("False"));
}

#[tokio::test]
async fn test_cardholder_listing_sends_eastern_time() {
    let mock = MockRest::fixed(
        200,
        &feed_json(&[transaction_json(5, "CardFunding", "25.00", "2024-07-01T04:10:00")]),
    );
    let pex = PexConnector::new(mock.clone());
    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let query = TransactionQuery::new(
        offset.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap(),
        offset.with_ymd_and_hms(2024, 7, 1, 11, 0, 0).unwrap(),
    )
    .unwrap()
    .include_pendings(true);

    let transactions = pex
        .get_cardholder_transactions(&token(), 42, &query)
        .await
        .unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions.card_fundings().count(), 1);

    let request = &mock.requests()[0];
    assert_eq!(request.endpoint, "/V4/Details/TransactionDetails/42");
    assert_eq!(request.query_param("StartDate"), Some("2024-07-01T04:00:00"));
    assert_eq!(request.query_param("EndDate"), Some("2024-07-01T05:00:00"));
    assert_eq!(request.query_param("IncludePendings"), Some("True"));
}

#[tokio::test]
async fn test_transaction_count() {
    let mock = MockRest::fixed(200, "17");
    let pex = PexConnector::new(mock.clone());
    let utc = chrono::Utc;
    let query = TransactionQuery::new(
        utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
    )
    .unwrap();

    let count = pex
        .get_all_cardholder_transactions_count(&token(), &query)
        .await
        .unwrap();
    assert_eq!(count, 17);
    assert_eq!(
        mock.endpoints(),
        vec!["/V4/Details/AllCardholderTransactionCount"]
    );
}
