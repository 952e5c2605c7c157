#![allow(dead_code)]

use async_trait::async_trait;
use pexcard::core::kernel::{RawResponse, RestClient, RestRequest};
use pexcard::PexError;
use std::sync::{Arc, Mutex};

type Handler = dyn Fn(&RestRequest) -> Result<RawResponse, PexError> + Send + Sync;

/// In-memory transport that records every request and answers from a handler
#[derive(Clone)]
pub struct MockRest {
    requests: Arc<Mutex<Vec<RestRequest>>>,
    handler: Arc<Handler>,
}

impl MockRest {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&RestRequest) -> Result<RawResponse, PexError> + Send + Sync + 'static,
    {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            handler: Arc::new(handler),
        }
    }

    /// Answer every request with the same status and body
    pub fn fixed(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self::new(move |_| Ok(RawResponse::new(status, body.clone())))
    }

    pub fn requests(&self) -> Vec<RestRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.endpoint)
            .collect()
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn execute(&self, request: RestRequest) -> Result<RawResponse, PexError> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        (self.handler)(&request)
    }
}

pub fn transaction_json(id: i64, category: &str, amount: &str, time: &str) -> String {
    format!(
        r#"{{"TransactionId":{},"AcctId":42,"TransactionTime":"{}","TransactionAmount":{},"TransactionTypeCategory":"{}","IsPending":false}}"#,
        id, time, amount, category
    )
}

pub fn feed_json(transactions: &[String]) -> String {
    format!(r#"{{"TransactionList":[{}]}}"#, transactions.join(","))
}

pub const FUND_OK: &str = r#"{"AccountId":42,"AvailableBalance":112.5,"LedgerBalance":112.5}"#;
