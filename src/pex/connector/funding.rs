use crate::core::{
    credential::{CancellationFlag, Credential},
    errors::PexError,
    kernel::RestClient,
    traits::CardFunding,
};
use crate::pex::rest::PexRestClient;
use crate::pex::types::{CardholderTransactions, FundResponse, Transaction, TransactionQuery};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

/// How far before "now" the feed search starts
pub const SEARCH_LOOKBACK_SECONDS: i64 = 30;
/// Width of the feed search window
pub const SEARCH_WINDOW_SECONDS: i64 = 60;

/// Card funding, including fund-then-annotate.
///
/// The funding endpoint acknowledges success without a transaction id, so
/// annotating a funding means finding it in the feed afterwards. Two
/// same-amount fundings of one account inside the search window cannot be
/// told apart; the most recent one is annotated.
pub struct Funding<R: RestClient> {
    rest: PexRestClient<R>,
    clock: fn() -> DateTime<Utc>,
}

impl<R: RestClient> Funding<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: PexRestClient::new(rest.clone()),
            clock: Utc::now,
        }
    }

    /// Replace the clock used to place the search window
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }
}

/// Feed window expected to contain a funding created at `now`.
///
/// Starts `SEARCH_LOOKBACK_SECONDS` before `now`, truncated to whole
/// seconds, and spans `SEARCH_WINDOW_SECONDS`.
pub fn search_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = (now - Duration::seconds(SEARCH_LOOKBACK_SECONDS)).trunc_subsecs(0);
    (start, start + Duration::seconds(SEARCH_WINDOW_SECONDS))
}

/// Pick the card funding of exactly `amount` with the latest timestamp.
///
/// Ties on timestamp go to the higher transaction id.
pub fn select_funding(transactions: &CardholderTransactions, amount: Decimal) -> Option<&Transaction> {
    transactions
        .card_fundings()
        .filter(|t| t.transaction_amount == amount)
        .max_by(|a, b| {
            a.transaction_time
                .cmp(&b.transaction_time)
                .then(a.transaction_id.cmp(&b.transaction_id))
        })
}

#[async_trait]
impl<R: RestClient> CardFunding for Funding<R> {
    async fn fund_card(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        amount: Decimal,
    ) -> Result<FundResponse, PexError> {
        self.rest
            .fund_card(token, cardholder_account_id, amount)
            .await
    }

    #[instrument(skip(self, token, note, cancel))]
    async fn fund_card_with_note(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        amount: Decimal,
        note: &str,
        cancel: &CancellationFlag,
    ) -> Result<FundResponse, PexError> {
        let funding = self
            .rest
            .fund_card(token, cardholder_account_id, amount)
            .await?;

        if cancel.is_cancelled() {
            warn!("Cancelled after funding; skipping note");
            return Ok(funding);
        }

        let (start, end) = search_window((self.clock)());
        debug!(%start, %end, "Searching feed for funding");

        let query = TransactionQuery::new(start, end)?;
        let transactions = self
            .rest
            .get_cardholder_transactions(token, cardholder_account_id, &query)
            .await?;

        let matched = select_funding(&transactions, amount).ok_or_else(|| {
            PexError::NoMatchingTransaction {
                cardholder_account_id,
                amount,
            }
        })?;
        debug!(
            transaction_id = matched.transaction_id,
            candidates = transactions.len(),
            "Matched funding transaction"
        );

        if cancel.is_cancelled() {
            warn!(
                transaction_id = matched.transaction_id,
                "Cancelled before note; funding stands without annotation"
            );
            return Ok(funding);
        }

        if let Err(e) = self.rest.add_transaction_note(token, matched, note).await {
            warn!(
                transaction_id = matched.transaction_id,
                error = %e,
                "Failed to annotate funding transaction"
            );
        }

        Ok(funding)
    }
}
