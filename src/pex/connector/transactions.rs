use crate::core::{
    credential::Credential, errors::PexError, kernel::RestClient, traits::TransactionFeed,
};
use crate::pex::rest::PexRestClient;
use crate::pex::types::{
    Attachment, AttachmentLink, BusinessAccountTransactions, CardholderTransactions, Transaction,
    TransactionQuery,
};
use async_trait::async_trait;
use tracing::debug;

/// Transaction listings, notes and attachments
pub struct Transactions<R: RestClient> {
    rest: PexRestClient<R>,
}

impl<R: RestClient> Transactions<R> {
    pub fn new(rest: &R) -> Self
    where
        R: Clone,
    {
        Self {
            rest: PexRestClient::new(rest.clone()),
        }
    }
}

#[async_trait]
impl<R: RestClient> TransactionFeed for Transactions<R> {
    async fn get_all_cardholder_transactions_count(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<i64, PexError> {
        self.rest
            .get_all_cardholder_transactions_count(token, query)
            .await
    }

    async fn get_all_cardholder_transactions(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<CardholderTransactions, PexError> {
        let transactions = self.rest.get_all_cardholder_transactions(token, query).await?;
        debug!(count = transactions.len(), "Fetched cardholder transactions");
        Ok(transactions)
    }

    async fn get_business_account_transactions(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<BusinessAccountTransactions, PexError> {
        let transactions = self
            .rest
            .get_business_account_transactions(token, query)
            .await?;
        debug!(count = transactions.len(), "Fetched business transactions");
        Ok(transactions)
    }

    async fn get_cardholder_transactions(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        query: &TransactionQuery,
    ) -> Result<CardholderTransactions, PexError> {
        self.rest
            .get_cardholder_transactions(token, cardholder_account_id, query)
            .await
    }

    async fn get_transaction_attachments(
        &self,
        token: &Credential,
        transaction_id: i64,
    ) -> Result<Option<Vec<AttachmentLink>>, PexError> {
        self.rest
            .get_transaction_attachments(token, transaction_id)
            .await
    }

    async fn get_transaction_attachment(
        &self,
        token: &Credential,
        transaction_id: i64,
        attachment_id: &str,
    ) -> Result<Option<Attachment>, PexError> {
        self.rest
            .get_transaction_attachment(token, transaction_id, attachment_id)
            .await
    }

    async fn add_transaction_note(
        &self,
        token: &Credential,
        transaction: &Transaction,
        note_text: &str,
    ) -> Result<(), PexError> {
        self.rest
            .add_transaction_note(token, transaction, note_text)
            .await
    }
}
