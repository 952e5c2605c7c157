use crate::core::credential::{CancellationFlag, Credential};
use crate::core::errors::PexError;
use crate::core::kernel::RestClient;
use crate::core::traits::{
    AccountInfo, CardFunding, PexApi, TagConfiguration, TokenManagement, TransactionFeed,
};
use crate::pex::types::{
    Attachment, AttachmentLink, BusinessAccountTransactions, BusinessDetails, CardholderDetails,
    CardholderProfile, CardholderTransactions, CustomFieldType, ExchangeTokenRequest,
    FundResponse, RenewTokenResponse, TagDetails, TagDropdownData, TagDropdownDetails,
    TokenResponse, Transaction, TransactionQuery,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub mod account;
pub mod funding;
pub mod tags;
pub mod transactions;

pub use account::Account;
pub use funding::Funding;
pub use tags::Tags;
pub use transactions::Transactions;

/// PEX connector that composes all sub-trait implementations.
///
/// Holds no session: every call takes its own credential, so one
/// connector can serve any number of concurrent callers.
pub struct PexConnector<R: RestClient> {
    pub account: Account<R>,
    pub transactions: Transactions<R>,
    pub tags: Tags<R>,
    pub funding: Funding<R>,
}

impl<R: RestClient + Clone> PexConnector<R> {
    pub fn new(rest: R) -> Self {
        Self {
            account: Account::new(&rest),
            transactions: Transactions::new(&rest),
            tags: Tags::new(&rest),
            funding: Funding::new(&rest),
        }
    }

    /// Replace the clock the funding search window is placed with
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.funding = self.funding.with_clock(clock);
        self
    }
}

// Implement traits for the connector by delegating to sub-components

#[async_trait]
impl<R: RestClient> TokenManagement for PexConnector<R> {
    async fn renew_external_token(
        &self,
        token: &Credential,
    ) -> Result<RenewTokenResponse, PexError> {
        self.account.renew_external_token(token).await
    }

    async fn exchange_jwt_for_api_token(
        &self,
        jwt: &Credential,
        request: &ExchangeTokenRequest,
    ) -> Result<String, PexError> {
        self.account.exchange_jwt_for_api_token(jwt, request).await
    }

    async fn delete_external_token(&self, token: &Credential) -> Result<(), PexError> {
        self.account.delete_external_token(token).await
    }

    async fn get_tokens(&self, token: &Credential) -> Result<TokenResponse, PexError> {
        self.account.get_tokens(token).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for PexConnector<R> {
    async fn ping(&self) -> Result<bool, PexError> {
        self.account.ping().await
    }

    async fn get_business_balance(&self, token: &Credential) -> Result<Decimal, PexError> {
        self.account.get_business_balance(token).await
    }

    async fn get_business_details(&self, token: &Credential) -> Result<BusinessDetails, PexError> {
        self.account.get_business_details(token).await
    }

    async fn get_cardholder_details(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
    ) -> Result<CardholderDetails, PexError> {
        self.account
            .get_cardholder_details(token, cardholder_account_id)
            .await
    }

    async fn get_cardholder_profile(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
    ) -> Result<CardholderProfile, PexError> {
        self.account
            .get_cardholder_profile(token, cardholder_account_id)
            .await
    }
}

#[async_trait]
impl<R: RestClient> TransactionFeed for PexConnector<R> {
    async fn get_all_cardholder_transactions_count(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<i64, PexError> {
        self.transactions
            .get_all_cardholder_transactions_count(token, query)
            .await
    }

    async fn get_all_cardholder_transactions(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<CardholderTransactions, PexError> {
        self.transactions
            .get_all_cardholder_transactions(token, query)
            .await
    }

    async fn get_business_account_transactions(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<BusinessAccountTransactions, PexError> {
        self.transactions
            .get_business_account_transactions(token, query)
            .await
    }

    async fn get_cardholder_transactions(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        query: &TransactionQuery,
    ) -> Result<CardholderTransactions, PexError> {
        self.transactions
            .get_cardholder_transactions(token, cardholder_account_id, query)
            .await
    }

    async fn get_transaction_attachments(
        &self,
        token: &Credential,
        transaction_id: i64,
    ) -> Result<Option<Vec<AttachmentLink>>, PexError> {
        self.transactions
            .get_transaction_attachments(token, transaction_id)
            .await
    }

    async fn get_transaction_attachment(
        &self,
        token: &Credential,
        transaction_id: i64,
        attachment_id: &str,
    ) -> Result<Option<Attachment>, PexError> {
        self.transactions
            .get_transaction_attachment(token, transaction_id, attachment_id)
            .await
    }

    async fn add_transaction_note(
        &self,
        token: &Credential,
        transaction: &Transaction,
        note_text: &str,
    ) -> Result<(), PexError> {
        self.transactions
            .add_transaction_note(token, transaction, note_text)
            .await
    }
}

#[async_trait]
impl<R: RestClient> TagConfiguration for PexConnector<R> {
    async fn get_tags(&self, token: &Credential) -> Result<Vec<TagDetails>, PexError> {
        self.tags.get_tags(token).await
    }

    async fn is_tags_enabled(&self, token: &Credential) -> Result<bool, PexError> {
        self.tags.is_tags_enabled(token).await
    }

    async fn is_tags_available(
        &self,
        token: &Credential,
        field_type: CustomFieldType,
    ) -> Result<bool, PexError> {
        self.tags.is_tags_available(token, field_type).await
    }

    async fn get_tag(&self, token: &Credential, tag_id: &str) -> Result<TagDetails, PexError> {
        self.tags.get_tag(token, tag_id).await
    }

    async fn get_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
    ) -> Result<TagDropdownDetails, PexError> {
        self.tags.get_dropdown_tag(token, tag_id).await
    }

    async fn create_dropdown_tag(
        &self,
        token: &Credential,
        tag: &TagDropdownData,
    ) -> Result<TagDropdownDetails, PexError> {
        self.tags.create_dropdown_tag(token, tag).await
    }

    async fn update_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
        tag: &TagDropdownData,
    ) -> Result<TagDropdownDetails, PexError> {
        self.tags.update_dropdown_tag(token, tag_id, tag).await
    }

    async fn delete_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
    ) -> Result<TagDropdownDetails, PexError> {
        self.tags.delete_dropdown_tag(token, tag_id).await
    }
}

#[async_trait]
impl<R: RestClient> CardFunding for PexConnector<R> {
    async fn fund_card(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        amount: Decimal,
    ) -> Result<FundResponse, PexError> {
        self.funding
            .fund_card(token, cardholder_account_id, amount)
            .await
    }

    async fn fund_card_with_note(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        amount: Decimal,
        note: &str,
        cancel: &CancellationFlag,
    ) -> Result<FundResponse, PexError> {
        self.funding
            .fund_card_with_note(token, cardholder_account_id, amount, note, cancel)
            .await
    }
}

impl<R: RestClient> PexApi for PexConnector<R> {}
