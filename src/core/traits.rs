use crate::core::{
    credential::{CancellationFlag, Credential},
    errors::PexError,
};
use crate::pex::types::{
    Attachment, AttachmentLink, BusinessAccountTransactions, BusinessDetails, CardholderDetails,
    CardholderProfile, CardholderTransactions, CustomFieldType, ExchangeTokenRequest,
    FundResponse, RenewTokenResponse, TagDetails, TagDropdownData, TagDropdownDetails,
    TokenResponse, Transaction, TransactionQuery,
};
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait TokenManagement {
    async fn renew_external_token(&self, token: &Credential)
        -> Result<RenewTokenResponse, PexError>;

    /// Exchange a short-lived JWT for an external token
    async fn exchange_jwt_for_api_token(
        &self,
        jwt: &Credential,
        request: &ExchangeTokenRequest,
    ) -> Result<String, PexError>;

    async fn delete_external_token(&self, token: &Credential) -> Result<(), PexError>;

    async fn get_tokens(&self, token: &Credential) -> Result<TokenResponse, PexError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn ping(&self) -> Result<bool, PexError>;

    async fn get_business_balance(&self, token: &Credential) -> Result<Decimal, PexError>;

    /// Business details including every cardholder account
    async fn get_business_details(&self, token: &Credential) -> Result<BusinessDetails, PexError>;

    async fn get_cardholder_details(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
    ) -> Result<CardholderDetails, PexError>;

    async fn get_cardholder_profile(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
    ) -> Result<CardholderProfile, PexError>;
}

#[async_trait]
pub trait TransactionFeed {
    async fn get_all_cardholder_transactions_count(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<i64, PexError>;

    async fn get_all_cardholder_transactions(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<CardholderTransactions, PexError>;

    async fn get_business_account_transactions(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<BusinessAccountTransactions, PexError>;

    /// Transactions of one cardholder; the range is sent in US Eastern time
    async fn get_cardholder_transactions(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        query: &TransactionQuery,
    ) -> Result<CardholderTransactions, PexError>;

    /// `Ok(None)` when the transaction has no attachments
    async fn get_transaction_attachments(
        &self,
        token: &Credential,
        transaction_id: i64,
    ) -> Result<Option<Vec<AttachmentLink>>, PexError>;

    /// `Ok(None)` when the attachment does not exist
    async fn get_transaction_attachment(
        &self,
        token: &Credential,
        transaction_id: i64,
        attachment_id: &str,
    ) -> Result<Option<Attachment>, PexError>;

    async fn add_transaction_note(
        &self,
        token: &Credential,
        transaction: &Transaction,
        note_text: &str,
    ) -> Result<(), PexError>;
}

#[async_trait]
pub trait TagConfiguration {
    async fn get_tags(&self, token: &Credential) -> Result<Vec<TagDetails>, PexError>;

    /// `false` when the server answers 403 for the tags resource
    async fn is_tags_enabled(&self, token: &Credential) -> Result<bool, PexError>;

    /// Whether tags are enabled and at least one tag has `field_type`
    async fn is_tags_available(
        &self,
        token: &Credential,
        field_type: CustomFieldType,
    ) -> Result<bool, PexError>;

    async fn get_tag(&self, token: &Credential, tag_id: &str) -> Result<TagDetails, PexError>;

    async fn get_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
    ) -> Result<TagDropdownDetails, PexError>;

    async fn create_dropdown_tag(
        &self,
        token: &Credential,
        tag: &TagDropdownData,
    ) -> Result<TagDropdownDetails, PexError>;

    async fn update_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
        tag: &TagDropdownData,
    ) -> Result<TagDropdownDetails, PexError>;

    async fn delete_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
    ) -> Result<TagDropdownDetails, PexError>;
}

#[async_trait]
pub trait CardFunding {
    /// Transfer funds from the business to a card
    async fn fund_card(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        amount: Decimal,
    ) -> Result<FundResponse, PexError>;

    /// Fund a card, then annotate the resulting feed entry with `note`
    async fn fund_card_with_note(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        amount: Decimal,
        note: &str,
        cancel: &CancellationFlag,
    ) -> Result<FundResponse, PexError>;
}

// Composite trait for callers that need every capability
#[async_trait]
pub trait PexApi:
    TokenManagement + AccountInfo + TransactionFeed + TagConfiguration + CardFunding
{
}
