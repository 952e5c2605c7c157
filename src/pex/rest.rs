use crate::core::credential::Credential;
use crate::core::errors::PexError;
use crate::core::kernel::{
    decode, decode_empty, decode_value, Authorization, DecodePolicy, RestClient, RestRequest,
};
use crate::pex::types::{
    Attachment, AttachmentLink, AttachmentsResponse, BusinessAccountTransactions, BusinessBalance,
    BusinessDetails, CardholderDetails, CardholderProfile, CardholderTransactions,
    ExchangeTokenRequest, FundRequest, FundResponse, NoteRequest, RenewTokenResponse, TagDetails,
    TagDropdownData, TagDropdownDetails, TokenResponse, Transaction, TransactionListResponse,
    TransactionQuery,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

/// Thin typed wrapper around `RestClient` for the PEX API.
///
/// Every method builds its own authorization from the credential it is
/// given; nothing is remembered between calls.
#[derive(Debug, Clone)]
pub struct PexRestClient<R: RestClient> {
    client: R,
}

impl<R: RestClient> PexRestClient<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    pub fn inner(&self) -> &R {
        &self.client
    }

    /// Check API availability. Needs no credential.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<bool, PexError> {
        let response = self
            .client
            .execute(RestRequest::get("/v4/ping", Authorization::None))
            .await?;
        Ok(response.is_success())
    }

    // Tokens

    #[instrument(skip_all)]
    pub async fn renew_external_token(
        &self,
        token: &Credential,
    ) -> Result<RenewTokenResponse, PexError> {
        let response = self
            .client
            .post("/V4/Token/Renew", None, Authorization::token(token)?)
            .await?;
        decode_value(&response)
    }

    /// Exchange a JWT for a platform external token
    #[instrument(skip_all, fields(app_id = %request.app_id))]
    pub async fn exchange_jwt_for_api_token(
        &self,
        jwt: &Credential,
        request: &ExchangeTokenRequest,
    ) -> Result<String, PexError> {
        let response = self
            .client
            .post(
                "/Internal/V4/Account/Token/Exchange",
                Some(to_body(request)?),
                Authorization::bearer(jwt)?,
            )
            .await?;
        decode_value(&response)
    }

    #[instrument(skip_all)]
    pub async fn delete_external_token(&self, token: &Credential) -> Result<(), PexError> {
        let response = self
            .client
            .delete("/V4/Token", Authorization::token(token)?)
            .await?;
        decode_empty(&response)
    }

    #[instrument(skip_all)]
    pub async fn get_tokens(&self, token: &Credential) -> Result<TokenResponse, PexError> {
        let response = self
            .client
            .get("/V4/Token", &[], Authorization::token(token)?)
            .await?;
        decode_value(&response)
    }

    // Account

    /// Business balance; a response without a balance reads as zero
    #[instrument(skip_all)]
    pub async fn get_business_balance(&self, token: &Credential) -> Result<Decimal, PexError> {
        let response = self
            .client
            .get("/V4/Business/Balance", &[], Authorization::token(token)?)
            .await?;
        let balance: BusinessBalance = decode_value(&response)?;
        Ok(balance.business_account_balance)
    }

    #[instrument(skip_all)]
    pub async fn get_business_details(
        &self,
        token: &Credential,
    ) -> Result<BusinessDetails, PexError> {
        let response = self
            .client
            .get("/V4/Details/AccountDetails", &[], Authorization::token(token)?)
            .await?;
        decode_value(&response)
    }

    #[instrument(skip(self, token))]
    pub async fn get_cardholder_details(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
    ) -> Result<CardholderDetails, PexError> {
        let endpoint = format!("/V4/Details/AccountDetails/{}", cardholder_account_id);
        let response = self
            .client
            .get(&endpoint, &[], Authorization::token(token)?)
            .await?;
        decode_value(&response)
    }

    #[instrument(skip(self, token))]
    pub async fn get_cardholder_profile(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
    ) -> Result<CardholderProfile, PexError> {
        let endpoint = format!("/V4/Card/Profile/{}", cardholder_account_id);
        let response = self
            .client
            .get(&endpoint, &[], Authorization::token(token)?)
            .await?;
        decode_value(&response)
    }

    // Transactions

    #[instrument(skip(self, token))]
    pub async fn get_all_cardholder_transactions_count(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<i64, PexError> {
        let response = self
            .client
            .get(
                "/V4/Details/AllCardholderTransactionCount",
                &query.to_query_params(),
                Authorization::token(token)?,
            )
            .await?;
        decode_value(&response)
    }

    #[instrument(skip(self, token))]
    pub async fn get_all_cardholder_transactions(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<CardholderTransactions, PexError> {
        let response = self
            .client
            .get(
                "/V4/Details/AllCardholderTransactions",
                &query.to_query_params(),
                Authorization::token(token)?,
            )
            .await?;
        let list: TransactionListResponse = decode_value(&response)?;
        Ok(list.into())
    }

    #[instrument(skip(self, token))]
    pub async fn get_business_account_transactions(
        &self,
        token: &Credential,
        query: &TransactionQuery,
    ) -> Result<BusinessAccountTransactions, PexError> {
        let response = self
            .client
            .get(
                "/V4/Details/TransactionDetails",
                &query.to_query_params(),
                Authorization::token(token)?,
            )
            .await?;
        let list: TransactionListResponse = decode_value(&response)?;
        Ok(list.into())
    }

    /// Transactions of one cardholder account.
    ///
    /// This endpoint reads its date range in US Eastern time, so the range
    /// is converted before formatting.
    #[instrument(skip(self, token))]
    pub async fn get_cardholder_transactions(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        query: &TransactionQuery,
    ) -> Result<CardholderTransactions, PexError> {
        let endpoint = format!("/V4/Details/TransactionDetails/{}", cardholder_account_id);
        let response = self
            .client
            .get(
                &endpoint,
                &query.to_eastern_query_params(),
                Authorization::token(token)?,
            )
            .await?;
        let list: TransactionListResponse = decode_value(&response)?;
        Ok(list.into())
    }

    /// Attachment links of a transaction; `None` when the server has none
    #[instrument(skip(self, token))]
    pub async fn get_transaction_attachments(
        &self,
        token: &Credential,
        transaction_id: i64,
    ) -> Result<Option<Vec<AttachmentLink>>, PexError> {
        let endpoint = format!("/V4/Transactions/{}/Attachments", transaction_id);
        let response = self
            .client
            .get(&endpoint, &[], Authorization::token(token)?)
            .await?;
        let decoded = decode::<AttachmentsResponse>(&response, DecodePolicy::NotFoundAsAbsent)?;
        Ok(decoded.into_option().map(|list| list.attachments))
    }

    #[instrument(skip(self, token))]
    pub async fn get_transaction_attachment(
        &self,
        token: &Credential,
        transaction_id: i64,
        attachment_id: &str,
    ) -> Result<Option<Attachment>, PexError> {
        let attachment_id = require_id("attachment_id", attachment_id)?;
        let endpoint = format!(
            "/V4/Transactions/{}/Attachment/{}",
            transaction_id, attachment_id
        );
        let response = self
            .client
            .get(&endpoint, &[], Authorization::token(token)?)
            .await?;
        decode::<Attachment>(&response, DecodePolicy::NotFoundAsAbsent).map(|d| d.into_option())
    }

    #[instrument(skip(self, token, transaction, note_text), fields(transaction_id = transaction.transaction_id))]
    pub async fn add_transaction_note(
        &self,
        token: &Credential,
        transaction: &Transaction,
        note_text: &str,
    ) -> Result<(), PexError> {
        let request = NoteRequest::for_transaction(transaction, note_text);
        let response = self
            .client
            .post(
                "/v4/note",
                Some(to_body(&request)?),
                Authorization::token(token)?,
            )
            .await?;
        decode_empty(&response)
    }

    // Funding

    /// Move funds from the business account to a card
    #[instrument(skip(self, token))]
    pub async fn fund_card(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
        amount: Decimal,
    ) -> Result<FundResponse, PexError> {
        if amount <= Decimal::ZERO {
            return Err(PexError::InvalidParameters(format!(
                "Funding amount must be positive, got {}",
                amount
            )));
        }

        let endpoint = format!("/V4/Card/Fund/{}", cardholder_account_id);
        let response = self
            .client
            .post(
                &endpoint,
                Some(to_body(&FundRequest { amount })?),
                Authorization::token(token)?,
            )
            .await?;
        decode_value(&response)
    }

    // Tags

    #[instrument(skip_all)]
    pub async fn get_tags(&self, token: &Credential) -> Result<Vec<TagDetails>, PexError> {
        let response = self
            .client
            .get(
                "/V4/Business/Configuration/Tags",
                &[],
                Authorization::token(token)?,
            )
            .await?;
        decode_value(&response)
    }

    /// Tags, or `None` when the tags feature is disabled (403)
    #[instrument(skip_all)]
    pub async fn get_tags_if_enabled(
        &self,
        token: &Credential,
    ) -> Result<Option<Vec<TagDetails>>, PexError> {
        let response = self
            .client
            .get(
                "/V4/Business/Configuration/Tags",
                &[],
                Authorization::token(token)?,
            )
            .await?;
        decode::<Vec<TagDetails>>(&response, DecodePolicy::ForbiddenAsAbsent)
            .map(|d| d.into_option())
    }

    #[instrument(skip(self, token))]
    pub async fn get_tag(&self, token: &Credential, tag_id: &str) -> Result<TagDetails, PexError> {
        self.fetch_tag(token, tag_id).await
    }

    #[instrument(skip(self, token))]
    pub async fn get_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
    ) -> Result<TagDropdownDetails, PexError> {
        self.fetch_tag(token, tag_id).await
    }

    #[instrument(skip(self, token, tag), fields(name = %tag.name))]
    pub async fn create_dropdown_tag(
        &self,
        token: &Credential,
        tag: &TagDropdownData,
    ) -> Result<TagDropdownDetails, PexError> {
        let response = self
            .client
            .post(
                "/V4/Business/Configuration/Tag/Dropdown",
                Some(to_body(tag)?),
                Authorization::token(token)?,
            )
            .await?;
        decode_value(&response)
    }

    #[instrument(skip(self, token, tag))]
    pub async fn update_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
        tag: &TagDropdownData,
    ) -> Result<TagDropdownDetails, PexError> {
        let tag_id = require_id("tag_id", tag_id)?;
        let endpoint = format!("/V4/Business/Configuration/Tag/Dropdown/{}", tag_id);
        let response = self
            .client
            .put(&endpoint, to_body(tag)?, Authorization::token(token)?)
            .await?;
        decode_value(&response)
    }

    #[instrument(skip(self, token))]
    pub async fn delete_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
    ) -> Result<TagDropdownDetails, PexError> {
        let tag_id = require_id("tag_id", tag_id)?;
        let endpoint = format!("/V4/Business/Configuration/Tag/Dropdown/{}", tag_id);
        let response = self
            .client
            .delete(&endpoint, Authorization::token(token)?)
            .await?;
        decode_value(&response)
    }

    async fn fetch_tag<T>(&self, token: &Credential, tag_id: &str) -> Result<T, PexError>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        let tag_id = require_id("tag_id", tag_id)?;
        let endpoint = format!("/V4/Business/Configuration/Tag/{}", tag_id);
        let response = self
            .client
            .get(&endpoint, &[], Authorization::token(token)?)
            .await?;
        decode_value(&response)
    }
}

fn to_body<T: Serialize + ?Sized>(value: &T) -> Result<Value, PexError> {
    serde_json::to_value(value).map_err(|e| {
        PexError::SerializationError(format!("Failed to serialize request body: {}", e))
    })
}

fn require_id<'a>(name: &str, value: &'a str) -> Result<&'a str, PexError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(PexError::InvalidParameters(format!(
            "{} must be a non-empty path segment",
            name
        )));
    }
    Ok(trimmed)
}
