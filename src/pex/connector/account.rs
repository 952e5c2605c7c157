use crate::core::{
    credential::Credential,
    errors::PexError,
    kernel::RestClient,
    traits::{AccountInfo, TokenManagement},
};
use crate::pex::rest::PexRestClient;
use crate::pex::types::{
    BusinessDetails, CardholderDetails, CardholderProfile, ExchangeTokenRequest,
    RenewTokenResponse, TokenResponse,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Account and token operations
pub struct Account<R: RestClient> {
    rest: PexRestClient<R>,
}

impl<R: RestClient> Account<R> {
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
impl<R: RestClient> TokenManagement for Account<R> {
    async fn renew_external_token(
        &self,
        token: &Credential,
    ) -> Result<RenewTokenResponse, PexError> {
        let renewed = self.rest.renew_external_token(token).await?;
        debug!(expires = ?renewed.expiration_date, "External token renewed");
        Ok(renewed)
    }

    async fn exchange_jwt_for_api_token(
        &self,
        jwt: &Credential,
        request: &ExchangeTokenRequest,
    ) -> Result<String, PexError> {
        let token = self.rest.exchange_jwt_for_api_token(jwt, request).await?;
        if token.trim().is_empty() {
            return Err(PexError::AuthError(
                "Token exchange succeeded but returned no token".to_string(),
            ));
        }
        Ok(token)
    }

    async fn delete_external_token(&self, token: &Credential) -> Result<(), PexError> {
        self.rest.delete_external_token(token).await
    }

    async fn get_tokens(&self, token: &Credential) -> Result<TokenResponse, PexError> {
        self.rest.get_tokens(token).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for Account<R> {
    async fn ping(&self) -> Result<bool, PexError> {
        self.rest.ping().await
    }

    async fn get_business_balance(&self, token: &Credential) -> Result<Decimal, PexError> {
        self.rest.get_business_balance(token).await
    }

    #[instrument(skip_all)]
    async fn get_business_details(&self, token: &Credential) -> Result<BusinessDetails, PexError> {
        let details = self.rest.get_business_details(token).await?;
        debug!(
            business_account_id = details.business_account_id,
            cardholders = details.cardholder_accounts.len(),
            "Fetched business details"
        );
        Ok(details)
    }

    async fn get_cardholder_details(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
    ) -> Result<CardholderDetails, PexError> {
        self.rest
            .get_cardholder_details(token, cardholder_account_id)
            .await
    }

    async fn get_cardholder_profile(
        &self,
        token: &Credential,
        cardholder_account_id: i64,
    ) -> Result<CardholderProfile, PexError> {
        self.rest
            .get_cardholder_profile(token, cardholder_account_id)
            .await
    }
}
