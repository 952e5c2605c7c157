use crate::core::{
    credential::Credential, errors::PexError, kernel::RestClient, traits::TagConfiguration,
};
use crate::pex::rest::PexRestClient;
use crate::pex::types::{CustomFieldType, TagDetails, TagDropdownData, TagDropdownDetails};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Business tag configuration
pub struct Tags<R: RestClient> {
    rest: PexRestClient<R>,
}

impl<R: RestClient> Tags<R> {
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
impl<R: RestClient> TagConfiguration for Tags<R> {
    async fn get_tags(&self, token: &Credential) -> Result<Vec<TagDetails>, PexError> {
        self.rest.get_tags(token).await
    }

    #[instrument(skip_all)]
    async fn is_tags_enabled(&self, token: &Credential) -> Result<bool, PexError> {
        let enabled = self.rest.get_tags_if_enabled(token).await?.is_some();
        debug!(enabled, "Checked tags feature");
        Ok(enabled)
    }

    #[instrument(skip(self, token))]
    async fn is_tags_available(
        &self,
        token: &Credential,
        field_type: CustomFieldType,
    ) -> Result<bool, PexError> {
        let available = self
            .rest
            .get_tags_if_enabled(token)
            .await?
            .is_some_and(|tags| tags.iter().any(|tag| tag.field_type == field_type));
        Ok(available)
    }

    async fn get_tag(&self, token: &Credential, tag_id: &str) -> Result<TagDetails, PexError> {
        self.rest.get_tag(token, tag_id).await
    }

    async fn get_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
    ) -> Result<TagDropdownDetails, PexError> {
        self.rest.get_dropdown_tag(token, tag_id).await
    }

    async fn create_dropdown_tag(
        &self,
        token: &Credential,
        tag: &TagDropdownData,
    ) -> Result<TagDropdownDetails, PexError> {
        validate_dropdown(tag)?;
        self.rest.create_dropdown_tag(token, tag).await
    }

    async fn update_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
        tag: &TagDropdownData,
    ) -> Result<TagDropdownDetails, PexError> {
        validate_dropdown(tag)?;
        self.rest.update_dropdown_tag(token, tag_id, tag).await
    }

    async fn delete_dropdown_tag(
        &self,
        token: &Credential,
        tag_id: &str,
    ) -> Result<TagDropdownDetails, PexError> {
        self.rest.delete_dropdown_tag(token, tag_id).await
    }
}

/// Dropdown tags need a name and unique option values
fn validate_dropdown(tag: &TagDropdownData) -> Result<(), PexError> {
    if tag.name.trim().is_empty() {
        return Err(PexError::InvalidParameters(
            "Dropdown tag name cannot be empty".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for option in &tag.options {
        if !seen.insert(option.value.as_str()) {
            return Err(PexError::InvalidParameters(format!(
                "Duplicate dropdown option value '{}'",
                option.value
            )));
        }
    }
    Ok(())
}
