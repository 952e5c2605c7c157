use crate::core::{
    config::PexConfig,
    errors::PexError,
    kernel::{ReqwestRest, RestClientBuilder, RestClientConfig},
};
use crate::pex::connector::PexConnector;

/// Create a PEX connector backed by reqwest
pub fn build_connector(config: &PexConfig) -> Result<PexConnector<ReqwestRest>, PexError> {
    Ok(PexConnector::new(build_rest(config)?))
}

/// Create the underlying REST transport
pub fn build_rest(config: &PexConfig) -> Result<ReqwestRest, PexError> {
    if config.base_url.is_empty() {
        return Err(PexError::ConfigurationError(
            "Base URL cannot be empty".to_string(),
        ));
    }
    if config.timeout_seconds == 0 {
        return Err(PexError::ConfigurationError(
            "Timeout must be at least one second".to_string(),
        ));
    }

    let rest_config = RestClientConfig::new(config.base_url.clone(), "pex".to_string())
        .with_timeout(config.timeout_seconds)
        .with_user_agent(config.user_agent.clone());

    RestClientBuilder::new(rest_config).build()
}
