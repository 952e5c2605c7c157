use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PexError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Non-2xx response. `body` is the raw response text, never re-parsed.
    #[error("API error: {status} - {body}")]
    ApiError { status: u16, body: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error(
        "No card funding of {amount} found for cardholder account {cardholder_account_id} in the search window"
    )]
    NoMatchingTransaction {
        cardholder_account_id: i64,
        amount: Decimal,
    },
}

impl PexError {
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            body: body.into(),
        }
    }

    /// HTTP status of a server-reported failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of a server-reported failure
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::ApiError { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
