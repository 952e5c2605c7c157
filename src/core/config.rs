use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://coreapi.pexcard.com";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct PexConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Token loaded for callers' convenience. The client never reads it;
    /// every operation takes its credential explicitly.
    pub external_token: Option<Secret<String>>,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for PexConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("PexConfig", 4)?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("timeout_seconds", &self.timeout_seconds)?;
        state.serialize_field("user_agent", &self.user_agent)?;
        state.serialize_field(
            "external_token",
            &self.external_token.as_ref().map(|_| "[REDACTED]"),
        )?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for PexConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct PexConfigHelper {
            base_url: Option<String>,
            timeout_seconds: Option<u64>,
            user_agent: Option<String>,
            external_token: Option<String>,
        }

        let helper = PexConfigHelper::deserialize(deserializer)?;
        let defaults = Self::default();
        Ok(Self {
            base_url: helper
                .base_url
                .map_or(defaults.base_url, |url| normalize_base_url(&url)),
            timeout_seconds: helper.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            user_agent: helper.user_agent.unwrap_or(defaults.user_agent),
            external_token: helper.external_token.map(Secret::new),
        })
    }
}

impl Default for PexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl PexConfig {
    /// Create a configuration pointing at the given API root
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: format!("pexcard-rs/{}", env!("CARGO_PKG_VERSION")),
            external_token: None,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Recognised variables (all optional):
    /// - `{PREFIX}_BASE_URL`
    /// - `{PREFIX}_TIMEOUT_SECONDS`
    /// - `{PREFIX}_EXTERNAL_TOKEN`
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let base_url_var = format!("{}_BASE_URL", prefix);
        let timeout_var = format!("{}_TIMEOUT_SECONDS", prefix);
        let token_var = format!("{}_EXTERNAL_TOKEN", prefix);

        let mut config = env::var(&base_url_var).map_or_else(|_| Self::default(), Self::new);

        if let Ok(raw) = env::var(&timeout_var) {
            config.timeout_seconds = raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidConfiguration(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    timeout_var, raw
                ))
            })?;
        }

        config.external_token = env::var(&token_var)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .map(Secret::new);

        Ok(config)
    }

    /// Load a .env file (if present) and then read the environment
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(prefix, ".env")
    }

    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // fall back to the process environment
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_external_token(mut self, token: impl Into<String>) -> Self {
        self.external_token = Some(Secret::new(token.into()));
        self
    }

    pub fn has_external_token(&self) -> bool {
        self.external_token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }

    /// Get the configured token (use carefully - exposes secret)
    pub fn external_token(&self) -> Option<&str> {
        self.external_token
            .as_ref()
            .map(|token| token.expose_secret().as_str())
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = PexConfig::new("https://sandbox.pexcard.com/");
        assert_eq!(config.base_url, "https://sandbox.pexcard.com");
    }

    #[test]
    fn test_serialization_redacts_token() {
        let config = PexConfig::default().with_external_token("super-secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: PexConfig = serde_json::from_str(r#"{"external_token":"abc"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.external_token(), Some("abc"));
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        env::set_var("PEXCFGTEST_TIMEOUT_SECONDS", "soon");
        let result = PexConfig::from_env("pexcfgtest");
        env::remove_var("PEXCFGTEST_TIMEOUT_SECONDS");
        assert!(matches!(result, Err(ConfigError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_from_env_ignores_blank_token() {
        env::set_var("PEXBLANK_EXTERNAL_TOKEN", "  ");
        let config = PexConfig::from_env("pexblank").unwrap();
        env::remove_var("PEXBLANK_EXTERNAL_TOKEN");
        assert!(!config.has_external_token());
    }
}
