use secrecy::{ExposeSecret, Secret};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Opaque bearer token supplied per call. Never persisted by the client.
#[derive(Clone)]
pub struct Credential(Secret<String>);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().trim().is_empty()
    }

    /// Raw token value (use carefully - exposes secret)
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

/// Cooperative cancellation signal.
///
/// Clones share the same flag. Long-running composite operations check it
/// only between requests; a request already on the wire always completes.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_prints_token() {
        let credential = Credential::new("abc123");
        assert!(!format!("{:?}", credential).contains("abc123"));
    }

    #[test]
    fn test_whitespace_credential_is_empty() {
        assert!(Credential::new("   ").is_empty());
        assert!(!Credential::new("t").is_empty());
    }

    #[test]
    fn test_cancellation_is_shared_between_clones() {
        let flag = CancellationFlag::new();
        let observer = flag.clone();
        assert!(!observer.is_cancelled());
        flag.cancel();
        assert!(observer.is_cancelled());
    }
}
