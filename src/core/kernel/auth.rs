use crate::core::credential::Credential;
use crate::core::errors::PexError;
use reqwest::header::HeaderValue;

/// Authorization scheme understood by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Platform external token, used by every operational call
    Token,
    /// JWT, used only to exchange for an external token
    Bearer,
}

impl TokenKind {
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Bearer => "Bearer",
        }
    }
}

/// Authorization for a single request.
///
/// Built fresh for every call and carried on the request itself, so
/// concurrent calls with different credentials never observe each other.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    None,
    Scheme { kind: TokenKind, value: String },
}

impl Authorization {
    /// Authorization for operational calls
    pub fn token(credential: &Credential) -> Result<Self, PexError> {
        Self::with_kind(TokenKind::Token, credential)
    }

    /// Authorization for the JWT exchange call
    pub fn bearer(jwt: &Credential) -> Result<Self, PexError> {
        Self::with_kind(TokenKind::Bearer, jwt)
    }

    pub fn with_kind(kind: TokenKind, credential: &Credential) -> Result<Self, PexError> {
        if credential.is_empty() {
            return Err(PexError::AuthError(format!(
                "A non-empty credential is required for '{}' authorization",
                kind.scheme()
            )));
        }
        Ok(Self::Scheme {
            kind,
            value: credential.expose().trim().to_string(),
        })
    }

    pub const fn kind(&self) -> Option<TokenKind> {
        match self {
            Self::None => None,
            Self::Scheme { kind, .. } => Some(*kind),
        }
    }

    /// Value for the `Authorization` header, if any
    pub fn header_value(&self) -> Result<Option<HeaderValue>, PexError> {
        match self {
            Self::None => Ok(None),
            Self::Scheme { kind, value } => {
                let mut header = HeaderValue::from_str(&format!("{} {}", kind.scheme(), value))
                    .map_err(|e| {
                        PexError::AuthError(format!("Invalid authorization header: {}", e))
                    })?;
                header.set_sensitive(true);
                Ok(Some(header))
            }
        }
    }
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("Authorization::None"),
            Self::Scheme { kind, .. } => f
                .debug_struct("Authorization")
                .field("kind", kind)
                .field("value", &"[REDACTED]")
                .finish(),
        }
    }
}
