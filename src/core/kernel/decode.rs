use crate::core::errors::PexError;
use crate::core::kernel::rest::RawResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::trace;

/// How non-success statuses are classified.
///
/// `Strict` turns every non-2xx into [`PexError::ApiError`]. The other
/// variants opt a single status into an explicit "absent" outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    #[default]
    Strict,
    /// 404 means the resource does not exist (attachment lookups)
    NotFoundAsAbsent,
    /// 403 means the feature is disabled for the account (tag checks)
    ForbiddenAsAbsent,
}

/// Outcome of decoding a response under a [`DecodePolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    Value(T),
    Absent,
}

impl<T> Decoded<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent => None,
        }
    }

    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Decode a completed response into `T` or a classified failure.
///
/// A success body that is empty, `null` or `{}` yields `T::default()`.
pub fn decode<T>(response: &RawResponse, policy: DecodePolicy) -> Result<Decoded<T>, PexError>
where
    T: DeserializeOwned + Default,
{
    if response.is_success() {
        return parse_body(&response.body).map(Decoded::Value);
    }

    match (policy, response.status) {
        (DecodePolicy::NotFoundAsAbsent, 404) | (DecodePolicy::ForbiddenAsAbsent, 403) => {
            trace!(status = response.status, "Treating response as absent");
            Ok(Decoded::Absent)
        }
        _ => Err(PexError::api(response.status, response.body.clone())),
    }
}

/// Strict decode: any non-2xx is an error
pub fn decode_value<T>(response: &RawResponse) -> Result<T, PexError>
where
    T: DeserializeOwned + Default,
{
    match decode(response, DecodePolicy::Strict)? {
        Decoded::Value(value) => Ok(value),
        Decoded::Absent => Err(PexError::api(response.status, response.body.clone())),
    }
}

/// Decode a response whose body carries nothing of interest
pub fn decode_empty(response: &RawResponse) -> Result<(), PexError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(PexError::api(response.status, response.body.clone()))
    }
}

fn parse_body<T>(body: &str) -> Result<T, PexError>
where
    T: DeserializeOwned + Default,
{
    if body.trim().is_empty() {
        return Ok(T::default());
    }

    let value: Value = serde_json::from_str(body).map_err(|e| {
        PexError::DeserializationError(format!("Failed to parse JSON response: {}", e))
    })?;

    match value {
        Value::Null => Ok(T::default()),
        Value::Object(ref map) if map.is_empty() => Ok(T::default()),
        other => serde_json::from_value(other).map_err(|e| {
            PexError::DeserializationError(format!("Failed to deserialize JSON: {}", e))
        }),
    }
}
