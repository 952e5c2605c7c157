/// PEX Kernel - transport layer for the API client
///
/// This module holds everything that is not specific to a single endpoint:
/// dispatching requests, attaching authorization, and classifying responses.
///
/// # Architecture
///
/// ## Transport Layer
/// - `RestClient`: async transport interface, one round trip per call
/// - `ReqwestRest`: production implementation over a shared `reqwest::Client`
///
/// ## Authorization
/// - `Authorization`: per-request header value, built from a `Credential`
/// - `TokenKind`: platform token vs JWT bearer scheme
///
/// ## Response Handling
/// - `decode`: typed decoding with an explicit `DecodePolicy`
///
/// # Key Principles
///
/// 1. **No ambient session**: credentials travel on each `RestRequest`
/// 2. **No hidden retries**: retry policy belongs to the caller
/// 3. **Raw errors**: non-2xx bodies are surfaced untouched
///
/// # Usage
///
/// ```rust,no_run
/// use pexcard::core::credential::Credential;
/// use pexcard::core::kernel::*;
/// use pexcard::pex::types::BusinessBalance;
///
/// # async fn example() -> Result<(), pexcard::PexError> {
/// let rest = ReqwestRest::new("https://coreapi.pexcard.com".to_string(), "pex".to_string())?;
/// let auth = Authorization::token(&Credential::new("external-token"))?;
///
/// let response = rest.get("/V4/Business/Balance", &[], auth).await?;
/// let balance: BusinessBalance = decode_value(&response)?;
/// println!("{}", balance.business_account_balance);
/// # Ok(())
/// # }
/// ```
///
/// ## Treating a status as absent
/// ```rust,no_run
/// use pexcard::core::kernel::*;
/// use pexcard::pex::types::AttachmentsResponse;
///
/// # fn example(response: RawResponse) -> Result<(), pexcard::PexError> {
/// match decode::<AttachmentsResponse>(&response, DecodePolicy::NotFoundAsAbsent)? {
///     Decoded::Value(list) => println!("{} attachments", list.attachments.len()),
///     Decoded::Absent => println!("no attachments"),
/// }
/// # Ok(())
/// # }
/// ```
pub mod auth;
pub mod decode;
pub mod rest;

// Re-export key types for convenience
pub use auth::{Authorization, TokenKind};
pub use decode::{decode, decode_empty, decode_value, DecodePolicy, Decoded};
pub use rest::{RawResponse, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, RestRequest};
