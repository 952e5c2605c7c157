use crate::core::errors::PexError;
use crate::core::time::{format_date_time, to_eastern};
use base64::engine::general_purpose;
use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction type category the platform uses for card fundings
pub const CARD_FUNDING_CATEGORY: &str = "CardFunding";

// Token Types

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RenewTokenResponse {
    pub token: String,
    pub expiration_date: Option<NaiveDateTime>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExchangeTokenRequest {
    pub app_id: String,
    pub app_secret: String,
}

impl fmt::Debug for ExchangeTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeTokenRequest")
            .field("app_id", &self.app_id)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TokenResponse {
    pub tokens: Vec<TokenData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TokenData {
    pub app_id: String,
    /// Masked by the server
    pub token: String,
    pub created_date: Option<NaiveDateTime>,
    pub expiration_date: Option<NaiveDateTime>,
}

// Account Types

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BusinessBalance {
    pub business_account_balance: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BusinessDetails {
    pub business_account_id: i64,
    pub business_name: String,
    pub business_account_balance: Decimal,
    #[serde(rename = "CHAccountList")]
    pub cardholder_accounts: Vec<CardholderAccount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CardholderAccount {
    pub account_id: i64,
    pub account_status: String,
    pub first_name: String,
    pub last_name: String,
    pub ledger_balance: Decimal,
    pub available_balance: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CardholderDetails {
    pub account_id: i64,
    pub account_status: String,
    pub ledger_balance: Decimal,
    pub available_balance: Decimal,
    pub profile: CardholderProfile,
    pub card_list: Vec<Card>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Card {
    pub card_id: i64,
    pub last4_card_number: String,
    pub expiration_date: Option<NaiveDateTime>,
    pub card_status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CardholderProfile {
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDateTime>,
    pub home_address: Address,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Address {
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

// Funding Types

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FundRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Acknowledgment of a funding request. Carries no transaction id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FundResponse {
    pub account_id: i64,
    pub available_balance: Decimal,
    pub ledger_balance: Decimal,
}

// Transaction Types

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TransactionListResponse {
    pub transaction_list: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    pub transaction_id: i64,
    #[serde(default)]
    pub acct_id: i64,
    pub transaction_time: NaiveDateTime,
    #[serde(default)]
    pub settlement_time: Option<NaiveDateTime>,
    pub transaction_amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub transaction_type: String,
    #[serde(default)]
    pub transaction_type_category: String,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub is_pending: bool,
    #[serde(default)]
    pub is_decline: bool,
    #[serde(default)]
    pub transaction_notes: Vec<TransactionNote>,
}

impl Transaction {
    pub fn is_card_funding(&self) -> bool {
        self.transaction_type_category == CARD_FUNDING_CATEGORY
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TransactionNote {
    pub note_id: i64,
    pub note_text: String,
    pub user_name: String,
    pub note_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoteRequest {
    pub note_text: String,
    pub pending: bool,
    pub transaction_id: i64,
}

impl NoteRequest {
    pub fn for_transaction(transaction: &Transaction, note_text: impl Into<String>) -> Self {
        Self {
            note_text: note_text.into(),
            pending: transaction.is_pending,
            transaction_id: transaction.transaction_id,
        }
    }
}

/// Date range and filters for transaction listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub include_pendings: bool,
    pub include_declines: bool,
}

impl TransactionQuery {
    /// Settled, non-declined transactions between `start` and `end`
    pub fn new<Tz: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, PexError> {
        let start = start.fixed_offset();
        let end = end.fixed_offset();
        if end < start {
            return Err(PexError::InvalidParameters(format!(
                "Transaction range ends before it starts ({} > {})",
                start, end
            )));
        }
        Ok(Self {
            start,
            end,
            include_pendings: false,
            include_declines: false,
        })
    }

    #[must_use]
    pub fn include_pendings(mut self, include: bool) -> Self {
        self.include_pendings = include;
        self
    }

    #[must_use]
    pub fn include_declines(mut self, include: bool) -> Self {
        self.include_declines = include;
        self
    }

    /// Parameters with dates rendered in their own offset
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        self.params(format_date_time(&self.start), format_date_time(&self.end))
    }

    /// Parameters with dates rendered in US Eastern time
    pub fn to_eastern_query_params(&self) -> Vec<(&'static str, String)> {
        self.params(
            format_date_time(&to_eastern(&self.start)),
            format_date_time(&to_eastern(&self.end)),
        )
    }

    fn params(&self, start: String, end: String) -> Vec<(&'static str, String)> {
        vec![
            ("IncludePendings", wire_bool(self.include_pendings)),
            ("IncludeDeclines", wire_bool(self.include_declines)),
            ("StartDate", start),
            ("EndDate", end),
        ]
    }
}

fn wire_bool(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

macro_rules! transaction_collection {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name(Vec<Transaction>);

        impl $name {
            pub fn new(transactions: Vec<Transaction>) -> Self {
                Self(transactions)
            }

            pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
                self.0.iter()
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn find_by_id(&self, transaction_id: i64) -> Option<&Transaction> {
                self.0.iter().find(|t| t.transaction_id == transaction_id)
            }

            pub fn card_fundings(&self) -> impl Iterator<Item = &Transaction> {
                self.0.iter().filter(|t| t.is_card_funding())
            }

            pub fn total_amount(&self) -> Decimal {
                self.0.iter().map(|t| t.transaction_amount).sum()
            }

            pub fn into_inner(self) -> Vec<Transaction> {
                self.0
            }
        }

        impl From<TransactionListResponse> for $name {
            fn from(response: TransactionListResponse) -> Self {
                Self(response.transaction_list)
            }
        }

        impl IntoIterator for $name {
            type Item = Transaction;
            type IntoIter = std::vec::IntoIter<Transaction>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a Transaction;
            type IntoIter = std::slice::Iter<'a, Transaction>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

transaction_collection!(
    /// Transactions of cardholder accounts, in server order
    CardholderTransactions
);

transaction_collection!(
    /// Transactions of the business account, in server order
    BusinessAccountTransactions
);

// Attachment Types

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttachmentsResponse {
    pub attachments: Vec<AttachmentLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttachmentLink {
    pub attachment_id: String,
    pub uri: String,
    pub content_type: String,
    pub created_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Attachment {
    pub attachment_id: String,
    pub content_type: String,
    /// Base64 payload
    pub content: String,
    pub created_date: Option<NaiveDateTime>,
}

impl Attachment {
    /// Decode the base64 payload into raw bytes
    pub fn decode_content(&self) -> Result<Vec<u8>, base64::DecodeError> {
        general_purpose::STANDARD.decode(self.content.trim())
    }
}

// Tag Types

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomFieldType {
    #[default]
    Text,
    YesNo,
    Decimal,
    Dropdown,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TagDetails {
    pub id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub field_type: CustomFieldType,
    pub is_required: bool,
    pub is_enabled: bool,
    pub order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TagDropdownDetails {
    pub id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub field_type: CustomFieldType,
    pub is_required: bool,
    pub is_enabled: bool,
    pub order: i32,
    pub options: Vec<TagOption>,
}

impl TagDropdownDetails {
    /// Values callers may choose from
    pub fn allowed_values(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .filter(|option| option.is_enabled)
            .map(|option| option.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TagOption {
    pub value: String,
    pub name: String,
    pub is_enabled: bool,
}

/// Body for creating or updating a dropdown tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TagDropdownData {
    pub name: String,
    pub is_required: bool,
    pub is_enabled: bool,
    pub order: i32,
    pub options: Vec<TagOption>,
}
