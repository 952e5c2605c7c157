pub mod builder;
pub mod connector;
pub mod rest;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_connector, build_rest};
pub use connector::PexConnector;
pub use rest::PexRestClient;
pub use types::{
    BusinessAccountTransactions, CardholderTransactions, CustomFieldType, FundResponse,
    Transaction, TransactionQuery,
};
