pub mod core;
pub mod pex;

pub use core::{
    config::PexConfig,
    credential::{CancellationFlag, Credential},
    errors::PexError,
    traits::{AccountInfo, CardFunding, PexApi, TagConfiguration, TokenManagement, TransactionFeed},
};
pub use pex::{build_connector, PexConnector};
