pub mod client;
pub mod error;
pub mod types;

pub use client::NumbersClient;
pub use error::NumbersError;
pub use types::{
    AssetRegistrationRequest, AssetRegistrationResponse, CommitRequest, CommitResponse,
};
