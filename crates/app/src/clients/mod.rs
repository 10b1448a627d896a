#[allow(clippy::module_inception)]
mod client;
mod contract;
mod encryption;
mod error;
mod pinata;

use std::sync::Arc;

pub use client::ApiClient;
pub use contract::{ContractClient, MintQubeRequest};
pub use encryption::EncryptionClient;
pub use error::ApiError;
pub use pinata::{PinResponse, PinataClient};

use common::mint::Minter;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::state::AppConfig;

pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// Resolve `path` below `base`, keeping any path prefix `base` already has
pub fn endpoint(base: &Url, path: &str) -> Result<Url, ApiError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefix = format!("{}/", base.path());
        base.set_path(&prefix);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

/// Wire a [`Minter`] to the services named in `config`
pub fn minter(config: &AppConfig) -> Result<Minter, ApiError> {
    let pinata = PinataClient::new(&config.pinata_url, config.pinata_jwt.as_deref())?;
    let encryption = EncryptionClient::new(&config.server_url)?;
    let contract = ContractClient::new(&config.contract_url)?;

    Ok(Minter::new(
        Arc::new(pinata),
        Arc::new(encryption),
        Arc::new(contract),
    ))
}
