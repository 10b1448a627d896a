use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;

use common::contract::{ContractError, QubeContract, Receipt};

use super::{endpoint, ApiClient, ApiError, ApiRequest};

/// Body of `POST /mint-qube` on the mint relay
#[derive(Debug, Clone, Serialize)]
pub struct MintQubeRequest {
    pub uri: String,
    pub key: String,
}

impl ApiRequest for MintQubeRequest {
    type Response = Receipt;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = endpoint(base_url, "mint-qube")?;
        Ok(client.post(full_url).json(&self))
    }
}

/// Qube contract reached through a mint relay that signs and submits the
/// transaction and answers with its receipt
#[derive(Debug, Clone)]
pub struct ContractClient {
    api: ApiClient,
}

impl ContractClient {
    pub fn new(relay_url: &Url) -> Result<Self, ApiError> {
        Ok(Self {
            api: ApiClient::new(relay_url)?,
        })
    }
}

#[async_trait]
impl QubeContract for ContractClient {
    async fn mint_qube(&self, metadata_uri: &str, key: &str) -> Result<Receipt, ContractError> {
        let receipt = self
            .api
            .call(MintQubeRequest {
                uri: metadata_uri.to_string(),
                key: key.to_string(),
            })
            .await
            .map_err(|e| ContractError::Default(e.into()))?;
        tracing::debug!(
            "mint transaction {} carried {} logs",
            receipt.transaction_hash,
            receipt.logs.len()
        );
        Ok(receipt)
    }
}
