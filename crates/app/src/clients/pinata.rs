use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use common::pinning::{ContentId, PinError, Pinner};
use common::qube::QubeFile;

use super::{endpoint, ApiClient, ApiError, ApiRequest};

/// Response of both Pinata pinning endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PinResponse {
    pub ipfs_hash: String,
    #[serde(default)]
    pub pin_size: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl PinResponse {
    fn into_content_id(self) -> Result<ContentId, PinError> {
        if self.ipfs_hash.trim().is_empty() {
            return Err(PinError::EmptyHash);
        }
        Ok(ContentId::new(self.ipfs_hash))
    }
}

struct PinFileRequest {
    form: Form,
}

impl ApiRequest for PinFileRequest {
    type Response = PinResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = endpoint(base_url, "pinning/pinFileToIPFS")?;
        Ok(client.post(full_url).multipart(self.form))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PinJsonRequest<'a> {
    pinata_content: &'a Value,
}

impl ApiRequest for PinJsonRequest<'_> {
    type Response = PinResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = endpoint(base_url, "pinning/pinJSONToIPFS")?;
        Ok(client.post(full_url).json(&self))
    }
}

/// Pinata pinning API client
#[derive(Debug, Clone)]
pub struct PinataClient {
    api: ApiClient,
}

impl PinataClient {
    pub fn new(pinata_url: &Url, jwt: Option<&str>) -> Result<Self, ApiError> {
        let api = match jwt {
            Some(jwt) => ApiClient::with_bearer(pinata_url, jwt)?,
            None => {
                tracing::warn!("no Pinata JWT configured, pinning requests will be unauthenticated");
                ApiClient::new(pinata_url)?
            }
        };
        Ok(Self { api })
    }
}

#[async_trait]
impl Pinner for PinataClient {
    async fn pin_file(&self, file: &QubeFile) -> Result<ContentId, PinError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime())
            .map_err(|e| PinError::Default(e.into()))?;
        let form = Form::new().part("file", part);

        let response = self
            .api
            .call(PinFileRequest { form })
            .await
            .map_err(|e| PinError::Default(e.into()))?;
        tracing::debug!(
            "pinned {} ({:?} bytes)",
            response.ipfs_hash,
            response.pin_size
        );
        response.into_content_id()
    }

    async fn pin_json(&self, document: &Value) -> Result<ContentId, PinError> {
        let response = self
            .api
            .call(PinJsonRequest {
                pinata_content: document,
            })
            .await
            .map_err(|e| PinError::Default(e.into()))?;
        response.into_content_id()
    }
}
