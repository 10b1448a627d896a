use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};

use common::encryption::{
    EncryptDataRequest, EncryptDataResponse, EncryptFileRequest, EncryptedFile, EncryptionError,
    EncryptionService,
};
use common::pinning::ContentId;

use super::{endpoint, ApiClient, ApiError, ApiRequest};

impl ApiRequest for EncryptFileRequest {
    type Response = EncryptedFile;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = endpoint(base_url, "encrypt-file")?;
        Ok(client.post(full_url).json(&self))
    }
}

impl ApiRequest for &EncryptDataRequest {
    type Response = EncryptDataResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = endpoint(base_url, "encrypt-data")?;
        Ok(client.post(full_url).json(self))
    }
}

/// HTTP client for the encryption service
#[derive(Debug, Clone)]
pub struct EncryptionClient {
    api: ApiClient,
}

impl EncryptionClient {
    pub fn new(server_url: &Url) -> Result<Self, ApiError> {
        Ok(Self {
            api: ApiClient::new(server_url)?,
        })
    }
}

#[async_trait]
impl EncryptionService for EncryptionClient {
    async fn encrypt_file(&self, file: &ContentId) -> Result<EncryptedFile, EncryptionError> {
        tracing::debug!("requesting encryption of {}", file);
        self.api
            .call(EncryptFileRequest::new(file))
            .await
            .map_err(|e| EncryptionError::Default(e.into()))
    }

    async fn encrypt_data(
        &self,
        request: &EncryptDataRequest,
    ) -> Result<EncryptDataResponse, EncryptionError> {
        tracing::debug!(
            "requesting encryption of BlakQube for {}",
            request.encrypted_file_hash()
        );
        self.api
            .call(request)
            .await
            .map_err(|e| EncryptionError::Default(e.into()))
    }
}
