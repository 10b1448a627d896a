use reqwest::{header, header::HeaderMap, header::HeaderValue, Client};
use url::Url;

use super::error::ApiError;
use super::ApiRequest;

/// JSON-over-HTTP client bound to one remote service
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        Self::build(remote, HeaderMap::new())
    }

    /// Client that sends `Authorization: Bearer <token>` on every request
    pub fn with_bearer(remote: &Url, token: &str) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        value.set_sensitive(true);
        default_headers.insert(header::AUTHORIZATION, value);
        Self::build(remote, default_headers)
    }

    fn build(remote: &Url, default_headers: HeaderMap) -> Result<Self, ApiError> {
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        let response = request_builder.send().await?;

        if response.status().is_success() {
            Ok(response.json::<T::Response>().await?)
        } else {
            Err(ApiError::HttpStatus(
                response.status(),
                response.text().await?,
            ))
        }
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }
}
