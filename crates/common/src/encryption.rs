//! Encryption delegate
//!
//! Encryption itself happens in an external service. This module fixes the
//! shapes exchanged with it, and in particular guarantees that the sealed
//! metadata leaves the process without its binary or preview payloads.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pinning::ContentId;
use crate::qube::BlakQube;

/// Body of `POST /encrypt-file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptFileRequest {
    /// Content identifier of the already pinned file
    pub file: String,
}

impl EncryptFileRequest {
    pub fn new(file: &ContentId) -> Self {
        Self {
            file: file.to_string(),
        }
    }
}

/// Response of `POST /encrypt-file`.
///
/// Only `key` is interpreted. The whole descriptor, key included, is what
/// ends up as the `image` of the token metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedFile {
    pub key: String,
    #[serde(flatten)]
    pub descriptor: Map<String, Value>,
}

/// Body of `POST /encrypt-data`.
///
/// `blobFile` and `blobPreview` are always sent as `null`; the file is
/// referenced only through its content identifier and key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptDataRequest {
    #[serde(flatten)]
    blak_qube: BlakQube,
    blob_file: Option<()>,
    blob_preview: Option<String>,
    encrypted_file_hash: String,
    encrypted_file_key: String,
}

impl EncryptDataRequest {
    pub fn new(blak_qube: &BlakQube, file: &ContentId, file_key: &str) -> Self {
        let mut blak_qube = blak_qube.clone();
        blak_qube.blob_preview = None;
        Self {
            blak_qube,
            blob_file: None,
            blob_preview: None,
            encrypted_file_hash: file.to_string(),
            encrypted_file_key: file_key.to_string(),
        }
    }

    pub fn blak_qube(&self) -> &BlakQube {
        &self.blak_qube
    }

    pub fn encrypted_file_hash(&self) -> &str {
        &self.encrypted_file_hash
    }

    pub fn encrypted_file_key(&self) -> &str {
        &self.encrypted_file_key
    }
}

/// Response of `POST /encrypt-data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptDataResponse {
    pub success: bool,
    #[serde(default)]
    pub encrypted_data: Option<EncryptedBlakQube>,
}

/// Encrypted sealed metadata and the key reference used to mint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedBlakQube {
    pub key: String,
    pub blak_qube: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("encryption service error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("encryption service reported success without encrypted data")]
    MissingPayload,
}

/// External encryption service
#[async_trait]
pub trait EncryptionService: Send + Sync + Debug {
    /// Encrypt a pinned file, keyed by its content identifier
    async fn encrypt_file(&self, file: &ContentId) -> Result<EncryptedFile, EncryptionError>;

    /// Encrypt the sealed metadata record
    async fn encrypt_data(
        &self,
        request: &EncryptDataRequest,
    ) -> Result<EncryptDataResponse, EncryptionError>;
}
