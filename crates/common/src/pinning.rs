use std::fmt::{self, Debug, Display};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::qube::QubeFile;

/// URI scheme used to reference pinned content
pub const IPFS_SCHEME: &str = "ipfs";

/// Opaque content identifier returned by the pinning network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ipfs://<hash>`
    pub fn uri(&self) -> String {
        format!("{}://{}", IPFS_SCHEME, self.0)
    }
}

impl Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("pinning service error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("pinning service returned an empty content identifier")]
    EmptyHash,
}

/// Client for a content-addressed pinning network.
///
/// Each call is a single attempt; failures propagate to the caller.
#[async_trait]
pub trait Pinner: Send + Sync + Debug {
    /// Pin the raw bytes of a file
    async fn pin_file(&self, file: &QubeFile) -> Result<ContentId, PinError>;

    /// Pin a JSON document
    async fn pin_json(&self, document: &serde_json::Value) -> Result<ContentId, PinError>;
}
