use std::path::Path;

use base64::Engine;
use bytes::Bytes;

use super::ContentType;

const FALLBACK_MIME: &str = "application/octet-stream";

/// A file selected for minting: name, declared MIME type and raw bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QubeFile {
    name: String,
    mime: String,
    bytes: Bytes,
}

impl QubeFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk.
    ///
    /// The MIME type is guessed from the extension unless `mime` is given.
    pub async fn from_path(path: &Path, mime: Option<String>) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        let mime = mime.unwrap_or_else(|| {
            mime_guess::from_path(path)
                .first()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| FALLBACK_MIME.to_string())
        });

        tracing::debug!("loaded {} ({} bytes, {})", name, bytes.len(), mime);
        Ok(Self::new(name, mime, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn content_type(&self) -> ContentType {
        ContentType::classify(&self.mime)
    }

    /// `data:` URL of the file, as shown in the preview pane
    pub fn preview(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}
