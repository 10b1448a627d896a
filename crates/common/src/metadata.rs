use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::encryption::{EncryptedBlakQube, EncryptedFile};
use crate::qube::{unix_millis, MetaQube};

pub const METADATA_NAME_PREFIX: &str = "ContentQube NFT";
pub const METADATA_DESCRIPTION: &str = "An encrypted ContentQube NFT";
pub const META_QUBE_TRAIT: &str = "metaQube";
pub const BLAK_QUBE_TRAIT: &str = "blakQube";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: Value,
}

/// Token metadata document pinned before minting.
///
/// Always carries exactly two attributes: the public MetaQube first,
/// then the encrypted BlakQube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QubeMetadata {
    pub name: String,
    pub description: String,
    pub image: Value,
    pub attributes: [Attribute; 2],
}

impl QubeMetadata {
    pub fn assemble(
        meta_qube: &MetaQube,
        encrypted_file: &EncryptedFile,
        sealed: &EncryptedBlakQube,
        at: OffsetDateTime,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            name: format!("{} #{}", METADATA_NAME_PREFIX, unix_millis(at)),
            description: METADATA_DESCRIPTION.to_string(),
            image: serde_json::to_value(encrypted_file)?,
            attributes: [
                Attribute {
                    trait_type: META_QUBE_TRAIT.to_string(),
                    value: serde_json::to_value(meta_qube)?,
                },
                Attribute {
                    trait_type: BLAK_QUBE_TRAIT.to_string(),
                    value: sealed.blak_qube.clone(),
                },
            ],
        })
    }

    pub fn meta_qube(&self) -> &Value {
        &self.attributes[0].value
    }

    pub fn blak_qube(&self) -> &Value {
        &self.attributes[1].value
    }

    /// Compact JSON text, fields in declaration order
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
