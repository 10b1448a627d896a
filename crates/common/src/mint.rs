//! Qube minting pipeline
//!
//! A strictly sequential chain of fallible async steps:
//!
//! ```text
//! validate -> pin file -> encrypt file -> encrypt BlakQube
//!          -> assemble metadata -> pin metadata -> mint -> read token id
//! ```
//!
//! The first failing step aborts the rest. Nothing already pinned or
//! encrypted is rolled back; pinned content identifiers are logged so an
//! operator can unpin them by hand.

use std::fmt::{self, Display};
use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use crate::contract::{ContractError, QubeContract, Receipt, TokenId};
use crate::encryption::{EncryptDataRequest, EncryptionError, EncryptionService};
use crate::metadata::QubeMetadata;
use crate::pinning::{ContentId, PinError, Pinner};
use crate::qube::{BlakQube, MetaQube, QubeFile};

/// Stage of a mint attempt, reported alongside any failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStage {
    Validating,
    PinningFile,
    EncryptingFile,
    EncryptingMetadata,
    AssemblingMetadata,
    PinningMetadata,
    Minting,
}

impl Display for MintStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MintStage::Validating => "validating input",
            MintStage::PinningFile => "pinning file",
            MintStage::EncryptingFile => "encrypting file",
            MintStage::EncryptingMetadata => "encrypting BlakQube",
            MintStage::AssemblingMetadata => "assembling metadata",
            MintStage::PinningMetadata => "pinning metadata",
            MintStage::Minting => "minting",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MintError {
    #[error("Please select a file to mint")]
    NoFileSelected,
    #[error("Failed to encrypt BlakQube data")]
    BlakQubeRejected,
    #[error("{stage} failed: {source}")]
    Pin {
        stage: MintStage,
        #[source]
        source: PinError,
    },
    #[error("{stage} failed: {source}")]
    Encryption {
        stage: MintStage,
        #[source]
        source: EncryptionError,
    },
    #[error("assembling metadata failed: {0}")]
    Assembly(#[from] serde_json::Error),
    #[error("minting failed: {0}")]
    Contract(#[from] ContractError),
}

impl MintError {
    pub fn stage(&self) -> MintStage {
        match self {
            MintError::NoFileSelected => MintStage::Validating,
            MintError::BlakQubeRejected => MintStage::EncryptingMetadata,
            MintError::Pin { stage, .. } | MintError::Encryption { stage, .. } => *stage,
            MintError::Assembly(_) => MintStage::AssemblingMetadata,
            MintError::Contract(_) => MintStage::Minting,
        }
    }

    /// Input was rejected before any external call was made
    pub fn is_validation(&self) -> bool {
        matches!(self, MintError::NoFileSelected)
    }
}

/// Everything the user filled in for one mint attempt
#[derive(Debug, Clone, Default)]
pub struct MintRequest {
    pub file: Option<QubeFile>,
    pub meta_qube: MetaQube,
    pub blak_qube: BlakQube,
}

/// BlakQube summary handed back after a mint.
///
/// Same stripping rules as the encryption request: no file bytes, no preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedBlakQube {
    #[serde(flatten)]
    pub fields: BlakQube,
    pub encrypted_file_hash: ContentId,
    pub encrypted_file_key: String,
    pub token_id: TokenId,
}

/// A mint whose token id is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintedQube {
    pub token_id: TokenId,
    pub metadata_uri: String,
    pub meta_qube: MetaQube,
    pub blak_qube: MintedBlakQube,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintOutcome {
    /// Minted and the token id was read from the receipt
    Minted(MintedQube),
    /// The transaction went through but its token id could not be recovered
    MintedWithoutId {
        metadata_uri: String,
        receipt: Receipt,
    },
}

impl MintOutcome {
    pub fn token_id(&self) -> Option<&TokenId> {
        match self {
            MintOutcome::Minted(minted) => Some(&minted.token_id),
            MintOutcome::MintedWithoutId { .. } => None,
        }
    }

    pub fn metadata_uri(&self) -> &str {
        match self {
            MintOutcome::Minted(minted) => &minted.metadata_uri,
            MintOutcome::MintedWithoutId { metadata_uri, .. } => metadata_uri,
        }
    }
}

/// Runs mint attempts against a pinning network, an encryption service
/// and a contract binding
#[derive(Debug, Clone)]
pub struct Minter {
    pinner: Arc<dyn Pinner>,
    encryption: Arc<dyn EncryptionService>,
    contract: Arc<dyn QubeContract>,
}

impl Minter {
    pub fn new(
        pinner: Arc<dyn Pinner>,
        encryption: Arc<dyn EncryptionService>,
        contract: Arc<dyn QubeContract>,
    ) -> Self {
        Self {
            pinner,
            encryption,
            contract,
        }
    }

    pub async fn mint(&self, request: MintRequest) -> Result<MintOutcome, MintError> {
        let mut pinned = Vec::new();
        let result = self.run(request, &mut pinned).await;

        if let Err(e) = &result {
            if !pinned.is_empty() {
                let cids: Vec<&str> = pinned.iter().map(ContentId::as_str).collect();
                tracing::info!(
                    stage = %e.stage(),
                    "MINT: leaving pinned content in place after failure: {}",
                    cids.join(", ")
                );
            }
        }

        result
    }

    async fn run(
        &self,
        request: MintRequest,
        pinned: &mut Vec<ContentId>,
    ) -> Result<MintOutcome, MintError> {
        let MintRequest {
            file,
            meta_qube,
            blak_qube,
        } = request;
        let file = file.ok_or(MintError::NoFileSelected)?;

        tracing::info!("MINT: pinning {} ({} bytes)", file.name(), file.len());
        let file_cid = self
            .pinner
            .pin_file(&file)
            .await
            .map_err(|source| MintError::Pin {
                stage: MintStage::PinningFile,
                source,
            })?;
        pinned.push(file_cid.clone());
        tracing::debug!("MINT: file pinned as {}", file_cid);

        let now = OffsetDateTime::now_utc();
        let meta_qube = meta_qube.stamped(&file, now);

        let encrypted_file = self
            .encryption
            .encrypt_file(&file_cid)
            .await
            .map_err(|source| MintError::Encryption {
                stage: MintStage::EncryptingFile,
                source,
            })?;

        let data_request = EncryptDataRequest::new(&blak_qube, &file_cid, &encrypted_file.key);
        let response = self
            .encryption
            .encrypt_data(&data_request)
            .await
            .map_err(|source| MintError::Encryption {
                stage: MintStage::EncryptingMetadata,
                source,
            })?;
        if !response.success {
            return Err(MintError::BlakQubeRejected);
        }
        let sealed = response
            .encrypted_data
            .ok_or(MintError::Encryption {
                stage: MintStage::EncryptingMetadata,
                source: EncryptionError::MissingPayload,
            })?;

        let metadata = QubeMetadata::assemble(&meta_qube, &encrypted_file, &sealed, now)?;
        let document = serde_json::to_value(&metadata)?;

        let metadata_cid = self
            .pinner
            .pin_json(&document)
            .await
            .map_err(|source| MintError::Pin {
                stage: MintStage::PinningMetadata,
                source,
            })?;
        pinned.push(metadata_cid.clone());
        let metadata_uri = metadata_cid.uri();

        tracing::info!("MINT: minting {} for {}", metadata_uri, meta_qube.identifier);
        let receipt = self.contract.mint_qube(&metadata_uri, &sealed.key).await?;
        if receipt.reverted() {
            return Err(ContractError::Reverted(receipt.transaction_hash).into());
        }

        let token_id = match self.contract.token_id_from_receipt(&receipt).await {
            Ok(token_id) => token_id,
            Err(e) => {
                tracing::debug!("MINT: reading token id failed: {}", e);
                None
            }
        };

        match token_id {
            Some(token_id) => {
                tracing::info!("MINT: NFT minted successfully with token ID: {}", token_id);
                Ok(MintOutcome::Minted(MintedQube {
                    token_id: token_id.clone(),
                    metadata_uri,
                    meta_qube,
                    blak_qube: MintedBlakQube {
                        fields: BlakQube {
                            blob_preview: None,
                            ..blak_qube
                        },
                        encrypted_file_hash: file_cid,
                        encrypted_file_key: encrypted_file.key,
                        token_id,
                    },
                }))
            }
            None => {
                tracing::warn!(
                    transaction_hash = %receipt.transaction_hash,
                    "NFT minted successfully, but couldn't retrieve token ID"
                );
                Ok(MintOutcome::MintedWithoutId {
                    metadata_uri,
                    receipt,
                })
            }
        }
    }
}
