use std::path::PathBuf;

use clap::Args;
use url::Url;

use common::form::QubeForm;
use common::mint::MintOutcome;
use common::pinning::IPFS_SCHEME;
use common::qube::{parse_assignment, FieldError, QubeFile};

#[derive(Args, Debug, Clone)]
pub struct Mint {
    /// File to encrypt and mint
    #[arg(long)]
    pub file: PathBuf,

    /// MIME type of the file (guessed from the extension if omitted)
    #[arg(long)]
    pub mime: Option<String>,

    /// MetaQube field, e.g. --meta iQubeCreator=alice
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    pub meta: Vec<String>,

    /// BlakQube field, e.g. --blak rarity=rare
    #[arg(long = "blak", value_name = "KEY=VALUE")]
    pub blak: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum MintOpError {
    #[error("failed to read {0}: {1}")]
    ReadFile(PathBuf, std::io::Error),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("client setup failed: {0}")]
    Client(#[from] qube::ApiError),
    #[error("{0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Mint {
    type Error = MintOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let file = QubeFile::from_path(&self.file, self.mime.clone())
            .await
            .map_err(|e| MintOpError::ReadFile(self.file.clone(), e))?;

        let mut form = QubeForm::new();
        form.select_file(file);
        for raw in &self.meta {
            let (name, value) = parse_assignment(raw)?;
            form.set_meta_field(&name, &value)?;
        }
        for raw in &self.blak {
            let (name, value) = parse_assignment(raw)?;
            form.set_blak_field(&name, &value)?;
        }

        let minter = qube::minter(&ctx.config)?;
        let outcome = match form.mint(&minter).await {
            Some(outcome) => outcome,
            None => {
                let message = form.error().unwrap_or("mint failed").to_string();
                return Err(MintOpError::Failed(message));
            }
        };

        let gateway = gateway_link(&ctx.config.gateway_url, outcome.metadata_uri());
        let output = match &outcome {
            MintOutcome::Minted(minted) => format!(
                "NFT minted successfully with token ID: {}\n\
                 - Identifier: {}\n\
                 - Metadata: {}\n\
                 - Gateway: {}\n\
                 - Encrypted file: {}",
                minted.token_id,
                minted.meta_qube.identifier,
                minted.metadata_uri,
                gateway,
                minted.blak_qube.encrypted_file_hash,
            ),
            MintOutcome::MintedWithoutId {
                metadata_uri,
                receipt,
            } => format!(
                "NFT minted successfully, but couldn't retrieve token ID\n\
                 - Transaction: {}\n\
                 - Metadata: {}\n\
                 - Gateway: {}",
                receipt.transaction_hash, metadata_uri, gateway,
            ),
        };

        Ok(output)
    }
}

/// `ipfs://<hash>` as an HTTP link through the configured gateway
fn gateway_link(gateway: &Url, uri: &str) -> String {
    let prefix = format!("{}://", IPFS_SCHEME);
    let hash = uri.strip_prefix(&prefix).unwrap_or(uri);
    match qube::clients::endpoint(gateway, &format!("ipfs/{}", hash)) {
        Ok(url) => url.to_string(),
        Err(_) => uri.to_string(),
    }
}
