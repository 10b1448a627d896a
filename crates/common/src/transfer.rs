use std::fmt::{self, Display};

use crate::qube::wire_enum;

wire_enum! {
    /// Chains a Qube can be moved between
    pub enum Chain {
        Amoy => "Amoy",
        Avalanche => "Avalanche",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    SameChain,
    Bridge,
}

impl Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferKind::SameChain => f.write_str("same-chain"),
            TransferKind::Bridge => f.write_str("cross-chain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("{0} transfer is not supported")]
    Unsupported(TransferKind),
    #[error("a token id is required")]
    MissingTokenId,
}

/// Request to move a Qube token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub from: Chain,
    pub to: Chain,
    pub token_id: String,
    pub destination: Option<String>,
}

impl Default for TransferRequest {
    fn default() -> Self {
        Self {
            from: Chain::Amoy,
            to: Chain::Avalanche,
            token_id: String::new(),
            destination: None,
        }
    }
}

impl TransferRequest {
    /// Exchange source and destination chains
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    pub fn kind(&self) -> TransferKind {
        if self.from == self.to {
            TransferKind::SameChain
        } else {
            TransferKind::Bridge
        }
    }

    /// Neither transfer path exists yet; both report `Unsupported`
    pub fn execute(&self) -> Result<(), TransferError> {
        if self.token_id.trim().is_empty() {
            return Err(TransferError::MissingTokenId);
        }
        tracing::info!(
            "Transferring token {} from {} to {}",
            self.token_id,
            self.from,
            self.to
        );
        Err(TransferError::Unsupported(self.kind()))
    }
}
