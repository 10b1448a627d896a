//! Contract binding for minting Qubes
//!
//! The binding itself is an external capability. What lives here is the
//! receipt model it hands back and the default way of reading the new token
//! id out of it: the ERC-721 `Transfer(from, to, tokenId)` event.

use std::fmt::{self, Debug, Display};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_EVENT_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Decimal token identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}

/// Transaction receipt of a mint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: String,
    /// 1 on success, 0 if the transaction reverted. Accepts `1` or `"0x1"`.
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: Option<u64>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn reverted(&self) -> bool {
        self.status == Some(0)
    }
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Status {
        Number(u64),
        Text(String),
    }

    match Option::<Status>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Status::Number(n)) => Ok(Some(n)),
        Some(Status::Text(s)) => {
            let parsed = match s.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse::<u64>(),
            };
            parsed.map(Some).map_err(serde::de::Error::custom)
        }
    }
}

/// Read the minted token id from the first ERC-721 `Transfer` log.
///
/// Returns `None` when no such log is present or its id topic is malformed.
pub fn token_id_from_transfer_logs(receipt: &Receipt) -> Option<TokenId> {
    receipt
        .logs
        .iter()
        .filter(|log| log.topics.len() == 4)
        .find(|log| log.topics[0].eq_ignore_ascii_case(TRANSFER_EVENT_TOPIC))
        .and_then(|log| decode_uint256(&log.topics[3]))
        .map(TokenId)
}

fn decode_uint256(topic: &str) -> Option<String> {
    let hex = topic.strip_prefix("0x").unwrap_or(topic);
    if hex.len() != 64 {
        return None;
    }
    let bytes = hex::decode(hex).ok()?;
    Some(be_bytes_to_decimal(&bytes))
}

/// Render a big-endian unsigned integer of any width in base 10
fn be_bytes_to_decimal(bytes: &[u8]) -> String {
    // little-endian base 10 digits
    let mut digits: Vec<u8> = vec![0];
    for &byte in bytes {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            let value = (*digit as u32) * 256 + carry;
            *digit = (value % 10) as u8;
            carry = value / 10;
        }
        while carry > 0 {
            digits.push((carry % 10) as u8);
            carry /= 10;
        }
    }
    digits.iter().rev().map(|d| char::from(b'0' + d)).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("contract error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("mint transaction {0} reverted")]
    Reverted(String),
}

/// On-chain Qube contract
#[async_trait]
pub trait QubeContract: Send + Sync + Debug {
    /// Mint a token pointing at `metadata_uri`, bound to the BlakQube key
    async fn mint_qube(&self, metadata_uri: &str, key: &str) -> Result<Receipt, ContractError>;

    /// Extract the id of the minted token from its receipt
    async fn token_id_from_receipt(
        &self,
        receipt: &Receipt,
    ) -> Result<Option<TokenId>, ContractError> {
        Ok(token_id_from_transfer_logs(receipt))
    }
}
