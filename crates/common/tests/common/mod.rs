//! Shared fakes for pipeline integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use ::common::contract::{ContractError, Log, QubeContract, Receipt, TRANSFER_EVENT_TOPIC};
use ::common::encryption::{
    EncryptDataRequest, EncryptDataResponse, EncryptedFile, EncryptionError, EncryptionService,
};
use ::common::mint::Minter;
use ::common::pinning::{ContentId, PinError, Pinner};
use ::common::qube::QubeFile;

/// One external call, in the order it was made
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PinFile(String),
    PinJson(Value),
    EncryptFile(String),
    EncryptData(Value),
    Mint { uri: String, key: String },
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }

    pub fn has_mint(&self) -> bool {
        self.calls().iter().any(|c| matches!(c, Call::Mint { .. }))
    }

    pub fn pinned_json(&self) -> Option<Value> {
        self.calls().into_iter().find_map(|c| match c {
            Call::PinJson(doc) => Some(doc),
            _ => None,
        })
    }

    pub fn encrypt_data_payload(&self) -> Option<Value> {
        self.calls().into_iter().find_map(|c| match c {
            Call::EncryptData(body) => Some(body),
            _ => None,
        })
    }
}

#[derive(Debug)]
pub struct FakePinner {
    log: CallLog,
    file_hash: String,
    json_hash: String,
    fail_json: bool,
    hang_file: bool,
}

#[async_trait]
impl Pinner for FakePinner {
    async fn pin_file(&self, file: &QubeFile) -> Result<ContentId, PinError> {
        self.log.push(Call::PinFile(file.name().to_string()));
        if self.hang_file {
            std::future::pending::<()>().await;
        }
        Ok(ContentId::new(&self.file_hash))
    }

    async fn pin_json(&self, document: &Value) -> Result<ContentId, PinError> {
        self.log.push(Call::PinJson(document.clone()));
        if self.fail_json {
            return Err(anyhow::anyhow!("pinata unavailable").into());
        }
        Ok(ContentId::new(&self.json_hash))
    }
}

#[derive(Debug)]
pub struct FakeEncryption {
    log: CallLog,
    file_response: Value,
    data_response: Value,
}

#[async_trait]
impl EncryptionService for FakeEncryption {
    async fn encrypt_file(&self, file: &ContentId) -> Result<EncryptedFile, EncryptionError> {
        self.log.push(Call::EncryptFile(file.to_string()));
        serde_json::from_value(self.file_response.clone())
            .map_err(|e| EncryptionError::Default(e.into()))
    }

    async fn encrypt_data(
        &self,
        request: &EncryptDataRequest,
    ) -> Result<EncryptDataResponse, EncryptionError> {
        self.log
            .push(Call::EncryptData(serde_json::to_value(request).unwrap()));
        serde_json::from_value(self.data_response.clone())
            .map_err(|e| EncryptionError::Default(e.into()))
    }
}

#[derive(Debug)]
pub struct FakeContract {
    log: CallLog,
    receipt: Receipt,
}

#[async_trait]
impl QubeContract for FakeContract {
    async fn mint_qube(&self, metadata_uri: &str, key: &str) -> Result<Receipt, ContractError> {
        self.log.push(Call::Mint {
            uri: metadata_uri.to_string(),
            key: key.to_string(),
        });
        Ok(self.receipt.clone())
    }
}

/// Builder for a set of fakes sharing one call log
#[derive(Debug, Clone)]
pub struct Scenario {
    pub log: CallLog,
    pub file_hash: String,
    pub json_hash: String,
    pub fail_json: bool,
    /// `pin_file` never answers
    pub hang_file: bool,
    pub file_response: Value,
    pub data_response: Value,
    pub receipt: Receipt,
}

impl Scenario {
    /// Every service answers successfully; the receipt yields token 42
    pub fn happy() -> Self {
        Self {
            log: CallLog::default(),
            file_hash: "Qm123".to_string(),
            json_hash: "QmABC".to_string(),
            fail_json: false,
            hang_file: false,
            file_response: json!({ "key": "k1", "encryptedFile": "QmEncrypted" }),
            data_response: json!({
                "success": true,
                "encryptedData": {
                    "key": "k2",
                    "blakQube": { "format": "0xaa", "rarity": "0xbb" }
                }
            }),
            receipt: transfer_receipt(42),
        }
    }

    pub fn minter(&self) -> Minter {
        Minter::new(
            Arc::new(FakePinner {
                log: self.log.clone(),
                file_hash: self.file_hash.clone(),
                json_hash: self.json_hash.clone(),
                fail_json: self.fail_json,
                hang_file: self.hang_file,
            }),
            Arc::new(FakeEncryption {
                log: self.log.clone(),
                file_response: self.file_response.clone(),
                data_response: self.data_response.clone(),
            }),
            Arc::new(FakeContract {
                log: self.log.clone(),
                receipt: self.receipt.clone(),
            }),
        )
    }
}

pub fn transfer_receipt(token_id: u64) -> Receipt {
    Receipt {
        transaction_hash: "0xfeed".to_string(),
        status: Some(1),
        logs: vec![Log {
            address: "0xqube".to_string(),
            topics: vec![
                TRANSFER_EVENT_TOPIC.to_string(),
                format!("0x{:064x}", 0),
                format!("0x{:064x}", 0x1234),
                format!("0x{:064x}", token_id),
            ],
            data: "0x".to_string(),
        }],
    }
}

pub fn photo() -> QubeFile {
    QubeFile::new("photo.png", "image/png", b"\x89PNG\r\n".to_vec())
}
