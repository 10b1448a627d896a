use serde::{Deserialize, Serialize};

use super::FieldError;

/// Sealed half of a Qube.
///
/// Every field is free-form text entered by the user. The plaintext record
/// must go through the encryption service before it is embedded anywhere
/// public; see [`EncryptDataRequest`](crate::encryption::EncryptDataRequest).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlakQube {
    pub format: String,
    pub episode: String,
    pub version: String,
    pub rarity: String,
    pub serial_number: String,
    pub specific_traits: String,
    pub payload_file: String,
    pub current_owner: String,
    pub updatable_data: String,
    /// Data URL preview of the selected file. Local only, never serialized.
    #[serde(skip)]
    pub blob_preview: Option<String>,
}

impl BlakQube {
    pub const FIELDS: [&'static str; 9] = [
        "format",
        "episode",
        "version",
        "rarity",
        "serialNumber",
        "specificTraits",
        "payloadFile",
        "currentOwner",
        "updatableData",
    ];

    /// Apply a single form field by its wire name
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        let slot = match name {
            "format" => &mut self.format,
            "episode" => &mut self.episode,
            "version" => &mut self.version,
            "rarity" => &mut self.rarity,
            "serialNumber" => &mut self.serial_number,
            "specificTraits" => &mut self.specific_traits,
            "payloadFile" => &mut self.payload_file,
            "currentOwner" => &mut self.current_owner,
            "updatableData" => &mut self.updatable_data,
            _ => return Err(FieldError::UnknownField(name.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }
}
