use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::{ContentType, FieldError, QubeFile};

/// Prefix of the identifier stamped on every minted Qube
pub const IDENTIFIER_PREFIX: &str = "ContentQube";

/// Scores are whole numbers picked by the user
pub type Score = u32;

const DEFAULT_SCORE: Score = 5;

wire_enum! {
    /// Who owns the content behind a Qube
    pub enum OwnerType {
        Person => "Person",
        Organisation => "Organisation",
        Thing => "Thing",
    }
}

impl Default for OwnerType {
    fn default() -> Self {
        OwnerType::Person
    }
}

wire_enum! {
    /// How identifiable the owner is from the content
    pub enum OwnerIdentifiability {
        Anonymous => "Anonymous",
        SemiAnonymous => "Semi-Anonymous",
        Identifiable => "Identifiable",
        SemiIdentifiable => "Semi-Identifiable",
    }
}

impl Default for OwnerIdentifiability {
    fn default() -> Self {
        OwnerIdentifiability::SemiAnonymous
    }
}

/// Public half of a Qube.
///
/// Serialized with the field names the metadata consumers expect
/// (`iQubeIdentifier`, `ownerType`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaQube {
    #[serde(rename = "iQubeIdentifier")]
    pub identifier: String,
    #[serde(rename = "iQubeCreator")]
    pub creator: String,
    pub owner_type: OwnerType,
    #[serde(rename = "iQubeContentType")]
    pub content_type: ContentType,
    pub owner_identifiability: OwnerIdentifiability,
    /// ISO 8601 / RFC 3339 timestamp
    pub transaction_date: String,
    pub sensitivity_score: Score,
    pub verifiability_score: Score,
    pub accuracy_score: Score,
    pub risk_score: Score,
}

impl Default for MetaQube {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            creator: String::new(),
            owner_type: OwnerType::default(),
            content_type: ContentType::default(),
            owner_identifiability: OwnerIdentifiability::default(),
            transaction_date: rfc3339(OffsetDateTime::now_utc()),
            sensitivity_score: DEFAULT_SCORE,
            verifiability_score: DEFAULT_SCORE,
            accuracy_score: DEFAULT_SCORE,
            risk_score: DEFAULT_SCORE,
        }
    }
}

impl MetaQube {
    /// Apply a single form field by its wire name
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "iQubeIdentifier" => self.identifier = value.to_string(),
            "iQubeCreator" => self.creator = value.to_string(),
            "ownerType" => {
                self.owner_type = value
                    .parse::<OwnerType>()
                    .map_err(|e| FieldError::invalid(name, e))?
            }
            "iQubeContentType" => {
                self.content_type = value
                    .parse::<ContentType>()
                    .map_err(|e| FieldError::invalid(name, e))?
            }
            "ownerIdentifiability" => {
                self.owner_identifiability = value
                    .parse::<OwnerIdentifiability>()
                    .map_err(|e| FieldError::invalid(name, e))?
            }
            "transactionDate" => {
                OffsetDateTime::parse(value, &Rfc3339)
                    .map_err(|e| FieldError::invalid(name, e))?;
                self.transaction_date = value.to_string();
            }
            "sensitivityScore" => self.sensitivity_score = parse_score(name, value)?,
            "verifiabilityScore" => self.verifiability_score = parse_score(name, value)?,
            "accuracyScore" => self.accuracy_score = parse_score(name, value)?,
            "riskScore" => self.risk_score = parse_score(name, value)?,
            _ => return Err(FieldError::UnknownField(name.to_string())),
        }
        Ok(())
    }

    /// Finalize the record for a mint attempt.
    ///
    /// The identifier is derived from `at` so each attempt gets its own,
    /// and the content type is reclassified from the file's MIME type.
    pub fn stamped(mut self, file: &QubeFile, at: OffsetDateTime) -> Self {
        self.identifier = format!("{}-{}", IDENTIFIER_PREFIX, unix_millis(at));
        self.content_type = file.content_type();
        self
    }
}

fn parse_score(field: &str, value: &str) -> Result<Score, FieldError> {
    value
        .trim()
        .parse::<Score>()
        .map_err(|e| FieldError::invalid(field, e))
}

fn rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}

pub(crate) fn unix_millis(at: OffsetDateTime) -> i128 {
    at.unix_timestamp_nanos() / 1_000_000
}
