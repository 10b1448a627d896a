//! Qube data model
//!
//! A Qube is split into two halves:
//!
//! - **[`MetaQube`]**: public descriptive metadata, embedded in the token metadata as-is
//! - **[`BlakQube`]**: sealed metadata that only ever leaves this process encrypted
//!
//! Both halves are typed records with field-level setters so that values coming
//! from a form (or the command line) are parsed once, at the edge.

/// Declares a closed enum whose variants map to fixed wire strings.
///
/// Generates serde renames, `Display`, `FromStr` and an `ALL` table.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::qube::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err($crate::qube::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

mod blak_qube;
mod content_type;
mod file;
mod meta_qube;

pub use blak_qube::BlakQube;
pub use content_type::ContentType;
pub use file::QubeFile;
pub use meta_qube::{MetaQube, OwnerIdentifiability, OwnerType, Score, IDENTIFIER_PREFIX};
pub(crate) use meta_qube::unix_millis;

/// A string that does not name any variant of a wire enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Errors raised when applying a named form field to a typed record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl FieldError {
    pub(crate) fn invalid(field: &str, reason: impl ToString) -> Self {
        FieldError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Split a `name=value` assignment as given on the command line
pub fn parse_assignment(raw: &str) -> Result<(String, String), FieldError> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(FieldError::invalid(raw, "expected name=value")),
    }
}
