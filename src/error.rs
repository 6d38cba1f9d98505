//! Error types
//!
//! Only configuration and persistence can fail. Index and inventory edge cases
//! are total functions returning `bool`/`Option` instead.

use thiserror::Error;

/// Invalid world or tuning configuration. Fatal for world creation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Generation region must have at least one row and one column
    #[error("invalid world dimensions: {rows} rows x {cols} cols")]
    InvalidDimensions { rows: i32, cols: i32 },

    /// A tuning value is out of its valid range
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Failures reading or writing the save record.
///
/// Loading treats every variant as "no saved state"; saving logs and continues.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("no save record at {0}")]
    NotFound(String),

    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unreadable save record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("save record is malformed: {0}")]
    Shape(String),
}

impl PersistenceError {
    /// Missing record is the normal "new world" condition
    pub fn is_not_found(&self) -> bool {
        match self {
            PersistenceError::NotFound(_) => true,
            PersistenceError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
