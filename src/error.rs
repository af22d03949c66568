//! Unified error type for taskdeck
//!
//! Built on `thiserror`; every fallible board, items, storage and auth
//! operation returns [`Result`].

use std::io;
use thiserror::Error;

use crate::validation::FieldErrors;

/// taskdeck error type
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O error (snapshot files, env files, config directory)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Storage error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// The addressed task, item or session does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected, one message per offending field
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Missing or bad credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// taskdeck Result alias
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// True for the uniform "entity does not exist" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
