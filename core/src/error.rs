//! Error types for statevault

use thiserror::Error;

/// Result type for statevault operations
pub type VaultResult<T> = Result<T, VaultError>;

/// Main error type for statevault
#[derive(Error, Debug)]
pub enum VaultError {
    // ============ Serialization Errors ============
    #[error("cannot serialize cyclic or unserializable state at key \"{key}\": {detail}")]
    CyclicState { key: String, detail: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    // ============ Rehydration Errors ============
    #[error("failed to decode persisted data for key \"{key}\": {detail}")]
    RehydrationDecode { key: String, detail: String },

    // ============ Transform Errors ============
    #[error("transform \"{name}\" failed for key \"{key}\": {detail}")]
    Transform {
        name: String,
        key: String,
        detail: String,
    },

    // ============ Storage Errors ============
    #[error("storage write failed for key \"{key}\": {detail}")]
    StorageWrite { key: String, detail: String },

    #[error("storage read failed for key \"{key}\": {detail}")]
    StorageRead { key: String, detail: String },

    #[error("storage error: {0}")]
    Storage(String),

    // ============ Configuration Errors ============
    #[error("configuration error: {0}")]
    Config(String),

    // ============ General Errors ============
    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}
