//! Generator-specific error types

use shared::{CatalogErrors, SharedError};
use thiserror::Error;

use crate::core::assignment::Layer;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Catalog authoring error: {0}")]
    Catalog(#[from] CatalogErrors),

    #[error("Catalog is missing pool: {pool}")]
    MissingPool { pool: String },

    #[error("Invalid identity hint for item {index}: {source}")]
    InvalidHint {
        index: u32,
        #[source]
        source: SharedError,
    },

    #[error("No mandatory {layer} selection for item {index}")]
    MissingMandatory { index: u32, layer: Layer },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Worker task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Worker pool closed: {0}")]
    WorkerPool(#[from] tokio::sync::AcquireError),
}

impl GeneratorError {
    pub fn config(field: impl Into<String>) -> Self {
        GeneratorError::ConfigurationError { field: field.into() }
    }

    /// Authoring errors indicate self-inconsistent static data
    pub fn is_authoring(&self) -> bool {
        matches!(
            self,
            GeneratorError::Catalog(_)
                | GeneratorError::MissingPool { .. }
                | GeneratorError::InvalidHint { .. }
                | GeneratorError::MissingMandatory { .. }
        )
    }
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;
