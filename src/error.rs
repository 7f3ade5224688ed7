//! Error types for geocluster.
//!
//! Clustering and reconciliation never fail; errors only come from
//! configuration, explicit coordinate validation and GeoJSON export.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationErrorWithContext(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
