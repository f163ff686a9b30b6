//! Error types for the fallible edges of the crate.
//!
//! Evaluating a view rule never fails; errors only arise when parsing codes,
//! loading configuration, or building a permission directory.

use std::io;

use thiserror::Error;

use crate::types::GroupId;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CanViewError>;

#[derive(Debug, Error)]
pub enum CanViewError {
    #[error("invalid access mode: {value:?}")]
    InvalidAccessMode { value: String },

    #[error("invalid capability code: {value:?}")]
    InvalidCapability { value: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("unknown group {group}")]
    UnknownGroup { group: GroupId },

    #[error("group {group} already exists")]
    DuplicateGroup { group: GroupId },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
