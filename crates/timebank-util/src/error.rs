//! Error types for timebank

use thiserror::Error;

use crate::PrincipalId;

/// Core error type for timebank operations
#[derive(Debug, Error)]
pub enum TimebankError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Principal already registered: {0}")]
    DuplicatePrincipal(PrincipalId),
}

impl TimebankError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TimebankError>;
