//! Configuration validation

use crate::schema::{RawConfig, RawPrincipal};
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Principal '{principal_id}': {message}")]
    PrincipalError {
        principal_id: String,
        message: String,
    },

    #[error("Duplicate principal ID: {0}")]
    DuplicatePrincipalId(String),

    #[error("limit_seconds must be greater than zero")]
    ZeroLimit,

    #[error("quantum_millis must be greater than zero")]
    ZeroQuantum,

    #[error("event_buffer must be greater than zero")]
    ZeroEventBuffer,
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let supervisor = &config.supervisor;
    if supervisor.limit_seconds == Some(0) {
        errors.push(ValidationError::ZeroLimit);
    }
    if supervisor.quantum_millis == Some(0) {
        errors.push(ValidationError::ZeroQuantum);
    }
    if supervisor.event_buffer == Some(0) {
        errors.push(ValidationError::ZeroEventBuffer);
    }

    let mut seen_ids = HashSet::new();
    for principal in &config.principals {
        if !seen_ids.insert(&principal.id) {
            errors.push(ValidationError::DuplicatePrincipalId(principal.id.clone()));
        }
    }

    for principal in &config.principals {
        errors.extend(validate_principal(principal));
    }

    errors
}

fn validate_principal(principal: &RawPrincipal) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if principal.id.trim().is_empty() {
        errors.push(ValidationError::PrincipalError {
            principal_id: principal.id.clone(),
            message: "id cannot be empty".into(),
        });
    }

    errors
}
