//! Validated policy structures

use crate::schema::{BudgetScope, RawConfig, RawPrincipal, RawSupervisorConfig};
use timebank_util::PrincipalId;
use std::time::Duration;

/// Default execution-time budget
pub const DEFAULT_LIMIT: Duration = Duration::from_secs(10);

/// Default charge interval
pub const DEFAULT_QUANTUM: Duration = Duration::from_secs(1);

/// Default capacity of the quota event channel
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Validated policy ready for use by the core
#[derive(Debug, Clone, Default)]
pub struct QuotaPolicy {
    /// Supervisor settings
    pub supervisor: SupervisorSettings,

    /// Pre-registered principals
    pub principals: Vec<PrincipalSpec>,
}

impl QuotaPolicy {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            supervisor: SupervisorSettings::from_raw(raw.supervisor),
            principals: raw.principals.into_iter().map(PrincipalSpec::from_raw).collect(),
        }
    }

    /// Get principal by ID
    pub fn get_principal(&self, id: &PrincipalId) -> Option<&PrincipalSpec> {
        self.principals.iter().find(|p| &p.id == id)
    }
}

/// Supervisor settings with defaults applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorSettings {
    pub limit: Duration,
    pub quantum: Duration,
    pub scope: BudgetScope,
    pub event_buffer: usize,
}

impl SupervisorSettings {
    fn from_raw(raw: RawSupervisorConfig) -> Self {
        Self {
            limit: raw
                .limit_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_LIMIT),
            quantum: raw
                .quantum_millis
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_QUANTUM),
            scope: raw.scope.unwrap_or_default(),
            event_buffer: raw.event_buffer.unwrap_or(DEFAULT_EVENT_BUFFER),
        }
    }
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            quantum: DEFAULT_QUANTUM,
            scope: BudgetScope::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Validated principal definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalSpec {
    pub id: PrincipalId,
    pub premium: bool,
    pub initial_used: Duration,
}

impl PrincipalSpec {
    fn from_raw(raw: RawPrincipal) -> Self {
        Self {
            id: PrincipalId::new(raw.id),
            premium: raw.premium,
            initial_used: Duration::from_secs(raw.initial_used_seconds),
        }
    }
}
