//! Per-principal quota accounting

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use timebank_config::QuotaPolicy;
use timebank_util::{PrincipalId, Result, TimebankError};
use tracing::{debug, info};

use crate::{Principal, PrincipalUsage};

/// Largest accepted charge interval (one day)
pub const MAX_QUANTUM: Duration = Duration::from_secs(24 * 60 * 60);

/// Result of a combined charge-and-check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeReceipt {
    /// Accumulated total after the charge
    pub total: Duration,
    /// Whether that total breaks the limit
    pub over_limit: bool,
}

/// The quota ledger.
///
/// Owns the registry of principals and is the only path that mutates their
/// accumulated time. The registry lock guards lookups only; charges take the
/// principal's own lock.
#[derive(Debug)]
pub struct QuotaLedger {
    quantum: Duration,
    principals: RwLock<HashMap<PrincipalId, Arc<Principal>>>,
}

impl QuotaLedger {
    /// Create an empty ledger charging `quantum` per tick
    pub fn new(quantum: Duration) -> Result<Self> {
        if quantum.is_zero() {
            return Err(TimebankError::config("quantum must be greater than zero"));
        }
        if quantum > MAX_QUANTUM {
            return Err(TimebankError::config(format!(
                "quantum must not exceed {}s",
                MAX_QUANTUM.as_secs()
            )));
        }

        Ok(Self {
            quantum,
            principals: RwLock::new(HashMap::new()),
        })
    }

    /// Create a ledger from policy, registering its principals
    pub fn from_policy(policy: &QuotaPolicy) -> Result<Self> {
        let ledger = Self::new(policy.supervisor.quantum)?;
        for spec in &policy.principals {
            ledger.register(Principal::from_spec(spec))?;
        }

        info!(
            principal_count = policy.principals.len(),
            quantum_ms = timebank_util::duration_millis(ledger.quantum),
            "Quota ledger initialized"
        );

        Ok(ledger)
    }

    /// The amount added by each charge
    pub fn quantum(&self) -> Duration {
        self.quantum
    }

    /// Install a pre-configured principal record
    pub fn register(&self, principal: Principal) -> Result<Arc<Principal>> {
        let mut principals = self.principals.write().unwrap_or_else(PoisonError::into_inner);
        if principals.contains_key(principal.id()) {
            return Err(TimebankError::DuplicatePrincipal(principal.id().clone()));
        }

        let principal = Arc::new(principal);
        principals.insert(principal.id().clone(), principal.clone());
        debug!(principal_id = %principal.id(), premium = principal.is_premium(), "Principal registered");
        Ok(principal)
    }

    /// Get the record for `id`, creating a metered one on first use
    pub fn principal(&self, id: &PrincipalId) -> Arc<Principal> {
        if let Some(existing) = self.get(id) {
            return existing;
        }

        let mut principals = self.principals.write().unwrap_or_else(PoisonError::into_inner);
        principals
            .entry(id.clone())
            .or_insert_with(|| {
                debug!(principal_id = %id, "Principal created on first use");
                Arc::new(Principal::new(id.clone(), false))
            })
            .clone()
    }

    /// Get the record for `id` if it exists
    pub fn get(&self, id: &PrincipalId) -> Option<Arc<Principal>> {
        self.principals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Add one quantum to the principal's total and return the new total
    pub fn charge(&self, principal: &Principal) -> Duration {
        principal.add(self.quantum)
    }

    /// Whether the principal's current total strictly exceeds `limit`.
    /// Premium principals are never over limit.
    pub fn is_over_limit(&self, principal: &Principal, limit: Duration) -> bool {
        principal.exceeds(principal.used(), limit)
    }

    /// Charge one quantum and evaluate the limit against the resulting total
    pub fn charge_and_check(&self, principal: &Principal, limit: Duration) -> ChargeReceipt {
        let total = self.charge(principal);
        ChargeReceipt {
            total,
            over_limit: principal.exceeds(total, limit),
        }
    }

    /// Budget left before `limit` is reached, or `None` for premium principals
    pub fn remaining(&self, principal: &Principal, limit: Duration) -> Option<Duration> {
        if principal.is_premium() {
            return None;
        }
        Some(limit.saturating_sub(principal.used()))
    }

    /// Usage of every registered principal, ordered by ID
    pub fn snapshot(&self) -> Vec<PrincipalUsage> {
        let mut rows: Vec<PrincipalUsage> = self
            .principals
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|p| p.usage())
            .collect();
        rows.sort_by(|a, b| a.principal_id.as_str().cmp(b.principal_id.as_str()));
        rows
    }
}
