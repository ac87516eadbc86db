//! Principal records

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use timebank_config::PrincipalSpec;
use timebank_util::PrincipalId;

/// A billable identity and its accumulated execution time.
///
/// The accumulated total only grows, and only through
/// [`QuotaLedger`](crate::QuotaLedger) charges. Each principal carries its
/// own lock, so charges for different principals never contend.
#[derive(Debug)]
pub struct Principal {
    id: PrincipalId,
    premium: bool,
    used: Mutex<Duration>,
}

impl Principal {
    /// Create a principal with nothing consumed yet
    pub fn new(id: impl Into<PrincipalId>, premium: bool) -> Self {
        Self::with_usage(id, premium, Duration::ZERO)
    }

    /// Create a principal that has already consumed `initial_used`
    pub fn with_usage(id: impl Into<PrincipalId>, premium: bool, initial_used: Duration) -> Self {
        Self {
            id: id.into(),
            premium,
            used: Mutex::new(initial_used),
        }
    }

    pub fn from_spec(spec: &PrincipalSpec) -> Self {
        Self::with_usage(spec.id.clone(), spec.premium, spec.initial_used)
    }

    pub fn id(&self) -> &PrincipalId {
        &self.id
    }

    /// Premium principals are exempt from the budget
    pub fn is_premium(&self) -> bool {
        self.premium
    }

    /// Accumulated execution time
    pub fn used(&self) -> Duration {
        *self.lock()
    }

    pub fn usage(&self) -> PrincipalUsage {
        PrincipalUsage {
            principal_id: self.id.clone(),
            premium: self.premium,
            used: self.used(),
        }
    }

    /// Add one quantum and return the new total, under this principal's lock
    pub(crate) fn add(&self, quantum: Duration) -> Duration {
        let mut used = self.lock();
        *used = used.saturating_add(quantum);
        *used
    }

    /// Whether `total` breaks `limit` for this principal.
    /// Strictly greater: a total equal to the limit is still within budget.
    pub(crate) fn exceeds(&self, total: Duration, limit: Duration) -> bool {
        !self.premium && total > limit
    }

    // The guarded value is a plain counter, so a panic elsewhere cannot leave
    // it inconsistent.
    fn lock(&self) -> MutexGuard<'_, Duration> {
        self.used.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Point-in-time view of a principal's accounting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalUsage {
    pub principal_id: PrincipalId,
    pub premium: bool,
    pub used: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_creation() {
        let principal = Principal::new("alice", false);

        assert_eq!(principal.id().as_str(), "alice");
        assert!(!principal.is_premium());
        assert_eq!(principal.used(), Duration::ZERO);
    }

    #[test]
    fn test_add_accumulates() {
        let principal = Principal::with_usage("bob", false, Duration::from_secs(2));

        assert_eq!(principal.add(Duration::from_secs(1)), Duration::from_secs(3));
        assert_eq!(principal.add(Duration::from_secs(1)), Duration::from_secs(4));
        assert_eq!(principal.used(), Duration::from_secs(4));
    }

    #[test]
    fn test_exceeds_is_strict() {
        let limit = Duration::from_secs(10);
        let principal = Principal::new("carol", false);

        assert!(!principal.exceeds(Duration::from_secs(10), limit));
        assert!(principal.exceeds(Duration::from_secs(11), limit));
    }

    #[test]
    fn test_premium_never_exceeds() {
        let principal = Principal::new("dave", true);
        assert!(!principal.exceeds(Duration::from_secs(1_000_000), Duration::from_secs(10)));
    }

    #[test]
    fn test_from_spec() {
        let spec = PrincipalSpec {
            id: PrincipalId::new("erin"),
            premium: true,
            initial_used: Duration::from_secs(7),
        };

        let principal = Principal::from_spec(&spec);
        assert_eq!(
            principal.usage(),
            PrincipalUsage {
                principal_id: PrincipalId::new("erin"),
                premium: true,
                used: Duration::from_secs(7),
            }
        );
    }
}
