//! Events emitted by the supervisor

use chrono::{DateTime, Local};
use timebank_util::{PrincipalId, RequestId};
use std::time::Duration;

/// Events emitted by the supervisor
#[derive(Debug, Clone)]
pub enum QuotaEvent {
    /// Work unit launched
    RequestStarted {
        request_id: RequestId,
        principal_id: PrincipalId,
        started_at: DateTime<Local>,
    },

    /// A quantum elapsed and was charged
    Charged {
        request_id: RequestId,
        principal_id: PrincipalId,
        total: Duration,
    },

    /// Work unit finished within budget
    Completed {
        request_id: RequestId,
        principal_id: PrincipalId,
        elapsed: Duration,
        charges: u32,
    },

    /// Budget exhausted; the work unit was told to stop
    BudgetExceeded {
        request_id: RequestId,
        principal_id: PrincipalId,
        total: Duration,
        limit: Duration,
        elapsed: Duration,
    },
}

impl QuotaEvent {
    pub fn request_id(&self) -> &RequestId {
        match self {
            QuotaEvent::RequestStarted { request_id, .. }
            | QuotaEvent::Charged { request_id, .. }
            | QuotaEvent::Completed { request_id, .. }
            | QuotaEvent::BudgetExceeded { request_id, .. } => request_id,
        }
    }

    pub fn principal_id(&self) -> &PrincipalId {
        match self {
            QuotaEvent::RequestStarted { principal_id, .. }
            | QuotaEvent::Charged { principal_id, .. }
            | QuotaEvent::Completed { principal_id, .. }
            | QuotaEvent::BudgetExceeded { principal_id, .. } => principal_id,
        }
    }

    /// Whether this event ends its request
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuotaEvent::Completed { .. } | QuotaEvent::BudgetExceeded { .. }
        )
    }
}
