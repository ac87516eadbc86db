//! Budgeted execution of work units
//!
//! The supervisor launches a work unit on a dedicated OS thread and then waits,
//! on the caller's task, for whichever comes first: the work finishing or the
//! next quantum boundary. Every boundary charges the ledger; the first charge
//! that pushes a metered principal past the limit ends supervision with
//! [`Outcome::BudgetExceeded`].
//!
//! Quantum boundaries are anchored to the start of the request
//! (`start + n * quantum`), so a slow wake-up does not push later charges back.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use timebank_config::{BudgetScope, QuotaPolicy, SupervisorSettings, DEFAULT_EVENT_BUFFER};
use timebank_util::{duration_millis, MonotonicInstant, RequestId, Result, TimebankError};
use tokio::sync::{broadcast, oneshot};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{ChargeReceipt, Outcome, Principal, QuotaEvent, QuotaLedger, WorkUnit};

/// Supervisor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    limit: Duration,
    scope: BudgetScope,
    event_buffer: usize,
}

impl SupervisorConfig {
    /// Per-principal budget of `limit`
    pub fn new(limit: Duration) -> Result<Self> {
        if limit.is_zero() {
            return Err(TimebankError::config("limit must be greater than zero"));
        }

        Ok(Self {
            limit,
            scope: BudgetScope::PerPrincipal,
            event_buffer: DEFAULT_EVENT_BUFFER,
        })
    }

    pub fn from_settings(settings: &SupervisorSettings) -> Result<Self> {
        Ok(Self::new(settings.limit)?
            .with_scope(settings.scope)
            .with_event_buffer(settings.event_buffer))
    }

    pub fn with_scope(mut self, scope: BudgetScope) -> Self {
        self.scope = scope;
        self
    }

    /// Capacity of the event channel (at least 1)
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn scope(&self) -> BudgetScope {
        self.scope
    }
}

/// Runs work units against a shared quota ledger
#[derive(Debug)]
pub struct Supervisor {
    ledger: Arc<QuotaLedger>,
    config: SupervisorConfig,
    events: broadcast::Sender<QuotaEvent>,
}

impl Supervisor {
    pub fn new(ledger: Arc<QuotaLedger>, config: SupervisorConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer);

        info!(
            limit_ms = duration_millis(config.limit),
            quantum_ms = duration_millis(ledger.quantum()),
            scope = ?config.scope,
            "Supervisor initialized"
        );

        Self {
            ledger,
            config,
            events,
        }
    }

    /// Build a ledger and supervisor from validated policy
    pub fn from_policy(policy: &QuotaPolicy) -> Result<Self> {
        let config = SupervisorConfig::from_settings(&policy.supervisor)?;
        let ledger = Arc::new(QuotaLedger::from_policy(policy)?);
        Ok(Self::new(ledger, config))
    }

    pub fn ledger(&self) -> &Arc<QuotaLedger> {
        &self.ledger
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    /// Subscribe to quota events
    pub fn subscribe(&self) -> broadcast::Receiver<QuotaEvent> {
        self.events.subscribe()
    }

    /// Run `work` on behalf of `principal` until it finishes or the budget
    /// runs out.
    ///
    /// On [`Outcome::BudgetExceeded`] the work's cancellation token is
    /// cancelled, but the work's thread is not joined: work that ignores the
    /// token keeps running until it returns on its own.
    pub async fn execute(&self, work: WorkUnit, principal: &Principal) -> Outcome {
        let request_id = RequestId::new();
        let quantum = self.ledger.quantum();
        let limit = self.config.limit;
        let started = MonotonicInstant::now();

        info!(
            request_id = %request_id,
            principal_id = %principal.id(),
            premium = principal.is_premium(),
            "Request started"
        );
        self.emit(QuotaEvent::RequestStarted {
            request_id: request_id.clone(),
            principal_id: principal.id().clone(),
            started_at: timebank_util::now(),
        });

        let cancel = CancellationToken::new();
        let (done_tx, mut done_rx) = oneshot::channel::<()>();
        let token = cancel.clone();
        // Detached thread outside the runtime's blocking pool: orphaned work
        // never occupies a slot that a later request needs to start.
        thread::spawn(move || {
            work.run(token);
            let _ = done_tx.send(());
        });

        let request_tally = match self.config.scope {
            BudgetScope::PerPrincipal => None,
            BudgetScope::PerRequest => {
                Some(Principal::new(principal.id().clone(), principal.is_premium()))
            }
        };

        let mut charges: u32 = 0;
        let mut next_tick = Instant::now() + quantum;

        loop {
            tokio::select! {
                biased;

                finished = &mut done_rx => {
                    if finished.is_err() {
                        warn!(
                            request_id = %request_id,
                            principal_id = %principal.id(),
                            "Work unit ended without signalling completion (panicked)"
                        );
                    }

                    let elapsed = started.elapsed();
                    info!(
                        request_id = %request_id,
                        principal_id = %principal.id(),
                        elapsed_ms = duration_millis(elapsed),
                        charges,
                        "Request completed"
                    );
                    self.emit(QuotaEvent::Completed {
                        request_id,
                        principal_id: principal.id().clone(),
                        elapsed,
                        charges,
                    });
                    return Outcome::Completed;
                }

                _ = tokio::time::sleep_until(next_tick) => {
                    next_tick += quantum;
                    charges += 1;

                    let receipt = self.charge(principal, request_tally.as_ref(), limit);

                    debug!(
                        request_id = %request_id,
                        principal_id = %principal.id(),
                        total_ms = duration_millis(receipt.total),
                        limit_ms = duration_millis(limit),
                        "Quantum charged"
                    );
                    self.emit(QuotaEvent::Charged {
                        request_id: request_id.clone(),
                        principal_id: principal.id().clone(),
                        total: receipt.total,
                    });

                    if receipt.over_limit {
                        cancel.cancel();

                        let elapsed = started.elapsed();
                        warn!(
                            request_id = %request_id,
                            principal_id = %principal.id(),
                            total_ms = duration_millis(receipt.total),
                            limit_ms = duration_millis(limit),
                            elapsed_ms = duration_millis(elapsed),
                            "Budget exceeded, cancelling work unit"
                        );
                        self.emit(QuotaEvent::BudgetExceeded {
                            request_id,
                            principal_id: principal.id().clone(),
                            total: receipt.total,
                            limit,
                            elapsed,
                        });
                        return Outcome::BudgetExceeded;
                    }
                }
            }
        }
    }

    /// Charge the principal, and the request-local tally when budgets are
    /// per request. The kill decision follows whichever total the scope names.
    fn charge(
        &self,
        principal: &Principal,
        request_tally: Option<&Principal>,
        limit: Duration,
    ) -> ChargeReceipt {
        match request_tally {
            Some(tally) => {
                self.ledger.charge(principal);
                self.ledger.charge_and_check(tally, limit)
            }
            None => self.ledger.charge_and_check(principal, limit),
        }
    }

    fn emit(&self, event: QuotaEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Run one work unit under a fresh ledger with the given budget.
///
/// Fails fast with a configuration error when `limit` is zero or `quantum` is
/// zero or above [`MAX_QUANTUM`](crate::MAX_QUANTUM).
pub async fn execute(
    work: WorkUnit,
    principal: &Principal,
    limit: Duration,
    quantum: Duration,
) -> Result<Outcome> {
    let ledger = Arc::new(QuotaLedger::new(quantum)?);
    let supervisor = Supervisor::new(ledger, SupervisorConfig::new(limit)?);
    Ok(supervisor.execute(work, principal).await)
}
