//! Quota ledger and execution supervisor for timebank
//!
//! This crate is the heart of timebank, containing:
//! - Per-principal accounting of consumed execution time
//! - The charge-and-check operation guarding each principal's budget
//! - Supervised execution of work units (Running -> Completed | BudgetExceeded)
//! - Cooperative cancellation of work units that exhaust their budget

mod events;
mod ledger;
mod principal;
mod supervisor;
mod work;

pub use events::*;
pub use ledger::*;
pub use principal::*;
pub use supervisor::*;
pub use work::*;
