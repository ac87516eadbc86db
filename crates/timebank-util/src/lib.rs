//! Shared utilities for timebank
//!
//! This crate provides:
//! - ID types (PrincipalId, RequestId)
//! - Time utilities (monotonic time, duration helpers)
//! - Error types
//! - Default path for the configuration file

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
