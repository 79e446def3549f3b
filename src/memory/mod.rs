//! Short-term conversational memory
//!
//! This module provides:
//! - SessionStore, a bounded, TTL-windowed per-session message log
//! - Value types for messages, roles and statistics
//! - An opt-in background sweeper for hosts that want periodic expiry

mod session;
pub mod store;
pub mod sweeper;
pub mod types;

pub use store::SessionStore;
pub use sweeper::{SweepReport, start_sweep_task, sweep_once};
pub use types::{ActivityPolicy, Message, Role, StoreStats};
