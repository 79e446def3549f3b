//! minimem - short-term conversational memory
//!
//! A bounded, TTL-windowed, per-session message store for agents that need
//! to rebuild recent context on every turn without unbounded memory growth.
//!
//! ```no_run
//! use std::time::Duration;
//! use minimem::memory::{Role, SessionStore};
//!
//! # async fn demo() -> minimem::Result<()> {
//! let store = SessionStore::new(20, Duration::from_secs(1800))?;
//! store.add_message("chat-42", Role::User, "Hello").await;
//! let recent = store.get_history("chat-42", Some(10)).await;
//! assert_eq!(recent.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod memory;

pub use error::{MemoryError, Result};
pub use memory::{ActivityPolicy, Message, Role, SessionStore, StoreStats};
