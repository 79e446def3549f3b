//! Session store implementation
//!
//! Holds, per session, a bounded and time-windowed log of messages. All state
//! sits behind one mutex so "append, trim, update activity" is atomic and
//! `stats`/`cleanup_expired` always observe a consistent map.
//!
//! The store never schedules its own sweeps. Hosts must call
//! [`SessionStore::cleanup_expired`] periodically (see
//! [`crate::memory::sweeper::start_sweep_task`]); otherwise the number of
//! tracked sessions grows without bound.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::session::SessionRecord;
use super::types::{ActivityPolicy, Message, Role, StoreStats};
use crate::config::StoreConfig;
use crate::error::{MemoryError, Result};

/// In-process, per-session short-term conversation memory
///
/// Cloning is cheap and every clone shares the same sessions, so a host can
/// hand one handle to each component that needs it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionRecord>>>,
    max_history: usize,
    ttl: Duration,
    ttl_std: StdDuration,
    policy: ActivityPolicy,
}

impl SessionStore {
    /// Creates a store that refreshes activity on both reads and writes
    ///
    /// # Arguments
    /// * `max_history` - Messages retained per session, must be positive
    /// * `ttl` - Idle time after which a session may be swept, must be positive
    ///
    /// # Returns
    /// * `Err(MemoryError::InvalidConfiguration)` - If either parameter is zero
    pub fn new(max_history: usize, ttl: StdDuration) -> Result<Self> {
        Self::with_policy(max_history, ttl, ActivityPolicy::default())
    }

    /// Creates a store with an explicit activity policy
    pub fn with_policy(
        max_history: usize,
        ttl: StdDuration,
        policy: ActivityPolicy,
    ) -> Result<Self> {
        if max_history == 0 {
            return Err(MemoryError::invalid_configuration(
                "max_history must be a positive integer",
            ));
        }
        if ttl.is_zero() {
            return Err(MemoryError::invalid_configuration(
                "ttl must be a positive duration",
            ));
        }
        let signed_ttl = Duration::from_std(ttl).map_err(|_| {
            MemoryError::invalid_configuration(format!("ttl of {:?} is out of range", ttl))
        })?;

        info!(
            max_history = max_history,
            ttl_ms = ttl.as_millis() as u64,
            activity_policy = %policy,
            "Session store created"
        );

        Ok(Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_history,
            ttl: signed_ttl,
            ttl_std: ttl,
            policy,
        })
    }

    /// Creates a store from a loaded configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        Self::with_policy(config.max_history, config.ttl(), config.activity_policy)
    }

    /// Appends a message to a session, creating the session if needed
    ///
    /// Trims the oldest messages so the session never holds more than
    /// `max_history`, and marks the session as active.
    ///
    /// # Arguments
    /// * `session_id` - Opaque session key
    /// * `role` - Message author
    /// * `content` - Message text, stored as-is
    pub async fn add_message(&self, session_id: &str, role: Role, content: impl Into<String>) {
        let content = content.into();
        let mut sessions = self.sessions.lock().await;
        let now = Utc::now();

        let record = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionRecord::new(self.max_history, now));
        let evicted = record.push(role, content, now, self.max_history);

        debug!(
            session_id = %session_id,
            role = %role,
            message_count = record.len(),
            evicted = evicted,
            "Added message to session"
        );
    }

    /// Returns a copy of a session's messages, oldest first
    ///
    /// With `Some(n)` for `n > 0` only the last `n` messages are returned;
    /// `None` or `Some(0)` returns everything retained. Unknown sessions yield
    /// an empty vector and are not created.
    pub async fn get_history(&self, session_id: &str, limit: Option<usize>) -> Vec<Message> {
        let mut sessions = self.sessions.lock().await;

        let Some(record) = sessions.get_mut(session_id) else {
            debug!(session_id = %session_id, "History requested for unknown session");
            return Vec::new();
        };

        if self.policy.refreshes_on_read() {
            record.touch(Utc::now());
        }
        record.snapshot(limit)
    }

    /// Removes a session and all of its messages; no-op if absent
    pub async fn clear_session(&self, session_id: &str) {
        let removed = self.sessions.lock().await.remove(session_id);

        if let Some(record) = removed {
            info!(
                session_id = %session_id,
                messages_dropped = record.len(),
                "Session cleared"
            );
        }
    }

    /// Removes every session idle for longer than the TTL
    ///
    /// # Returns
    /// * `usize` - Number of sessions removed
    pub async fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_with_remaining().await.0
    }

    /// Sweeps and reports `(removed, remaining)` from the same critical section
    pub(crate) async fn cleanup_expired_with_remaining(&self) -> (usize, usize) {
        let mut sessions = self.sessions.lock().await;
        let now = Utc::now();
        let before = sessions.len();

        sessions.retain(|session_id, record| {
            let expired = record.is_expired(now, self.ttl);
            if expired {
                debug!(
                    session_id = %session_id,
                    last_activity = %record.last_activity(),
                    "Removing expired session"
                );
            }
            !expired
        });

        let removed = before - sessions.len();
        if removed > 0 {
            info!(
                sessions_removed = removed,
                sessions_remaining = sessions.len(),
                "Expired sessions swept"
            );
        }
        (removed, sessions.len())
    }

    /// Aggregate occupancy snapshot; does not count as session activity
    pub async fn stats(&self) -> StoreStats {
        let sessions = self.sessions.lock().await;
        if sessions.is_empty() {
            return StoreStats::empty();
        }

        let total_sessions = sessions.len();
        let total_messages: usize = sessions.values().map(SessionRecord::len).sum();
        let activity = sessions.values().map(SessionRecord::last_activity);
        let oldest_activity: Option<DateTime<Utc>> = activity.clone().min();
        let newest_activity: Option<DateTime<Utc>> = activity.max();

        StoreStats {
            total_sessions,
            total_messages,
            avg_messages_per_session: total_messages as f64 / total_sessions as f64,
            oldest_activity,
            newest_activity,
        }
    }

    /// Number of sessions currently tracked (including not-yet-swept expired ones)
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Checks whether a session is present without refreshing its activity
    pub async fn contains_session(&self, session_id: &str) -> bool {
        self.sessions.lock().await.contains_key(session_id)
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn ttl(&self) -> StdDuration {
        self.ttl_std
    }

    pub fn activity_policy(&self) -> ActivityPolicy {
        self.policy
    }
}
