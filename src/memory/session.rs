//! Per-session record kept inside the store

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

use super::types::{Message, Role};

/// One conversation's retained messages and its last activity time
///
/// Never handed out directly; the store returns copies of `messages`.
#[derive(Debug, Clone)]
pub(crate) struct SessionRecord {
    messages: VecDeque<Message>,
    last_activity: DateTime<Utc>,
}

impl SessionRecord {
    pub(crate) fn new(max_history: usize, now: DateTime<Utc>) -> Self {
        Self {
            // Cap the preallocation; max_history may be configured very large
            messages: VecDeque::with_capacity(max_history.min(64)),
            last_activity: now,
        }
    }

    /// Appends a message and trims from the front down to `max_history`.
    ///
    /// Returns the number of messages evicted.
    pub(crate) fn push(
        &mut self,
        role: Role,
        content: String,
        now: DateTime<Utc>,
        max_history: usize,
    ) -> usize {
        self.messages.push_back(Message::new(role, content, now));

        let mut evicted = 0;
        while self.messages.len() > max_history {
            self.messages.pop_front();
            evicted += 1;
        }

        self.last_activity = now;
        evicted
    }

    /// Copies the last `limit` messages (all of them for `None` or `Some(0)`).
    pub(crate) fn snapshot(&self, limit: Option<usize>) -> Vec<Message> {
        let skip = match limit {
            Some(n) if n > 0 => self.messages.len().saturating_sub(n),
            _ => 0,
        };
        self.messages.iter().skip(skip).cloned().collect()
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    pub(crate) fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.last_activity) > ttl
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }

    pub(crate) fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }
}
