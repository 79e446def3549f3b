//! Types for the session store
//!
//! This module defines the value types handed across the store boundary:
//! - Role enum for message authorship
//! - Message struct, stamped by the store on insertion
//! - ActivityPolicy enum controlling which operations refresh a session's TTL
//! - StoreStats snapshot returned by `SessionStore::stats`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MemoryError;

/// Author of a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "system" => Ok(Role::System),
            other => Err(MemoryError::invalid_input(format!(
                "unknown role '{}' (expected user, assistant or system)",
                other
            ))),
        }
    }
}

/// A single message in a session's history
///
/// Messages are immutable once stored. The timestamp is assigned by the store
/// at insertion time, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(role: Role, content: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            content,
            timestamp,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the store accepted this message (UTC)
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Checks if this message is from a user
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Checks if this message is from the assistant
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Checks if this message is a system instruction
    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}

/// Which operations count as activity for TTL purposes
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityPolicy {
    /// Both `add_message` and `get_history` refresh `last_activity`
    #[default]
    ReadWrite,
    /// Only `add_message` refreshes `last_activity`; polled sessions still expire
    WriteOnly,
}

impl ActivityPolicy {
    pub fn refreshes_on_read(&self) -> bool {
        matches!(self, ActivityPolicy::ReadWrite)
    }
}

impl fmt::Display for ActivityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityPolicy::ReadWrite => write!(f, "read_write"),
            ActivityPolicy::WriteOnly => write!(f, "write_only"),
        }
    }
}

impl FromStr for ActivityPolicy {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "read_write" => Ok(ActivityPolicy::ReadWrite),
            "write_only" => Ok(ActivityPolicy::WriteOnly),
            other => Err(MemoryError::invalid_input(format!(
                "unknown activity policy '{}' (expected read_write or write_only)",
                other
            ))),
        }
    }
}

/// Point-in-time snapshot of store occupancy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_sessions: usize,
    pub total_messages: usize,
    pub avg_messages_per_session: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_activity: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_activity: Option<DateTime<Utc>>,
}

impl StoreStats {
    pub fn empty() -> Self {
        Self {
            total_sessions: 0,
            total_messages: 0,
            avg_messages_per_session: 0.0,
            oldest_activity: None,
            newest_activity: None,
        }
    }
}
