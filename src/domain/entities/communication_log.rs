//! # Communication Log
//!
//! Append-only negotiation history attached to proposals and responses.
//!
//! Entries are never edited or removed. The log is the audit trail used to
//! reconstruct who did what during a negotiation and to explain state
//! changes after the fact.
//!
//! # Examples
//!
//! ```
//! use recimat::domain::entities::communication_log::{CommunicationLog, LogEventType};
//! use recimat::domain::value_objects::UserId;
//!
//! let mut log = CommunicationLog::new();
//! log.log(
//!     UserId::new("user-7"),
//!     LogEventType::Submitted,
//!     "Oferta enviada para revisión",
//! );
//! assert_eq!(log.len(), 1);
//! assert_eq!(log.last_event(), Some(LogEventType::Submitted));
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::value_objects::{Timestamp, UserId};

/// The kind of negotiation event a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum LogEventType {
    /// The record was created.
    Created = 0,
    /// The record was submitted for review.
    Submitted = 1,
    /// An admin approved the record.
    AdminApproved = 2,
    /// The record was returned for rework.
    Returned = 3,
    /// The record was rejected.
    Rejected = 4,
    /// A counter-proposal was made on one or more clauses.
    CounterProposed = 5,
    /// The on-behalf party ratified an admin-created record.
    Ratified = 6,
    /// The response was accepted and a commitment derived.
    Accepted = 7,
    /// A rejected record was corrected and resubmitted.
    Resubmitted = 8,
    /// The proposal's quantity was amended.
    QuantityAmended = 9,
    /// Free-form message between the parties.
    Message = 10,
}

impl fmt::Display for LogEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Submitted => write!(f, "SUBMITTED"),
            Self::AdminApproved => write!(f, "ADMIN_APPROVED"),
            Self::Returned => write!(f, "RETURNED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::CounterProposed => write!(f, "COUNTER_PROPOSED"),
            Self::Ratified => write!(f, "RATIFIED"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Resubmitted => write!(f, "RESUBMITTED"),
            Self::QuantityAmended => write!(f, "QUANTITY_AMENDED"),
            Self::Message => write!(f, "MESSAGE"),
        }
    }
}

/// One immutable entry in a communication log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LogEntry {
    /// Unique entry identifier.
    id: Uuid,
    /// Who performed or recorded the action.
    author: UserId,
    /// When the entry was recorded.
    timestamp: Timestamp,
    /// Human-readable description of the action.
    message: String,
    /// The kind of event recorded.
    #[serde(rename = "eventType")]
    event: LogEventType,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(author: UserId, event: LogEventType, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            timestamp: Timestamp::now(),
            message: message.into(),
            event,
        }
    }

    /// Returns the entry identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns who recorded the entry.
    #[inline]
    #[must_use]
    pub const fn author(&self) -> &UserId {
        &self.author
    }

    /// Returns when the entry was recorded.
    #[inline]
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the entry message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the kind of event recorded.
    #[inline]
    #[must_use]
    pub const fn event(&self) -> LogEventType {
        self.event
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} by {}: {}",
            self.timestamp, self.event, self.author, self.message
        )
    }
}

/// Append-only list of [`LogEntry`] values.
///
/// The only mutation offered is appending. Existing entries cannot be
/// reached mutably through this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CommunicationLog {
    entries: Vec<LogEntry>,
}

impl CommunicationLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a prepared entry.
    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Appends a new entry stamped with the current time.
    pub fn log(&mut self, author: UserId, event: LogEventType, message: impl Into<String>) {
        self.record(LogEntry::new(author, event, message));
    }

    /// Returns all entries in insertion order.
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the log has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the most recent entry, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Returns the kind of the most recent event, if any.
    #[must_use]
    pub fn last_event(&self) -> Option<LogEventType> {
        self.entries.last().map(LogEntry::event)
    }
}
