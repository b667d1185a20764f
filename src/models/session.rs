use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of one roll-call session.
///
/// `Finalized` and `Cancelled` are terminal; a closed session is never reused
/// and a new roll call requires opening a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Finalized,
    Cancelled,
}

impl SessionStatus {
    /// Status token understood by the status-change endpoint
    pub fn api_token(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "inProgress",
            SessionStatus::Finalized => "finalized",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Finalized | SessionStatus::Cancelled)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::InProgress => write!(f, "In Progress"),
            SessionStatus::Finalized => write!(f, "Finalized"),
            SessionStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Per-passenger roll-call outcome. Every roster entry holds exactly one of
/// these for the lifetime of a session, starting at `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Unknown,
    Present,
    Absent,
}

impl Presence {
    /// Wire token for the presence-submission payload.
    /// `Unknown` entries are omitted from the payload, never coerced.
    pub fn api_token(&self) -> Option<&'static str> {
        match self {
            Presence::Unknown => None,
            Presence::Present => Some("present"),
            Presence::Absent => Some("absent"),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Presence::Unknown)
    }
}

/// One roll-call pass over an itinerary, as known to the remote service.
/// The identifier and timestamps are server-assigned.
#[derive(Debug, Clone)]
pub struct AttendanceSession {
    pub id: String,
    pub itinerary_id: String,
    pub status: SessionStatus,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

// Wire types for the attendance-session endpoints

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct OpenSessionResponse {
    pub id: String,
    #[serde(rename = "openedAt")]
    pub opened_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusChangeRequest<'a> {
    pub status: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PresenceSubmission<'a> {
    pub marks: &'a BTreeMap<String, &'static str>,
}
