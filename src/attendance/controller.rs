//! Roll-call session state machine.
//!
//! One controller instance owns one roll-call pass over one itinerary's
//! roster: it opens the session against the backend, tracks a presence value
//! per passenger and a cursor over the roster, and drives the finalize/cancel
//! transitions. Every remote call goes through [`ResilientClient`]; the
//! controller itself never retries and treats any returned failure as final,
//! leaving its state unchanged.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, info};

use crate::api::{ApiError, AttendanceApi, ResilientClient};
use crate::models::{AttendanceSession, Presence, SessionStatus};
use crate::roster::RosterOrderingService;

use super::ports::{ConfirmationPort, NotificationPort, NotifyKind};

/// Controller lifecycle. `Finalized` and `Cancelled` are terminal; a new roll
/// call requires a new controller bound to a freshly-opened session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Finalized,
    Cancelled,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::NotStarted => write!(f, "not started"),
            SessionState::InProgress => write!(f, "in progress"),
            SessionState::Finalized => write!(f, "finalized"),
            SessionState::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("The itinerary has no passengers to check in")]
    EmptyRoster,

    #[error("Cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("Passenger {0} is not on this roster")]
    UnknownPassenger(String),

    #[error("Row {index} is out of range for a roster of {len}")]
    CursorOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result of a confirmation-gated finalize attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    Finalized,
    /// The operator declined the unresolved-entries confirmation;
    /// nothing was submitted and the session stays open.
    Declined,
}

/// Result of a confirmation-gated cancel attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    Declined,
}

pub struct AttendanceSessionController<A, C, N>
where
    A: AttendanceApi,
    C: ConfirmationPort,
    N: NotificationPort,
{
    api: A,
    retry: ResilientClient,
    confirm: C,
    notify: N,
    roster: RosterOrderingService,
    presence: HashMap<String, Presence>,
    cursor: usize,
    state: SessionState,
    session: Option<AttendanceSession>,
}

impl<A, C, N> AttendanceSessionController<A, C, N>
where
    A: AttendanceApi,
    C: ConfirmationPort,
    N: NotificationPort,
{
    /// Bind a new controller to an already-loaded roster.
    ///
    /// Loading the roster up front means an empty itinerary is rejected
    /// locally by [`start`](Self::start) before any session is opened.
    pub fn new(
        api: A,
        retry: ResilientClient,
        confirm: C,
        notify: N,
        roster: RosterOrderingService,
    ) -> Self {
        Self {
            api,
            retry,
            confirm,
            notify,
            roster,
            presence: HashMap::new(),
            cursor: 0,
            state: SessionState::NotStarted,
            session: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn roster(&self) -> &RosterOrderingService {
        &self.roster
    }

    pub fn session(&self) -> Option<&AttendanceSession> {
        self.session.as_ref()
    }

    /// Current presence value for a passenger, `Unknown` when never marked
    pub fn presence_of(&self, passenger_id: &str) -> Presence {
        self.presence.get(passenger_id).copied().unwrap_or_default()
    }

    /// Whether the cursor sits on the roster's last entry
    pub fn is_at_last_entry(&self) -> bool {
        !self.roster.is_empty() && self.cursor == self.roster.len() - 1
    }

    fn require_state(
        &self,
        expected: SessionState,
        operation: &'static str,
    ) -> Result<(), AttendanceError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(AttendanceError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn session_id(&self, operation: &'static str) -> Result<String, AttendanceError> {
        self.session
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or(AttendanceError::InvalidState {
                operation,
                state: self.state,
            })
    }

    /// Open the roll-call session against the backend.
    ///
    /// Fails locally with [`AttendanceError::EmptyRoster`] before any remote
    /// call when the roster is empty. A conflict (another session already open
    /// for the itinerary) surfaces as [`ApiError::SessionConflict`] and is
    /// never auto-retried; the operator must close the other session first.
    pub async fn start(&mut self) -> Result<(), AttendanceError> {
        self.require_state(SessionState::NotStarted, "start")?;

        if self.roster.is_empty() {
            self.notify
                .notify(NotifyKind::Error, "This itinerary has no passengers");
            return Err(AttendanceError::EmptyRoster);
        }

        let itinerary_id = self.roster.itinerary_id().to_string();
        let session = match self
            .retry
            .execute(|| self.api.open_session(&itinerary_id))
            .await
        {
            Ok(session) => session,
            Err(err) => {
                self.notify.notify(NotifyKind::Error, &err.to_string());
                return Err(err.into());
            }
        };

        info!(session_id = %session.id, itinerary_id = %itinerary_id, "Roll call started");
        self.presence = self
            .roster
            .entries()
            .iter()
            .map(|e| (e.passenger_id.clone(), Presence::Unknown))
            .collect();
        self.cursor = 0;
        self.session = Some(session);
        self.state = SessionState::InProgress;

        self.notify.notify(
            NotifyKind::Success,
            &format!("Roll call started for {} passengers", self.roster.len()),
        );
        Ok(())
    }

    /// Mark a passenger present or absent.
    ///
    /// Re-marking overwrites the prior value. When the marked passenger is the
    /// one at the cursor, the cursor advances one row, clamped at the last
    /// entry; callers can check [`is_at_last_entry`](Self::is_at_last_entry)
    /// to surface "last entry reached". Purely local, no remote call.
    pub fn record_presence(
        &mut self,
        passenger_id: &str,
        present: bool,
    ) -> Result<(), AttendanceError> {
        self.require_state(SessionState::InProgress, "record presence")?;

        let index = self
            .roster
            .index_of(passenger_id)
            .ok_or_else(|| AttendanceError::UnknownPassenger(passenger_id.to_string()))?;

        let value = if present {
            Presence::Present
        } else {
            Presence::Absent
        };
        self.presence.insert(passenger_id.to_string(), value);
        debug!(passenger_id, ?value, "Presence recorded");

        // Marking the current row walks the cursor forward, out-of-order
        // marks leave it where it is
        if index == self.cursor {
            self.cursor = (self.cursor + 1).min(self.roster.len() - 1);
        }
        Ok(())
    }

    /// Point the cursor at an arbitrary roster row
    pub fn select_cursor(&mut self, index: usize) -> Result<(), AttendanceError> {
        self.require_state(SessionState::InProgress, "select a row")?;

        if index >= self.roster.len() {
            return Err(AttendanceError::CursorOutOfRange {
                index,
                len: self.roster.len(),
            });
        }
        self.cursor = index;
        Ok(())
    }

    fn unresolved_count(&self) -> usize {
        self.roster
            .entries()
            .iter()
            .filter(|e| !self.presence_of(&e.passenger_id).is_resolved())
            .count()
    }

    /// Persist the roll call and close the session as `Finalized`.
    ///
    /// Unresolved entries are a soft warning: the confirmation port decides
    /// whether to proceed, and a declined confirmation leaves the session
    /// open with nothing submitted. The presence payload contains only
    /// resolved entries. Both the presence submission and the status change
    /// must succeed for the transition; on any failure the session stays
    /// `InProgress` and the failure is surfaced.
    pub async fn finalize(&mut self) -> Result<FinalizeOutcome, AttendanceError> {
        self.require_state(SessionState::InProgress, "finalize")?;

        let unresolved = self.unresolved_count();
        if unresolved > 0 {
            let message = format!(
                "{} of {} passengers are still unmarked. Finalize anyway?",
                unresolved,
                self.roster.len()
            );
            if !self.confirm.confirm(&message) {
                self.notify
                    .notify(NotifyKind::Info, "Finalize cancelled, session stays open");
                return Ok(FinalizeOutcome::Declined);
            }
        }

        let session_id = self.session_id("finalize")?;
        let marks: BTreeMap<String, &'static str> = self
            .roster
            .entries()
            .iter()
            .filter_map(|e| {
                self.presence_of(&e.passenger_id)
                    .api_token()
                    .map(|token| (e.passenger_id.clone(), token))
            })
            .collect();

        if let Err(err) = self
            .retry
            .execute(|| self.api.submit_presence(&session_id, &marks))
            .await
        {
            self.notify.notify(NotifyKind::Error, &err.to_string());
            return Err(err.into());
        }

        if let Err(err) = self
            .retry
            .execute(|| {
                self.api
                    .change_session_status(&session_id, SessionStatus::Finalized)
            })
            .await
        {
            self.notify.notify(NotifyKind::Error, &err.to_string());
            return Err(err.into());
        }

        let present = self
            .presence
            .values()
            .filter(|p| **p == Presence::Present)
            .count();
        let absent = self
            .presence
            .values()
            .filter(|p| **p == Presence::Absent)
            .count();

        self.state = SessionState::Finalized;
        if let Some(session) = self.session.as_mut() {
            session.status = SessionStatus::Finalized;
        }
        info!(session_id = %session_id, present, absent, unresolved, "Roll call finalized");
        self.notify.notify(
            NotifyKind::Success,
            &format!(
                "Roll call finalized: {} present, {} absent, {} unmarked",
                present, absent, unresolved
            ),
        );
        Ok(FinalizeOutcome::Finalized)
    }

    /// Abandon the roll call, discarding all recorded marks.
    ///
    /// Always confirmation-gated. On success the session closes as
    /// `Cancelled` and no presence is ever persisted for it; on remote
    /// failure the session stays `InProgress`.
    pub async fn cancel(&mut self) -> Result<CancelOutcome, AttendanceError> {
        self.require_state(SessionState::InProgress, "cancel")?;

        if !self
            .confirm
            .confirm("Cancel this roll call? Recorded marks will be discarded.")
        {
            self.notify
                .notify(NotifyKind::Info, "Cancel aborted, session stays open");
            return Ok(CancelOutcome::Declined);
        }

        let session_id = self.session_id("cancel")?;
        if let Err(err) = self
            .retry
            .execute(|| {
                self.api
                    .change_session_status(&session_id, SessionStatus::Cancelled)
            })
            .await
        {
            self.notify.notify(NotifyKind::Error, &err.to_string());
            return Err(err.into());
        }

        self.state = SessionState::Cancelled;
        self.presence.clear();
        if let Some(session) = self.session.as_mut() {
            session.status = SessionStatus::Cancelled;
        }
        info!(session_id = %session_id, "Roll call cancelled");
        self.notify
            .notify(NotifyKind::Success, "Roll call cancelled, marks discarded");
        Ok(CancelOutcome::Cancelled)
    }
}
