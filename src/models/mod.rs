//! Domain and wire types for the operator backend.
//!
//! Wire structs mirror the backend's camelCase JSON and stay private to the
//! crate; the rest of the codebase works with the domain types re-exported
//! here.

mod roster;
mod session;

pub use roster::RosterEntry;
pub use session::{AttendanceSession, Presence, SessionStatus};

pub(crate) use roster::ItineraryRosterResponse;
pub(crate) use session::{OpenSessionResponse, PresenceSubmission, StatusChangeRequest};
