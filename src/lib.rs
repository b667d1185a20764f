//! RouteCall core - the roll-call session workflow of a school-transport
//! operator console.
//!
//! This crate provides the attendance (roll-call) state machine, the ordered
//! roster it walks, the resilient remote-call policy every network-facing
//! component shares, and the API client for the operator backend. Record CRUD
//! screens, billing, calendars and route optimization live in the embedding
//! application; this crate only exposes the ports they plug into.

pub mod api;
pub mod attendance;
pub mod config;
pub mod models;
pub mod roster;

pub use api::{ApiClient, ApiError, AttendanceApi, ResilientClient};
pub use attendance::{
    AttendanceError, AttendanceSessionController, AttendanceSummary, CancelOutcome,
    ConfirmationPort, FinalizeOutcome, NotificationPort, NotifyKind, SessionState,
};
pub use config::Config;
pub use models::{AttendanceSession, Presence, RosterEntry, SessionStatus};
pub use roster::{MoveDirection, RosterOrderingService};
