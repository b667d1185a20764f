//! Roll-call (attendance) session workflow.
//!
//! The controller owns the session state machine, the ports are the seams to
//! the embedding application, and the summary is the derived view the render
//! layer consumes.

mod controller;
mod ports;
mod summary;

pub use controller::{
    AttendanceError, AttendanceSessionController, CancelOutcome, FinalizeOutcome, SessionState,
};
pub use ports::{ConfirmationPort, NotificationPort, NotifyKind, NullNotifier};
pub use summary::{AttendanceSummary, SummaryRow};
