//! Collaborator ports the roll-call workflow talks to its surroundings
//! through. The core only needs a yes/no answer and a place to surface
//! messages; how either is rendered is the embedding application's concern.

/// Severity of a surfaced message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
    Info,
}

/// Asks the operator to confirm a destructive or lossy step.
/// Invoked by finalize when entries remain unresolved, and by cancel always.
pub trait ConfirmationPort {
    fn confirm(&self, message: &str) -> bool;
}

/// Surfaces the outcome of every transition attempt to the operator.
pub trait NotificationPort {
    fn notify(&self, kind: NotifyKind, message: &str);
}

/// Notification port that drops everything, for embedders that surface
/// outcomes through returned errors alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl NotificationPort for NullNotifier {
    fn notify(&self, _kind: NotifyKind, _message: &str) {}
}
