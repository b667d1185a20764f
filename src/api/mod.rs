//! Remote API surface for the operator backend.
//!
//! `ApiClient` owns the HTTP transport and the request/response logging;
//! `ResilientClient` layers the bounded-retry policy on top. The
//! `AttendanceApi` trait is the seam the roll-call workflow talks through.

mod client;
mod error;
mod retry;

pub use client::ApiClient;
pub use error::ApiError;
pub use retry::ResilientClient;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::models::{AttendanceSession, RosterEntry, SessionStatus};

/// Remote operations consumed by the roll-call session workflow.
///
/// Implemented by [`ApiClient`] against the operator backend, and by
/// in-memory fakes in tests. None of these calls retry on their own; callers
/// wrap them in [`ResilientClient::execute`].
#[async_trait]
pub trait AttendanceApi {
    /// Fetch the itinerary's roster entries, in server order.
    async fn fetch_roster(&self, itinerary_id: &str) -> Result<Vec<RosterEntry>, ApiError>;

    /// Open a roll-call session for the itinerary.
    /// Fails with [`ApiError::SessionConflict`] if one is already open.
    async fn open_session(&self, itinerary_id: &str) -> Result<AttendanceSession, ApiError>;

    /// Move the session to the given status.
    async fn change_session_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<(), ApiError>;

    /// Submit the resolved presence marks for the session.
    /// `marks` maps passenger id to a presence wire token; entries that were
    /// never resolved are not included.
    async fn submit_presence(
        &self,
        session_id: &str,
        marks: &BTreeMap<String, &'static str>,
    ) -> Result<(), ApiError>;
}
