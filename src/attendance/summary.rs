//! Read-only aggregation over the roll-call session for display.
//!
//! A summary is recomputed from the controller on every observation and never
//! mutates it; it carries the presence counts, the highlighted current entry,
//! and per-row render data for the roster table.

use crate::api::AttendanceApi;
use crate::models::{Presence, RosterEntry};

use super::controller::{AttendanceSessionController, SessionState};
use super::ports::{ConfirmationPort, NotificationPort};

/// One roster row as the console renders it
#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub entry: RosterEntry,
    pub presence: Presence,
    /// Whether this row is the one at the cursor
    pub is_current: bool,
}

impl SummaryRow {
    /// Single-character mark for the presence column
    pub fn presence_mark(&self) -> &'static str {
        match self.presence {
            Presence::Unknown => "·",
            Presence::Present => "✓",
            Presence::Absent => "✗",
        }
    }
}

/// Derived view of one roll-call session's state.
///
/// `present + absent + unknown` always equals the roster length.
#[derive(Debug, Clone)]
pub struct AttendanceSummary {
    pub state: SessionState,
    pub present: usize,
    pub absent: usize,
    pub unknown: usize,
    pub cursor: usize,
    /// Entry at the cursor, for highlighting; `None` only on an empty roster
    pub current_entry: Option<RosterEntry>,
    rows: Vec<SummaryRow>,
}

impl AttendanceSummary {
    /// Compute a fresh summary from the controller's current state
    pub fn observe<A, C, N>(controller: &AttendanceSessionController<A, C, N>) -> Self
    where
        A: AttendanceApi,
        C: ConfirmationPort,
        N: NotificationPort,
    {
        let cursor = controller.cursor();
        let mut present = 0;
        let mut absent = 0;
        let mut unknown = 0;

        let rows: Vec<SummaryRow> = controller
            .roster()
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let presence = controller.presence_of(&entry.passenger_id);
                match presence {
                    Presence::Present => present += 1,
                    Presence::Absent => absent += 1,
                    Presence::Unknown => unknown += 1,
                }
                SummaryRow {
                    entry: entry.clone(),
                    presence,
                    is_current: i == cursor,
                }
            })
            .collect();

        let current_entry = controller.roster().entry(cursor).cloned();

        Self {
            state: controller.state(),
            present,
            absent,
            unknown,
            cursor,
            current_entry,
            rows,
        }
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn roster_len(&self) -> usize {
        self.rows.len()
    }

    /// Number of entries still unmarked
    pub fn unresolved(&self) -> usize {
        self.unknown
    }

    /// Headline for the session panel, e.g. `"3 ✓  1 ✗  2 ·"`
    pub fn counts_line(&self) -> String {
        format!("{} ✓  {} ✗  {} ·", self.present, self.absent, self.unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, AttendanceApi, ResilientClient};
    use crate::attendance::ports::{ConfirmationPort, NotificationPort, NotifyKind};
    use crate::models::{AttendanceSession, SessionStatus};
    use crate::roster::RosterOrderingService;
    use std::collections::BTreeMap;
    use std::time::Duration;

    use async_trait::async_trait;

    struct HappyApi;

    #[async_trait]
    impl AttendanceApi for HappyApi {
        async fn fetch_roster(&self, _itinerary_id: &str) -> Result<Vec<RosterEntry>, ApiError> {
            Ok(vec![])
        }

        async fn open_session(&self, itinerary_id: &str) -> Result<AttendanceSession, ApiError> {
            Ok(AttendanceSession {
                id: "S1".to_string(),
                itinerary_id: itinerary_id.to_string(),
                status: SessionStatus::InProgress,
                opened_at: None,
                closed_at: None,
            })
        }

        async fn change_session_status(
            &self,
            _session_id: &str,
            _status: SessionStatus,
        ) -> Result<(), ApiError> {
            Ok(())
        }

        async fn submit_presence(
            &self,
            _session_id: &str,
            _marks: &BTreeMap<String, &'static str>,
        ) -> Result<(), ApiError> {
            Ok(())
        }
    }

    struct AlwaysYes;
    impl ConfirmationPort for AlwaysYes {
        fn confirm(&self, _message: &str) -> bool {
            true
        }
    }

    struct Silent;
    impl NotificationPort for Silent {
        fn notify(&self, _kind: NotifyKind, _message: &str) {}
    }

    fn entry(id: &str, position: i64) -> RosterEntry {
        RosterEntry {
            passenger_id: id.to_string(),
            first_name: id.to_string(),
            last_name: "Test".to_string(),
            guardian_name: None,
            school_name: None,
            boarding_position: Some(position),
            room_label: None,
            pickup_address_id: None,
        }
    }

    async fn started_controller(
        ids: &[&str],
    ) -> AttendanceSessionController<HappyApi, AlwaysYes, Silent> {
        let entries = ids
            .iter()
            .enumerate()
            .map(|(i, id)| entry(id, i as i64 + 1))
            .collect();
        let mut ctrl = AttendanceSessionController::new(
            HappyApi,
            ResilientClient::new(3, Duration::from_millis(1)),
            AlwaysYes,
            Silent,
            RosterOrderingService::from_entries("ITN-1", entries),
        );
        ctrl.start().await.unwrap();
        ctrl
    }

    #[tokio::test]
    async fn test_counts_sum_to_roster_length() {
        let mut ctrl = started_controller(&["A", "B", "C", "D"]).await;
        ctrl.record_presence("A", true).unwrap();
        ctrl.record_presence("B", false).unwrap();

        let summary = AttendanceSummary::observe(&ctrl);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.absent, 1);
        assert_eq!(summary.unknown, 2);
        assert_eq!(
            summary.present + summary.absent + summary.unknown,
            summary.roster_len()
        );
    }

    #[tokio::test]
    async fn test_current_entry_tracks_cursor() {
        let mut ctrl = started_controller(&["A", "B", "C"]).await;

        let summary = AttendanceSummary::observe(&ctrl);
        assert_eq!(summary.cursor, 0);
        assert_eq!(summary.current_entry.as_ref().unwrap().passenger_id, "A");
        assert!(summary.rows()[0].is_current);
        assert!(!summary.rows()[1].is_current);

        ctrl.select_cursor(2).unwrap();
        let summary = AttendanceSummary::observe(&ctrl);
        assert_eq!(summary.current_entry.as_ref().unwrap().passenger_id, "C");
        assert!(summary.rows()[2].is_current);
    }

    #[tokio::test]
    async fn test_summary_is_recomputed_per_observation() {
        let mut ctrl = started_controller(&["A", "B"]).await;

        let before = AttendanceSummary::observe(&ctrl);
        assert_eq!(before.present, 0);

        ctrl.record_presence("A", true).unwrap();
        // The earlier observation is unchanged, a fresh one sees the mark
        assert_eq!(before.present, 0);
        let after = AttendanceSummary::observe(&ctrl);
        assert_eq!(after.present, 1);
    }

    #[tokio::test]
    async fn test_presence_marks_and_counts_line() {
        let mut ctrl = started_controller(&["A", "B", "C"]).await;
        ctrl.record_presence("A", true).unwrap();
        ctrl.record_presence("B", false).unwrap();

        let summary = AttendanceSummary::observe(&ctrl);
        assert_eq!(summary.rows()[0].presence_mark(), "✓");
        assert_eq!(summary.rows()[1].presence_mark(), "✗");
        assert_eq!(summary.rows()[2].presence_mark(), "·");
        assert_eq!(summary.counts_line(), "1 ✓  1 ✗  1 ·");
        assert_eq!(summary.unresolved(), 1);
    }

    #[tokio::test]
    async fn test_all_present_scenario() {
        let mut ctrl = started_controller(&["A", "B", "C"]).await;
        for id in ["A", "B", "C"] {
            ctrl.record_presence(id, true).unwrap();
        }

        let summary = AttendanceSummary::observe(&ctrl);
        assert_eq!(summary.present, summary.roster_len());
        assert_eq!(summary.unknown, 0);
    }
}
