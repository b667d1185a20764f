//! Roster ordering for one itinerary.
//!
//! Holds the ordered pickup roster the roll-call session walks, and supports
//! moving an entry one position up or down. Persisting re-ordered boarding
//! positions is an itinerary-edit save, not part of this subsystem.

use tracing::debug;

use crate::api::{ApiError, AttendanceApi, ResilientClient};
use crate::models::RosterEntry;

/// Direction for an adjacent re-order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Ordered roster for one itinerary, sorted ascending by boarding position.
/// Entries with no boarding position sort first, as position 0; the sort is
/// stable so server order breaks ties.
#[derive(Debug, Clone)]
pub struct RosterOrderingService {
    itinerary_id: String,
    entries: Vec<RosterEntry>,
}

impl RosterOrderingService {
    /// Fetch and order the itinerary's roster
    pub async fn load<A: AttendanceApi>(
        api: &A,
        retry: &ResilientClient,
        itinerary_id: &str,
    ) -> Result<Self, ApiError> {
        let entries = retry.execute(|| api.fetch_roster(itinerary_id)).await?;
        debug!(itinerary_id, count = entries.len(), "Roster loaded");
        Ok(Self::from_entries(itinerary_id, entries))
    }

    /// Build the service from already-fetched entries, applying the sort
    pub fn from_entries(itinerary_id: &str, mut entries: Vec<RosterEntry>) -> Self {
        entries.sort_by_key(|e| e.sort_position());
        Self {
            itinerary_id: itinerary_id.to_string(),
            entries,
        }
    }

    pub fn itinerary_id(&self) -> &str {
        &self.itinerary_id
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&RosterEntry> {
        self.entries.get(index)
    }

    /// Index of the entry for the given passenger, in the current order
    pub fn index_of(&self, passenger_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.passenger_id == passenger_id)
    }

    /// Swap the entry at `index` with its neighbor in `direction`.
    ///
    /// No-op at the boundary: the first entry cannot move up and the last
    /// cannot move down. Returns whether the order changed. Only the in-memory
    /// order mutates; the swapped boarding positions go with their entries.
    pub fn move_entry(&mut self, index: usize, direction: MoveDirection) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        let neighbor = match direction {
            MoveDirection::Up => {
                if index == 0 {
                    return false;
                }
                index - 1
            }
            MoveDirection::Down => {
                if index + 1 >= self.entries.len() {
                    return false;
                }
                index + 1
            }
        };

        // Positions travel with the slots so the persisted order matches
        let pos_a = self.entries[index].boarding_position;
        let pos_b = self.entries[neighbor].boarding_position;
        self.entries[index].boarding_position = pos_b;
        self.entries[neighbor].boarding_position = pos_a;
        self.entries.swap(index, neighbor);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, position: Option<i64>) -> RosterEntry {
        RosterEntry {
            passenger_id: id.to_string(),
            first_name: id.to_string(),
            last_name: "Test".to_string(),
            guardian_name: None,
            school_name: None,
            boarding_position: position,
            room_label: None,
            pickup_address_id: None,
        }
    }

    fn ids(service: &RosterOrderingService) -> Vec<&str> {
        service
            .entries()
            .iter()
            .map(|e| e.passenger_id.as_str())
            .collect()
    }

    #[test]
    fn test_load_order_sorts_by_boarding_position() {
        let service = RosterOrderingService::from_entries(
            "ITN-1",
            vec![entry("C", Some(3)), entry("A", Some(1)), entry("B", Some(2))],
        );
        assert_eq!(ids(&service), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_undefined_position_sorts_first_and_stable() {
        let service = RosterOrderingService::from_entries(
            "ITN-1",
            vec![
                entry("B", Some(1)),
                entry("X", None),
                entry("Y", None),
                entry("A", Some(0)),
            ],
        );
        // None sorts as 0; ties keep server order
        assert_eq!(ids(&service), vec!["X", "Y", "A", "B"]);
    }

    #[test]
    fn test_move_entry_swaps_neighbors_and_positions() {
        let mut service = RosterOrderingService::from_entries(
            "ITN-1",
            vec![entry("A", Some(1)), entry("B", Some(2)), entry("C", Some(3))],
        );

        assert!(service.move_entry(1, MoveDirection::Up));
        assert_eq!(ids(&service), vec!["B", "A", "C"]);
        assert_eq!(service.entry(0).unwrap().boarding_position, Some(1));
        assert_eq!(service.entry(1).unwrap().boarding_position, Some(2));

        assert!(service.move_entry(1, MoveDirection::Down));
        assert_eq!(ids(&service), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_move_entry_boundary_noops() {
        let mut service = RosterOrderingService::from_entries(
            "ITN-1",
            vec![entry("A", Some(1)), entry("B", Some(2)), entry("C", Some(3))],
        );

        assert!(!service.move_entry(0, MoveDirection::Up));
        assert_eq!(ids(&service), vec!["A", "B", "C"]);

        let last = service.len() - 1;
        assert!(!service.move_entry(last, MoveDirection::Down));
        assert_eq!(ids(&service), vec!["A", "B", "C"]);

        // Out-of-range index is also a no-op
        assert!(!service.move_entry(99, MoveDirection::Up));
    }

    #[tokio::test]
    async fn test_load_fetches_and_sorts() {
        use crate::api::{ApiError, AttendanceApi};
        use crate::models::{AttendanceSession, SessionStatus};
        use async_trait::async_trait;
        use std::collections::BTreeMap;
        use std::time::Duration;

        struct FakeApi {
            entries: Vec<RosterEntry>,
        }

        #[async_trait]
        impl AttendanceApi for FakeApi {
            async fn fetch_roster(
                &self,
                _itinerary_id: &str,
            ) -> Result<Vec<RosterEntry>, ApiError> {
                Ok(self.entries.clone())
            }

            async fn open_session(
                &self,
                _itinerary_id: &str,
            ) -> Result<AttendanceSession, ApiError> {
                unimplemented!("not exercised by roster loading")
            }

            async fn change_session_status(
                &self,
                _session_id: &str,
                _status: SessionStatus,
            ) -> Result<(), ApiError> {
                unimplemented!("not exercised by roster loading")
            }

            async fn submit_presence(
                &self,
                _session_id: &str,
                _marks: &BTreeMap<String, &'static str>,
            ) -> Result<(), ApiError> {
                unimplemented!("not exercised by roster loading")
            }
        }

        let api = FakeApi {
            entries: vec![entry("B", Some(2)), entry("A", Some(1))],
        };
        let retry = ResilientClient::new(3, Duration::from_millis(1));

        let service = RosterOrderingService::load(&api, &retry, "ITN-7").await.unwrap();
        assert_eq!(service.itinerary_id(), "ITN-7");
        assert_eq!(ids(&service), vec!["A", "B"]);
    }

    #[test]
    fn test_index_of() {
        let service = RosterOrderingService::from_entries(
            "ITN-1",
            vec![entry("A", Some(1)), entry("B", Some(2))],
        );
        assert_eq!(service.index_of("B"), Some(1));
        assert_eq!(service.index_of("Z"), None);
    }
}
