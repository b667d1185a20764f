// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// One passenger slot on an itinerary's pickup roster.
///
/// Owned by `RosterOrderingService`; the only mutation this subsystem performs
/// is the boarding-position swap during re-ordering. Removal is an
/// itinerary-edit concern handled elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub passenger_id: String,
    pub first_name: String,
    pub last_name: String,
    pub guardian_name: Option<String>,
    pub school_name: Option<String>,
    /// Position in the pickup order. Entries without one sort first, as 0.
    pub boarding_position: Option<i64>,
    pub room_label: Option<String>,
    pub pickup_address_id: Option<String>,
}

impl RosterEntry {
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    /// Boarding position used for sort order (undefined sorts as 0)
    pub fn sort_position(&self) -> i64 {
        self.boarding_position.unwrap_or(0)
    }
}

// API response wrappers for GET /itineraries/{id}/roster

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ItineraryRosterResponse {
    #[serde(rename = "itineraryId")]
    pub itinerary_id: Option<String>,
    #[serde(default)]
    pub passengers: Vec<RosterEntryApi>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RosterEntryApi {
    #[serde(rename = "passengerId")]
    pub passenger_id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "guardianName")]
    pub guardian_name: Option<String>,
    #[serde(rename = "schoolName")]
    pub school_name: Option<String>,
    #[serde(rename = "boardingPosition")]
    pub boarding_position: Option<i64>,
    #[serde(rename = "roomLabel")]
    pub room_label: Option<String>,
    #[serde(rename = "pickupAddressId")]
    pub pickup_address_id: Option<String>,
}

impl RosterEntryApi {
    pub fn to_entry(&self) -> RosterEntry {
        RosterEntry {
            passenger_id: self.passenger_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            guardian_name: self.guardian_name.clone(),
            school_name: self.school_name.clone(),
            boarding_position: self.boarding_position,
            room_label: self.room_label.clone(),
            pickup_address_id: self.pickup_address_id.clone(),
        }
    }
}
