use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::room::Room;

/// A user's assignment to a room. A user holds at most one active booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub room_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(id: i32, user_id: i32, room_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            room_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Point the booking at another room
    pub fn move_to(&mut self, room_id: i32) {
        self.room_id = room_id;
        self.updated_at = Utc::now();
    }
}

/// The view of a booking handed back to its owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingWithRoom {
    pub id: i32,
    #[serde(rename = "Room")]
    pub room: Room,
}

/// Returned by successful create and change requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub booking_id: i32,
}
