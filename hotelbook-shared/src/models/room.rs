use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// A bookable unit within a hotel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub hotel_id: i32,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(id: i32, name: impl Into<String>, hotel_id: i32, capacity: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            hotel_id,
            capacity,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A room together with the number of bookings currently pointing at it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomOccupancy {
    pub room: Room,
    pub occupancy: i64,
}

impl RoomOccupancy {
    /// True when no slot remains (`occupancy >= capacity`)
    pub fn is_full(&self) -> bool {
        self.occupancy >= i64::from(self.room.capacity)
    }
}
