use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Reserved,
    Paid,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Reserved => "RESERVED",
            TicketStatus::Paid => "PAID",
        }
    }

    /// Parse the database representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "RESERVED" => Some(TicketStatus::Reserved),
            "PAID" => Some(TicketStatus::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's registration for the event; tickets hang off it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i32,
    pub user_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: i32,
    pub name: String,
    pub price: i32,
    pub is_remote: bool,
    pub includes_hotel: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i32,
    pub enrollment_id: i32,
    pub ticket_type_id: i32,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketWithType {
    #[serde(flatten)]
    pub ticket: Ticket,
    #[serde(rename = "TicketType")]
    pub ticket_type: TicketType,
}
