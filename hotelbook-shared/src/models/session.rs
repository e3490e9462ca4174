use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Server-side proof that a bearer token is still live
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i32,
    pub user_id: i32,
    pub token: String,
    pub created_at: DateTime<Utc>,
}
