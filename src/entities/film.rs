use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: Uuid,
    pub name: String,
    /// Free-form genre/format label ("action", "documentary", ...).
    pub kind: String,
    pub duration_minutes: i64,
    pub release_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub film_id: Uuid,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
