use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled screening of a film on one screen. Occupies the screen
/// from `starts_at` for the film's duration; base ticket price is per
/// showing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Showing {
    pub id: Uuid,
    pub screen_id: Uuid,
    pub film_id: Uuid,
    pub base_price: Decimal,
    pub starts_at: DateTime<Utc>,
}
