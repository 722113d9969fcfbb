use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reserved seat for a showing. Immutable once created, except for the
/// cancellation timestamp. At most one active (non-cancelled) booking may
/// exist per (showing, seat) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub showing_id: Uuid,
    pub seat_id: Uuid,
    pub ticket_number: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.cancelled_at.is_none()
    }
}
