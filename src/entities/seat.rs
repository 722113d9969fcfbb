use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatCategory {
    General,
    Vip,
    Couple,
}

/// A priced seat tier, defined per theater. `premium_percent` is the
/// surcharge applied on top of a showing's base price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatType {
    pub id: Uuid,
    pub theater_id: Uuid,
    pub category: SeatCategory,
    pub premium_percent: i32,
}

/// A physical seat. Placement (screen, row, column) and pricing tier
/// (seat type) are independent references.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: Uuid,
    pub screen_id: Uuid,
    pub seat_type_id: Uuid,
    pub row: u32,
    pub column: u32,
}
