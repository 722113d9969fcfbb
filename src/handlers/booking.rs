use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::entities::{Booking, SeatCategory};
use crate::error::AppResult;
use crate::pricing;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub showing_id: Uuid,
    pub seat_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub showing_id: Uuid,
    pub seat_id: Uuid,
    pub ticket_number: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            showing_id: b.showing_id,
            seat_id: b.seat_id,
            ticket_number: b.ticket_number,
            price: b.price,
            created_at: b.created_at,
            cancelled_at: b.cancelled_at,
        }
    }
}

/// Reserve one or more seats for a showing, all-or-nothing.
pub async fn reserve(
    State(state): State<AppState>,
    Json(payload): Json<ReserveRequest>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = state
        .engine
        .reserve(payload.showing_id, &payload.seat_ids)
        .await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Look up a booking (the "where am I sitting" ticket view).
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.engine.booking(booking_id).await?;
    Ok(Json(booking.into()))
}

/// Cancel a booking, freeing its seat.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    state.engine.cancel(booking_id).await?;
    Ok(Json(serde_json::json!({ "message": "Booking cancelled" })))
}

#[derive(Debug, Serialize)]
pub struct AvailableSeatResponse {
    pub id: Uuid,
    pub row: u32,
    pub column: u32,
    pub category: SeatCategory,
    pub price: Decimal,
}

/// Seats of the showing's screen that are still bookable, with the
/// price each would cost.
pub async fn available_seats(
    State(state): State<AppState>,
    Path(showing_id): Path<Uuid>,
) -> AppResult<Json<Vec<AvailableSeatResponse>>> {
    let available = state.engine.available_seats(showing_id).await?;

    let showing = state.catalog.showing(showing_id)?;
    let seats = state.catalog.seats_for_screen(showing.screen_id)?;

    let mut responses = Vec::with_capacity(available.len());
    for seat in seats.into_iter().filter(|s| available.contains(&s.id)) {
        let seat_type = state.catalog.seat_type(seat.seat_type_id)?;
        responses.push(AvailableSeatResponse {
            id: seat.id,
            row: seat.row,
            column: seat.column,
            category: seat_type.category,
            price: pricing::ticket_price(showing.base_price, seat_type.premium_percent)?,
        });
    }

    Ok(Json(responses))
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub showing_id: Uuid,
    pub seat_id: Uuid,
    pub price: Decimal,
}

/// Quote the price of a single seat without reserving it.
pub async fn price_for(
    State(state): State<AppState>,
    Path((showing_id, seat_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<PriceResponse>> {
    let price = state.engine.price_for(showing_id, seat_id)?;
    Ok(Json(PriceResponse {
        showing_id,
        seat_id,
        price,
    }))
}
