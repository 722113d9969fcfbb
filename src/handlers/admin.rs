use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{City, Film, Screen, ScreenKind, Seat, SeatCategory, SeatType, Showing, Theater};
use crate::error::AppResult;
use crate::handlers::booking::BookingResponse;
use crate::AppState;

// ============ Directory ============

#[derive(Debug, Deserialize)]
pub struct CreateCityRequest {
    pub name: String,
    pub state: String,
}

pub async fn create_city(
    State(state): State<AppState>,
    Json(payload): Json<CreateCityRequest>,
) -> AppResult<Json<City>> {
    Ok(Json(state.catalog.add_city(&payload.name, &payload.state)))
}

#[derive(Debug, Deserialize)]
pub struct CreateTheaterRequest {
    pub name: String,
    pub city_id: Uuid,
}

pub async fn create_theater(
    State(state): State<AppState>,
    Json(payload): Json<CreateTheaterRequest>,
) -> AppResult<Json<Theater>> {
    let theater = state.catalog.add_theater(&payload.name, payload.city_id)?;
    Ok(Json(theater))
}

// ============ Screens & seating ============

#[derive(Debug, Deserialize)]
pub struct CreateSeatTypeRequest {
    pub theater_id: Uuid,
    pub category: SeatCategory,
    pub premium_percent: i32,
}

pub async fn create_seat_type(
    State(state): State<AppState>,
    Json(payload): Json<CreateSeatTypeRequest>,
) -> AppResult<Json<SeatType>> {
    let seat_type = state.catalog.add_seat_type(
        payload.theater_id,
        payload.category,
        payload.premium_percent,
    )?;
    Ok(Json(seat_type))
}

#[derive(Debug, Deserialize)]
pub struct SeatLayoutEntry {
    pub seat_type_id: Uuid,
    pub row: u32,
    pub column: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreateScreenRequest {
    pub theater_id: Uuid,
    pub name: String,
    pub kind: ScreenKind,
    pub row_count: u32,
    pub column_count: u32,
    /// Full seat layout, registered together with the screen so the
    /// seating does not have to be configured per show.
    #[serde(default)]
    pub seats: Vec<SeatLayoutEntry>,
}

#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    #[serde(flatten)]
    pub screen: Screen,
    pub seats: Vec<Seat>,
}

/// Register a screen together with its seat layout.
pub async fn create_screen(
    State(state): State<AppState>,
    Json(payload): Json<CreateScreenRequest>,
) -> AppResult<Json<ScreenResponse>> {
    let screen = state.catalog.add_screen(
        payload.theater_id,
        &payload.name,
        payload.kind,
        payload.row_count,
        payload.column_count,
    )?;

    let mut seats = Vec::with_capacity(payload.seats.len());
    for entry in &payload.seats {
        seats.push(state.catalog.add_seat(
            screen.id,
            entry.seat_type_id,
            entry.row,
            entry.column,
        )?);
    }

    Ok(Json(ScreenResponse { screen, seats }))
}

// ============ Films & showings ============

#[derive(Debug, Deserialize)]
pub struct CreateFilmRequest {
    pub name: String,
    pub kind: String,
    pub duration_minutes: i64,
    pub release_date: Option<DateTime<Utc>>,
}

pub async fn create_film(
    State(state): State<AppState>,
    Json(payload): Json<CreateFilmRequest>,
) -> AppResult<Json<Film>> {
    let film = state.catalog.add_film(
        &payload.name,
        &payload.kind,
        payload.duration_minutes,
        payload.release_date,
    )?;
    Ok(Json(film))
}

#[derive(Debug, Deserialize)]
pub struct CreateShowingRequest {
    pub screen_id: Uuid,
    pub film_id: Uuid,
    pub base_price: Decimal,
    pub starts_at: DateTime<Utc>,
}

/// Schedule a showing; rejects slots that overlap another showing on
/// the same screen.
pub async fn create_showing(
    State(state): State<AppState>,
    Json(payload): Json<CreateShowingRequest>,
) -> AppResult<Json<Showing>> {
    let showing = state.catalog.add_showing(
        payload.screen_id,
        payload.film_id,
        payload.base_price,
        payload.starts_at,
    )?;
    Ok(Json(showing))
}

/// Remove a showing; its bookings are cascade-deleted from the ledger.
pub async fn delete_showing(
    State(state): State<AppState>,
    Path(showing_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    state.catalog.remove_showing(showing_id)?;
    state.engine.forget_showing(showing_id).await;
    Ok(Json(serde_json::json!({ "message": "Showing removed" })))
}

/// All bookings of a showing, cancelled ones included.
pub async fn showing_bookings(
    State(state): State<AppState>,
    Path(showing_id): Path<Uuid>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = state.engine.bookings_for_showing(showing_id).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
