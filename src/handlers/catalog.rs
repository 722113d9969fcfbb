use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{City, Film, Review, Theater};
use crate::error::AppResult;
use crate::AppState;

/// List all cities
pub async fn list_cities(State(state): State<AppState>) -> AppResult<Json<Vec<City>>> {
    Ok(Json(state.catalog.cities()))
}

/// List all theaters
pub async fn list_theaters(State(state): State<AppState>) -> AppResult<Json<Vec<Theater>>> {
    Ok(Json(state.catalog.theaters()))
}

/// List all films
pub async fn list_films(State(state): State<AppState>) -> AppResult<Json<Vec<Film>>> {
    Ok(Json(state.catalog.films()))
}

#[derive(Debug, Serialize)]
pub struct ShowtimeResponse {
    pub id: Uuid,
    pub screen_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub base_price: Decimal,
    pub available_seats: usize,
}

/// Upcoming showings of a film with how many seats are left, so clients
/// can hide booked-out shows.
pub async fn film_showtimes(
    State(state): State<AppState>,
    Path(film_id): Path<Uuid>,
) -> AppResult<Json<Vec<ShowtimeResponse>>> {
    state.catalog.film(film_id)?;

    let mut responses = Vec::new();
    for showing in state.catalog.showings_for_film(film_id) {
        let available = state.engine.available_seats(showing.id).await?;
        responses.push(ShowtimeResponse {
            id: showing.id,
            screen_id: showing.screen_id,
            starts_at: showing.starts_at,
            base_price: showing.base_price,
            available_seats: available.len(),
        });
    }

    Ok(Json(responses))
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: u8,
    pub comment: String,
}

/// Leave a review for a film
pub async fn create_review(
    State(state): State<AppState>,
    Path(film_id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> AppResult<Json<Review>> {
    let review = state
        .catalog
        .add_review(film_id, payload.rating, &payload.comment)?;
    Ok(Json(review))
}

/// List a film's reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(film_id): Path<Uuid>,
) -> AppResult<Json<Vec<Review>>> {
    state.catalog.film(film_id)?;
    Ok(Json(state.catalog.reviews_for_film(film_id)))
}
