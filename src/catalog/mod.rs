//! Reference data: cities, theaters, screens, seats, seat types, films,
//! reviews and showings. Read-mostly; mutations happen out of band of the
//! booking path and enforce the catalog invariants at registration time.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::entities::{
    City, Film, Review, Screen, ScreenKind, Seat, SeatCategory, SeatType, Showing, Theater,
};
use crate::error::{AppError, AppResult};

/// The read boundary the booking engine depends on. Everything the engine
/// knows about reference data goes through these four lookups.
pub trait Catalog: Send + Sync {
    fn showing(&self, id: Uuid) -> AppResult<Showing>;
    fn screen(&self, id: Uuid) -> AppResult<Screen>;
    fn seats_for_screen(&self, screen_id: Uuid) -> AppResult<Vec<Seat>>;
    fn seat_type(&self, id: Uuid) -> AppResult<SeatType>;
}

#[derive(Default)]
struct Inner {
    cities: HashMap<Uuid, City>,
    theaters: HashMap<Uuid, Theater>,
    screens: HashMap<Uuid, Screen>,
    seat_types: HashMap<Uuid, SeatType>,
    seats: HashMap<Uuid, Seat>,
    films: HashMap<Uuid, Film>,
    reviews: HashMap<Uuid, Review>,
    showings: HashMap<Uuid, Showing>,
}

/// In-memory catalog store.
#[derive(Default)]
pub struct CatalogStore {
    inner: RwLock<Inner>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("catalog lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("catalog lock poisoned")
    }

    // ============ Registration ============

    pub fn add_city(&self, name: &str, state: &str) -> City {
        let city = City {
            id: Uuid::new_v4(),
            name: name.to_string(),
            state: state.to_string(),
        };
        self.write().cities.insert(city.id, city.clone());
        city
    }

    pub fn add_theater(&self, name: &str, city_id: Uuid) -> AppResult<Theater> {
        let mut inner = self.write();
        if !inner.cities.contains_key(&city_id) {
            return Err(AppError::NotFound("city".to_string()));
        }
        let theater = Theater {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city_id,
        };
        inner.theaters.insert(theater.id, theater.clone());
        Ok(theater)
    }

    pub fn add_screen(
        &self,
        theater_id: Uuid,
        name: &str,
        kind: ScreenKind,
        row_count: u32,
        column_count: u32,
    ) -> AppResult<Screen> {
        if row_count < 1 || column_count < 1 {
            return Err(AppError::InvalidInput(
                "screen must have at least one row and one column".to_string(),
            ));
        }
        let mut inner = self.write();
        if !inner.theaters.contains_key(&theater_id) {
            return Err(AppError::NotFound("theater".to_string()));
        }
        let screen = Screen {
            id: Uuid::new_v4(),
            theater_id,
            name: name.to_string(),
            kind,
            row_count,
            column_count,
        };
        inner.screens.insert(screen.id, screen.clone());
        Ok(screen)
    }

    pub fn add_seat_type(
        &self,
        theater_id: Uuid,
        category: SeatCategory,
        premium_percent: i32,
    ) -> AppResult<SeatType> {
        if premium_percent < 0 {
            return Err(AppError::InvalidInput(format!(
                "premium percent must be non-negative, got {premium_percent}"
            )));
        }
        let mut inner = self.write();
        if !inner.theaters.contains_key(&theater_id) {
            return Err(AppError::NotFound("theater".to_string()));
        }
        let seat_type = SeatType {
            id: Uuid::new_v4(),
            theater_id,
            category,
            premium_percent,
        };
        inner.seat_types.insert(seat_type.id, seat_type.clone());
        Ok(seat_type)
    }

    /// Register a seat on a screen. Position must fit the screen's grid
    /// and be unoccupied; the seat type must belong to the screen's
    /// theater.
    pub fn add_seat(
        &self,
        screen_id: Uuid,
        seat_type_id: Uuid,
        row: u32,
        column: u32,
    ) -> AppResult<Seat> {
        let mut inner = self.write();
        let screen = inner
            .screens
            .get(&screen_id)
            .ok_or_else(|| AppError::NotFound("screen".to_string()))?;
        let seat_type = inner
            .seat_types
            .get(&seat_type_id)
            .ok_or_else(|| AppError::NotFound("seat type".to_string()))?;
        if seat_type.theater_id != screen.theater_id {
            return Err(AppError::InvalidInput(
                "seat type belongs to a different theater".to_string(),
            ));
        }
        if row < 1 || row > screen.row_count || column < 1 || column > screen.column_count {
            return Err(AppError::InvalidInput(format!(
                "seat position ({row}, {column}) is outside the {}x{} screen grid",
                screen.row_count, screen.column_count
            )));
        }
        let taken = inner
            .seats
            .values()
            .any(|s| s.screen_id == screen_id && s.row == row && s.column == column);
        if taken {
            return Err(AppError::InvalidInput(format!(
                "seat position ({row}, {column}) is already registered"
            )));
        }
        let seat = Seat {
            id: Uuid::new_v4(),
            screen_id,
            seat_type_id,
            row,
            column,
        };
        inner.seats.insert(seat.id, seat.clone());
        Ok(seat)
    }

    pub fn add_film(
        &self,
        name: &str,
        kind: &str,
        duration_minutes: i64,
        release_date: Option<DateTime<Utc>>,
    ) -> AppResult<Film> {
        if duration_minutes < 1 {
            return Err(AppError::InvalidInput(format!(
                "film duration must be at least one minute, got {duration_minutes}"
            )));
        }
        let film = Film {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind: kind.to_string(),
            duration_minutes,
            release_date,
        };
        self.write().films.insert(film.id, film.clone());
        Ok(film)
    }

    pub fn add_review(&self, film_id: Uuid, rating: u8, comment: &str) -> AppResult<Review> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::InvalidInput(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        let mut inner = self.write();
        if !inner.films.contains_key(&film_id) {
            return Err(AppError::NotFound("film".to_string()));
        }
        let review = Review {
            id: Uuid::new_v4(),
            film_id,
            rating,
            comment: comment.to_string(),
            created_at: Utc::now(),
        };
        inner.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    /// Schedule a showing. A screen runs one showing at a time: the new
    /// slot `[starts_at, starts_at + film duration)` must not overlap any
    /// showing already scheduled on the same screen.
    pub fn add_showing(
        &self,
        screen_id: Uuid,
        film_id: Uuid,
        base_price: Decimal,
        starts_at: DateTime<Utc>,
    ) -> AppResult<Showing> {
        if base_price <= Decimal::ZERO {
            return Err(AppError::InvalidInput(format!(
                "base price must be positive, got {base_price}"
            )));
        }
        let mut inner = self.write();
        if !inner.screens.contains_key(&screen_id) {
            return Err(AppError::NotFound("screen".to_string()));
        }
        let film = inner
            .films
            .get(&film_id)
            .ok_or_else(|| AppError::NotFound("film".to_string()))?;
        let ends_at = starts_at + Duration::minutes(film.duration_minutes);

        for other in inner.showings.values().filter(|s| s.screen_id == screen_id) {
            let other_film = inner
                .films
                .get(&other.film_id)
                .ok_or_else(|| AppError::Internal("showing references missing film".to_string()))?;
            let other_end = other.starts_at + Duration::minutes(other_film.duration_minutes);
            if starts_at < other_end && other.starts_at < ends_at {
                return Err(AppError::InvalidInput(format!(
                    "screen is already occupied by showing {} in that slot",
                    other.id
                )));
            }
        }

        let showing = Showing {
            id: Uuid::new_v4(),
            screen_id,
            film_id,
            base_price,
            starts_at,
        };
        inner.showings.insert(showing.id, showing.clone());
        Ok(showing)
    }

    /// Remove a showing from the schedule. The caller is responsible for
    /// cascading its bookings out of the reservation ledger.
    pub fn remove_showing(&self, id: Uuid) -> AppResult<Showing> {
        self.write()
            .showings
            .remove(&id)
            .ok_or_else(|| AppError::NotFound("showing".to_string()))
    }

    // ============ Listings (exploration endpoints) ============

    pub fn cities(&self) -> Vec<City> {
        self.read().cities.values().cloned().collect()
    }

    pub fn theaters(&self) -> Vec<Theater> {
        self.read().theaters.values().cloned().collect()
    }

    pub fn films(&self) -> Vec<Film> {
        self.read().films.values().cloned().collect()
    }

    pub fn film(&self, id: Uuid) -> AppResult<Film> {
        self.read()
            .films
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("film".to_string()))
    }

    pub fn reviews_for_film(&self, film_id: Uuid) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .read()
            .reviews
            .values()
            .filter(|r| r.film_id == film_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| r.created_at);
        reviews
    }

    pub fn showings(&self) -> Vec<Showing> {
        self.read().showings.values().cloned().collect()
    }

    pub fn showings_for_film(&self, film_id: Uuid) -> Vec<Showing> {
        let mut showings: Vec<Showing> = self
            .read()
            .showings
            .values()
            .filter(|s| s.film_id == film_id)
            .cloned()
            .collect();
        showings.sort_by_key(|s| s.starts_at);
        showings
    }
}

impl Catalog for CatalogStore {
    fn showing(&self, id: Uuid) -> AppResult<Showing> {
        self.read()
            .showings
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("showing".to_string()))
    }

    fn screen(&self, id: Uuid) -> AppResult<Screen> {
        self.read()
            .screens
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("screen".to_string()))
    }

    fn seats_for_screen(&self, screen_id: Uuid) -> AppResult<Vec<Seat>> {
        let inner = self.read();
        if !inner.screens.contains_key(&screen_id) {
            return Err(AppError::NotFound("screen".to_string()));
        }
        let mut seats: Vec<Seat> = inner
            .seats
            .values()
            .filter(|s| s.screen_id == screen_id)
            .cloned()
            .collect();
        seats.sort_by_key(|s| (s.row, s.column));
        Ok(seats)
    }

    fn seat_type(&self, id: Uuid) -> AppResult<SeatType> {
        self.read()
            .seat_types
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("seat type".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_theater() -> (CatalogStore, Theater) {
        let store = CatalogStore::new();
        let city = store.add_city("Berlin", "Berlin");
        let theater = store.add_theater("Kino International", city.id).unwrap();
        (store, theater)
    }

    #[test]
    fn seat_positions_must_fit_the_screen_grid() {
        let (store, theater) = store_with_theater();
        let screen = store
            .add_screen(theater.id, "Screen 1", ScreenKind::TwoD, 2, 3)
            .unwrap();
        let general = store
            .add_seat_type(theater.id, SeatCategory::General, 0)
            .unwrap();

        assert!(store.add_seat(screen.id, general.id, 2, 3).is_ok());
        assert!(matches!(
            store.add_seat(screen.id, general.id, 3, 1),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            store.add_seat(screen.id, general.id, 0, 1),
            Err(AppError::InvalidInput(_))
        ));
        // (2, 3) is taken now
        assert!(matches!(
            store.add_seat(screen.id, general.id, 2, 3),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn seat_type_must_belong_to_the_screens_theater() {
        let (store, theater) = store_with_theater();
        let city = store.add_city("Hamburg", "Hamburg");
        let other_theater = store.add_theater("Elsewhere", city.id).unwrap();
        let screen = store
            .add_screen(theater.id, "Screen 1", ScreenKind::TwoD, 5, 5)
            .unwrap();
        let foreign_type = store
            .add_seat_type(other_theater.id, SeatCategory::Vip, 50)
            .unwrap();

        assert!(matches!(
            store.add_seat(screen.id, foreign_type.id, 1, 1),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn overlapping_showings_on_the_same_screen_are_rejected() {
        let (store, theater) = store_with_theater();
        let screen = store
            .add_screen(theater.id, "Screen 1", ScreenKind::ThreeD, 5, 5)
            .unwrap();
        let film = store.add_film("Solaris", "sci-fi", 120, None).unwrap();

        let start = Utc::now();
        store
            .add_showing(screen.id, film.id, Decimal::from(10), start)
            .unwrap();

        // starts halfway through the first showing
        let overlap = store.add_showing(
            screen.id,
            film.id,
            Decimal::from(10),
            start + Duration::minutes(60),
        );
        assert!(matches!(overlap, Err(AppError::InvalidInput(_))));

        // back to back is fine
        assert!(store
            .add_showing(
                screen.id,
                film.id,
                Decimal::from(10),
                start + Duration::minutes(120),
            )
            .is_ok());
    }

    #[test]
    fn non_positive_base_price_is_rejected() {
        let (store, theater) = store_with_theater();
        let screen = store
            .add_screen(theater.id, "Screen 1", ScreenKind::TwoD, 5, 5)
            .unwrap();
        let film = store.add_film("Solaris", "sci-fi", 120, None).unwrap();

        assert!(matches!(
            store.add_showing(screen.id, film.id, Decimal::ZERO, Utc::now()),
            Err(AppError::InvalidInput(_))
        ));
    }
}
