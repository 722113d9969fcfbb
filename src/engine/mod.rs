//! The booking engine: validation, pricing, ticket issuance and the
//! atomic handoff to the reservation ledger.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::entities::{Booking, Seat};
use crate::error::{AppError, AppResult};
use crate::ledger::ReservationLedger;
use crate::pricing;

pub struct BookingEngine {
    catalog: Arc<dyn Catalog>,
    ledger: ReservationLedger,
    ticket_seq: AtomicU64,
}

impl BookingEngine {
    pub fn new(catalog: Arc<dyn Catalog>, lock_timeout: Duration) -> Self {
        Self {
            catalog,
            ledger: ReservationLedger::new(lock_timeout),
            ticket_seq: AtomicU64::new(1),
        }
    }

    /// Reserve a set of seats for a showing, all-or-nothing. On success
    /// every seat gets its own booking with a fresh ticket number and a
    /// price derived from the showing's base price and the seat's tier.
    pub async fn reserve(&self, showing_id: Uuid, seat_ids: &[Uuid]) -> AppResult<Vec<Booking>> {
        if seat_ids.is_empty() {
            return Err(AppError::InvalidInput(
                "at least one seat must be requested".to_string(),
            ));
        }
        let unique: HashSet<Uuid> = seat_ids.iter().copied().collect();
        if unique.len() != seat_ids.len() {
            return Err(AppError::InvalidInput(
                "duplicate seat ids in request".to_string(),
            ));
        }

        let showing = self.catalog.showing(showing_id)?;
        let screen_seats: HashMap<Uuid, Seat> = self
            .catalog
            .seats_for_screen(showing.screen_id)?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let foreign: Vec<Uuid> = seat_ids
            .iter()
            .copied()
            .filter(|id| !screen_seats.contains_key(id))
            .collect();
        if !foreign.is_empty() {
            return Err(AppError::InvalidSeat(foreign));
        }

        let mut bookings = Vec::with_capacity(seat_ids.len());
        for seat_id in seat_ids {
            let seat = &screen_seats[seat_id];
            let seat_type = self.catalog.seat_type(seat.seat_type_id)?;
            let price = pricing::ticket_price(showing.base_price, seat_type.premium_percent)?;
            bookings.push(Booking {
                id: Uuid::new_v4(),
                showing_id,
                seat_id: *seat_id,
                ticket_number: self.next_ticket_number(),
                price,
                created_at: Utc::now(),
                cancelled_at: None,
            });
        }

        let committed = self.ledger.try_commit(bookings).await?;
        tracing::info!(
            showing = %showing_id,
            seats = committed.len(),
            "reservation committed"
        );
        Ok(committed)
    }

    /// Cancel a booking, freeing its seat for later reservations.
    /// Idempotent on already-cancelled bookings.
    pub async fn cancel(&self, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self.ledger.cancel(booking_id).await?;
        tracing::info!(booking = %booking_id, seat = %booking.seat_id, "booking cancelled");
        Ok(booking)
    }

    /// Seats of the showing's screen without an active booking, in
    /// row/column order.
    pub async fn available_seats(&self, showing_id: Uuid) -> AppResult<Vec<Uuid>> {
        let showing = self.catalog.showing(showing_id)?;
        let seats = self.catalog.seats_for_screen(showing.screen_id)?;
        let taken = self.ledger.active_seats(showing_id).await?;
        Ok(seats
            .into_iter()
            .map(|s| s.id)
            .filter(|id| !taken.contains(id))
            .collect())
    }

    /// Quote the price of one seat for a showing without reserving it.
    pub fn price_for(&self, showing_id: Uuid, seat_id: Uuid) -> AppResult<Decimal> {
        let showing = self.catalog.showing(showing_id)?;
        let seat = self
            .catalog
            .seats_for_screen(showing.screen_id)?
            .into_iter()
            .find(|s| s.id == seat_id)
            .ok_or_else(|| AppError::InvalidSeat(vec![seat_id]))?;
        let seat_type = self.catalog.seat_type(seat.seat_type_id)?;
        pricing::ticket_price(showing.base_price, seat_type.premium_percent)
    }

    pub async fn booking(&self, booking_id: Uuid) -> AppResult<Booking> {
        self.ledger.booking(booking_id).await
    }

    pub async fn bookings_for_showing(&self, showing_id: Uuid) -> AppResult<Vec<Booking>> {
        self.catalog.showing(showing_id)?;
        self.ledger.bookings_for_showing(showing_id).await
    }

    /// Cascade hook for showing deletion: drops the showing's booking
    /// history from the ledger.
    pub async fn forget_showing(&self, showing_id: Uuid) {
        self.ledger.remove_showing(showing_id).await;
    }

    /// Globally unique, opaque ticket number: process-wide sequence plus
    /// a random suffix.
    fn next_ticket_number(&self) -> String {
        let seq = self.ticket_seq.fetch_add(1, Ordering::Relaxed);
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        format!("TKT-{seq:08}-{}", suffix.to_uppercase())
    }
}
