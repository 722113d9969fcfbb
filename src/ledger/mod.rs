//! Reservation ledger: the source of truth for seat exclusivity.
//!
//! Bookings are grouped per showing, each group behind its own async
//! mutex, so reservations for different showings never contend. The
//! outer registry is only locked long enough to locate a group. History
//! is retained: cancellation flags a booking, it is never removed except
//! when its showing is deleted.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::entities::Booking;
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct ShowingLedger {
    /// All bookings ever made for this showing, cancelled ones included.
    bookings: HashMap<Uuid, Booking>,
}

impl ShowingLedger {
    fn conflicting_seats(&self, seat_ids: &[Uuid]) -> Vec<Uuid> {
        let active: HashSet<Uuid> = self
            .bookings
            .values()
            .filter(|b| b.is_active())
            .map(|b| b.seat_id)
            .collect();
        seat_ids
            .iter()
            .copied()
            .filter(|id| active.contains(id))
            .collect()
    }
}

pub struct ReservationLedger {
    /// Bound on waiting for a showing's serialization point; exceeding
    /// it surfaces as the retryable `Busy` error.
    lock_timeout: Duration,
    showings: RwLock<HashMap<Uuid, Arc<Mutex<ShowingLedger>>>>,
    /// booking id -> showing id, so cancellation can find its group.
    index: RwLock<HashMap<Uuid, Uuid>>,
}

impl ReservationLedger {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            lock_timeout,
            showings: RwLock::new(HashMap::new()),
            index: RwLock::new(HashMap::new()),
        }
    }

    fn entry(&self, showing_id: Uuid) -> Arc<Mutex<ShowingLedger>> {
        if let Some(entry) = self
            .showings
            .read()
            .expect("ledger lock poisoned")
            .get(&showing_id)
        {
            return entry.clone();
        }
        self.showings
            .write()
            .expect("ledger lock poisoned")
            .entry(showing_id)
            .or_default()
            .clone()
    }

    async fn lock(
        &self,
        entry: Arc<Mutex<ShowingLedger>>,
    ) -> AppResult<OwnedMutexGuard<ShowingLedger>> {
        tokio::time::timeout(self.lock_timeout, entry.lock_owned())
            .await
            .map_err(|_| AppError::Busy)
    }

    /// Atomically append a batch of bookings for one showing. Either all
    /// bookings commit, or none do and the already-taken seats are
    /// reported via `SeatUnavailable`.
    pub async fn try_commit(&self, new_bookings: Vec<Booking>) -> AppResult<Vec<Booking>> {
        let showing_id = match new_bookings.first() {
            Some(b) => b.showing_id,
            None => {
                return Err(AppError::InvalidInput(
                    "no bookings to commit".to_string(),
                ))
            }
        };
        if new_bookings.iter().any(|b| b.showing_id != showing_id) {
            return Err(AppError::Internal(
                "commit batch spans multiple showings".to_string(),
            ));
        }

        let mut ledger = self.lock(self.entry(showing_id)).await?;

        let seat_ids: Vec<Uuid> = new_bookings.iter().map(|b| b.seat_id).collect();
        let conflicts = ledger.conflicting_seats(&seat_ids);
        if !conflicts.is_empty() {
            return Err(AppError::SeatUnavailable(conflicts));
        }

        let mut index = self.index.write().expect("ledger lock poisoned");
        for booking in &new_bookings {
            index.insert(booking.id, showing_id);
            ledger.bookings.insert(booking.id, booking.clone());
        }

        Ok(new_bookings)
    }

    /// Flag a booking cancelled, freeing its seat. Idempotent: cancelling
    /// an already-cancelled booking succeeds without touching it again.
    pub async fn cancel(&self, booking_id: Uuid) -> AppResult<Booking> {
        let showing_id = self
            .index
            .read()
            .expect("ledger lock poisoned")
            .get(&booking_id)
            .copied()
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

        let mut ledger = self.lock(self.entry(showing_id)).await?;

        let booking = ledger
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;
        if booking.cancelled_at.is_none() {
            booking.cancelled_at = Some(Utc::now());
        }
        Ok(booking.clone())
    }

    pub async fn booking(&self, booking_id: Uuid) -> AppResult<Booking> {
        let showing_id = self
            .index
            .read()
            .expect("ledger lock poisoned")
            .get(&booking_id)
            .copied()
            .ok_or_else(|| AppError::NotFound("booking".to_string()))?;

        let ledger = self.lock(self.entry(showing_id)).await?;
        ledger
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("booking".to_string()))
    }

    /// Seats with an active booking for the showing, read at a single
    /// consistent point.
    pub async fn active_seats(&self, showing_id: Uuid) -> AppResult<HashSet<Uuid>> {
        let ledger = self.lock(self.entry(showing_id)).await?;
        Ok(ledger
            .bookings
            .values()
            .filter(|b| b.is_active())
            .map(|b| b.seat_id)
            .collect())
    }

    /// All bookings for a showing, newest first.
    pub async fn bookings_for_showing(&self, showing_id: Uuid) -> AppResult<Vec<Booking>> {
        let ledger = self.lock(self.entry(showing_id)).await?;
        let mut bookings: Vec<Booking> = ledger.bookings.values().cloned().collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    /// Cascade removal of a deleted showing: drops its whole booking
    /// history.
    pub async fn remove_showing(&self, showing_id: Uuid) {
        let removed = self
            .showings
            .write()
            .expect("ledger lock poisoned")
            .remove(&showing_id);
        if let Some(entry) = removed {
            let ledger = entry.lock().await;
            let mut index = self.index.write().expect("ledger lock poisoned");
            for id in ledger.bookings.keys() {
                index.remove(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn booking(showing_id: Uuid, seat_id: Uuid) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            showing_id,
            seat_id,
            ticket_number: format!("TKT-{}", Uuid::new_v4().simple()),
            price: Decimal::from(10),
            created_at: Utc::now(),
            cancelled_at: None,
        }
    }

    fn ledger() -> ReservationLedger {
        ReservationLedger::new(Duration::from_millis(250))
    }

    #[tokio::test]
    async fn commit_rejects_batch_when_any_seat_is_taken() {
        let ledger = ledger();
        let showing = Uuid::new_v4();
        let (seat_a, seat_b) = (Uuid::new_v4(), Uuid::new_v4());

        ledger
            .try_commit(vec![booking(showing, seat_b)])
            .await
            .unwrap();

        let err = ledger
            .try_commit(vec![booking(showing, seat_a), booking(showing, seat_b)])
            .await
            .unwrap_err();
        assert_eq!(err, AppError::SeatUnavailable(vec![seat_b]));

        // seat A was not partially committed
        let active = ledger.active_seats(showing).await.unwrap();
        assert!(!active.contains(&seat_a));
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn cancellation_frees_the_seat_and_is_idempotent() {
        let ledger = ledger();
        let showing = Uuid::new_v4();
        let seat = Uuid::new_v4();

        let committed = ledger
            .try_commit(vec![booking(showing, seat)])
            .await
            .unwrap();
        let booking_id = committed[0].id;

        let first = ledger.cancel(booking_id).await.unwrap();
        let stamp = first.cancelled_at.unwrap();

        // second cancel succeeds and keeps the original timestamp
        let second = ledger.cancel(booking_id).await.unwrap();
        assert_eq!(second.cancelled_at, Some(stamp));

        assert!(ledger.active_seats(showing).await.unwrap().is_empty());

        // the seat can be booked again
        assert!(ledger.try_commit(vec![booking(showing, seat)]).await.is_ok());
    }

    #[tokio::test]
    async fn cancelling_an_unknown_booking_is_not_found() {
        let err = ledger().cancel(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn held_showing_lock_surfaces_as_busy() {
        let ledger = ReservationLedger::new(Duration::from_millis(20));
        let showing = Uuid::new_v4();

        let entry = ledger.entry(showing);
        let _guard = entry.lock().await;

        let err = ledger
            .try_commit(vec![booking(showing, Uuid::new_v4())])
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Busy);
    }

    #[tokio::test]
    async fn showings_do_not_contend_with_each_other() {
        let ledger = ReservationLedger::new(Duration::from_millis(20));
        let blocked = Uuid::new_v4();
        let free = Uuid::new_v4();

        let entry = ledger.entry(blocked);
        let _guard = entry.lock().await;

        // a different showing commits while the first one's lock is held
        assert!(ledger
            .try_commit(vec![booking(free, Uuid::new_v4())])
            .await
            .is_ok());
    }
}
