//! Concurrency properties: seat exclusivity under racing reservations.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Barrier;
use uuid::Uuid;

use cinema_booking_backend::entities::{ScreenKind, SeatCategory};
use cinema_booking_backend::{AppError, AppState, Config};

fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        reserve_lock_timeout_ms: 2_000,
    }
}

struct Cinema {
    state: AppState,
    showing: Uuid,
    seats: Vec<Uuid>,
}

fn cinema(rows: u32, columns: u32) -> Cinema {
    let state = AppState::new(test_config());
    let catalog = &state.catalog;

    let city = catalog.add_city("Mumbai", "Maharashtra");
    let theater = catalog.add_theater("Regal Cinema", city.id).unwrap();
    let screen = catalog
        .add_screen(theater.id, "Audi 1", ScreenKind::ThreeD, rows, columns)
        .unwrap();
    let vip = catalog.add_seat_type(theater.id, SeatCategory::Vip, 50).unwrap();

    let mut seats = Vec::new();
    for row in 1..=rows {
        for column in 1..=columns {
            seats.push(catalog.add_seat(screen.id, vip.id, row, column).unwrap().id);
        }
    }

    let film = catalog.add_film("The Grand Escape", "action", 140, None).unwrap();
    let showing = catalog
        .add_showing(screen.id, film.id, Decimal::from(200), Utc::now())
        .unwrap();

    Cinema {
        showing: showing.id,
        seats,
        state,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn fifty_racing_reservations_for_one_seat_yield_one_winner() {
    let c = cinema(1, 1);
    let seat = c.seats[0];
    let barrier = Arc::new(Barrier::new(50));

    let mut handles = Vec::new();
    for _ in 0..50 {
        let engine = c.state.engine.clone();
        let barrier = barrier.clone();
        let showing = c.showing;
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            engine.reserve(showing, &[seat]).await
        }));
    }

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(bookings) => {
                assert_eq!(bookings.len(), 1);
                winners += 1;
            }
            Err(AppError::SeatUnavailable(seats)) => {
                assert_eq!(seats, vec![seat]);
                conflicts += 1;
            }
            Err(other) => panic!("unexpected failure: {other:?}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 49);

    // the ledger holds exactly one active booking for the seat
    let bookings = c
        .state
        .engine
        .bookings_for_showing(c.showing)
        .await
        .unwrap();
    assert_eq!(bookings.iter().filter(|b| b.is_active()).count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn overlapping_multi_seat_requests_never_both_win_the_shared_seat() {
    let c = cinema(1, 3);
    let (a, shared, b) = (c.seats[0], c.seats[1], c.seats[2]);
    let barrier = Arc::new(Barrier::new(2));

    let spawn = |seats: Vec<Uuid>| {
        let engine = c.state.engine.clone();
        let barrier = barrier.clone();
        let showing = c.showing;
        tokio::spawn(async move {
            barrier.wait().await;
            engine.reserve(showing, &seats).await
        })
    };

    let left = spawn(vec![a, shared]);
    let right = spawn(vec![shared, b]);

    let results = [left.await.unwrap(), right.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one of the overlapping requests wins");

    let loser = results.iter().find(|r| r.is_err()).unwrap();
    match loser {
        Err(AppError::SeatUnavailable(seats)) => assert!(seats.contains(&shared)),
        other => panic!("loser should see the shared seat as taken, got {other:?}"),
    }

    // the loser's non-shared seat stayed free (all-or-nothing)
    let available: HashSet<Uuid> = c
        .state
        .engine
        .available_seats(c.showing)
        .await
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(available.len(), 1);
    assert!(available.contains(&a) || available.contains(&b));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn reservations_for_different_showings_do_not_interfere() {
    let state = AppState::new(test_config());
    let catalog = &state.catalog;

    let city = catalog.add_city("Mumbai", "Maharashtra");
    let theater = catalog.add_theater("Regal Cinema", city.id).unwrap();
    let general = catalog
        .add_seat_type(theater.id, SeatCategory::General, 0)
        .unwrap();
    let film = catalog.add_film("The Grand Escape", "action", 140, None).unwrap();

    // one single-seat screen and showing per task
    let mut targets = Vec::new();
    for i in 0..20 {
        let screen = catalog
            .add_screen(theater.id, &format!("Audi {i}"), ScreenKind::TwoD, 1, 1)
            .unwrap();
        let seat = catalog.add_seat(screen.id, general.id, 1, 1).unwrap();
        let showing = catalog
            .add_showing(screen.id, film.id, Decimal::from(100), Utc::now())
            .unwrap();
        targets.push((showing.id, seat.id));
    }

    let barrier = Arc::new(Barrier::new(targets.len()));
    let mut handles = Vec::new();
    for (showing, seat) in targets {
        let engine = state.engine.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            engine.reserve(showing, &[seat]).await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
}
