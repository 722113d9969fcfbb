use std::net::SocketAddr;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking_backend::{
    config::Config,
    entities::{ScreenKind, SeatCategory},
    routes, AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinema_booking_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // Create app state and seed a demo catalog
    let state = AppState::new(config.clone());
    seed_catalog(&state);

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    // Start server
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

/// Seed one cinema with a screen, seat tiers and an evening showing so
/// the API is explorable out of the box.
fn seed_catalog(state: &AppState) {
    let catalog = &state.catalog;

    let city = catalog.add_city("Mumbai", "Maharashtra");
    let theater = catalog
        .add_theater("Regal Cinema", city.id)
        .expect("Failed to seed theater");

    let screen = catalog
        .add_screen(theater.id, "Audi 1", ScreenKind::TwoD, 5, 8)
        .expect("Failed to seed screen");

    let general = catalog
        .add_seat_type(theater.id, SeatCategory::General, 0)
        .expect("Failed to seed seat type");
    let vip = catalog
        .add_seat_type(theater.id, SeatCategory::Vip, 50)
        .expect("Failed to seed seat type");
    let couple = catalog
        .add_seat_type(theater.id, SeatCategory::Couple, 25)
        .expect("Failed to seed seat type");

    for row in 1..=5u32 {
        for column in 1..=8u32 {
            let seat_type = match row {
                1 => vip.id,
                2 => couple.id,
                _ => general.id,
            };
            catalog
                .add_seat(screen.id, seat_type, row, column)
                .expect("Failed to seed seat");
        }
    }

    let film = catalog
        .add_film("The Grand Escape", "action", 140, Some(Utc::now()))
        .expect("Failed to seed film");

    let showing = catalog
        .add_showing(
            screen.id,
            film.id,
            Decimal::from(200),
            Utc::now() + Duration::hours(6),
        )
        .expect("Failed to seed showing");

    tracing::info!(
        showing = %showing.id,
        film = %film.name,
        "Demo catalog seeded"
    );
}
