use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{admin, booking, catalog};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public exploration routes (films, showtimes, directory)
    let public_routes = Router::new()
        .route("/cities", get(catalog::list_cities))
        .route("/theaters", get(catalog::list_theaters))
        .route("/films", get(catalog::list_films))
        .route("/films/{id}/showings", get(catalog::film_showtimes))
        .route("/films/{id}/reviews", get(catalog::list_reviews))
        .route("/films/{id}/reviews", post(catalog::create_review))
        .route("/showings/{id}/seats", get(booking::available_seats))
        .route(
            "/showings/{showing_id}/price/{seat_id}",
            get(booking::price_for),
        );

    // Booking routes
    let booking_routes = Router::new()
        .route("/", post(booking::reserve))
        .route("/{id}", get(booking::get_booking))
        .route("/{id}", delete(booking::cancel_booking));

    // Admin routes (show administration, directory management)
    let admin_routes = Router::new()
        .route("/cities", post(admin::create_city))
        .route("/theaters", post(admin::create_theater))
        .route("/seat-types", post(admin::create_seat_type))
        .route("/screens", post(admin::create_screen))
        .route("/films", post(admin::create_film))
        .route("/showings", post(admin::create_showing))
        .route("/showings/{id}", delete(admin::delete_showing))
        .route("/showings/{id}/bookings", get(admin::showing_bookings));

    Router::new()
        .nest("/api", public_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
}
