pub mod booking;
pub mod city;
pub mod film;
pub mod screen;
pub mod seat;
pub mod showing;
pub mod theater;

pub use booking::Booking;
pub use city::City;
pub use film::{Film, Review};
pub use screen::{Screen, ScreenKind};
pub use seat::{Seat, SeatCategory, SeatType};
pub use showing::Showing;
pub use theater::Theater;
