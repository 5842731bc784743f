pub mod admin;
pub mod auth;
pub mod baggage;
pub mod bookings;
pub mod flights;
pub mod payments;
