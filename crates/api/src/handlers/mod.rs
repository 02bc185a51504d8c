pub mod calendar;
pub mod requests;
pub mod reservations;
