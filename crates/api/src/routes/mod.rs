pub mod calendar;
pub mod health;
pub mod requests;
pub mod reservations;
