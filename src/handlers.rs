pub mod auth;
pub mod bookings;
pub mod contact;
pub mod crud;
pub mod destinations;
pub mod media;
pub mod public;
pub mod regions;
pub mod tours;
pub mod users;
