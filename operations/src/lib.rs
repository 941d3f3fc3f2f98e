#[macro_use]
mod macros;

pub mod airports;
pub mod atc;
pub mod errors;
pub mod fleet;
pub mod live_flights;
pub mod notifications;
pub mod personnel;
pub mod profile;
pub mod schedule;
pub mod session;
pub mod settings;
