//! PostgreSQL persistence adapters for the driven ports.

mod diesel_activity_counter;
mod diesel_consultant_roster;
mod diesel_error_mapping;
mod diesel_reservation_log;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_activity_counter::DieselDailyActivityCounter;
pub use diesel_consultant_roster::DieselConsultantRoster;
pub use diesel_reservation_log::DieselReservationLog;
pub use pool::{DbPool, PoolConfig, PoolError};
