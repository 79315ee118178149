//! Domain Model
//!
//! Entities and value objects of the reservation domain. Everything here is
//! storage-agnostic; persistence shapes live in [`crate::db`].

pub mod booking;
pub mod capacity;
pub mod duration;
pub mod error;
pub mod interval;
pub mod restaurant;
pub mod window;

pub use booking::{Booking, BookingStatus};
pub use capacity::CapacityRange;
pub use duration::{Duration, SLOT_MINUTES};
pub use error::{DomainError, DomainResult};
pub use interval::TimeInterval;
pub use restaurant::{DiningTable, Restaurant, Sector};
pub use window::ServiceWindow;
