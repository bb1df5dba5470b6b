//! Booking an engineer: contact details, service type, location lookup and scheduling.

pub mod router;
pub mod service;


pub use router::booking_router;
pub use service::{BookingService, BookingView, LocationRequestOutcome};
