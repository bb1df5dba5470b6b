//! Registering as an engineer: profile, degree certificate and the engineer agreement.

pub mod router;
pub mod service;


pub use router::registration_router;
pub use service::{RegistrationService, RegistrationView};
