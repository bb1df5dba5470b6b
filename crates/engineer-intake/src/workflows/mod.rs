pub mod booking;
pub mod intake;
pub mod registration;
