pub(crate) mod common;

mod agreement;
mod session;
mod submission;
