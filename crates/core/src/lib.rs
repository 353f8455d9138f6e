//! Core business logic for pulse.

pub mod services;

pub use services::*;
