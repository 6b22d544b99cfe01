//! Core business logic for RateIt.

pub mod services;

pub use services::*;
