//! Core types for the care tracker.
//!
//! Profiles, the error type, settings, date handling, derived-metric
//! arithmetic and the advisory rules shared by the data and report crates.

pub mod advisories;
pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{CareError, Result};
