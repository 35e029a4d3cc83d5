//! Data layer for the care tracker.
//!
//! Parses profile and event-log files, decodes each log row into a typed
//! event, aggregates one pass per subject and derives the structured
//! reports with their health advisories.

pub mod aggregator;
pub mod analysis;
pub mod events;
pub mod profile;
pub mod reader;
pub mod record;

pub use care_core as core;
