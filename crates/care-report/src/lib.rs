//! Output layer for care reports.
//!
//! A [`CareReport`] is rendered either as sectioned, column-aligned text for
//! the terminal or as pretty-printed JSON for other tools.

pub mod layout;
pub mod text_view;

use care_core::error::Result;
use care_data::analysis::CareReport;

pub use text_view::render_text;

/// Serialize the full report as pretty-printed JSON.
pub fn render_json(report: &CareReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
