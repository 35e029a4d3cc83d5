//! Delimited-record parsing for profile and event-log lines.
//!
//! Lines are comma separated. A `"` toggles a quoted state in which commas
//! are literal; the quote characters themselves stay in the field text.

use std::str::FromStr;

/// Split one line into its fields.
///
/// Always yields at least one field: an empty line becomes `[""]`. Unbalanced
/// quotes are not an error; whatever has accumulated when the line ends is
/// emitted as the last field.
pub fn parse_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Strip an exact trailing `unit` suffix and trim the remainder.
///
/// Returns `None` when nothing is left, so `"ml"` alone is absent rather
/// than zero.
///
/// ```
/// use care_data::record::strip_unit;
///
/// assert_eq!(strip_unit("120ml", "ml"), Some("120"));
/// assert_eq!(strip_unit("120 ml", "ml"), Some("120"));
/// assert_eq!(strip_unit("ml", "ml"), None);
/// assert_eq!(strip_unit("3.4", "kg"), Some("3.4"));
/// ```
pub fn strip_unit<'a>(value: &'a str, unit: &str) -> Option<&'a str> {
    let value = value.trim();
    let stripped = value.strip_suffix(unit).unwrap_or(value).trim();
    (!stripped.is_empty()).then_some(stripped)
}

// ── EventRow ──────────────────────────────────────────────────────────────────

/// Index of the date column in every event log.
pub const DATE_COLUMN: usize = 0;
/// Index of the time-of-day column.
pub const TIME_COLUMN: usize = 1;
/// Index of the activity discriminator.
pub const ACTIVITY_COLUMN: usize = 2;

/// Minimum number of fields for a row to be considered at all.
pub const MIN_FIELDS: usize = 3;

/// The fields of one event-log line.
///
/// Column meaning beyond [`ACTIVITY_COLUMN`] depends on the activity; the
/// accessors here only deal with presence, trimming and conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    fields: Vec<String>,
}

impl EventRow {
    /// Parse a raw line. Returns `None` for blank lines and for rows with
    /// fewer than [`MIN_FIELDS`] fields.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let fields = parse_record(line);
        if fields.len() < MIN_FIELDS {
            return None;
        }
        Some(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The raw date column, trimmed.
    pub fn date(&self) -> &str {
        self.raw(DATE_COLUMN)
    }

    /// The raw time column, trimmed (may be empty).
    pub fn time(&self) -> &str {
        self.raw(TIME_COLUMN)
    }

    /// The activity discriminator, trimmed.
    pub fn activity(&self) -> &str {
        self.raw(ACTIVITY_COLUMN)
    }

    /// Trimmed text of column `index`; `None` when the column is missing or
    /// blank.
    pub fn text(&self, index: usize) -> Option<&str> {
        let value = self.raw(index);
        (!value.is_empty()).then_some(value)
    }

    /// Column `index` parsed as `T`; `None` when absent, blank or
    /// unparsable.
    pub fn number<T: FromStr>(&self, index: usize) -> Option<T> {
        self.text(index)?.parse().ok()
    }

    /// Column `index` with an optional trailing `unit` removed, parsed as a
    /// float.
    pub fn quantity(&self, index: usize, unit: &str) -> Option<f64> {
        strip_unit(self.text(index)?, unit)?.parse().ok()
    }

    fn raw(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.trim()).unwrap_or("")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
