use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CareError, Result};

/// Date format used by every input file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day format used by the event logs.
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| CareError::DateParse(format!("{s:?}: {e}")))
}

/// Parse an `HH:MM` time of day.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|e| CareError::TimeParse(format!("{s:?}: {e}")))
}

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve a timezone setting into a [`Tz`].
///
/// `"auto"` selects the system timezone. Unknown names fall back to UTC with
/// a warning.
pub fn resolve_timezone(name: &str) -> Tz {
    let name = if name.eq_ignore_ascii_case("auto") {
        get_system_timezone()
    } else {
        name.to_string()
    };
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!("unrecognised timezone \"{}\", falling back to UTC", name);
        Tz::UTC
    })
}

/// The current wall-clock date and time in `tz`.
pub fn local_now(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

// ── AnalysisContext ───────────────────────────────────────────────────────────

/// The single external input the analysis engine depends on besides its files:
/// which day counts as "today" and what time it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub today: NaiveDate,
    pub now: NaiveDateTime,
}

impl AnalysisContext {
    /// Build a context for an explicit date and time.
    pub fn new(today: NaiveDate, now: NaiveTime) -> Self {
        Self {
            today,
            now: today.and_time(now),
        }
    }

    /// Context for `today` with the clock at the last minute of the day.
    pub fn end_of_day(today: NaiveDate) -> Self {
        Self::new(today, NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default())
    }

    /// Context taken from the wall clock in `tz`.
    pub fn from_clock(tz: Tz) -> Self {
        let now = local_now(tz);
        Self {
            today: now.date(),
            now,
        }
    }

    pub fn yesterday(&self) -> NaiveDate {
        self.today - Duration::days(1)
    }

    /// Earliest date that still counts as "this week" (inclusive).
    pub fn week_start(&self) -> NaiveDate {
        self.today - Duration::days(7)
    }

    /// Classify `date` relative to this context.
    pub fn scope_of(&self, date: NaiveDate) -> DateScope {
        DateScope {
            today: date == self.today,
            yesterday: date == self.yesterday(),
            this_week: date >= self.week_start(),
        }
    }

    /// Whole days from `start` to the reference date (negative if `start` is
    /// in the future).
    pub fn days_since(&self, start: NaiveDate) -> i64 {
        (self.today - start).num_days()
    }

    /// Whole hours (truncated) from `moment` to the reference time.
    pub fn hours_since(&self, moment: NaiveDateTime) -> i64 {
        (self.now - moment).num_hours()
    }
}

/// Which date-scoped buckets a row falls into.
///
/// `this_week` is open-ended: any date on or after [`AnalysisContext::week_start`]
/// counts, including dates after the reference date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateScope {
    pub today: bool,
    pub yesterday: bool,
    pub this_week: bool,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
