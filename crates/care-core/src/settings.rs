use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::time_utils::{self, AnalysisContext};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Mother & baby care tracker: statistics and health advisories from CSV logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "care-tracker",
    about = "Statistics and health advisories from mother & baby CSV logs",
    version
)]
pub struct Settings {
    /// Directory holding the profile and event-log files
    #[arg(long, env = "CARE_TRACKER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Infant profile file (overrides discovery)
    #[arg(long)]
    pub infant_profile: Option<PathBuf>,

    /// Parent profile file (overrides discovery)
    #[arg(long)]
    pub parent_profile: Option<PathBuf>,

    /// Infant event log (overrides discovery)
    #[arg(long)]
    pub infant_log: Option<PathBuf>,

    /// Parent event log (overrides discovery)
    #[arg(long)]
    pub parent_log: Option<PathBuf>,

    /// Date treated as "today" (YYYY-MM-DD); defaults to the current date
    #[arg(long, value_parser = parse_reference_date)]
    pub reference_date: Option<NaiveDate>,

    /// Time of day paired with the reference date (HH:MM)
    #[arg(long, value_parser = parse_reference_time)]
    pub reference_time: Option<NaiveTime>,

    /// Timezone used to resolve the current date (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Treat blank infant profile values as "not provided" instead of failing
    #[arg(long)]
    pub skip_blank_infant_values: bool,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Number of special memories listed in the report
    #[arg(long, default_value = "10")]
    pub memory_display_limit: usize,

    /// Number of doctor appointments listed in the report
    #[arg(long, default_value = "3")]
    pub appointment_display_limit: usize,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── DisplayLimits ──────────────────────────────────────────────────────────────

/// Caps applied to sample lists when a report is built.
///
/// Limits only shorten what is listed; counts always reflect every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLimits {
    pub memories: usize,
    pub appointments: usize,
}

impl Default for DisplayLimits {
    fn default() -> Self {
        Self {
            memories: 10,
            appointments: 3,
        }
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`load`](Self::load) but with an explicit argument list.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = time_utils::get_system_timezone();
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// Build the date/time context the analysis runs against.
    ///
    /// * With `--reference-date`, that date is used; the time is
    ///   `--reference-time`, the current clock time when the date is today,
    ///   or 23:59 for any other date.
    /// * Without it, the wall clock in the configured timezone is used
    ///   (optionally overriding the time of day).
    pub fn analysis_context(&self) -> AnalysisContext {
        let tz = time_utils::resolve_timezone(&self.timezone);
        let clock = AnalysisContext::from_clock(tz);

        match (self.reference_date, self.reference_time) {
            (Some(date), Some(time)) => AnalysisContext::new(date, time),
            (Some(date), None) if date == clock.today => clock,
            (Some(date), None) => AnalysisContext::end_of_day(date),
            (None, Some(time)) => AnalysisContext::new(clock.today, time),
            (None, None) => clock,
        }
    }

    /// Directories searched for input files, in priority order.
    ///
    /// An explicit `--data-dir` is the only candidate. Otherwise the working
    /// directory is tried first, then `~/.care-tracker`, then the platform
    /// data directory.
    pub fn data_dir_candidates(&self) -> Vec<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return vec![dir.clone()];
        }

        let mut dirs_out = vec![PathBuf::from(".")];
        if let Some(home) = dirs::home_dir() {
            dirs_out.push(home.join(".care-tracker"));
        }
        if let Some(data) = dirs::data_dir() {
            dirs_out.push(data.join("care-tracker"));
        }
        dirs_out
    }

    pub fn display_limits(&self) -> DisplayLimits {
        DisplayLimits {
            memories: self.memory_display_limit,
            appointments: self.appointment_display_limit,
        }
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Value parsers ──────────────────────────────────────────────────────────────

fn parse_reference_date(s: &str) -> Result<NaiveDate, String> {
    time_utils::parse_date(s).map_err(|e| e.to_string())
}

fn parse_reference_time(s: &str) -> Result<NaiveTime, String> {
    time_utils::parse_time(s).map_err(|e| e.to_string())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        time_utils::parse_date(s).unwrap()
    }

    // ── test_settings_default_values ─────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["care-tracker"]);

        assert!(settings.infant_profile.is_none());
        assert!(settings.parent_log.is_none());
        assert!(settings.reference_date.is_none());
        assert!(settings.reference_time.is_none());
        assert_eq!(settings.timezone, "auto");
        assert!(!settings.skip_blank_infant_values);
        assert_eq!(settings.format, "text");
        assert_eq!(settings.memory_display_limit, 10);
        assert_eq!(settings.appointment_display_limit, 3);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
        assert_eq!(settings.display_limits(), DisplayLimits::default());
    }

    // ── test_settings_cli_parsing ─────────────────────────────────────────────

    #[test]
    fn test_settings_cli_reference_date() {
        let settings = Settings::parse_from(["care-tracker", "--reference-date", "2024-06-10"]);
        assert_eq!(settings.reference_date, Some(date("2024-06-10")));
    }

    #[test]
    fn test_settings_cli_rejects_bad_reference_date() {
        let result = Settings::try_parse_from(["care-tracker", "--reference-date", "10/06/2024"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_rejects_unknown_format() {
        let result = Settings::try_parse_from(["care-tracker", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_cli_paths() {
        let settings = Settings::parse_from([
            "care-tracker",
            "--data-dir",
            "/tmp/care",
            "--infant-log",
            "/tmp/care/baby.csv",
        ]);
        assert_eq!(settings.data_dir, Some(PathBuf::from("/tmp/care")));
        assert_eq!(settings.infant_log, Some(PathBuf::from("/tmp/care/baby.csv")));
    }

    #[test]
    fn test_data_dir_candidates_explicit() {
        let settings = Settings::parse_from(["care-tracker", "--data-dir", "/srv/care"]);
        assert_eq!(settings.data_dir_candidates(), vec![PathBuf::from("/srv/care")]);
    }

    #[test]
    fn test_data_dir_candidates_default_starts_with_cwd() {
        let settings = Settings::parse_from(["care-tracker"]);
        let candidates = settings.data_dir_candidates();
        assert_eq!(candidates[0], PathBuf::from("."));
    }

    #[test]
    fn test_settings_json_format() {
        let settings = Settings::parse_from(["care-tracker", "--format", "json"]);
        assert!(settings.wants_json());
    }

    // ── resolve_auto_values ───────────────────────────────────────────────────

    #[test]
    fn test_load_debug_overrides_log_level() {
        let settings = Settings::load_from_args(vec!["care-tracker".into(), "--debug".into()]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_resolves_auto_timezone() {
        let settings = Settings::load_from_args(vec!["care-tracker".into()]);
        assert_ne!(settings.timezone, "auto");
    }

    // ── analysis_context ──────────────────────────────────────────────────────

    #[test]
    fn test_analysis_context_explicit_date_and_time() {
        let settings = Settings::parse_from([
            "care-tracker",
            "--reference-date",
            "2024-06-10",
            "--reference-time",
            "08:15",
            "--timezone",
            "UTC",
        ]);
        let ctx = settings.analysis_context();
        assert_eq!(ctx.today, date("2024-06-10"));
        assert_eq!(ctx.now.time(), NaiveTime::from_hms_opt(8, 15, 0).unwrap());
    }

    #[test]
    fn test_analysis_context_past_date_uses_end_of_day() {
        let settings = Settings::parse_from([
            "care-tracker",
            "--reference-date",
            "2001-02-03",
            "--timezone",
            "UTC",
        ]);
        let ctx = settings.analysis_context();
        assert_eq!(ctx, AnalysisContext::end_of_day(date("2001-02-03")));
    }

    #[test]
    fn test_analysis_context_time_only() {
        let settings = Settings::parse_from([
            "care-tracker",
            "--reference-time",
            "06:00",
            "--timezone",
            "UTC",
        ]);
        let ctx = settings.analysis_context();
        assert_eq!(ctx.now.time(), NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(ctx.now.date(), ctx.today);
    }
}
