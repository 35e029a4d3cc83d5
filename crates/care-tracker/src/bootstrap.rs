use std::path::{Path, PathBuf};

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use care_core::error::Result;
use care_core::settings::Settings;
use care_data::reader::{locate_input, InputKind};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Unrecognised names fall back to `"info"`.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" | "WARN" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber, writing to stderr so that
/// rendered reports on stdout stay machine-readable.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))?;

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Input discovery ────────────────────────────────────────────────────────────

/// Resolved locations of the four inputs of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub infant_profile: PathBuf,
    pub parent_profile: PathBuf,
    pub infant_log: Option<PathBuf>,
    pub parent_log: Option<PathBuf>,
}

/// Locate every input from the explicit overrides and the data directories.
///
/// Fails when either profile cannot be found; a missing event log resolves
/// to `None`.
pub fn resolve_inputs(settings: &Settings) -> Result<InputPaths> {
    let dirs = settings.data_dir_candidates();
    debug!("Searching for inputs in {:?}", dirs);

    let required = |kind: InputKind, explicit: Option<&Path>| -> Result<PathBuf> {
        locate_input(kind, explicit, &dirs)?.ok_or_else(|| {
            care_core::CareError::MissingInput {
                kind: kind.label().to_string(),
                candidates: kind.candidates().join(", "),
            }
        })
    };

    Ok(InputPaths {
        infant_profile: required(InputKind::InfantProfile, settings.infant_profile.as_deref())?,
        parent_profile: required(InputKind::ParentProfile, settings.parent_profile.as_deref())?,
        infant_log: locate_input(
            InputKind::InfantLog,
            settings.infant_log.as_deref(),
            &dirs,
        )?,
        parent_log: locate_input(
            InputKind::ParentLog,
            settings.parent_log.as_deref(),
            &dirs,
        )?,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
