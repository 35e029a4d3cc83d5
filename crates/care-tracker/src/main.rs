mod bootstrap;

use anyhow::{Context, Result};
use tracing::{info, warn};

use care_core::models::{InfantProfile, ParentProfile};
use care_core::settings::Settings;
use care_data::analysis::{analyze_infant_log, analyze_parent_log, CareReport};
use care_data::profile::{load_profile_with, BlankValuePolicy, ProfileRecord};
use care_data::reader::{read_input, read_log};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    info!("Care Tracker v{} starting", env!("CARGO_PKG_VERSION"));

    let output = run(&settings)?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Load both profiles, analyse whichever logs exist and render the report.
fn run(settings: &Settings) -> Result<String> {
    let inputs = bootstrap::resolve_inputs(settings)?;
    let ctx = settings.analysis_context();
    let limits = settings.display_limits();
    info!("Reference point: {}", ctx.now.format("%Y-%m-%d %H:%M"));

    let infant_policy = if settings.skip_blank_infant_values {
        BlankValuePolicy::Skip
    } else {
        InfantProfile::DEFAULT_BLANK_POLICY
    };
    let infant_profile: InfantProfile =
        load_profile_with(&read_input(&inputs.infant_profile)?, infant_policy)
            .with_context(|| format!("Failed to load {}", inputs.infant_profile.display()))?;
    let parent_profile: ParentProfile = load_profile_with(
        &read_input(&inputs.parent_profile)?,
        ParentProfile::DEFAULT_BLANK_POLICY,
    )
    .with_context(|| format!("Failed to load {}", inputs.parent_profile.display()))?;

    let mut report = CareReport::new(&ctx, infant_profile, parent_profile);

    match &inputs.infant_log {
        Some(path) => match read_log(path) {
            Ok(text) => {
                let infant = analyze_infant_log(&text, &report.infant_profile, &ctx, &limits)
                    .with_context(|| format!("Cannot analyse {}", path.display()))?;
                info!(
                    "Infant log: {} rows applied, {} advisories",
                    infant.stats.rows_applied,
                    infant.advisories.len()
                );
                report.infant = Some(infant);
            }
            Err(e) => warn!("Skipping infant analysis: {}", e),
        },
        None => warn!("No infant event log found; skipping infant analysis"),
    }

    match &inputs.parent_log {
        Some(path) => match read_log(path) {
            Ok(text) => {
                let parent = analyze_parent_log(&text, &report.parent_profile, &ctx, &limits);
                info!(
                    "Parent log: {} rows applied, {} advisories",
                    parent.stats.rows_applied,
                    parent.advisories.len()
                );
                report.parent = Some(parent);
            }
            Err(e) => warn!("Skipping parent analysis: {}", e),
        },
        None => warn!("No parent event log found; skipping parent analysis"),
    }

    if report.alert_count() > 0 {
        warn!("{} advisories need attention", report.alert_count());
    }

    if settings.wants_json() {
        Ok(care_report::render_json(&report)?)
    } else {
        Ok(care_report::render_text(&report))
    }
}
