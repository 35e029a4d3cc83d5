//! Sectioned plain-text rendering of a [`CareReport`].

use care_core::advisories::{
    ExerciseStatus, HydrationStatus, ParentSleepStatus, TemperatureStatus, WeightGainStatus,
    WEEKLY_EXERCISE_GOAL_MINUTES,
};
use care_core::formatting::{format_age, format_minutes, format_number, format_quantity, format_signed};
use care_core::models::{InfantProfile, ParentProfile, ParentStatus};
use care_data::aggregator::FrequencyTable;
use care_data::analysis::{CareReport, GrowthTrend, InfantReport, ParentReport, SampleSummary};

use crate::layout::{build_bar, Section, BAR_WIDTH};

/// Render the whole report as text, ending with the advisory summary.
pub fn render_text(report: &CareReport) -> String {
    let mut sections = vec![
        header(report),
        infant_profile_section(&report.infant_profile, report),
        parent_profile_section(&report.parent_profile, report),
    ];

    match &report.infant {
        Some(infant) if infant.has_data => sections.extend(infant_sections(infant)),
        Some(_) => sections.push(notice("👶", "Baby activity", "No events recorded yet")),
        None => sections.push(notice("👶", "Baby activity", "No event log found")),
    }
    match &report.parent {
        Some(parent) if parent.has_data => sections.extend(parent_sections(parent)),
        Some(_) => sections.push(notice("🤱", "Parent activity", "No events recorded yet")),
        None => sections.push(notice("🤱", "Parent activity", "No event log found")),
    }
    sections.push(advisory_section(report));

    sections
        .iter()
        .filter(|s| !s.is_empty())
        .map(Section::render)
        .collect::<Vec<_>>()
        .join("\n")
}

fn header(report: &CareReport) -> Section {
    let mut section = Section::new("📋", "Care report");
    section
        .row("Date", report.reference_date.format("%A, %B %-d, %Y").to_string())
        .row("Time", report.reference_time.format("%H:%M").to_string());
    section
}

fn notice(icon: &'static str, title: &str, text: &str) -> Section {
    let mut section = Section::new(icon, title);
    section.item(text);
    section
}

// ── Profiles ──────────────────────────────────────────────────────────────────

fn infant_profile_section(profile: &InfantProfile, report: &CareReport) -> Section {
    let mut section = Section::new("👶", "Baby");
    section
        .row_opt("Name", profile.name.clone())
        .row_opt("Born", profile.birth_date.map(|d| d.to_string()))
        .row_opt("Age", report.infant_age.as_ref().map(format_age))
        .row_opt("Gender", profile.gender.clone())
        .row_opt("Blood type", profile.blood_type.clone())
        .row_opt("Birth weight", profile.birth_weight_kg.map(|kg| format_quantity(kg, 2, "kg")))
        .row_opt("Birth height", profile.birth_height_cm.map(|cm| format_quantity(cm, 1, "cm")))
        .row_opt(
            "Head circumference",
            profile
                .birth_head_circumference_cm
                .map(|cm| format_quantity(cm, 1, "cm")),
        )
        .row_opt("Notes", profile.notes.clone());
    section
}

fn parent_profile_section(profile: &ParentProfile, report: &CareReport) -> Section {
    let mut section = Section::new("🤰", "Parent");
    section
        .row_opt("Name", profile.name.clone())
        .row_opt("Status", report.parent_status.as_ref().map(describe_status))
        .row_opt("Due date", profile.expected_due_date.map(|d| d.to_string()))
        .row_opt("Delivered", profile.delivery_date.map(|d| d.to_string()))
        .row_opt("Delivery type", profile.delivery_type.clone())
        .row_opt("BMI", report.parent_bmi.map(|bmi| format_number(bmi, 1)))
        .row_opt("Blood type", profile.blood_type.clone())
        .row_opt("Doctor", profile.doctor_name.clone())
        .row_opt("Doctor phone", profile.doctor_phone.clone())
        .row_opt("Hospital", profile.hospital.clone())
        .row_opt("Allergies", profile.allergies.clone())
        .row_opt("Conditions", profile.chronic_conditions.clone());
    section
}

fn describe_status(status: &ParentStatus) -> String {
    match *status {
        ParentStatus::Pregnant {
            week,
            day,
            trimester,
            days_until_due,
        } => {
            let mut text = format!("Pregnant, week {week} day {day} (trimester {trimester})");
            if let Some(days) = days_until_due {
                text.push_str(&format!(", {days} days until due"));
            }
            text
        }
        ParentStatus::Postpartum { weeks, days } => {
            format!("Postpartum, {weeks} weeks ({days} days)")
        }
    }
}

// ── Infant ────────────────────────────────────────────────────────────────────

fn infant_sections(report: &InfantReport) -> Vec<Section> {
    let mut sections = Vec::new();

    let feeding = &report.feeding;
    let mut section = Section::new("🍼", "Feeding");
    section
        .row("Today", feeding.counts.today.to_string())
        .row("Yesterday", feeding.counts.yesterday.to_string())
        .row("This week", feeding.counts.this_week.to_string())
        .row("Average per day", format_number(feeding.per_day, 1))
        .row_opt(
            "Last feeding",
            feeding.last_feeding.map(|at| at.format("%Y-%m-%d %H:%M").to_string()),
        )
        .row_opt("Hours since last", feeding.hours_since_last.map(|h| h.to_string()));
    frequency_items(&mut section, &feeding.types);
    sections.push(section);

    let sleep = &report.sleep;
    let mut section = Section::new("😴", "Sleep");
    let pct = sleep.avg_hours_per_day / sleep.recommended_hours * 100.0;
    section
        .row("Today", format_quantity(sleep.today_hours, 1, "h"))
        .row("Average per day", format_quantity(sleep.avg_hours_per_day, 1, "h"))
        .row(
            "Recommended",
            format!(
                "{} [{}]",
                format_quantity(sleep.recommended_hours, 0, "h"),
                build_bar(pct, BAR_WIDTH)
            ),
        )
        .row("Sessions", sleep.sessions.to_string());
    if let Some(dist) = &sleep.session_minutes {
        section
            .row("Median session", format_minutes(dist.median))
            .row("90th percentile", format_minutes(dist.p90));
    }
    frequency_items(&mut section, &sleep.quality);
    sections.push(section);

    let diapers = &report.diapers;
    let mut section = Section::new("🧷", "Diapers");
    section
        .row("Today", diapers.today.to_string())
        .row("Total", diapers.total.to_string())
        .row("Average per day", format_number(diapers.per_day, 1));
    frequency_items(&mut section, &diapers.types);
    sections.push(section);

    if let Some(temp) = &report.temperature {
        let mut section = Section::new("🌡️", "Temperature");
        section
            .row("Readings", temp.readings.to_string())
            .row("Average", format_quantity(temp.average, 1, "°C"))
            .row_opt("Lowest", temp.min.map(|c| format_quantity(c, 1, "°C")))
            .row_opt("Highest", temp.max.map(|c| format_quantity(c, 1, "°C")))
            .row("Status", temperature_label(temp.status));
        sections.push(section);
    }

    if let Some(mood) = &report.mood {
        let mut section = Section::new("😊", "Mood");
        section
            .row("Observations", mood.observations.to_string())
            .row("Fussy or crying", mood.fussy_or_crying.to_string());
        frequency_items(&mut section, &mood.moods);
        sections.push(section);
    }

    if let Some(growth) = &report.growth {
        let mut section = Section::new("📈", "Growth");
        section
            .row_opt("Weight", growth.weight_kg.as_ref().map(|t| describe_trend(t, 2, "kg")))
            .row_opt("Height", growth.height_cm.as_ref().map(|t| describe_trend(t, 1, "cm")));
        sections.push(section);
    }

    if let Some(pumping) = &report.pumping {
        let mut section = Section::new("🥛", "Pumping");
        section
            .row("Sessions", pumping.sessions.to_string())
            .row("Total", format_quantity(pumping.total_ml, 0, "ml"))
            .row("Per session", format_quantity(pumping.avg_ml_per_session, 0, "ml"));
        sections.push(section);
    }

    let mut section = Section::new("💉", "Health");
    section
        .row("Vaccines", report.vaccines.total.to_string())
        .row("Doctor visits", report.doctor_visits.to_string());
    sample_items(&mut section, &report.vaccines);
    sections.push(section);

    if report.milestones.total > 0 {
        let mut section = Section::new("🌟", "Milestones");
        section.row("Recorded", report.milestones.total.to_string());
        sample_items(&mut section, &report.milestones);
        sections.push(section);
    }

    if report.memories.total > 0 {
        let mut section = Section::new("📸", "Memories");
        section.row("Recorded", report.memories.total.to_string());
        sample_items(&mut section, &report.memories);
        sections.push(section);
    }

    sections
}

fn temperature_label(status: TemperatureStatus) -> &'static str {
    match status {
        TemperatureStatus::Normal => "Normal",
        TemperatureStatus::Elevated => "Elevated",
        TemperatureStatus::Fever => "Fever",
    }
}

fn describe_trend(trend: &GrowthTrend, decimals: u32, unit: &str) -> String {
    let mut text = format_quantity(trend.current, decimals, unit);
    if let Some(gain) = trend.gain {
        text.push_str(&format!(" ({} {unit} since birth", format_signed(gain, decimals)));
        if let Some(pct) = trend.gain_percent {
            text.push_str(&format!(", {}%", format_signed(pct, 1)));
        }
        text.push(')');
    }
    text
}

// ── Parent ────────────────────────────────────────────────────────────────────

fn parent_sections(report: &ParentReport) -> Vec<Section> {
    let mut sections = Vec::new();

    if let Some(weight) = &report.weight {
        let mut section = Section::new("⚖️", "Weight");
        section
            .row("Entries", weight.entries.to_string())
            .row("Average gain", format_quantity(weight.average_gain_kg, 2, "kg"))
            .row_opt("Lowest", weight.min_kg.map(|kg| format_quantity(kg, 1, "kg")))
            .row_opt("Highest", weight.max_kg.map(|kg| format_quantity(kg, 1, "kg")))
            .row_opt(
                "Total gain",
                weight.total_gain_kg.map(|kg| format!("{} kg", format_signed(kg, 1))),
            )
            .row_opt("Recommended", weight.status.as_ref().map(describe_weight_status));
        sections.push(section);
    }

    let medical = &report.medical;
    let mut section = Section::new("🩺", "Medical");
    section
        .row("Doctor visits", medical.doctor_visits.to_string())
        .row("Tests completed", medical.tests_completed.to_string())
        .row("Postpartum checkups", medical.postpartum_checkups.to_string());
    sample_items(&mut section, &medical.recent_appointments);
    sample_items(&mut section, &medical.tests);
    sections.push(section);

    if let Some(mood) = &report.mood {
        let mut section = Section::new("💭", "Mood");
        section
            .row("Scored entries", mood.entries.to_string())
            .row_opt(
                "Average score",
                mood.average_score.map(|s| format!("{}/10", format_number(s, 1))),
            )
            .row_opt("Status", mood.status.map(|s| s.label().to_string()));
        frequency_items(&mut section, &mood.types);
        sections.push(section);
    }

    if let Some(sleep) = &report.sleep {
        let mut section = Section::new("🛏️", "Sleep");
        section
            .row("Nights", sleep.nights.to_string())
            .row("Average", format_quantity(sleep.avg_hours_per_night, 1, "h"))
            .row("Status", parent_sleep_label(sleep.status));
        sections.push(section);
    }

    if let Some(milk) = &report.milk {
        let mut section = Section::new("🥛", "Milk");
        section
            .row("Breastfeeding sessions", milk.breastfeeding_sessions.to_string())
            .row("Pumping sessions", milk.pumping_sessions.to_string())
            .row("Total pumped", format_quantity(milk.total_ml, 0, "ml"))
            .row_opt("Per session", milk.avg_ml_per_session.map(|ml| format_quantity(ml, 0, "ml")))
            .row_opt(
                "Estimated daily",
                milk.estimated_daily_ml.map(|ml| format_quantity(ml, 0, "ml")),
            );
        sections.push(section);
    }

    if let Some(exercise) = &report.exercise {
        let mut section = Section::new("🏃", "Exercise");
        section
            .row("Sessions", exercise.sessions.to_string())
            .row("Total", format_minutes(exercise.total_minutes as f64))
            .row("Per session", format_minutes(exercise.avg_minutes_per_session))
            .row(
                "Weekly",
                format!(
                    "{} [{}]",
                    format_quantity(exercise.weekly_minutes, 0, "min"),
                    build_bar(exercise.weekly_minutes / WEEKLY_EXERCISE_GOAL_MINUTES * 100.0, BAR_WIDTH)
                ),
            )
            .row("Status", exercise_label(exercise.status));
        frequency_items(&mut section, &exercise.types);
        sections.push(section);
    }

    if let Some(hydration) = &report.hydration {
        let mut section = Section::new("💧", "Hydration");
        section
            .row("Days logged", hydration.days.to_string())
            .row("Average", format_quantity(hydration.avg_litres_per_day, 1, "L/day"))
            .row("Status", hydration_label(hydration.status));
        sections.push(section);
    }

    let mut section = Section::new("🤰", "Pregnancy and recovery");
    section
        .row("Fetal movement sessions", report.fetal_movement_sessions.to_string())
        .row("Contractions", report.contractions.to_string())
        .row("Pelvic floor sessions", report.pelvic_floor_sessions.to_string());
    sections.push(section);

    if !report.symptoms.is_empty() {
        let mut section = Section::new("🤒", "Symptoms");
        section.row("Reported", report.symptoms.total().to_string());
        frequency_items(&mut section, &report.symptoms);
        sections.push(section);
    }

    if report.milestones.total > 0 {
        let mut section = Section::new("🌟", "Milestones");
        section.row("Recorded", report.milestones.total.to_string());
        sample_items(&mut section, &report.milestones);
        sections.push(section);
    }

    sections
}

fn describe_weight_status(status: &WeightGainStatus) -> String {
    let verdict = match status {
        WeightGainStatus::WithinRange { .. } => "within range",
        WeightGainStatus::AboveRecommended { .. } => "above",
        WeightGainStatus::BelowRecommended { .. } => "below",
    };
    format!("{} ({verdict})", format_quantity(status.recommended_kg(), 0, "kg"))
}

fn parent_sleep_label(status: ParentSleepStatus) -> String {
    match status {
        ParentSleepStatus::Critical { debt_hours } => {
            format!("Critical ({} sleep debt)", format_quantity(debt_hours, 0, "h"))
        }
        ParentSleepStatus::BelowRecommended => "Below recommended".to_string(),
        ParentSleepStatus::Meeting => "Meeting recommendations".to_string(),
    }
}

fn exercise_label(status: ExerciseStatus) -> String {
    match status {
        ExerciseStatus::GoalMet => "Weekly goal met".to_string(),
        ExerciseStatus::Remaining { minutes } => {
            format!("{} to go", format_quantity(minutes, 0, "min"))
        }
    }
}

fn hydration_label(status: HydrationStatus) -> &'static str {
    match status {
        HydrationStatus::Low => "Low",
        HydrationStatus::Adequate => "Adequate",
        HydrationStatus::Excellent => "Excellent",
    }
}

// ── Shared ────────────────────────────────────────────────────────────────────

fn frequency_items(section: &mut Section, table: &FrequencyTable) {
    for (label, count) in table.sorted() {
        section.item(format!("{label}: {count}"));
    }
}

fn sample_items(section: &mut Section, samples: &SampleSummary) {
    for sample in &samples.shown {
        section.item(sample.clone());
    }
    if samples.hidden > 0 {
        section.item(format!("... and {} more", samples.hidden));
    }
}

fn advisory_section(report: &CareReport) -> Section {
    let mut section = Section::new("📣", "Advisories");
    let mut any = false;
    for advisory in report.advisories() {
        section.advisory(advisory);
        any = true;
    }
    if !any {
        section.item("Nothing to report");
    }
    section.blank();
    section.row("Alerts", report.alert_count().to_string());
    section
}

// ── Tests ─────────────────────────────────────────────────────────────────────
