//! Analysis pipeline: accumulate, derive, advise.
//!
//! Each event log goes through one aggregation pass, then derived metrics
//! are computed from the final state and the advisory rules are evaluated.
//! The result is a plain serializable report; rendering lives elsewhere.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use care_core::advisories::{
    self, Advisory, ExerciseStatus, HydrationStatus, MoodStatus, ParentSleepStatus,
    TemperatureStatus, WeightGainStatus,
};
use care_core::calculations::{mean, percent_of, rate_per_day, weekly_equivalent, Distribution};
use care_core::error::{CareError, Result};
use care_core::models::{InfantAge, InfantProfile, ParentProfile, ParentStatus, ProfileKind};
use care_core::settings::DisplayLimits;
use care_core::time_utils::AnalysisContext;

use crate::aggregator::{
    DatedCounter, FrequencyTable, InfantAggregation, ParentAggregation, PassStats, SampleList,
};

// ── Shared report pieces ──────────────────────────────────────────────────────

/// A possibly truncated list of dated samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleSummary {
    /// Number of events, including those without a description.
    pub total: u32,
    pub shown: Vec<String>,
    /// Samples left out by the display limit.
    pub hidden: usize,
}

impl SampleSummary {
    fn from_list(list: SampleList, limit: Option<usize>) -> Self {
        let SampleList { count, mut samples } = list;
        let hidden = limit.map_or(0, |limit| samples.len().saturating_sub(limit));
        samples.truncate(samples.len() - hidden);
        Self {
            total: count,
            shown: samples,
            hidden,
        }
    }
}

/// `true` when the log has at least one non-blank line after the header.
fn has_rows(text: &str) -> bool {
    text.lines().skip(1).any(|line| !line.trim().is_empty())
}

// ── Infant report ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedingSummary {
    pub counts: DatedCounter,
    pub per_day: f64,
    pub types: FrequencyTable,
    pub last_feeding: Option<NaiveDateTime>,
    pub hours_since_last: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfantSleepSummary {
    pub today_hours: f64,
    pub avg_hours_per_day: f64,
    pub recommended_hours: f64,
    pub sessions: usize,
    /// Median and p90 of session length in minutes.
    pub session_minutes: Option<Distribution>,
    pub quality: FrequencyTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiaperSummary {
    pub today: u32,
    pub total: u32,
    pub per_day: f64,
    pub types: FrequencyTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureSummary {
    pub readings: u32,
    pub average: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub status: TemperatureStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodDistribution {
    pub observations: u32,
    pub fussy_or_crying: u32,
    pub moods: FrequencyTable,
}

/// Latest measurement of one growth series compared to the birth value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthTrend {
    pub measurements: usize,
    pub current: f64,
    pub gain: Option<f64>,
    pub gain_percent: Option<f64>,
}

impl GrowthTrend {
    fn from_series(series: &[f64], at_birth: Option<f64>) -> Option<Self> {
        let current = *series.last()?;
        let gain = at_birth.map(|birth| current - birth);
        Some(Self {
            measurements: series.len(),
            current,
            gain,
            gain_percent: gain.zip(at_birth).and_then(|(g, b)| percent_of(g, b)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSummary {
    pub weight_kg: Option<GrowthTrend>,
    pub height_cm: Option<GrowthTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PumpingSummary {
    pub sessions: u32,
    pub total_ml: f64,
    pub avg_ml_per_session: f64,
}

/// Everything derived from the infant event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfantReport {
    pub has_data: bool,
    pub days_since_birth: i64,
    pub feeding: FeedingSummary,
    pub sleep: InfantSleepSummary,
    pub diapers: DiaperSummary,
    pub temperature: Option<TemperatureSummary>,
    pub mood: Option<MoodDistribution>,
    pub growth: Option<GrowthSummary>,
    pub pumping: Option<PumpingSummary>,
    pub vaccines: SampleSummary,
    pub doctor_visits: u32,
    pub milestones: SampleSummary,
    pub memories: SampleSummary,
    pub advisories: Vec<Advisory>,
    pub stats: PassStats,
}

/// Analyse an infant event log against the profile's birth date.
///
/// Fails only when the profile has no birth date; row problems are absorbed
/// by the aggregation pass.
pub fn analyze_infant_log(
    text: &str,
    profile: &InfantProfile,
    ctx: &AnalysisContext,
    limits: &DisplayLimits,
) -> Result<InfantReport> {
    let birth_date = profile
        .birth_date
        .ok_or_else(|| CareError::MissingProfileField {
            profile: ProfileKind::Infant,
            key: "birth_date".to_string(),
        })?;

    let has_data = has_rows(text);
    let (agg, stats) = if has_data {
        InfantAggregation::from_log(text, ctx)
    } else {
        debug!("infant log has no data rows");
        (InfantAggregation::default(), PassStats::default())
    };

    let mut report = derive_infant(agg, stats, profile, birth_date, ctx, limits);
    report.has_data = has_data;
    if has_data {
        report.advisories = advise_infant(&report, ctx);
    }
    Ok(report)
}

fn derive_infant(
    agg: InfantAggregation,
    stats: PassStats,
    profile: &InfantProfile,
    birth_date: NaiveDate,
    ctx: &AnalysisContext,
    limits: &DisplayLimits,
) -> InfantReport {
    let days = ctx.days_since(birth_date);
    let age = InfantAge::from_days(days);

    let feeding = FeedingSummary {
        counts: agg.feedings,
        per_day: rate_per_day(f64::from(agg.feedings.total), days),
        types: agg.feeding_types,
        last_feeding: agg.last_feeding,
        hours_since_last: agg.last_feeding.map(|at| ctx.hours_since(at)),
    };

    let sleep = InfantSleepSummary {
        today_hours: agg.sleep_minutes_today as f64 / 60.0,
        avg_hours_per_day: rate_per_day(agg.sleep_minutes_total as f64 / 60.0, days),
        recommended_hours: advisories::recommended_infant_sleep_hours(age.age_months()),
        sessions: agg.sleep_sessions.len(),
        session_minutes: Distribution::from_samples(&agg.sleep_sessions),
        quality: agg.sleep_quality,
    };

    let diapers = DiaperSummary {
        today: agg.diapers.today,
        total: agg.diapers.total,
        per_day: rate_per_day(f64::from(agg.diapers.total), days),
        types: agg.diaper_types,
    };

    let temperature = agg.temperature.mean().map(|average| {
        let max = agg.temperature.max();
        TemperatureSummary {
            readings: agg.temperature.count(),
            average,
            min: agg.temperature.min(),
            max,
            status: TemperatureStatus::classify(average, max.unwrap_or(average)),
        }
    });

    let mood = (!agg.moods.is_empty()).then(|| MoodDistribution {
        observations: agg.moods.total(),
        fussy_or_crying: agg.moods.get("fussy") + agg.moods.get("crying"),
        moods: agg.moods,
    });

    let weight_kg = GrowthTrend::from_series(&agg.growth_weights_kg, profile.birth_weight_kg);
    let height_cm = GrowthTrend::from_series(&agg.growth_heights_cm, profile.birth_height_cm);
    let growth = (weight_kg.is_some() || height_cm.is_some())
        .then_some(GrowthSummary { weight_kg, height_cm });

    let pumping = mean(agg.pumping_ml, agg.pumping_sessions).map(|avg| PumpingSummary {
        sessions: agg.pumping_sessions,
        total_ml: agg.pumping_ml,
        avg_ml_per_session: avg,
    });

    InfantReport {
        has_data: true,
        days_since_birth: days,
        feeding,
        sleep,
        diapers,
        temperature,
        mood,
        growth,
        pumping,
        vaccines: SampleSummary::from_list(agg.vaccines, None),
        doctor_visits: agg.doctor_visits,
        milestones: SampleSummary::from_list(agg.milestones, None),
        memories: SampleSummary::from_list(agg.memories, Some(limits.memories)),
        advisories: Vec::new(),
        stats,
    }
}

fn advise_infant(report: &InfantReport, ctx: &AnalysisContext) -> Vec<Advisory> {
    let age_months = InfantAge::from_days(report.days_since_birth).age_months();
    let mut out = Vec::new();

    out.extend(report.feeding.hours_since_last.and_then(advisories::feeding_gap));
    out.extend(advisories::infant_sleep(report.sleep.avg_hours_per_day, age_months));
    out.extend(report.temperature.as_ref().and_then(|t| t.status.advisory()));
    out.extend(
        report
            .mood
            .as_ref()
            .and_then(|m| advisories::fussy_pattern(m.fussy_or_crying, m.observations)),
    );

    debug!(
        "infant analysis for {}: {} advisories",
        ctx.today,
        out.len()
    );
    out
}

// ── Parent report ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSummary {
    pub entries: u32,
    pub average_gain_kg: f64,
    pub min_kg: Option<f64>,
    pub max_kg: Option<f64>,
    /// Highest recorded weight minus the pre-pregnancy weight.
    pub total_gain_kg: Option<f64>,
    pub status: Option<WeightGainStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalSummary {
    pub doctor_visits: u32,
    pub tests_completed: u32,
    pub postpartum_checkups: u32,
    pub recent_appointments: SampleSummary,
    pub tests: SampleSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentMoodSummary {
    pub entries: u32,
    pub average_score: Option<f64>,
    pub status: Option<MoodStatus>,
    pub types: FrequencyTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentSleepSummary {
    pub nights: u32,
    pub avg_hours_per_night: f64,
    pub status: ParentSleepStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilkSummary {
    pub breastfeeding_sessions: u32,
    pub pumping_sessions: u32,
    pub total_ml: f64,
    pub avg_ml_per_session: Option<f64>,
    pub estimated_daily_ml: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSummary {
    pub sessions: u32,
    pub total_minutes: u64,
    pub avg_minutes_per_session: f64,
    pub weekly_minutes: f64,
    pub status: ExerciseStatus,
    pub types: FrequencyTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydrationSummary {
    pub days: u32,
    pub avg_litres_per_day: f64,
    pub status: HydrationStatus,
}

/// Everything derived from the parent event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentReport {
    pub has_data: bool,
    pub weight: Option<WeightSummary>,
    pub medical: MedicalSummary,
    pub mood: Option<ParentMoodSummary>,
    pub sleep: Option<ParentSleepSummary>,
    pub milk: Option<MilkSummary>,
    pub exercise: Option<ExerciseSummary>,
    pub hydration: Option<HydrationSummary>,
    pub fetal_movement_sessions: u32,
    pub contractions: u32,
    pub pelvic_floor_sessions: u32,
    pub symptoms: FrequencyTable,
    pub milestones: SampleSummary,
    pub advisories: Vec<Advisory>,
    pub stats: PassStats,
}

/// Analyse a parent event log. Never fails: missing profile values only
/// disable the rules that need them.
pub fn analyze_parent_log(
    text: &str,
    profile: &ParentProfile,
    ctx: &AnalysisContext,
    limits: &DisplayLimits,
) -> ParentReport {
    let has_data = has_rows(text);
    let (agg, stats) = if has_data {
        ParentAggregation::from_log(text)
    } else {
        debug!("parent log has no data rows");
        (ParentAggregation::default(), PassStats::default())
    };

    let mut report = derive_parent(agg, stats, profile, limits);
    report.has_data = has_data;
    if has_data {
        report.advisories = advise_parent(&report);
    }
    debug!(
        "parent analysis for {}: {} advisories",
        ctx.today,
        report.advisories.len()
    );
    report
}

fn derive_parent(
    agg: ParentAggregation,
    stats: PassStats,
    profile: &ParentProfile,
    limits: &DisplayLimits,
) -> ParentReport {
    let weight = agg.weight_gain.mean().map(|average_gain_kg| {
        let max_kg = agg.weight.max();
        let total_gain_kg = max_kg
            .zip(profile.pre_pregnancy_weight_kg)
            .map(|(max, before)| max - before);
        WeightSummary {
            entries: agg.weight_gain.count(),
            average_gain_kg,
            min_kg: agg.weight.min(),
            max_kg,
            total_gain_kg,
            status: profile
                .bmi()
                .zip(total_gain_kg)
                .map(|(bmi, gain)| WeightGainStatus::classify(bmi, gain)),
        }
    });

    let medical = MedicalSummary {
        doctor_visits: agg.doctor_appointments.count,
        tests_completed: agg.tests.count,
        postpartum_checkups: agg.postpartum_checkups,
        recent_appointments: SampleSummary::from_list(
            agg.doctor_appointments,
            Some(limits.appointments),
        ),
        tests: SampleSummary::from_list(agg.tests, None),
    };

    let average_score = agg.mood_score.mean();
    let mood = (average_score.is_some() || !agg.mood_types.is_empty()).then(|| ParentMoodSummary {
        entries: agg.mood_score.count(),
        average_score,
        status: average_score.map(MoodStatus::classify),
        types: agg.mood_types,
    });

    let sleep = mean(agg.sleep_minutes as f64 / 60.0, agg.sleep_nights).map(|avg| {
        ParentSleepSummary {
            nights: agg.sleep_nights,
            avg_hours_per_night: avg,
            status: ParentSleepStatus::classify(avg, agg.sleep_nights),
        }
    });

    let milk = (agg.breastfeeding_sessions > 0 || agg.pumping_sessions > 0).then(|| MilkSummary {
        breastfeeding_sessions: agg.breastfeeding_sessions,
        pumping_sessions: agg.pumping_sessions,
        total_ml: agg.pumping_ml,
        avg_ml_per_session: mean(agg.pumping_ml, agg.pumping_sessions),
        estimated_daily_ml: (agg.pumping_sessions > 0).then(|| {
            advisories::estimated_daily_milk_ml(agg.pumping_ml, agg.pumping_sessions)
        }),
    });

    let exercise_total = agg.exercise_minutes as f64;
    let exercise = mean(exercise_total, agg.exercise_sessions).map(|avg| {
        let weekly_minutes = weekly_equivalent(exercise_total, agg.exercise_sessions);
        ExerciseSummary {
            sessions: agg.exercise_sessions,
            total_minutes: agg.exercise_minutes,
            avg_minutes_per_session: avg,
            weekly_minutes,
            status: ExerciseStatus::classify(weekly_minutes),
            types: agg.exercise_types,
        }
    });

    let hydration = mean(agg.water_litres, agg.water_days).map(|avg| HydrationSummary {
        days: agg.water_days,
        avg_litres_per_day: avg,
        status: HydrationStatus::classify(avg),
    });

    ParentReport {
        has_data: true,
        weight,
        medical,
        mood,
        sleep,
        milk,
        exercise,
        hydration,
        fetal_movement_sessions: agg.fetal_movement_sessions,
        contractions: agg.contractions,
        pelvic_floor_sessions: agg.pelvic_floor_sessions,
        symptoms: agg.symptoms,
        milestones: SampleSummary::from_list(agg.milestones, None),
        advisories: Vec::new(),
        stats,
    }
}

fn advise_parent(report: &ParentReport) -> Vec<Advisory> {
    let mut out = Vec::new();

    out.extend(
        report
            .weight
            .as_ref()
            .and_then(|w| w.status.as_ref())
            .and_then(WeightGainStatus::advisory),
    );
    if let Some(avg) = report.mood.as_ref().and_then(|m| m.average_score) {
        out.push(MoodStatus::classify(avg).advisory());
        out.extend(advisories::low_mood(avg));
    }
    out.extend(report.sleep.as_ref().map(|s| s.status.advisory()));
    out.extend(
        report
            .milk
            .as_ref()
            .and_then(|m| m.estimated_daily_ml)
            .and_then(advisories::milk_production),
    );
    out.extend(report.exercise.as_ref().map(|e| e.status.advisory()));
    out.extend(report.hydration.as_ref().and_then(|h| h.status.advisory()));
    out.extend(advisories::fetal_movement_tracking(report.fetal_movement_sessions));
    out.extend(advisories::contraction_tracking(report.contractions));
    out.extend(advisories::pelvic_floor_progress(report.pelvic_floor_sessions));
    out.extend(advisories::nausea_tip(report.symptoms.get("nausea")));
    out.extend(advisories::back_pain_tip(report.symptoms.get("back_pain")));
    out
}

// ── CareReport ────────────────────────────────────────────────────────────────

/// The complete output of one run: both profiles with their derived views
/// and whichever subject reports could be produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareReport {
    pub reference_date: NaiveDate,
    pub reference_time: NaiveDateTime,
    pub infant_profile: InfantProfile,
    pub infant_age: Option<InfantAge>,
    pub parent_profile: ParentProfile,
    pub parent_status: Option<ParentStatus>,
    pub parent_bmi: Option<f64>,
    pub infant: Option<InfantReport>,
    pub parent: Option<ParentReport>,
}

impl CareReport {
    /// Start a report from the loaded profiles; subject reports are attached
    /// afterwards.
    pub fn new(
        ctx: &AnalysisContext,
        infant_profile: InfantProfile,
        parent_profile: ParentProfile,
    ) -> Self {
        Self {
            reference_date: ctx.today,
            reference_time: ctx.now,
            infant_age: infant_profile.age_on(ctx.today),
            parent_status: parent_profile.status_on(ctx.today),
            parent_bmi: parent_profile.bmi(),
            infant_profile,
            parent_profile,
            infant: None,
            parent: None,
        }
    }

    /// All advisories, infant first.
    pub fn advisories(&self) -> impl Iterator<Item = &Advisory> {
        let infant = self.infant.iter().flat_map(|r| r.advisories.iter());
        let parent = self.parent.iter().flat_map(|r| r.advisories.iter());
        infant.chain(parent)
    }

    /// Number of warning or critical advisories.
    pub fn alert_count(&self) -> usize {
        self.advisories().filter(|a| a.is_alert()).count()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
