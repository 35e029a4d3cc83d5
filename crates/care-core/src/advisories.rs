//! Threshold-based health advisories.
//!
//! Every rule is a pure comparison of one or more aggregated values against a
//! literal constant. Rules are independent; the analysis layer evaluates all
//! of them and keeps whatever fires.

use serde::{Deserialize, Serialize};
use std::fmt;

// ── Thresholds ────────────────────────────────────────────────────────────────

/// Hours without a feeding after which a warning is raised.
pub const FEEDING_GAP_HOURS: i64 = 4;

/// Maximum temperature (°C) treated as a fever.
pub const FEVER_CELSIUS: f64 = 38.0;

/// Average temperature (°C) treated as elevated.
pub const ELEVATED_CELSIUS: f64 = 37.5;

/// Share of fussy/crying mood observations that marks a pattern.
pub const FUSSY_PATTERN_SHARE: f64 = 0.4;

/// Allowed deviation (kg) from the recommended pregnancy weight gain.
pub const WEIGHT_GAIN_TOLERANCE_KG: f64 = 3.0;

/// Recommended nightly sleep for the parent, in hours.
pub const PARENT_SLEEP_TARGET_HOURS: f64 = 7.0;

/// Below this many hours per night sleep deprivation is critical.
pub const PARENT_SLEEP_CRITICAL_HOURS: f64 = 6.0;

/// Estimated daily milk output (ml) below which production may be low.
pub const LOW_MILK_DAILY_ML: f64 = 500.0;

/// Pumping sessions assumed per day when estimating daily output.
pub const PUMPING_SESSIONS_PER_DAY: f64 = 4.0;

/// WHO weekly activity recommendation, in minutes.
pub const WEEKLY_EXERCISE_GOAL_MINUTES: f64 = 150.0;

/// Daily water intake (litres) below which hydration is low.
pub const LOW_WATER_LITRES: f64 = 2.0;

/// Daily water intake (litres) at or above which hydration is excellent.
pub const EXCELLENT_WATER_LITRES: f64 = 2.5;

/// Contraction count above which tracking is considered thorough.
pub const CONTRACTION_TRACKING_COUNT: u32 = 10;

/// Nausea occurrences above which a tip is shown.
pub const NAUSEA_TIP_COUNT: u32 = 10;

/// Back-pain occurrences above which a tip is shown.
pub const BACK_PAIN_TIP_COUNT: u32 = 15;

// ── Severity ──────────────────────────────────────────────────────────────────

/// How urgent an advisory is, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Advisory ──────────────────────────────────────────────────────────────────

/// Identifies which rule produced an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCode {
    FeedingGap,
    InfantSleep,
    Temperature,
    FussyPattern,
    WeightGain,
    MoodStatus,
    LowMood,
    ParentSleep,
    MilkProduction,
    ExerciseGoal,
    Hydration,
    FetalMovements,
    Contractions,
    PelvicFloor,
    NauseaTip,
    BackPainTip,
}

/// A status label plus message derived from final aggregated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub code: AdvisoryCode,
    pub severity: Severity,
    pub message: String,
}

impl Advisory {
    pub fn new(code: AdvisoryCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
        }
    }

    /// `true` for warnings and critical alerts.
    pub fn is_alert(&self) -> bool {
        self.severity >= Severity::Warning
    }
}

// ── Infant rules ──────────────────────────────────────────────────────────────

pub fn feeding_gap(hours_since_last: i64) -> Option<Advisory> {
    (hours_since_last > FEEDING_GAP_HOURS).then(|| {
        Advisory::new(
            AdvisoryCode::FeedingGap,
            Severity::Warning,
            format!("It's been over {FEEDING_GAP_HOURS} hours since last feeding"),
        )
    })
}

/// Recommended daily sleep in hours for an infant of `age_months`.
pub fn recommended_infant_sleep_hours(age_months: i64) -> f64 {
    if age_months < 3 {
        16.0
    } else if age_months < 12 {
        14.0
    } else {
        13.0
    }
}

pub fn infant_sleep(avg_hours_per_day: f64, age_months: i64) -> Option<Advisory> {
    let recommended = recommended_infant_sleep_hours(age_months);
    (avg_hours_per_day < recommended).then(|| {
        Advisory::new(
            AdvisoryCode::InfantSleep,
            Severity::Warning,
            format!("Baby is sleeping less than recommended {recommended:.0} hours for age"),
        )
    })
}

/// Temperature classification from the observed average and maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureStatus {
    Normal,
    Elevated,
    Fever,
}

impl TemperatureStatus {
    /// The maximum is checked first: one fever reading outranks any average.
    pub fn classify(avg: f64, max: f64) -> Self {
        if max >= FEVER_CELSIUS {
            TemperatureStatus::Fever
        } else if avg >= ELEVATED_CELSIUS {
            TemperatureStatus::Elevated
        } else {
            TemperatureStatus::Normal
        }
    }

    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            TemperatureStatus::Fever => Some(Advisory::new(
                AdvisoryCode::Temperature,
                Severity::Critical,
                format!("Fever detected (>= {FEVER_CELSIUS:.1}°C) - contact doctor"),
            )),
            TemperatureStatus::Elevated => Some(Advisory::new(
                AdvisoryCode::Temperature,
                Severity::Warning,
                "Elevated temperature - monitor closely",
            )),
            TemperatureStatus::Normal => None,
        }
    }
}

/// Fires when fussy plus crying observations exceed the pattern share.
pub fn fussy_pattern(fussy_or_crying: u32, total_observations: u32) -> Option<Advisory> {
    (f64::from(fussy_or_crying) > f64::from(total_observations) * FUSSY_PATTERN_SHARE).then(|| {
        Advisory::new(
            AdvisoryCode::FussyPattern,
            Severity::Warning,
            "Baby has been fussy/crying frequently (possible causes: teething, colic, illness)",
        )
    })
}

// ── Parent rules ──────────────────────────────────────────────────────────────

/// Recommended total pregnancy weight gain (kg) for a pre-pregnancy BMI.
pub fn recommended_weight_gain_kg(bmi: f64) -> f64 {
    if bmi < 18.5 {
        18.0
    } else if bmi < 25.0 {
        15.0
    } else if bmi < 30.0 {
        11.0
    } else {
        9.0
    }
}

/// Pregnancy weight gain relative to the BMI-based recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeightGainStatus {
    WithinRange { recommended_kg: f64 },
    AboveRecommended { recommended_kg: f64 },
    BelowRecommended { recommended_kg: f64 },
}

impl WeightGainStatus {
    pub fn classify(bmi: f64, gain_kg: f64) -> Self {
        let recommended_kg = recommended_weight_gain_kg(bmi);
        if gain_kg > recommended_kg + WEIGHT_GAIN_TOLERANCE_KG {
            WeightGainStatus::AboveRecommended { recommended_kg }
        } else if gain_kg < recommended_kg - WEIGHT_GAIN_TOLERANCE_KG {
            WeightGainStatus::BelowRecommended { recommended_kg }
        } else {
            WeightGainStatus::WithinRange { recommended_kg }
        }
    }

    pub fn recommended_kg(&self) -> f64 {
        match *self {
            WeightGainStatus::WithinRange { recommended_kg }
            | WeightGainStatus::AboveRecommended { recommended_kg }
            | WeightGainStatus::BelowRecommended { recommended_kg } => recommended_kg,
        }
    }

    pub fn advisory(&self) -> Option<Advisory> {
        let (direction, recommended_kg) = match *self {
            WeightGainStatus::AboveRecommended { recommended_kg } => ("above", recommended_kg),
            WeightGainStatus::BelowRecommended { recommended_kg } => ("below", recommended_kg),
            WeightGainStatus::WithinRange { .. } => return None,
        };
        Some(Advisory::new(
            AdvisoryCode::WeightGain,
            Severity::Warning,
            format!("Weight gain {direction} recommended ({recommended_kg:.0} kg) for BMI"),
        ))
    }
}

/// Mood band for an average self-reported score on a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodStatus {
    Good,
    Fair,
    Challenging,
    Alert,
}

impl MoodStatus {
    pub fn classify(avg_score: f64) -> Self {
        if avg_score >= 7.0 {
            MoodStatus::Good
        } else if avg_score >= 5.0 {
            MoodStatus::Fair
        } else if avg_score >= 3.0 {
            MoodStatus::Challenging
        } else {
            MoodStatus::Alert
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoodStatus::Good => "Good",
            MoodStatus::Fair => "Fair",
            MoodStatus::Challenging => "Challenging",
            MoodStatus::Alert => "Alert",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            MoodStatus::Good | MoodStatus::Fair => Severity::Normal,
            MoodStatus::Challenging => Severity::Warning,
            MoodStatus::Alert => Severity::Critical,
        }
    }

    pub fn advisory(&self) -> Advisory {
        let message = match self {
            MoodStatus::Good => "Good - doing well",
            MoodStatus::Fair => "Fair - manageable",
            MoodStatus::Challenging => "Challenging - needs support",
            MoodStatus::Alert => "Alert - please seek professional help",
        };
        Advisory::new(AdvisoryCode::MoodStatus, self.severity(), message)
    }
}

/// Fires below a "Fair" average, independent of the mood band itself.
pub fn low_mood(avg_score: f64) -> Option<Advisory> {
    (avg_score < 5.0).then(|| {
        Advisory::new(
            AdvisoryCode::LowMood,
            Severity::Warning,
            "Low mood detected. Consider talking to a healthcare provider, reaching out to \
             your support network, and postpartum depression screening",
        )
    })
}

/// Nightly sleep classification for the parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParentSleepStatus {
    /// Severe deprivation; `debt_hours` is `(7 - avg) * nights`.
    Critical { debt_hours: f64 },
    BelowRecommended,
    Meeting,
}

impl ParentSleepStatus {
    pub fn classify(avg_hours_per_night: f64, nights: u32) -> Self {
        if avg_hours_per_night < PARENT_SLEEP_CRITICAL_HOURS {
            ParentSleepStatus::Critical {
                debt_hours: (PARENT_SLEEP_TARGET_HOURS - avg_hours_per_night) * f64::from(nights),
            }
        } else if avg_hours_per_night < PARENT_SLEEP_TARGET_HOURS {
            ParentSleepStatus::BelowRecommended
        } else {
            ParentSleepStatus::Meeting
        }
    }

    pub fn advisory(&self) -> Advisory {
        match *self {
            ParentSleepStatus::Critical { debt_hours } => Advisory::new(
                AdvisoryCode::ParentSleep,
                Severity::Critical,
                format!(
                    "Severe sleep deprivation ({debt_hours:.0} hours debt) - this can affect \
                     physical and mental health"
                ),
            ),
            ParentSleepStatus::BelowRecommended => Advisory::new(
                AdvisoryCode::ParentSleep,
                Severity::Warning,
                "Below recommended 7-8 hours - try to rest more",
            ),
            ParentSleepStatus::Meeting => Advisory::new(
                AdvisoryCode::ParentSleep,
                Severity::Normal,
                "Meeting sleep recommendations",
            ),
        }
    }
}

/// Estimated daily output: `total_ml / max(1, sessions / 4)`.
pub fn estimated_daily_milk_ml(total_ml: f64, sessions: u32) -> f64 {
    total_ml / (f64::from(sessions) / PUMPING_SESSIONS_PER_DAY).max(1.0)
}

pub fn milk_production(estimated_daily_ml: f64) -> Option<Advisory> {
    (estimated_daily_ml < LOW_MILK_DAILY_ML).then(|| {
        Advisory::new(
            AdvisoryCode::MilkProduction,
            Severity::Warning,
            "Milk production may be low",
        )
    })
}

/// Progress towards the weekly activity goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExerciseStatus {
    GoalMet,
    Remaining { minutes: f64 },
}

impl ExerciseStatus {
    pub fn classify(weekly_minutes: f64) -> Self {
        if weekly_minutes >= WEEKLY_EXERCISE_GOAL_MINUTES {
            ExerciseStatus::GoalMet
        } else {
            ExerciseStatus::Remaining {
                minutes: WEEKLY_EXERCISE_GOAL_MINUTES - weekly_minutes,
            }
        }
    }

    pub fn advisory(&self) -> Advisory {
        match *self {
            ExerciseStatus::GoalMet => Advisory::new(
                AdvisoryCode::ExerciseGoal,
                Severity::Normal,
                format!("Meeting WHO recommendation of {WEEKLY_EXERCISE_GOAL_MINUTES:.0} min/week"),
            ),
            ExerciseStatus::Remaining { minutes } => Advisory::new(
                AdvisoryCode::ExerciseGoal,
                Severity::Info,
                format!(
                    "Goal: {minutes:.0} more minutes to reach {WEEKLY_EXERCISE_GOAL_MINUTES:.0}/week"
                ),
            ),
        }
    }
}

/// Daily water intake band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationStatus {
    Low,
    Adequate,
    Excellent,
}

impl HydrationStatus {
    pub fn classify(avg_litres_per_day: f64) -> Self {
        if avg_litres_per_day < LOW_WATER_LITRES {
            HydrationStatus::Low
        } else if avg_litres_per_day >= EXCELLENT_WATER_LITRES {
            HydrationStatus::Excellent
        } else {
            HydrationStatus::Adequate
        }
    }

    /// `Adequate` intake produces no advisory.
    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            HydrationStatus::Low => Some(Advisory::new(
                AdvisoryCode::Hydration,
                Severity::Warning,
                "Below recommended 2-3 liters during pregnancy/breastfeeding",
            )),
            HydrationStatus::Excellent => Some(Advisory::new(
                AdvisoryCode::Hydration,
                Severity::Normal,
                "Excellent hydration",
            )),
            HydrationStatus::Adequate => None,
        }
    }
}

pub fn contraction_tracking(count: u32) -> Option<Advisory> {
    (count > CONTRACTION_TRACKING_COUNT).then(|| {
        Advisory::new(
            AdvisoryCode::Contractions,
            Severity::Info,
            "Good tracking - helpful for labor preparation",
        )
    })
}

pub fn nausea_tip(count: u32) -> Option<Advisory> {
    (count > NAUSEA_TIP_COUNT).then(|| {
        Advisory::new(
            AdvisoryCode::NauseaTip,
            Severity::Info,
            "Frequent nausea - try ginger tea, small meals",
        )
    })
}

pub fn back_pain_tip(count: u32) -> Option<Advisory> {
    (count > BACK_PAIN_TIP_COUNT).then(|| {
        Advisory::new(
            AdvisoryCode::BackPainTip,
            Severity::Info,
            "Frequent back pain - consider prenatal yoga, massage",
        )
    })
}

/// Positive note for any recorded fetal-movement tracking.
pub fn fetal_movement_tracking(sessions: u32) -> Option<Advisory> {
    (sessions > 0).then(|| {
        Advisory::new(
            AdvisoryCode::FetalMovements,
            Severity::Normal,
            "Monitoring baby's activity regularly",
        )
    })
}

pub fn pelvic_floor_progress(sessions: u32) -> Option<Advisory> {
    (sessions > 0).then(|| {
        Advisory::new(
            AdvisoryCode::PelvicFloor,
            Severity::Normal,
            "Great work on pelvic floor recovery",
        )
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
