//! Single-pass aggregation of decoded event-log rows.
//!
//! One [`InfantAggregation`] or [`ParentAggregation`] is created per file,
//! updated once per decoded row and then handed to the analysis layer. Updates
//! only ever add; nothing is retracted within a pass.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use tracing::{debug, trace};

use care_core::time_utils::{AnalysisContext, DateScope};

use crate::events::{GrowthSample, InfantEvent, InfantRecord, ParentEvent, ParentRecord, RowError};
use crate::record::EventRow;

// ── RunningStats ──────────────────────────────────────────────────────────────

/// Count, sum and extrema of a numeric series.
///
/// Extrema start at sentinel bounds chosen for the metric's physical range:
/// `min` starts above any real observation and `max` below it. A value that
/// does not beat the sentinel leaves the bound untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningStats {
    count: u32,
    sum: f64,
    min: f64,
    max: f64,
    min_seen: bool,
    max_seen: bool,
}

impl RunningStats {
    pub const fn with_sentinels(min: f64, max: f64) -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min,
            max,
            min_seen: false,
            max_seen: false,
        }
    }

    /// Count the value, add it to the sum and update both extrema.
    pub fn record(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.lower_min(value);
        self.raise_max(value);
    }

    pub fn lower_min(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
            self.min_seen = true;
        }
    }

    pub fn raise_max(&mut self, value: f64) {
        if value > self.max {
            self.max = value;
            self.max_seen = true;
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn mean(&self) -> Option<f64> {
        care_core::calculations::mean(self.sum, self.count)
    }

    /// The smallest value seen, or `None` while still at the sentinel.
    pub fn min(&self) -> Option<f64> {
        self.min_seen.then_some(self.min)
    }

    /// The largest value seen, or `None` while still at the sentinel.
    pub fn max(&self) -> Option<f64> {
        self.max_seen.then_some(self.max)
    }
}

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Occurrence counts per category label.
///
/// Serialized as a list of `{label, count}` ordered by count (descending)
/// and then label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u32>,
}

impl FrequencyTable {
    pub fn add(&mut self, label: &str) {
        *self.counts.entry(label.to_string()).or_default() += 1;
    }

    pub fn get(&self, label: &str) -> u32 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Entries in display order.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Entry<'a>(&'a str, u32);

        impl Serialize for Entry<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut s = serializer.serialize_struct("Entry", 2)?;
                s.serialize_field("label", self.0)?;
                s.serialize_field("count", &self.1)?;
                s.end()
            }
        }

        serializer.collect_seq(self.sorted().into_iter().map(|(l, c)| Entry(l, c)))
    }
}

// ── DatedCounter / SampleList ─────────────────────────────────────────────────

/// Event count split by the reference-date scopes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DatedCounter {
    pub total: u32,
    pub today: u32,
    pub yesterday: u32,
    pub this_week: u32,
}

impl DatedCounter {
    pub fn record(&mut self, scope: DateScope) {
        self.total += 1;
        if scope.today {
            self.today += 1;
        }
        if scope.yesterday {
            self.yesterday += 1;
        }
        if scope.this_week {
            self.this_week += 1;
        }
    }
}

/// Counted events with an ordered list of `"<date>: <text>"` samples.
///
/// Every event is counted; only events with a description add a sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleList {
    pub count: u32,
    pub samples: Vec<String>,
}

impl SampleList {
    pub fn record(&mut self, date: &str, text: Option<&str>) {
        self.count += 1;
        if let Some(text) = text {
            self.samples.push(format!("{date}: {text}"));
        }
    }
}

// ── PassStats ─────────────────────────────────────────────────────────────────

/// Row bookkeeping for one aggregation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Non-blank data lines (header excluded).
    pub rows_read: u32,
    /// Rows that updated the aggregation.
    pub rows_applied: u32,
    /// Rows dropped as malformed (too few fields, bad date).
    pub rows_skipped: u32,
    /// Rows with an activity that is not tracked.
    pub rows_unrecognized: u32,
}

/// Drive `decode` and `apply` over every data line of `text`.
///
/// The first line is a header. Row failures are logged at trace level and
/// never stop the pass.
fn run_pass<R>(
    subject: &str,
    text: &str,
    decode: impl Fn(&EventRow) -> Result<Option<R>, RowError>,
    mut apply: impl FnMut(R),
) -> PassStats {
    let mut stats = PassStats::default();

    for (index, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        stats.rows_read += 1;

        let Some(row) = EventRow::from_line(line) else {
            trace!("{} log line {}: fewer than 3 fields", subject, index + 1);
            stats.rows_skipped += 1;
            continue;
        };

        match decode(&row) {
            Ok(Some(record)) => {
                apply(record);
                stats.rows_applied += 1;
            }
            Ok(None) => {
                trace!(
                    "{} log line {}: unrecognised activity {:?}",
                    subject,
                    index + 1,
                    row.activity()
                );
                stats.rows_unrecognized += 1;
            }
            Err(e) => {
                trace!("{} log line {}: {}", subject, index + 1, e);
                stats.rows_skipped += 1;
            }
        }
    }

    debug!(
        "{} log: {} rows read, {} applied, {} skipped, {} unrecognised",
        subject, stats.rows_read, stats.rows_applied, stats.rows_skipped, stats.rows_unrecognized
    );
    stats
}

// ── InfantAggregation ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct InfantAggregation {
    pub feedings: DatedCounter,
    pub feeding_types: FrequencyTable,
    /// Last `(date, time)` seen in file order.
    pub last_feeding: Option<NaiveDateTime>,

    pub sleep_minutes_total: u64,
    pub sleep_minutes_today: u64,
    pub sleep_sessions: Vec<f64>,
    pub sleep_quality: FrequencyTable,

    pub diapers: DatedCounter,
    pub diaper_types: FrequencyTable,

    pub temperature: RunningStats,
    pub moods: FrequencyTable,

    pub milestones: SampleList,
    pub memories: SampleList,
    pub vaccines: SampleList,
    pub doctor_visits: u32,

    pub pumping_sessions: u32,
    pub pumping_ml: f64,

    pub growth_weights_kg: Vec<f64>,
    pub growth_heights_cm: Vec<f64>,
}

impl Default for InfantAggregation {
    fn default() -> Self {
        Self {
            feedings: DatedCounter::default(),
            feeding_types: FrequencyTable::default(),
            last_feeding: None,
            sleep_minutes_total: 0,
            sleep_minutes_today: 0,
            sleep_sessions: Vec::new(),
            sleep_quality: FrequencyTable::default(),
            diapers: DatedCounter::default(),
            diaper_types: FrequencyTable::default(),
            temperature: RunningStats::with_sentinels(100.0, 0.0),
            moods: FrequencyTable::default(),
            milestones: SampleList::default(),
            memories: SampleList::default(),
            vaccines: SampleList::default(),
            doctor_visits: 0,
            pumping_sessions: 0,
            pumping_ml: 0.0,
            growth_weights_kg: Vec::new(),
            growth_heights_cm: Vec::new(),
        }
    }
}

impl InfantAggregation {
    /// Aggregate a whole infant log (header line included).
    pub fn from_log(text: &str, ctx: &AnalysisContext) -> (Self, PassStats) {
        let mut agg = Self::default();
        let stats = run_pass("infant", text, InfantRecord::decode, |record| {
            agg.apply(&record, ctx)
        });
        (agg, stats)
    }

    pub fn apply(&mut self, record: &InfantRecord, ctx: &AnalysisContext) {
        let scope = ctx.scope_of(record.date);
        let date_label = record.date.to_string();

        match &record.event {
            InfantEvent::Feeding { kind, time } => {
                self.feedings.record(scope);
                if let Some(kind) = kind {
                    self.feeding_types.add(kind);
                }
                if let Some(time) = time {
                    self.last_feeding = Some(record.date.and_time(*time));
                }
            }
            InfantEvent::SleepMarker => {}
            InfantEvent::SleepEnd { minutes, quality } => {
                if let Some(minutes) = *minutes {
                    self.sleep_minutes_total += u64::from(minutes);
                    if scope.today {
                        self.sleep_minutes_today += u64::from(minutes);
                    }
                    self.sleep_sessions.push(f64::from(minutes));
                }
                if let Some(quality) = quality {
                    self.sleep_quality.add(quality);
                }
            }
            InfantEvent::Diaper { kind } => {
                self.diapers.record(scope);
                if let Some(kind) = kind {
                    self.diaper_types.add(kind);
                }
            }
            InfantEvent::Temperature { celsius } => {
                if let Some(celsius) = *celsius {
                    self.temperature.record(celsius);
                }
            }
            InfantEvent::Mood { label } => {
                if let Some(label) = label {
                    self.moods.add(label);
                }
            }
            InfantEvent::Milestone { description } => {
                self.milestones.record(&date_label, description.as_deref())
            }
            InfantEvent::Memory { description } => {
                self.memories.record(&date_label, description.as_deref())
            }
            InfantEvent::Pumping { ml } => {
                self.pumping_sessions += 1;
                if let Some(ml) = ml {
                    self.pumping_ml += ml;
                }
            }
            InfantEvent::Vaccine { name } => self.vaccines.record(&date_label, Some(name.as_str())),
            InfantEvent::DoctorVisit => self.doctor_visits += 1,
            InfantEvent::Growth { sample } => match sample {
                Some(GrowthSample::WeightKg(kg)) => self.growth_weights_kg.push(*kg),
                Some(GrowthSample::HeightCm(cm)) => self.growth_heights_cm.push(*cm),
                None => {}
            },
        }
    }
}

// ── ParentAggregation ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ParentAggregation {
    /// Recorded weight gains (count and sum only).
    pub weight_gain: RunningStats,
    /// Recorded weights; the minimum only considers positive values.
    pub weight: RunningStats,

    pub doctor_appointments: SampleList,
    pub tests: SampleList,
    pub postpartum_checkups: u32,

    pub mood_score: RunningStats,
    pub mood_types: FrequencyTable,

    pub sleep_minutes: u64,
    pub sleep_nights: u32,

    pub breastfeeding_sessions: u32,
    pub pumping_sessions: u32,
    pub pumping_ml: f64,

    pub exercise_sessions: u32,
    pub exercise_minutes: u64,
    pub exercise_types: FrequencyTable,

    pub water_litres: f64,
    pub water_days: u32,

    pub fetal_movement_sessions: u32,
    pub contractions: u32,
    pub pelvic_floor_sessions: u32,
    pub symptoms: FrequencyTable,
    pub milestones: SampleList,
}

impl Default for ParentAggregation {
    fn default() -> Self {
        Self {
            weight_gain: RunningStats::with_sentinels(f64::INFINITY, f64::NEG_INFINITY),
            weight: RunningStats::with_sentinels(1000.0, 0.0),
            doctor_appointments: SampleList::default(),
            tests: SampleList::default(),
            postpartum_checkups: 0,
            mood_score: RunningStats::with_sentinels(f64::INFINITY, f64::NEG_INFINITY),
            mood_types: FrequencyTable::default(),
            sleep_minutes: 0,
            sleep_nights: 0,
            breastfeeding_sessions: 0,
            pumping_sessions: 0,
            pumping_ml: 0.0,
            exercise_sessions: 0,
            exercise_minutes: 0,
            exercise_types: FrequencyTable::default(),
            water_litres: 0.0,
            water_days: 0,
            fetal_movement_sessions: 0,
            contractions: 0,
            pelvic_floor_sessions: 0,
            symptoms: FrequencyTable::default(),
            milestones: SampleList::default(),
        }
    }
}

impl ParentAggregation {
    /// Aggregate a whole parent log (header line included).
    pub fn from_log(text: &str) -> (Self, PassStats) {
        let mut agg = Self::default();
        let stats = run_pass("parent", text, ParentRecord::decode, |record| {
            agg.apply(&record)
        });
        (agg, stats)
    }

    pub fn apply(&mut self, record: &ParentRecord) {
        let date = record.date_label.as_str();

        match &record.event {
            ParentEvent::Weight { weight_kg, gain_kg } => {
                if let Some(gain) = *gain_kg {
                    self.weight_gain.record(gain);
                }
                if let Some(weight) = *weight_kg {
                    self.weight.raise_max(weight);
                    if weight > 0.0 {
                        self.weight.lower_min(weight);
                    }
                }
            }
            ParentEvent::DoctorAppointment { note } => {
                self.doctor_appointments.record(date, note.as_deref())
            }
            ParentEvent::Test { name } => self.tests.record(date, name.as_deref()),
            ParentEvent::Mood { score, kind } => {
                if let Some(score) = *score {
                    self.mood_score.record(score);
                }
                if let Some(kind) = kind {
                    self.mood_types.add(kind);
                }
            }
            ParentEvent::Sleep { minutes } => {
                if let Some(minutes) = *minutes {
                    self.sleep_minutes += u64::from(minutes);
                    self.sleep_nights += 1;
                }
            }
            ParentEvent::Breastfeeding => self.breastfeeding_sessions += 1,
            ParentEvent::Pumping { ml } => {
                self.pumping_sessions += 1;
                if let Some(ml) = ml {
                    self.pumping_ml += ml;
                }
            }
            ParentEvent::Exercise { minutes, kind } => {
                self.exercise_sessions += 1;
                if let Some(minutes) = *minutes {
                    self.exercise_minutes += u64::from(minutes);
                }
                if let Some(kind) = kind {
                    self.exercise_types.add(kind);
                }
            }
            ParentEvent::FetalMovements => self.fetal_movement_sessions += 1,
            ParentEvent::Contractions => self.contractions += 1,
            ParentEvent::Nutrition { water_litres } => {
                if let Some(litres) = *water_litres {
                    self.water_litres += litres;
                    self.water_days += 1;
                }
            }
            ParentEvent::Symptom { name } => {
                if let Some(name) = name {
                    self.symptoms.add(name);
                }
            }
            ParentEvent::PostpartumCheckup => self.postpartum_checkups += 1,
            ParentEvent::PelvicFloor => self.pelvic_floor_sessions += 1,
            ParentEvent::Milestone { description } => {
                self.milestones.record(date, description.as_deref())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
