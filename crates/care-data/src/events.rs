//! Typed event-log rows.
//!
//! Every log row carries `date, time, activity` followed by columns whose
//! meaning depends on the activity. Each row is decoded once into an
//! [`InfantEvent`] or [`ParentEvent`]; the column offsets below are the file
//! contract and are referenced nowhere else. Sleep phase and growth kind
//! are compared after trimming, and a vaccine row without a name is recorded
//! as `"Unknown"`.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use care_core::time_utils;

use crate::record::EventRow;

/// Column offsets of the infant log.
pub mod infant_columns {
    pub const FEEDING_TYPE: usize = 3;
    pub const SLEEP_PHASE: usize = 4;
    pub const SLEEP_MINUTES: usize = 5;
    pub const SLEEP_QUALITY: usize = 7;
    pub const DIAPER_TYPE: usize = 3;
    pub const TEMPERATURE: usize = 5;
    pub const MOOD: usize = 3;
    pub const MILESTONE: usize = 19;
    pub const MEMORY: usize = 20;
    pub const PUMPING_AMOUNT: usize = 5;
    pub const VACCINE_NAME: usize = 3;
    pub const GROWTH_KIND: usize = 3;
    pub const GROWTH_VALUE: usize = 5;
}

/// Column offsets of the parent log.
pub mod parent_columns {
    pub const WEIGHT: usize = 7;
    pub const WEIGHT_GAIN: usize = 8;
    pub const APPOINTMENT_NOTE: usize = 16;
    pub const TEST_NAME: usize = 22;
    pub const MOOD_SCORE: usize = 26;
    pub const MOOD_TYPE: usize = 27;
    pub const SYMPTOM: usize = 31;
    pub const PUMPING_AMOUNT: usize = 63;
    pub const SLEEP_MINUTES: usize = 70;
    pub const WATER_LITRES: usize = 92;
    pub const EXERCISE_TYPE: usize = 94;
    pub const EXERCISE_MINUTES: usize = 95;
    pub const MILESTONE: usize = 142;
}

/// Why a row contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("row has no date")]
    MissingDate,

    #[error("row date {0:?} is not YYYY-MM-DD")]
    InvalidDate(String),
}

// ── Infant events ─────────────────────────────────────────────────────────────

/// A measurement from a `growth` row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthSample {
    WeightKg(f64),
    HeightCm(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InfantEvent {
    Feeding {
        kind: Option<String>,
        time: Option<NaiveTime>,
    },
    /// A sleep row whose phase is anything but `end`.
    SleepMarker,
    SleepEnd {
        minutes: Option<u32>,
        quality: Option<String>,
    },
    Diaper {
        kind: Option<String>,
    },
    Temperature {
        celsius: Option<f64>,
    },
    Mood {
        label: Option<String>,
    },
    Milestone {
        description: Option<String>,
    },
    Memory {
        description: Option<String>,
    },
    Pumping {
        ml: Option<f64>,
    },
    Vaccine {
        name: String,
    },
    DoctorVisit,
    Growth {
        sample: Option<GrowthSample>,
    },
}

/// An infant event together with its (validated) date.
#[derive(Debug, Clone, PartialEq)]
pub struct InfantRecord {
    pub date: NaiveDate,
    pub event: InfantEvent,
}

impl InfantRecord {
    /// Decode a row. `Ok(None)` means the activity is not one we track.
    pub fn decode(row: &EventRow) -> Result<Option<Self>, RowError> {
        use infant_columns as col;

        let date = match row.date() {
            "" => return Err(RowError::MissingDate),
            raw => time_utils::parse_date(raw).map_err(|_| RowError::InvalidDate(raw.to_string()))?,
        };

        let text = |i: usize| row.text(i).map(str::to_string);

        let event = match row.activity() {
            "feeding" => InfantEvent::Feeding {
                kind: text(col::FEEDING_TYPE),
                time: time_utils::parse_time(row.time()).ok(),
            },
            "sleep" if row.text(col::SLEEP_PHASE) == Some("end") => InfantEvent::SleepEnd {
                minutes: row.number(col::SLEEP_MINUTES),
                quality: text(col::SLEEP_QUALITY),
            },
            "sleep" => InfantEvent::SleepMarker,
            "diaper" => InfantEvent::Diaper {
                kind: text(col::DIAPER_TYPE),
            },
            "temperature" => InfantEvent::Temperature {
                celsius: row.number(col::TEMPERATURE),
            },
            "mood" => InfantEvent::Mood {
                label: text(col::MOOD),
            },
            "milestone" => InfantEvent::Milestone {
                description: text(col::MILESTONE),
            },
            "memory" => InfantEvent::Memory {
                description: text(col::MEMORY),
            },
            "pumping" => InfantEvent::Pumping {
                ml: row.quantity(col::PUMPING_AMOUNT, "ml"),
            },
            "vaccine" => InfantEvent::Vaccine {
                name: text(col::VACCINE_NAME).unwrap_or_else(|| "Unknown".to_string()),
            },
            "doctor_visit" => InfantEvent::DoctorVisit,
            "growth" => InfantEvent::Growth {
                sample: match row.text(col::GROWTH_KIND) {
                    Some("weight") => row
                        .quantity(col::GROWTH_VALUE, "kg")
                        .map(GrowthSample::WeightKg),
                    Some("height") => row
                        .quantity(col::GROWTH_VALUE, "cm")
                        .map(GrowthSample::HeightCm),
                    _ => None,
                },
            },
            _ => return Ok(None),
        };

        Ok(Some(Self { date, event }))
    }
}

// ── Parent events ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ParentEvent {
    /// Both `weight` and `pregnancy_week` rows.
    Weight {
        weight_kg: Option<f64>,
        gain_kg: Option<f64>,
    },
    DoctorAppointment {
        note: Option<String>,
    },
    Test {
        name: Option<String>,
    },
    Mood {
        score: Option<f64>,
        kind: Option<String>,
    },
    Sleep {
        minutes: Option<u32>,
    },
    Breastfeeding,
    Pumping {
        ml: Option<f64>,
    },
    Exercise {
        minutes: Option<u32>,
        kind: Option<String>,
    },
    FetalMovements,
    Contractions,
    Nutrition {
        water_litres: Option<f64>,
    },
    Symptom {
        name: Option<String>,
    },
    PostpartumCheckup,
    PelvicFloor,
    Milestone {
        description: Option<String>,
    },
}

/// A parent event with its date column kept as a display label.
///
/// The parent log's dates are not validated; they only prefix samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentRecord {
    pub date_label: String,
    pub event: ParentEvent,
}

impl ParentRecord {
    /// Decode a row. `Ok(None)` means the activity is not one we track.
    pub fn decode(row: &EventRow) -> Result<Option<Self>, RowError> {
        use parent_columns as col;

        let text = |i: usize| row.text(i).map(str::to_string);

        let event = match row.activity() {
            "weight" | "pregnancy_week" => ParentEvent::Weight {
                weight_kg: row.number(col::WEIGHT),
                gain_kg: row.number(col::WEIGHT_GAIN),
            },
            "doctor_appointment" => ParentEvent::DoctorAppointment {
                note: text(col::APPOINTMENT_NOTE),
            },
            "test" => ParentEvent::Test {
                name: text(col::TEST_NAME),
            },
            "mood" => ParentEvent::Mood {
                score: row.number(col::MOOD_SCORE),
                kind: text(col::MOOD_TYPE),
            },
            "mama_sleep" => ParentEvent::Sleep {
                minutes: row.number(col::SLEEP_MINUTES),
            },
            "breastfeeding" => ParentEvent::Breastfeeding,
            "pumping" => ParentEvent::Pumping {
                ml: row.quantity(col::PUMPING_AMOUNT, "ml"),
            },
            "exercise" => ParentEvent::Exercise {
                minutes: row.number(col::EXERCISE_MINUTES),
                kind: text(col::EXERCISE_TYPE),
            },
            "fetal_movements" => ParentEvent::FetalMovements,
            "contractions" => ParentEvent::Contractions,
            "nutrition" => ParentEvent::Nutrition {
                water_litres: row.number(col::WATER_LITRES),
            },
            "symptom" => ParentEvent::Symptom {
                name: text(col::SYMPTOM),
            },
            "postpartum_checkup" => ParentEvent::PostpartumCheckup,
            "pelvic_floor" => ParentEvent::PelvicFloor,
            "mama_milestone" => ParentEvent::Milestone {
                description: text(col::MILESTONE),
            },
            _ => return Ok(None),
        };

        Ok(Some(Self {
            date_label: row.date().to_string(),
            event,
        }))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a row with `values` placed at the given column offsets.
    fn row_with(date: &str, time: &str, activity: &str, values: &[(usize, &str)]) -> EventRow {
        let width = values.iter().map(|(i, _)| i + 1).max().unwrap_or(3).max(3);
        let mut fields = vec![String::new(); width];
        fields[0] = date.to_string();
        fields[1] = time.to_string();
        fields[2] = activity.to_string();
        for (i, v) in values {
            fields[*i] = v.to_string();
        }
        EventRow::from_line(&fields.join(",")).unwrap()
    }

    fn infant(row: &EventRow) -> InfantEvent {
        InfantRecord::decode(row).unwrap().unwrap().event
    }

    fn parent(row: &EventRow) -> ParentEvent {
        ParentRecord::decode(row).unwrap().unwrap().event
    }

    // ── infant decoding ───────────────────────────────────────────────────────

    #[test]
    fn test_decode_feeding() {
        let row = row_with("2024-06-01", "08:30", "feeding", &[(3, "breast")]);
        assert_eq!(
            infant(&row),
            InfantEvent::Feeding {
                kind: Some("breast".into()),
                time: NaiveTime::from_hms_opt(8, 30, 0),
            }
        );
    }

    #[test]
    fn test_decode_feeding_bad_time_voids_only_time() {
        let row = row_with("2024-06-01", "noon", "feeding", &[(3, "bottle")]);
        assert_eq!(
            infant(&row),
            InfantEvent::Feeding {
                kind: Some("bottle".into()),
                time: None,
            }
        );
    }

    #[test]
    fn test_decode_sleep_phases() {
        let start = row_with("2024-06-01", "20:00", "sleep", &[(4, "start"), (5, "90")]);
        assert_eq!(infant(&start), InfantEvent::SleepMarker);

        let end = row_with("2024-06-01", "21:30", "sleep", &[(4, "end"), (5, "90"), (7, "good")]);
        assert_eq!(
            infant(&end),
            InfantEvent::SleepEnd {
                minutes: Some(90),
                quality: Some("good".into()),
            }
        );
    }

    #[test]
    fn test_decode_trims_phase_and_kind() {
        let end = row_with("2024-06-01", "21:30", "sleep", &[(4, " end "), (5, "45")]);
        assert_eq!(
            infant(&end),
            InfantEvent::SleepEnd {
                minutes: Some(45),
                quality: None,
            }
        );

        let weight = row_with("2024-06-01", "", "growth", &[(3, " weight"), (5, "4.1")]);
        assert_eq!(
            infant(&weight),
            InfantEvent::Growth {
                sample: Some(GrowthSample::WeightKg(4.1))
            }
        );
    }

    #[test]
    fn test_decode_growth() {
        let weight = row_with("2024-06-01", "", "growth", &[(3, "weight"), (5, "5.2kg")]);
        assert_eq!(
            infant(&weight),
            InfantEvent::Growth {
                sample: Some(GrowthSample::WeightKg(5.2))
            }
        );

        let height = row_with("2024-06-01", "", "growth", &[(3, "height"), (5, "cm")]);
        assert_eq!(infant(&height), InfantEvent::Growth { sample: None });
    }

    #[test]
    fn test_decode_vaccine_defaults_name() {
        let row = row_with("2024-06-01", "", "vaccine", &[]);
        assert_eq!(
            infant(&row),
            InfantEvent::Vaccine {
                name: "Unknown".into()
            }
        );
    }

    #[test]
    fn test_decode_high_offsets() {
        let row = row_with("2024-06-01", "", "memory", &[(20, "first bath")]);
        assert_eq!(
            infant(&row),
            InfantEvent::Memory {
                description: Some("first bath".into())
            }
        );
    }

    #[test]
    fn test_decode_infant_date_required() {
        let blank = row_with("", "08:00", "feeding", &[]);
        assert_eq!(InfantRecord::decode(&blank), Err(RowError::MissingDate));

        let bad = row_with("June 1", "08:00", "feeding", &[]);
        assert!(matches!(
            InfantRecord::decode(&bad),
            Err(RowError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_decode_unknown_activity() {
        let row = row_with("2024-06-01", "", "bath", &[]);
        assert_eq!(InfantRecord::decode(&row), Ok(None));
    }

    #[test]
    fn test_decode_is_deterministic() {
        let row = row_with("2024-06-01", "", "pumping", &[(5, "120ml")]);
        assert_eq!(InfantRecord::decode(&row), InfantRecord::decode(&row));
        assert_eq!(infant(&row), InfantEvent::Pumping { ml: Some(120.0) });
    }

    // ── parent decoding ───────────────────────────────────────────────────────

    #[test]
    fn test_decode_parent_weight() {
        let row = row_with("2024-01-10", "", "pregnancy_week", &[(7, "72.5"), (8, "1.5")]);
        assert_eq!(
            parent(&row),
            ParentEvent::Weight {
                weight_kg: Some(72.5),
                gain_kg: Some(1.5),
            }
        );
    }

    #[test]
    fn test_decode_parent_date_not_validated() {
        let row = row_with("last tuesday", "", "test", &[(22, "glucose")]);
        let record = ParentRecord::decode(&row).unwrap().unwrap();
        assert_eq!(record.date_label, "last tuesday");
        assert_eq!(
            record.event,
            ParentEvent::Test {
                name: Some("glucose".into())
            }
        );
    }

    #[test]
    fn test_decode_parent_milestone_at_142() {
        let row = row_with("2024-01-10", "", "mama_milestone", &[(142, "first walk")]);
        assert_eq!(
            parent(&row),
            ParentEvent::Milestone {
                description: Some("first walk".into())
            }
        );
    }

    #[test]
    fn test_decode_parent_exercise_bad_minutes() {
        let row = row_with("2024-01-10", "", "exercise", &[(94, "yoga"), (95, "half hour")]);
        assert_eq!(
            parent(&row),
            ParentEvent::Exercise {
                minutes: None,
                kind: Some("yoga".into()),
            }
        );
    }

    #[test]
    fn test_decode_parent_unknown_activity() {
        let row = row_with("2024-01-10", "", "massage", &[]);
        assert_eq!(ParentRecord::decode(&row), Ok(None));
    }
}
