//! `key,value` profile loading.
//!
//! The first line of a profile file is a header. Each following line is split
//! at its first comma; recognised keys are converted into typed profile
//! fields and everything else is ignored. A value that fails to convert
//! aborts the whole load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use care_core::error::{CareError, Result};
use care_core::models::{InfantProfile, ParentProfile, ProfileKind};
use care_core::time_utils;

// ── BlankValuePolicy ──────────────────────────────────────────────────────────

/// What to do with a recognised key whose value is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankValuePolicy {
    /// Treat the key as not provided.
    Skip,
    /// Assign the blank value: text fields become `""`, typed fields fail.
    Assign,
}

// ── ProfileRecord ─────────────────────────────────────────────────────────────

/// A profile variant that can be populated from `key,value` lines.
pub trait ProfileRecord: Default {
    const KIND: ProfileKind;

    /// Policy used when the caller does not override it.
    const DEFAULT_BLANK_POLICY: BlankValuePolicy;

    /// Apply one key/value pair. Unrecognised keys are ignored and return
    /// `Ok(false)`.
    fn assign(&mut self, key: &str, value: &str) -> Result<bool>;
}

impl ProfileRecord for InfantProfile {
    const KIND: ProfileKind = ProfileKind::Infant;
    const DEFAULT_BLANK_POLICY: BlankValuePolicy = BlankValuePolicy::Assign;

    fn assign(&mut self, key: &str, value: &str) -> Result<bool> {
        let kind = Self::KIND;
        match key {
            "baby_name" => self.name = Some(value.to_string()),
            "birth_date" => self.birth_date = Some(date_value(kind, key, value)?),
            "birth_weight_kg" => self.birth_weight_kg = Some(float_value(kind, key, value)?),
            "birth_height_cm" => self.birth_height_cm = Some(float_value(kind, key, value)?),
            "birth_head_circumference_cm" => {
                self.birth_head_circumference_cm = Some(float_value(kind, key, value)?)
            }
            "blood_type" => self.blood_type = Some(value.to_string()),
            "gender" => self.gender = Some(value.to_string()),
            "notes" => self.notes = Some(value.to_string()),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl ProfileRecord for ParentProfile {
    const KIND: ProfileKind = ProfileKind::Parent;
    const DEFAULT_BLANK_POLICY: BlankValuePolicy = BlankValuePolicy::Skip;

    fn assign(&mut self, key: &str, value: &str) -> Result<bool> {
        let kind = Self::KIND;
        match key {
            "mama_name" => self.name = Some(value.to_string()),
            "last_menstrual_period" => {
                self.last_menstrual_period = Some(date_value(kind, key, value)?)
            }
            "expected_due_date" => self.expected_due_date = Some(date_value(kind, key, value)?),
            "pre_pregnancy_weight_kg" => {
                self.pre_pregnancy_weight_kg = Some(float_value(kind, key, value)?)
            }
            "blood_type" => self.blood_type = Some(value.to_string()),
            "height_cm" => self.height_cm = Some(float_value(kind, key, value)?),
            "doctor_name" => self.doctor_name = Some(value.to_string()),
            "doctor_phone" => self.doctor_phone = Some(value.to_string()),
            "hospital" => self.hospital = Some(value.to_string()),
            "allergies" => self.allergies = Some(value.to_string()),
            "chronic_conditions" => self.chronic_conditions = Some(value.to_string()),
            "delivery_date" => self.delivery_date = Some(date_value(kind, key, value)?),
            "delivery_type" => self.delivery_type = Some(value.to_string()),
            "baby_name" => self.baby_name = Some(value.to_string()),
            "notes" => self.notes = Some(value.to_string()),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parse profile text using the variant's default blank-value policy.
pub fn load_profile<P: ProfileRecord>(text: &str) -> Result<P> {
    load_profile_with(text, P::DEFAULT_BLANK_POLICY)
}

/// Parse profile text with an explicit blank-value policy.
pub fn load_profile_with<P: ProfileRecord>(text: &str, blanks: BlankValuePolicy) -> Result<P> {
    let mut profile = P::default();
    let mut assigned = 0usize;

    for line in text.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(',') else {
            trace!("profile line without a comma: {:?}", line);
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        if value.is_empty() && blanks == BlankValuePolicy::Skip {
            continue;
        }
        if profile.assign(key, value)? {
            assigned += 1;
        } else {
            trace!("ignoring unknown {} profile key {:?}", P::KIND, key);
        }
    }

    debug!("Loaded {} profile with {} fields", P::KIND, assigned);
    Ok(profile)
}

// ── Field conversion ──────────────────────────────────────────────────────────

fn date_value(kind: ProfileKind, key: &str, value: &str) -> Result<NaiveDate> {
    time_utils::parse_date(value)
        .map_err(|_| CareError::profile_field(kind, key, value, "expected YYYY-MM-DD"))
}

fn float_value(kind: ProfileKind, key: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|e| CareError::profile_field(kind, key, value, e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        time_utils::parse_date(s).unwrap()
    }

    const INFANT: &str = "field,value\n\
        baby_name,Mila\n\
        birth_date,2024-03-01\n\
        birth_weight_kg,3.4\n\
        birth_height_cm,50\n\
        gender,female\n\
        notes,born at 02:10, healthy\n\
        favourite_toy,giraffe\n";

    const PARENT: &str = "field,value\n\
        mama_name,Ana\n\
        last_menstrual_period,2023-06-01\n\
        pre_pregnancy_weight_kg,60\n\
        height_cm,165\n\
        hospital,\n\
        delivery_date,2024-03-01\n";

    // ── infant profile ────────────────────────────────────────────────────────

    #[test]
    fn test_load_infant_profile() {
        let profile: InfantProfile = load_profile(INFANT).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Mila"));
        assert_eq!(profile.birth_date, Some(date("2024-03-01")));
        assert_eq!(profile.birth_weight_kg, Some(3.4));
        assert_eq!(profile.birth_height_cm, Some(50.0));
        assert_eq!(profile.birth_head_circumference_cm, None);
        assert_eq!(profile.gender.as_deref(), Some("female"));
    }

    #[test]
    fn test_value_split_at_first_comma_only() {
        let profile: InfantProfile = load_profile(INFANT).unwrap();
        assert_eq!(profile.notes.as_deref(), Some("born at 02:10, healthy"));
    }

    #[test]
    fn test_header_line_is_skipped() {
        let profile: InfantProfile = load_profile("baby_name,Header\nbaby_name,Real\n").unwrap();
        assert_eq!(profile.name.as_deref(), Some("Real"));
    }

    #[test]
    fn test_infant_blank_typed_value_fails_by_default() {
        let err = load_profile::<InfantProfile>("field,value\nbirth_weight_kg,\n").unwrap_err();
        assert!(matches!(
            err,
            CareError::ProfileField { profile: ProfileKind::Infant, ref key, .. } if key == "birth_weight_kg"
        ));
    }

    #[test]
    fn test_infant_blank_text_value_assigned_by_default() {
        let profile: InfantProfile = load_profile("field,value\ngender,\n").unwrap();
        assert_eq!(profile.gender.as_deref(), Some(""));
    }

    #[test]
    fn test_infant_blank_values_skippable() {
        let text = "field,value\nbirth_weight_kg,\ngender,\n";
        let profile: InfantProfile = load_profile_with(text, BlankValuePolicy::Skip).unwrap();
        assert_eq!(profile.birth_weight_kg, None);
        assert_eq!(profile.gender, None);
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let err = load_profile::<InfantProfile>("field,value\nbirth_date,01/03/2024\n").unwrap_err();
        assert!(err.to_string().contains("birth_date"));
    }

    // ── parent profile ────────────────────────────────────────────────────────

    #[test]
    fn test_load_parent_profile() {
        let profile: ParentProfile = load_profile(PARENT).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Ana"));
        assert_eq!(profile.pre_pregnancy_weight_kg, Some(60.0));
        assert_eq!(profile.height_cm, Some(165.0));
        assert_eq!(profile.delivery_date, Some(date("2024-03-01")));
    }

    #[test]
    fn test_parent_blank_values_skipped_by_default() {
        let profile: ParentProfile = load_profile(PARENT).unwrap();
        assert_eq!(profile.hospital, None);
    }

    #[test]
    fn test_parent_blank_values_assignable() {
        let profile: ParentProfile = load_profile_with(PARENT, BlankValuePolicy::Assign).unwrap();
        assert_eq!(profile.hospital.as_deref(), Some(""));
    }

    #[test]
    fn test_parent_bad_number_is_fatal() {
        let result = load_profile::<ParentProfile>("field,value\nheight_cm,tall\n");
        assert!(matches!(result, Err(CareError::ProfileField { .. })));
    }

    #[test]
    fn test_lines_without_comma_ignored() {
        let profile: ParentProfile = load_profile("field,value\nmama_name\nheight_cm,170\n").unwrap();
        assert_eq!(profile.name, None);
        assert_eq!(profile.height_cm, Some(170.0));
    }
}
