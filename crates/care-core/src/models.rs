use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which subject a profile or event log belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// The baby.
    Infant,
    /// The pregnant or postpartum parent.
    Parent,
}

impl ProfileKind {
    /// The canonical lowercase string identifier for this subject.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Infant => "infant",
            ProfileKind::Parent => "parent",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── InfantProfile ─────────────────────────────────────────────────────────────

/// Static facts about the baby, loaded from the infant profile file.
///
/// Every field is optional: a key that never appears in the file stays
/// `None` rather than defaulting to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfantProfile {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub birth_weight_kg: Option<f64>,
    pub birth_height_cm: Option<f64>,
    pub birth_head_circumference_cm: Option<f64>,
    pub blood_type: Option<String>,
    pub gender: Option<String>,
    pub notes: Option<String>,
}

impl InfantProfile {
    /// Age of the baby on `today`, or `None` without a birth date.
    pub fn age_on(&self, today: NaiveDate) -> Option<InfantAge> {
        self.birth_date
            .map(|birth| InfantAge::from_days((today - birth).num_days()))
    }
}

/// Calendar-approximate age breakdown (365-day years, 30-day months).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfantAge {
    pub total_days: i64,
    pub years: i64,
    pub months: i64,
    pub days: i64,
}

impl InfantAge {
    pub fn from_days(total_days: i64) -> Self {
        Self {
            total_days,
            years: total_days / 365,
            months: (total_days % 365) / 30,
            days: (total_days % 365) % 30,
        }
    }

    /// Age in whole 30-day months, used for the sleep recommendation bracket.
    pub fn age_months(&self) -> i64 {
        self.total_days / 30
    }
}

// ── ParentProfile ─────────────────────────────────────────────────────────────

/// Static facts about the parent, loaded from the parent profile file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentProfile {
    pub name: Option<String>,
    pub last_menstrual_period: Option<NaiveDate>,
    pub expected_due_date: Option<NaiveDate>,
    pub pre_pregnancy_weight_kg: Option<f64>,
    pub blood_type: Option<String>,
    pub height_cm: Option<f64>,
    pub doctor_name: Option<String>,
    pub doctor_phone: Option<String>,
    pub hospital: Option<String>,
    pub allergies: Option<String>,
    pub chronic_conditions: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_type: Option<String>,
    pub baby_name: Option<String>,
    pub notes: Option<String>,
}

impl ParentProfile {
    /// Pre-pregnancy body-mass index: `weight_kg / (height_m)^2`.
    ///
    /// Returns `None` when either input is missing or the height is not
    /// positive.
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.pre_pregnancy_weight_kg?;
        let height_m = self.height_cm? / 100.0;
        if height_m <= 0.0 {
            return None;
        }
        Some(weight / height_m.powi(2))
    }

    /// Pregnancy or postpartum status on `today`.
    ///
    /// A delivery date always wins; otherwise the status is derived from the
    /// last menstrual period. Returns `None` when neither date is known.
    pub fn status_on(&self, today: NaiveDate) -> Option<ParentStatus> {
        if let Some(delivered) = self.delivery_date {
            let days = (today - delivered).num_days();
            return Some(ParentStatus::Postpartum {
                weeks: days / 7,
                days,
            });
        }

        let lmp = self.last_menstrual_period?;
        let since_lmp = (today - lmp).num_days();
        let week = since_lmp / 7;
        Some(ParentStatus::Pregnant {
            week,
            day: since_lmp % 7,
            trimester: trimester_for_week(week),
            days_until_due: self.expected_due_date.map(|due| (due - today).num_days()),
        })
    }
}

/// Where the parent is on the pregnancy / postpartum timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ParentStatus {
    Pregnant {
        week: i64,
        day: i64,
        trimester: u8,
        days_until_due: Option<i64>,
    },
    Postpartum {
        weeks: i64,
        days: i64,
    },
}

/// Weeks 0-13 are the first trimester, 14-27 the second, the rest the third.
pub fn trimester_for_week(week: i64) -> u8 {
    if week <= 13 {
        1
    } else if week <= 27 {
        2
    } else {
        3
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_profile_kind_display() {
        assert_eq!(ProfileKind::Infant.to_string(), "infant");
        assert_eq!(ProfileKind::Parent.as_str(), "parent");
    }

    // ── InfantAge ─────────────────────────────────────────────────────────────

    #[test]
    fn test_infant_age_breakdown() {
        let age = InfantAge::from_days(400);
        assert_eq!(age.years, 1);
        assert_eq!(age.months, 1);
        assert_eq!(age.days, 5);
        assert_eq!(age.age_months(), 13);
    }

    #[test]
    fn test_infant_age_on() {
        let profile = InfantProfile {
            birth_date: Some(date("2024-01-01")),
            ..InfantProfile::default()
        };
        let age = profile.age_on(date("2024-03-01")).unwrap();
        assert_eq!(age.total_days, 60);
        assert_eq!(age.months, 2);
        assert_eq!(age.days, 0);
    }

    #[test]
    fn test_infant_age_without_birth_date() {
        assert!(InfantProfile::default().age_on(date("2024-03-01")).is_none());
    }

    // ── ParentProfile ─────────────────────────────────────────────────────────

    #[test]
    fn test_bmi() {
        let profile = ParentProfile {
            pre_pregnancy_weight_kg: Some(63.36),
            height_cm: Some(160.0),
            ..ParentProfile::default()
        };
        assert!((profile.bmi().unwrap() - 24.75).abs() < 1e-9);
    }

    #[test]
    fn test_bmi_missing_inputs() {
        let profile = ParentProfile {
            pre_pregnancy_weight_kg: Some(60.0),
            ..ParentProfile::default()
        };
        assert!(profile.bmi().is_none());

        let zero_height = ParentProfile {
            pre_pregnancy_weight_kg: Some(60.0),
            height_cm: Some(0.0),
            ..ParentProfile::default()
        };
        assert!(zero_height.bmi().is_none());
    }

    #[test]
    fn test_status_pregnant() {
        let profile = ParentProfile {
            last_menstrual_period: Some(date("2024-01-01")),
            expected_due_date: Some(date("2024-10-07")),
            ..ParentProfile::default()
        };
        let status = profile.status_on(date("2024-04-15")).unwrap();
        assert_eq!(
            status,
            ParentStatus::Pregnant {
                week: 15,
                day: 0,
                trimester: 2,
                days_until_due: Some(175),
            }
        );
    }

    #[test]
    fn test_status_postpartum_wins_over_lmp() {
        let profile = ParentProfile {
            last_menstrual_period: Some(date("2023-04-01")),
            delivery_date: Some(date("2024-01-01")),
            ..ParentProfile::default()
        };
        let status = profile.status_on(date("2024-01-18")).unwrap();
        assert_eq!(status, ParentStatus::Postpartum { weeks: 2, days: 17 });
    }

    #[test]
    fn test_status_unknown() {
        assert!(ParentProfile::default()
            .status_on(date("2024-01-18"))
            .is_none());
    }

    #[test]
    fn test_trimester_boundaries() {
        assert_eq!(trimester_for_week(13), 1);
        assert_eq!(trimester_for_week(14), 2);
        assert_eq!(trimester_for_week(27), 2);
        assert_eq!(trimester_for_week(28), 3);
    }
}
