use crate::models::InfantAge;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use care_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let scale = 10_u64.pow(decimals);
    // Work in whole units of the last shown digit. The relative nudge makes
    // values such as 1.005 round half up despite their binary representation.
    let units = (value.abs() * scale as f64 * (1.0 + f64::EPSILON)).round() as u64;

    let sign = if value < 0.0 && units > 0 { "-" } else { "" };
    let whole = group_thousands(units / scale);
    if decimals == 0 {
        format!("{sign}{whole}")
    } else {
        let frac = units % scale;
        format!("{sign}{whole}.{frac:0width$}", width = decimals as usize)
    }
}

/// Format a measured quantity followed by its unit.
///
/// # Examples
///
/// ```
/// use care_core::formatting::format_quantity;
///
/// assert_eq!(format_quantity(1250.0, 0, "ml"), "1,250 ml");
/// assert_eq!(format_quantity(4.25, 2, "kg"), "4.25 kg");
/// ```
pub fn format_quantity(value: f64, decimals: u32, unit: &str) -> String {
    format!("{} {}", format_number(value, decimals), unit)
}

/// Format a change with an explicit sign, e.g. `"+1.20"` or `"-0.35"`.
pub fn format_signed(value: f64, decimals: u32) -> String {
    let body = format_number(value, decimals);
    if body.starts_with('-') {
        body
    } else {
        format!("+{}", body)
    }
}

/// Format a duration in minutes as a human-readable string.
///
/// * `< 60` minutes → `"45m"`
/// * `≥ 60` minutes, no remainder → `"3h"`
/// * `≥ 60` minutes, with remainder → `"3h 45m"`
///
/// # Examples
///
/// ```
/// use care_core::formatting::format_minutes;
///
/// assert_eq!(format_minutes(45.0),  "45m");
/// assert_eq!(format_minutes(60.0),  "1h");
/// assert_eq!(format_minutes(225.0), "3h 45m");
/// ```
pub fn format_minutes(minutes: f64) -> String {
    let total_mins = minutes.round() as i64;
    if total_mins < 60 {
        format!("{}m", total_mins)
    } else {
        let hours = total_mins / 60;
        let mins = total_mins % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

/// Format a baby's age, omitting years while under one year.
///
/// # Examples
///
/// ```
/// use care_core::formatting::format_age;
/// use care_core::models::InfantAge;
///
/// assert_eq!(format_age(&InfantAge::from_days(75)), "2 months, 15 days (75 days total)");
/// assert_eq!(
///     format_age(&InfantAge::from_days(400)),
///     "1 years, 1 months, 5 days (400 days total)"
/// );
/// ```
pub fn format_age(age: &InfantAge) -> String {
    if age.years > 0 {
        format!(
            "{} years, {} months, {} days ({} days total)",
            age.years, age.months, age.days, age.total_days
        )
    } else {
        format!(
            "{} months, {} days ({} days total)",
            age.months, age.days, age.total_days
        )
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Render `n` with a comma between every group of three digits.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
