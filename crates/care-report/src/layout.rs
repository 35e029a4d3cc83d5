//! Plain-text layout primitives: titled sections with aligned label/value
//! rows, severity markers and simple progress bars.

use std::fmt::Write as _;

use unicode_width::UnicodeWidthStr;

use care_core::advisories::{Advisory, Severity};

/// Width of the horizontal rule under section titles.
pub const RULE_WIDTH: usize = 60;

/// Width of progress bars in terminal columns.
pub const BAR_WIDTH: usize = 20;

// ── Markers ───────────────────────────────────────────────────────────────────

/// Marker emoji shown in front of an advisory.
pub fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Normal => "✅",
        Severity::Info => "💡",
        Severity::Warning => "⚠️",
        Severity::Critical => "🚨",
    }
}

/// Build a bar string, capping fill at 100 %.
///
/// ```
/// use care_report::layout::build_bar;
///
/// assert_eq!(build_bar(50.0, 4), "██░░");
/// assert_eq!(build_bar(250.0, 4), "████");
/// ```
pub fn build_bar(pct: f64, width: usize) -> String {
    let capped = if pct.is_finite() { pct.clamp(0.0, 100.0) } else { 0.0 };
    let filled = ((capped / 100.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Pad `text` with trailing spaces to `width` display columns.
pub fn pad_to(text: &str, width: usize) -> String {
    let shown = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(shown)))
}

// ── Section ───────────────────────────────────────────────────────────────────

enum Entry {
    Row { label: String, value: String },
    Item(String),
    Advisory(Advisory),
    Blank,
}

/// A titled block of output.
///
/// Rows are collected first and rendered together so every value in the
/// section starts in the same column, whatever the display width of the
/// labels.
pub struct Section {
    icon: &'static str,
    title: String,
    entries: Vec<Entry>,
}

impl Section {
    pub fn new(icon: &'static str, title: impl Into<String>) -> Self {
        Self {
            icon,
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Add a `label: value` row.
    pub fn row(&mut self, label: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push(Entry::Row {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    /// Add a row only when `value` is present.
    pub fn row_opt(&mut self, label: &str, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.row(label, value);
        }
        self
    }

    /// Add an indented bullet line.
    pub fn item(&mut self, text: impl Into<String>) -> &mut Self {
        self.entries.push(Entry::Item(text.into()));
        self
    }

    pub fn advisory(&mut self, advisory: &Advisory) -> &mut Self {
        self.entries.push(Entry::Advisory(advisory.clone()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.entries.push(Entry::Blank);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the section, ending with a newline.
    pub fn render(&self) -> String {
        let label_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Row { label, .. } => Some(UnicodeWidthStr::width(label.as_str()) + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        let _ = writeln!(out, "{} {}", self.icon, self.title);
        let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH));

        for entry in &self.entries {
            match entry {
                Entry::Row { label, value } => {
                    let _ = writeln!(out, "  {}  {}", pad_to(&format!("{label}:"), label_width), value);
                }
                Entry::Item(text) => {
                    let _ = writeln!(out, "    • {text}");
                }
                Entry::Advisory(advisory) => {
                    let _ = writeln!(
                        out,
                        "  {} {}",
                        severity_marker(advisory.severity),
                        advisory.message
                    );
                }
                Entry::Blank => out.push('\n'),
            }
        }
        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use care_core::advisories::AdvisoryCode;

    // ── build_bar ─────────────────────────────────────────────────────────────

    #[test]
    fn test_build_bar_bounds() {
        assert_eq!(build_bar(0.0, 10), "░".repeat(10));
        assert_eq!(build_bar(100.0, 10), "█".repeat(10));
        assert_eq!(build_bar(-5.0, 3), "░░░");
        assert_eq!(build_bar(f64::NAN, 3), "░░░");
    }

    // ── pad_to ────────────────────────────────────────────────────────────────

    #[test]
    fn test_pad_to_uses_display_width() {
        assert_eq!(pad_to("ab", 4), "ab  ");
        // Wide characters count as two columns.
        assert_eq!(pad_to("宝宝", 5), "宝宝 ");
        assert_eq!(pad_to("toolong", 3), "toolong");
    }

    // ── Section ───────────────────────────────────────────────────────────────

    #[test]
    fn test_section_aligns_values() {
        let mut section = Section::new("🍼", "Feeding");
        section.row("Today", "5").row("Per day", "6.2");
        let text = section.render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "🍼 Feeding");
        assert_eq!(lines[2], "  Today:    5");
        assert_eq!(lines[3], "  Per day:  6.2");
    }

    #[test]
    fn test_section_skips_absent_rows() {
        let mut section = Section::new("📈", "Growth");
        section.row_opt("Weight", None);
        assert!(section.is_empty());
        section.row_opt("Height", Some("60 cm".into()));
        assert!(section.render().contains("Height:  60 cm"));
    }

    #[test]
    fn test_section_advisory_marker() {
        let mut section = Section::new("🌡️", "Temperature");
        section.advisory(&Advisory::new(
            AdvisoryCode::Temperature,
            Severity::Critical,
            "Fever detected",
        ));
        section.item("first");
        let text = section.render();
        assert!(text.contains("🚨 Fever detected"));
        assert!(text.contains("    • first"));
    }
}
