//! Cell formatting
//!
//! Each column declares a [`ColumnKind`]; [`format_cell`] turns a raw
//! [`CellValue`] into display text plus a tone hint for the renderer.
//! Formatting is pure so it can be tested without a UI.

use chrono::{DateTime, TimeZone, Utc};

use crate::row::CellValue;

/// Display format used when a date has no value
pub const EMPTY_DATE: &str = "N/A";

/// Placeholder for empty badges and missing values
pub const EMPTY_CELL: &str = "-";

const DATE_FORMAT: &str = "%b %d, %Y %H:%M:%S";

/// How a column's values are presented
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    /// Plain text
    Text,
    /// Social handle, shown with a leading `@`
    Handle,
    /// Coloured badge
    Badge(BadgeRule),
    /// Truncated text with an external link built from the row
    Link { max_chars: usize },
    /// Number with fixed decimals and optional thousands separators
    Numeric { decimals: usize, grouping: bool },
    /// Ratio rendered as a percentage (`0.25` -> `25.00%`)
    Percent { decimals: usize },
    /// Epoch seconds or RFC 3339 text rendered as a UTC date
    Date,
    /// Seconds until a token went to zero; zero means it never did
    Duration,
    /// Image URL, rendered as text when images are unavailable
    Image,
}

/// Badge colouring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRule {
    /// `true` -> "Yes" (success), `false` -> "No" (destructive)
    YesNo,
    /// Gold/silver/bronze dog tiers
    DogTier,
}

/// Colour hint attached to formatted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Muted,
    Success,
    Destructive,
    Gold,
    Silver,
    Bronze,
    Outline,
}

/// Formatted cell content
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellText {
    pub text: String,
    pub tone: Tone,
    /// Untruncated text, when `text` was shortened
    pub full_text: Option<String>,
    /// External link target
    pub href: Option<String>,
    /// Right-align numeric content
    pub align_right: bool,
}

impl CellText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            ..Default::default()
        }
    }

    fn numeric(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            align_right: true,
            ..Default::default()
        }
    }
}

/// Format a cell value for the given column kind
pub fn format_cell(kind: &ColumnKind, value: &CellValue) -> CellText {
    match kind {
        ColumnKind::Text | ColumnKind::Image => CellText::plain(value.facet_key()),
        ColumnKind::Handle => match value {
            CellValue::Missing => CellText::toned(EMPTY_CELL, Tone::Muted),
            other => CellText::plain(format!("@{}", other.facet_key())),
        },
        ColumnKind::Badge(rule) => format_badge(*rule, value),
        ColumnKind::Link { max_chars } => {
            let full = value.facet_key();
            let text = truncate(&full, *max_chars);
            let full_text = (text != full).then_some(full);
            CellText {
                text,
                full_text,
                ..Default::default()
            }
        }
        ColumnKind::Numeric { decimals, grouping } => match value.as_number() {
            Some(n) => CellText::numeric(format_number(n, *decimals, *grouping)),
            None => CellText::toned(EMPTY_CELL, Tone::Muted),
        },
        ColumnKind::Percent { decimals } => match value.as_number() {
            Some(n) => CellText::numeric(format!("{}%", format_number(n * 100.0, *decimals, true))),
            None => CellText::toned(EMPTY_CELL, Tone::Muted),
        },
        ColumnKind::Date => match parse_datetime(value) {
            Some(dt) => CellText::plain(dt.format(DATE_FORMAT).to_string()),
            None => CellText::toned(EMPTY_DATE, Tone::Muted),
        },
        ColumnKind::Duration => match value.as_number() {
            Some(n) if n > 0.0 => CellText::numeric(format!("{}s", format_number(n, 0, false))),
            _ => {
                let mut text = CellText::numeric("Not zeroed");
                text.tone = Tone::Muted;
                text
            }
        },
    }
}

fn format_badge(rule: BadgeRule, value: &CellValue) -> CellText {
    match rule {
        BadgeRule::YesNo => match value.as_bool() {
            Some(true) => CellText::toned("Yes", Tone::Success),
            Some(false) => CellText::toned("No", Tone::Destructive),
            None => CellText::toned(EMPTY_CELL, Tone::Muted),
        },
        BadgeRule::DogTier => match value.as_text().filter(|s| !s.is_empty()) {
            None => CellText::toned(EMPTY_CELL, Tone::Muted),
            Some(dog) => {
                let tone = match dog {
                    "金狗" => Tone::Gold,
                    "银狗" => Tone::Silver,
                    "铜狗" => Tone::Bronze,
                    _ => Tone::Outline,
                };
                CellText::toned(dog, tone)
            }
        },
    }
}

/// Interpret a cell as a UTC timestamp.
///
/// Accepts epoch seconds (numbers or timestamps) and RFC 3339 text.
pub fn parse_datetime(value: &CellValue) -> Option<DateTime<Utc>> {
    match value {
        CellValue::Timestamp(secs) => Utc.timestamp_opt(*secs, 0).single(),
        CellValue::Number(n) if n.is_finite() => Utc.timestamp_opt(*n as i64, 0).single(),
        CellValue::Text(s) if !s.is_empty() => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// Format a number with fixed decimals and optional thousands separators
pub fn format_number(value: f64, decimals: usize, grouping: bool) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }

    if grouping {
        let digits = int_part.len();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (digits - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
    } else {
        out.push_str(int_part);
    }

    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }

    out
}

/// Shorten text to `max_chars` characters, appending an ellipsis
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(1234567.891, 2, true), "1,234,567.89");
        assert_eq!(format_number(999.0, 0, true), "999");
        assert_eq!(format_number(1000.0, 0, true), "1,000");
        assert_eq!(format_number(-1234.5, 1, true), "-1,234.5");
        assert_eq!(format_number(1234.5, 2, false), "1234.50");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_number(-0.001, 2, true), "0.00");
    }

    #[test]
    fn test_yes_no_badge() {
        let kind = ColumnKind::Badge(BadgeRule::YesNo);
        assert_eq!(format_cell(&kind, &CellValue::Bool(true)).tone, Tone::Success);
        assert_eq!(format_cell(&kind, &CellValue::Bool(false)).text, "No");
    }

    #[test]
    fn test_dog_badge_tiers() {
        let kind = ColumnKind::Badge(BadgeRule::DogTier);
        assert_eq!(format_cell(&kind, &CellValue::from("金狗")).tone, Tone::Gold);
        assert_eq!(format_cell(&kind, &CellValue::from("土狗")).tone, Tone::Outline);
        assert_eq!(format_cell(&kind, &CellValue::Missing).text, EMPTY_CELL);
    }

    #[test]
    fn test_duration_zero_is_not_zeroed() {
        assert_eq!(format_cell(&ColumnKind::Duration, &CellValue::Number(0.0)).text, "Not zeroed");
        assert_eq!(format_cell(&ColumnKind::Duration, &CellValue::Number(90.0)).text, "90s");
    }

    #[test]
    fn test_date_from_epoch_and_rfc3339() {
        let epoch = format_cell(&ColumnKind::Date, &CellValue::Timestamp(0));
        assert_eq!(epoch.text, "Jan 01, 1970 00:00:00");

        let text = format_cell(&ColumnKind::Date, &CellValue::from("2024-03-05T10:20:30Z"));
        assert_eq!(text.text, "Mar 05, 2024 10:20:30");

        let empty = format_cell(&ColumnKind::Date, &CellValue::from(""));
        assert_eq!(empty.text, EMPTY_DATE);
    }

    #[test]
    fn test_link_truncation_keeps_full_text() {
        let kind = ColumnKind::Link { max_chars: 6 };
        let cell = format_cell(&kind, &CellValue::from("0x1234567890"));
        assert_eq!(cell.text, "0x1234…");
        assert_eq!(cell.full_text.as_deref(), Some("0x1234567890"));
    }

    #[test]
    fn test_percent() {
        let cell = format_cell(&ColumnKind::Percent { decimals: 2 }, &CellValue::Number(0.256));
        assert_eq!(cell.text, "25.60%");
        assert!(cell.align_right);
    }
}
