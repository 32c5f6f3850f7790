//! Date normalization for the spreadsheet's mixed encodings.
//!
//! Three encodings reach this crate: the spreadsheet feed's serialized
//! triple `Date(year, monthZeroBased, day)` embedded in free text, ISO
//! `YYYY-MM-DD` from form inputs, and the storage-native `DD/MM/YYYY`.
//! [`normalize`] canonicalizes to storage form; [`parse`] turns canonical or
//! ISO input into a [`NaiveDate`] for interval math. Both recover from bad
//! input by returning `None`/unchanged values — a malformed date is "no
//! date", never an error.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Canonicalize a raw date value to storage form `DD/MM/YYYY`.
///
/// Accepts the serialized `Date(y, m0, d)` triple (month is zero-based),
/// ISO `YYYY-MM-DD`, or already-canonical input. Unrecognized non-empty
/// input is returned unchanged; `None`/empty input collapses to `None`.
pub fn normalize(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(canonical) = normalize_serial_triple(raw) {
        return Some(canonical);
    }

    if is_iso(raw) {
        let (year, rest) = raw.split_at(4);
        let (month, day) = (&rest[1..3], &rest[4..6]);
        return Some(format!("{day}/{month}/{year}"));
    }

    Some(raw.to_string())
}

/// `Date(2024, 2, 5)` → `05/03/2024`. The triple's month is zero-based.
fn normalize_serial_triple(raw: &str) -> Option<String> {
    let start = raw.find("Date(")?;
    let inner = &raw[start + 5..];
    let inner = &inner[..inner.find(')')?];

    let mut parts = inner.splitn(3, ',');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month0: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;

    Some(format!("{day:02}/{:02}/{year}", month0 + 1))
}

/// Parse a canonical `DD/MM/YYYY` or ISO `YYYY-MM-DD` value for interval
/// comparisons. Returns `None` for missing, empty or unparseable input;
/// callers treat `None` as "no date".
pub fn parse(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    tracing::debug!(raw, "unparseable date value");
    None
}

/// Storage form → form-input form: `DD/MM/YYYY` → `YYYY-MM-DD`.
///
/// Pure textual rearrangement, loss-free against [`normalize`] for
/// well-formed 4-digit-year input. Anything else yields `None`.
pub fn to_input(raw: &str) -> Option<String> {
    if !is_dmy(raw) {
        return None;
    }
    let (day, rest) = raw.split_at(2);
    let (month, year) = (&rest[1..3], &rest[4..8]);
    Some(format!("{year}-{month}-{day}"))
}

/// Render a date in storage form `DD/MM/YYYY`.
pub fn format_dmy(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn is_iso(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter().enumerate().all(|(i, c)| matches!(i, 4 | 7) || c.is_ascii_digit())
}

fn is_dmy(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[2] == b'/'
        && b[5] == b'/'
        && b.iter().enumerate().all(|(i, c)| matches!(i, 2 | 5) || c.is_ascii_digit())
}

// ============================================================================
// YearMonth
// ============================================================================

/// A calendar month, the unit the board pages by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Build a month; `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        // Month is validated at construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap()
    }

    pub fn last_day(self) -> NaiveDate {
        self.succ().first_day() - Days::new(1)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The following month.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// The preceding month.
    pub fn pred(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = String;

    /// Parses `YYYY-MM`, the form the CLI takes months in.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = || {
            let (year, month) = s.split_once('-')?;
            let year: i32 = year.parse().ok()?;
            let month: u32 = month.parse().ok()?;
            Self::new(year, month)
        };
        parse().ok_or_else(|| format!("invalid month '{s}', expected YYYY-MM"))
    }
}

// ============================================================================
// Tests
// ============================================================================
