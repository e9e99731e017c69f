//! # Date normalization
//!
//! Reference ephemerides and computed series label their samples differently. Before any
//! join, every label is mapped to the canonical key `YYYY-MM-DD` (UTC calendar date).
//!
//! Accepted forms, tried in order (see [`DATE_FORMATS`]):
//!
//! | Form            | Example                              |
//! |-----------------|--------------------------------------|
//! | ISO date / time | `2025-01-01`, `2025-01-01T12:00:00`  |
//! | Horizons label  | `A.D. 2025-Jan-01 00:00:00.0000`     |
//!
//! The `A.D. ` prefix of the Horizons form is optional and the time-of-day part is ignored
//! by both forms. A label is accepted only if the calendar date exists (checked through
//! `hifitime`), so `2025-Feb-30` is rejected.
use std::sync::LazyLock;

use hifitime::{Epoch, Unit};
use regex::{Captures, Regex};

use crate::constants::Days;

/// Three-letter month abbreviations, index + 1 is the month number.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A date format understood by [`normalize_date`].
pub struct DateFormat {
    pub name: &'static str,
    pattern: &'static LazyLock<Regex>,
    month: fn(&str) -> Option<u8>,
}

static ISO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:[T ].*)?$").expect("ISO date pattern")
});

static HORIZONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:A\.D\.\s+)?(\d{4})-([A-Za-z]{3})-(\d{2})(?:\s.*)?$")
        .expect("Horizons date pattern")
});

fn numeric_month(s: &str) -> Option<u8> {
    s.parse().ok()
}

fn named_month(s: &str) -> Option<u8> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(s))
        .map(|i| i as u8 + 1)
}

/// Supported label formats, in the order they are tried.
pub static DATE_FORMATS: [DateFormat; 2] = [
    DateFormat {
        name: "iso",
        pattern: &ISO_RE,
        month: numeric_month,
    },
    DateFormat {
        name: "horizons",
        pattern: &HORIZONS_RE,
        month: named_month,
    },
];

impl DateFormat {
    fn parse(&self, raw: &str) -> Option<String> {
        let caps: Captures = self.pattern.captures(raw)?;
        let year: i32 = caps[1].parse().ok()?;
        let month = (self.month)(&caps[2])?;
        let day: u8 = caps[3].parse().ok()?;

        Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).ok()?;
        Some(format!("{year:04}-{month:02}-{day:02}"))
    }
}

/// Map a source date label to the canonical `YYYY-MM-DD` key.
///
/// Return
/// ----------
/// * `Some(key)` for the first format in [`DATE_FORMATS`] that matches and yields a
///   valid calendar date, `None` otherwise. Rows whose label fails are dropped by the
///   readers.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    DATE_FORMATS.iter().find_map(|fmt| fmt.parse(raw))
}

/// Canonical key of the computed sample at `elapsed_days` after `start`.
pub fn date_label(start: Epoch, elapsed_days: Days) -> String {
    let (y, m, d, _, _, _, _) = (start + Unit::Day * elapsed_days).to_gregorian_utc();
    format!("{y:04}-{m:02}-{d:02}")
}
