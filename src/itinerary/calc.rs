//! Pure derived-value calculators: hotel nights, installment remainder,
//! activity fill counts.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use super::model::{ActivityEntry, InstallmentAmount};

lazy_static! {
    static ref DISPLAY_DATE_RE: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
}

/// Parse a `DD/MM/YYYY` display date. Returns `None` for anything that is
/// not exactly that shape or does not name a real calendar day
/// (e.g. 31/02/2024).
pub fn parse_display_date(value: &str) -> Option<NaiveDate> {
    if !DISPLAY_DATE_RE.is_match(value) {
        return None;
    }
    let mut parts = value.split('/');
    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Nights between a check-in/check-out pair. Zero when either date is
/// missing or malformed, or when check-out is not after check-in.
pub fn nights_between(check_in: &str, check_out: &str) -> u32 {
    let (Some(start), Some(end)) = (parse_display_date(check_in), parse_display_date(check_out))
    else {
        return 0;
    };
    (end - start).num_days().max(0) as u32
}

/// The third installment is always derived: `total - first - second` while
/// positive, otherwise the literal `Remaining` marker.
pub fn installment_remainder(total_amount: f64, first: f64, second: f64) -> InstallmentAmount {
    let remaining = total_amount - first - second;
    if remaining > 0.0 {
        InstallmentAmount::Amount(remaining)
    } else {
        InstallmentAmount::remaining()
    }
}

/// How many activity rows carry any content.
pub fn filled_activity_count(activities: &[ActivityEntry]) -> usize {
    activities.iter().filter(|entry| entry.is_filled()).count()
}
