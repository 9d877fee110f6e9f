//! Primitive field validators and the chain combinator.
//!
//! Validators are pure predicates returning `None` on success or a
//! human-readable message. They never panic and never throw; blank values
//! pass every rule except `required`, so optional fields compose the same
//! rules without a separate "optional" wrapper.

use lazy_static::lazy_static;
use regex::Regex;

use crate::itinerary::calc::parse_display_date;
use crate::itinerary::model::IATA_CODE_LENGTH;

pub const REQUIRED_FIELD: &str = "This field is required";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_PHONE: &str = "Please enter a valid phone number";
pub const INVALID_DATE: &str = "Please enter a valid date";
pub const DATE_ORDER: &str = "Arrival date must be after departure date";
pub const CHECKOUT_AFTER_CHECKIN: &str = "Check-out date must be after check-in date";
pub const MIN_ACTIVITIES: &str = "At least 7 activities recommended";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9][0-9]{0,15}$").unwrap();
    static ref IATA_RE: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();
}

pub fn min_length_message(min: usize) -> String {
    format!("Minimum {min} characters required")
}

pub fn max_length_message(max: usize) -> String {
    format!("Maximum {max} characters allowed")
}

pub fn min_value_message(min: f64) -> String {
    format!("Value must be at least {min}")
}

pub fn max_value_message(max: f64) -> String {
    format!("Value must be at most {max}")
}

/// Run rules left to right, returning the first failure. Later rules are
/// not evaluated once one fails.
pub fn compose(value: &str, rules: &[&dyn Fn(&str) -> Option<String>]) -> Option<String> {
    rules.iter().find_map(|rule| rule(value))
}

pub fn required(value: &str) -> Option<String> {
    if value.is_empty() {
        Some(REQUIRED_FIELD.to_string())
    } else {
        None
    }
}

pub fn min_length(min: usize) -> impl Fn(&str) -> Option<String> {
    move |value| {
        if !value.is_empty() && value.chars().count() < min {
            Some(min_length_message(min))
        } else {
            None
        }
    }
}

pub fn max_length(max: usize) -> impl Fn(&str) -> Option<String> {
    move |value| {
        if !value.is_empty() && value.chars().count() > max {
            Some(max_length_message(max))
        } else {
            None
        }
    }
}

/// Numeric bound pair. Values are always present on the record (zero means
/// "not filled in yet"), so there is no required step for numbers.
pub fn numeric_range(value: f64, min: f64, max: Option<f64>) -> Option<String> {
    if value < min {
        return Some(min_value_message(min));
    }
    if let Some(max) = max {
        if value > max {
            return Some(max_value_message(max));
        }
    }
    None
}

pub fn email(value: &str) -> Option<String> {
    if !value.is_empty() && !EMAIL_RE.is_match(value) {
        Some(INVALID_EMAIL.to_string())
    } else {
        None
    }
}

/// Phone: strip common separators, then `+` plus 1..=16 digits with no
/// leading zero.
pub fn phone(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let stripped: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    if PHONE_RE.is_match(&stripped) {
        None
    } else {
        Some(INVALID_PHONE.to_string())
    }
}

pub fn iata_code(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if value.chars().count() != IATA_CODE_LENGTH || !IATA_RE.is_match(value) {
        Some(format!(
            "IATA code must be exactly {IATA_CODE_LENGTH} uppercase letters"
        ))
    } else {
        None
    }
}

/// Strict `DD/MM/YYYY`: right shape and a real calendar day.
pub fn date(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if parse_display_date(value).is_none() {
        Some(INVALID_DATE.to_string())
    } else {
        None
    }
}

/// `value` must be strictly after `after`. Silently passes when either side
/// is blank or unparseable; `date` is expected earlier in the chain.
pub fn date_after<'a>(after: &'a str) -> impl Fn(&str) -> Option<String> + 'a {
    move |value| {
        let (Some(candidate), Some(reference)) =
            (parse_display_date(value), parse_display_date(after))
        else {
            return None;
        };
        if candidate <= reference {
            Some(DATE_ORDER.to_string())
        } else {
            None
        }
    }
}

pub fn checkout_after_checkin<'a>(check_in: &'a str) -> impl Fn(&str) -> Option<String> + 'a {
    move |check_out| {
        let (Some(out), Some(inn)) =
            (parse_display_date(check_out), parse_display_date(check_in))
        else {
            return None;
        };
        if out <= inn {
            Some(CHECKOUT_AFTER_CHECKIN.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required(""), Some(REQUIRED_FIELD.to_string()));
        assert_eq!(required("x"), None);
        // no trimming: whitespace counts as content
        assert_eq!(required(" "), None);
    }

    #[test]
    fn test_compose_returns_first_failure_only() {
        // value fails both required-length and date shape; only the first
        // rule in the chain may report
        let outcome = compose("x", &[&min_length(5), &date]);
        assert_eq!(outcome, Some(min_length_message(5)));

        let outcome = compose("x", &[&date, &min_length(5)]);
        assert_eq!(outcome, Some(INVALID_DATE.to_string()));
    }

    #[test]
    fn test_compose_short_circuits() {
        use std::cell::Cell;
        let later_ran = Cell::new(false);
        let failing = |_: &str| Some("first".to_string());
        let spy = |_: &str| {
            later_ran.set(true);
            None
        };
        assert_eq!(compose("v", &[&failing, &spy]), Some("first".to_string()));
        assert!(!later_ran.get());
    }

    #[test]
    fn test_email() {
        assert_eq!(email("user@example.com"), None);
        assert_eq!(email(""), None);
        assert_eq!(email("not-an-email"), Some(INVALID_EMAIL.to_string()));
        assert_eq!(email("a@b"), Some(INVALID_EMAIL.to_string()));
    }

    #[test]
    fn test_phone() {
        assert_eq!(phone("+91-9504061112"), None);
        assert_eq!(phone("(980) 1234-5678"), None);
        assert_eq!(phone(""), None);
        // leading zero is rejected even with separators stripped
        assert_eq!(phone("(080) 1234-5678"), Some(INVALID_PHONE.to_string()));
        assert_eq!(phone("0123"), Some(INVALID_PHONE.to_string()));
        assert_eq!(phone("12345678901234567"), Some(INVALID_PHONE.to_string()));
        assert_eq!(phone("abc"), Some(INVALID_PHONE.to_string()));
    }

    #[test]
    fn test_iata_code() {
        assert_eq!(iata_code("DEL"), None);
        assert_eq!(iata_code(""), None);
        assert!(iata_code("del").is_some());
        assert!(iata_code("DELHI").is_some());
        assert!(iata_code("D1L").is_some());
    }

    #[test]
    fn test_date_strictness() {
        assert_eq!(date("01/12/2024"), None);
        assert_eq!(date("31/02/2024"), Some(INVALID_DATE.to_string()));
        assert_eq!(date("2024-12-01"), Some(INVALID_DATE.to_string()));
    }

    #[test]
    fn test_date_after() {
        let rule = date_after("01/12/2024");
        assert_eq!(rule("05/12/2024"), None);
        assert_eq!(rule("01/12/2024"), Some(DATE_ORDER.to_string()));
        assert_eq!(rule("30/11/2024"), Some(DATE_ORDER.to_string()));
        // unparseable reference passes through
        let rule = date_after("");
        assert_eq!(rule("05/12/2024"), None);
    }

    #[test]
    fn test_checkout_after_checkin() {
        let rule = checkout_after_checkin("10/01/2025");
        assert_eq!(rule("13/01/2025"), None);
        assert_eq!(rule("10/01/2025"), Some(CHECKOUT_AFTER_CHECKIN.to_string()));
    }

    #[test]
    fn test_numeric_range() {
        assert_eq!(numeric_range(5.0, 1.0, Some(30.0)), None);
        assert_eq!(numeric_range(0.0, 1.0, Some(30.0)), Some(min_value_message(1.0)));
        assert_eq!(numeric_range(31.0, 1.0, Some(30.0)), Some(max_value_message(30.0)));
        assert_eq!(numeric_range(0.0, 0.0, None), None);
    }
}
