//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Trim, collapse internal whitespace and lowercase a free-form label
pub fn normalize_label(raw: &str) -> String {
    whitespace().replace_all(raw.trim(), " ").to_lowercase()
}

/// Completed years between `birthdate` and `today`; `None` for future birthdates
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birthdate > today {
        return None;
    }

    let mut years = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        years -= 1;
    }

    u32::try_from(years).ok()
}

/// True for `yes` answers regardless of case or surrounding whitespace
pub fn is_yes(value: Option<&str>) -> bool {
    value.map(|v| v.trim().eq_ignore_ascii_case("yes")).unwrap_or(false)
}

/// Returns the trimmed value when it carries any content
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validate that a required text field is present
pub fn require_text(field: &str, value: &str) -> Result<(), crate::utils::errors::PortalError> {
    if value.trim().is_empty() {
        return Err(crate::utils::errors::PortalError::InvalidInput(format!(
            "{field} is required"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Core   Youth(18-24 yrs old) "), "core youth(18-24 yrs old)");
        assert_eq!(normalize_label("College\tGrad"), "college grad");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_age_on_respects_birthday() {
        let birthdate = date(2005, 6, 15);
        assert_eq!(age_on(birthdate, date(2025, 6, 14)), Some(19));
        assert_eq!(age_on(birthdate, date(2025, 6, 15)), Some(20));
        assert_eq!(age_on(birthdate, date(2004, 1, 1)), None);
    }

    #[test]
    fn test_leap_day_birthdays() {
        let birthdate = date(2004, 2, 29);
        assert_eq!(age_on(birthdate, date(2022, 2, 28)), Some(17));
        assert_eq!(age_on(birthdate, date(2022, 3, 1)), Some(18));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes(Some("Yes")));
        assert!(is_yes(Some(" yes ")));
        assert!(is_yes(Some("YES")));
        assert!(!is_yes(Some("No")));
        assert!(!is_yes(None));
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("first_name", "Juan").is_ok());
        assert!(require_text("first_name", "   ").is_err());
    }
}
