//! Input validators. None of these touch the database.

use crate::error::{Result, SchedulerError};
use crate::models::{CourseTime, Weekday};

/// True for one of the seven capitalized weekday names, weekend included.
/// Surrounding whitespace is ignored, as in [`parse_day`].
pub fn is_valid_day(day: &str) -> bool {
    parse_day(day).is_ok()
}

/// True when `time` reads as `HH:MM AM/PM`
pub fn is_valid_time(time: &str) -> bool {
    CourseTime::parse(time).is_ok()
}

/// A student name needs at least a first and a last name
pub fn is_valid_student_name(name: &str) -> bool {
    name.split_whitespace().count() >= 2
}

pub fn parse_day(day: &str) -> Result<Weekday> {
    day.trim().parse()
}

pub fn parse_time(time: &str) -> Result<CourseTime> {
    CourseTime::parse(time)
}

/// Returns the trimmed name if it has at least two tokens
pub fn student_name(name: &str) -> Result<&str> {
    if !is_valid_student_name(name) {
        return Err(SchedulerError::InvalidStudentName(name.trim().to_string()));
    }
    Ok(name.trim())
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_days() {
        assert!(is_valid_day("Monday"));
        assert!(is_valid_day("Friday"));
        assert!(is_valid_day("Saturday"));
        assert!(!is_valid_day("Funday"));
        assert!(!is_valid_day("tuesday"));
        assert!(!is_valid_day(""));
    }

    #[test]
    fn test_day_check_agrees_with_parse() {
        for day in [" Monday ", "Friday\n", "\tSunday", "monday", " ", "Mon day"] {
            assert_eq!(is_valid_day(day), parse_day(day).is_ok(), "{day:?}");
        }
        assert!(is_valid_day(" Monday "));
        assert_eq!(parse_day(" Monday ").unwrap(), Weekday::Monday);
    }

    #[test]
    fn test_valid_times() {
        assert!(is_valid_time("9:00 AM"));
        assert!(is_valid_time("09:00 AM"));
        assert!(is_valid_time("11:45 PM"));
        assert!(!is_valid_time("9 AM"));
        assert!(!is_valid_time("21:00"));
        assert!(!is_valid_time("0:30 AM"));
        assert!(!is_valid_time("9:00AM"));
        assert!(!is_valid_time("9:5 AM"));
        assert!(!is_valid_time("9:00  AM"));
    }

    #[test]
    fn test_student_name_needs_two_tokens() {
        assert!(!is_valid_student_name("Jim"));
        assert!(!is_valid_student_name("   "));
        assert!(is_valid_student_name("Jim Tim"));
        assert!(is_valid_student_name("Mary Ann Smith"));

        assert_eq!(student_name("  Jim Tim ").unwrap(), "Jim Tim");
        assert!(matches!(
            student_name("Jim"),
            Err(SchedulerError::InvalidStudentName(_))
        ));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("monday"), "Monday");
        assert_eq!(capitalize("FRIDAY"), "Friday");
        assert_eq!(capitalize(" wednesday "), "Wednesday");
        assert_eq!(capitalize(""), "");
    }
}
