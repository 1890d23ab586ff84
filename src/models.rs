use crate::error::SchedulerError;
use chrono::{NaiveTime, Timelike};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week a course meets on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Position in the week, Monday = 0
    pub fn index(&self) -> i64 {
        *self as i64
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| SchedulerError::InvalidDay(s.to_string()))
    }
}

impl ToSql for Weekday {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Weekday {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A wall-clock start time written as `HH:MM AM/PM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CourseTime(NaiveTime);

impl CourseTime {
    const FORMAT: &'static str = "%I:%M %p";

    pub fn parse(s: &str) -> Result<Self, SchedulerError> {
        let trimmed = s.trim();
        if !Self::has_clock_shape(trimmed) {
            return Err(SchedulerError::InvalidTime(s.to_string()));
        }
        NaiveTime::parse_from_str(trimmed, Self::FORMAT)
            .map(CourseTime)
            .map_err(|_| SchedulerError::InvalidTime(s.to_string()))
    }

    /// `H:MM XM` or `HH:MM XM`: one or two hour digits, exactly two minute
    /// digits, a single space before the meridiem
    fn has_clock_shape(s: &str) -> bool {
        let Some((clock, meridiem)) = s.split_once(' ') else {
            return false;
        };
        let Some((hour, minute)) = clock.split_once(':') else {
            return false;
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        (1..=2).contains(&hour.len())
            && all_digits(hour)
            && minute.len() == 2
            && all_digits(minute)
            && meridiem.len() == 2
    }

    /// Minutes after midnight, used as the sort key in storage
    pub fn minutes(&self) -> i64 {
        i64::from(self.0.hour() * 60 + self.0.minute())
    }
}

impl fmt::Display for CourseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (pm, hour) = self.0.hour12();
        let meridiem = if pm { "PM" } else { "AM" };
        write!(f, "{}:{:02} {}", hour, self.0.minute(), meridiem)
    }
}

/// A registered student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
}

/// A course occupying one (time, day) slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub time: String,
    pub day: Weekday,
}

/// The fact that a student is registered in a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
}

/// Result of a successful enroll, carrying both names for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentDetail {
    pub enrollment: Enrollment,
    pub student: Student,
    pub course: Course,
}

/// Students enrolled in one course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRoster {
    pub course: Course,
    pub students: Vec<Student>,
}

/// Courses one student is enrolled in, optionally limited to a day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCourses {
    pub student: Student,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<Weekday>,
    pub courses: Vec<Course>,
}

/// Everything in the catalogue, for the combined listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalogue {
    pub students: Vec<Student>,
    pub courses: Vec<Course>,
}
