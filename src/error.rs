use std::path::PathBuf;
use thiserror::Error;

/// All possible errors in the scheduler
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Config file '{}' not found", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Invalid config file '{}': {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    #[error("Please enter both first and last name (got '{0}')")]
    InvalidStudentName(String),

    #[error("Course name cannot be empty")]
    InvalidCourseName,

    #[error("Invalid time format: {0}. Use 'HH:MM AM/PM'.")]
    InvalidTime(String),

    #[error("Invalid day: {0}. Please enter a valid weekday.")]
    InvalidDay(String),

    #[error("Classes cannot be scheduled on weekends ({0})")]
    WeekendCourse(String),

    #[error("Student ID {0} does not exist")]
    StudentNotFound(i64),

    #[error("Course ID {0} does not exist")]
    CourseNotFound(i64),

    #[error("Student '{0}' already exists")]
    DuplicateStudent(String),

    #[error("Course '{name}' at {time} on {day} already exists")]
    DuplicateCourse {
        name: String,
        time: String,
        day: String,
    },

    #[error("Time conflict: '{existing}' is already at {time} on {day}")]
    TimeConflict {
        existing: String,
        time: String,
        day: String,
    },

    #[error("Student '{student}' is already enrolled in '{course}'")]
    AlreadyEnrolled { student: String, course: String },

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulerError {
    /// Whether the error was caused by the input rather than the database
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            SchedulerError::Db(_)
                | SchedulerError::Io(_)
                | SchedulerError::Json(_)
                | SchedulerError::ConfigMissing(_)
                | SchedulerError::InvalidConfig { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SchedulerError>;
