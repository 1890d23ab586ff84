use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scheduler")]
#[command(about = "Student Course Scheduler")]
#[command(version)]
pub struct Cli {
    /// Path to the JSON config file naming the database
    #[arg(long, global = true, env = "SCHEDULER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the database tables
    Init,

    /// Add a student (first and last name)
    AddStudent {
        /// Full name, e.g. Jim Tim
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Add a course at a weekday time slot
    AddCourse {
        /// Course name, e.g. "Math 101"
        name: String,
        /// Start time, e.g. "9:00 AM"
        time: String,
        /// Weekday, e.g. Monday
        day: String,
    },

    /// Enroll a student in a course
    Enroll {
        /// Student ID
        student_id: i64,
        /// Course ID
        course_id: i64,
    },

    /// List the students enrolled in a course
    Roster {
        /// Course ID
        course_id: i64,
    },

    /// List the courses a student is enrolled in
    CoursesFor {
        /// Student ID
        student_id: i64,
    },

    /// Show a student's schedule for one day
    Schedule {
        /// Student ID
        student_id: i64,
        /// Weekday, e.g. Monday
        day: String,
    },

    /// List all students and courses
    List,

    /// Run the interactive menu
    Menu,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_student_joins_words() {
        let cli = Cli::try_parse_from(["scheduler", "add-student", "Jim", "Tim"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::AddStudent {
                name: vec!["Jim".to_string(), "Tim".to_string()]
            })
        );
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["scheduler", "--config", "school.json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("school.json"));
    }

    #[test]
    fn test_ids_must_be_numeric() {
        assert!(Cli::try_parse_from(["scheduler", "enroll", "one", "2"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["scheduler", "list", "--json"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.command, Some(Commands::List));
    }
}
