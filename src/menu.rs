//! The numbered interactive menu.

use crate::cli_handlers::{self, Format};
use crate::core::Scheduler;
use crate::error::{Result, SchedulerError};
use crate::validate::capitalize;
use std::io::{BufRead, Write};

const MENU: &str = "
Student Course Scheduler
1. Add Student
2. Add Course
3. Enroll Student in Course
4. List Students in a Course
5. View Courses for a Student
6. View a Student's Schedule for a Specific Day
7. List All Students and Courses
8. Exit";

/// Run the menu until the user picks Exit or input ends.
///
/// Failed operations are printed and the loop carries on; only a failure to
/// read input or write output ends it early.
pub fn run<R: BufRead>(scheduler: &Scheduler, mut input: R, out: &mut dyn Write) -> Result<()> {
    loop {
        writeln!(out, "{MENU}")?;
        let Some(choice) = prompt(&mut input, out, "Enter your choice: ")? else {
            break;
        };

        let outcome = match choice.as_str() {
            "1" => add_student(scheduler, &mut input, out),
            "2" => add_course(scheduler, &mut input, out),
            "3" => enroll(scheduler, &mut input, out),
            "4" => roster(scheduler, &mut input, out),
            "5" => courses_for(scheduler, &mut input, out),
            "6" => schedule(scheduler, &mut input, out),
            "7" => cli_handlers::handle_list(scheduler, Format::Text, out).map(|_| Step::Continue),
            "8" => break,
            _ => {
                writeln!(out, "Invalid option. Please try again.")?;
                Ok(Step::Continue)
            }
        };

        match outcome {
            Ok(Step::Continue) => {}
            Ok(Step::EndOfInput) => break,
            Err(SchedulerError::Io(e)) => return Err(e.into()),
            Err(e) => writeln!(out, "Error: {e}")?,
        }
    }

    writeln!(out, "Exiting the program. Goodbye!")?;
    Ok(())
}

enum Step {
    Continue,
    EndOfInput,
}

/// Print `message` and read one trimmed line; `None` at end of input
fn prompt<R: BufRead>(
    input: &mut R,
    out: &mut dyn Write,
    message: &str,
) -> Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Answer to a numeric id prompt
enum IdInput {
    Id(i64),
    NotNumeric,
    EndOfInput,
}

/// Read a numeric id, printing `complaint` if the input isn't one
fn prompt_id<R: BufRead>(
    input: &mut R,
    out: &mut dyn Write,
    message: &str,
    complaint: &str,
) -> Result<IdInput> {
    let Some(raw) = prompt(input, out, message)? else {
        return Ok(IdInput::EndOfInput);
    };
    match raw.parse() {
        Ok(id) => Ok(IdInput::Id(id)),
        Err(_) => {
            writeln!(out, "{complaint}")?;
            Ok(IdInput::NotNumeric)
        }
    }
}

macro_rules! read_or_end {
    ($e:expr) => {
        match $e? {
            Some(value) => value,
            None => return Ok(Step::EndOfInput),
        }
    };
}

/// A non-numeric id abandons the current choice and goes back to the menu
macro_rules! read_id {
    ($e:expr) => {
        match $e? {
            IdInput::Id(id) => id,
            IdInput::NotNumeric => return Ok(Step::Continue),
            IdInput::EndOfInput => return Ok(Step::EndOfInput),
        }
    };
}

fn add_student<R: BufRead>(
    scheduler: &Scheduler,
    input: &mut R,
    out: &mut dyn Write,
) -> Result<Step> {
    let name = read_or_end!(prompt(input, out, "Enter student name (e.g., 'Jim Tim'): "));
    cli_handlers::handle_add_student(scheduler, &name, Format::Text, out)?;
    Ok(Step::Continue)
}

fn add_course<R: BufRead>(
    scheduler: &Scheduler,
    input: &mut R,
    out: &mut dyn Write,
) -> Result<Step> {
    let name = read_or_end!(prompt(input, out, "Enter course name (e.g., 'Math 101'): "));
    let time = read_or_end!(prompt(input, out, "Enter course time (e.g., '9:00 AM'): "));
    let day = read_or_end!(prompt(input, out, "Enter course day (e.g., 'Monday'): "));
    cli_handlers::handle_add_course(scheduler, &name, &time, &day, Format::Text, out)?;
    Ok(Step::Continue)
}

fn enroll<R: BufRead>(
    scheduler: &Scheduler,
    input: &mut R,
    out: &mut dyn Write,
) -> Result<Step> {
    let catalogue = scheduler.catalogue()?;
    writeln!(out, "\nCurrent students:")?;
    cli_handlers::print_students(out, &catalogue.students)?;
    writeln!(out, "\nCurrent courses:")?;
    cli_handlers::print_courses(out, &catalogue.courses)?;

    let complaint = "Please enter numeric IDs.";
    let student_id = read_id!(prompt_id(input, out, "\nEnter student ID: ", complaint));
    let course_id = read_id!(prompt_id(input, out, "Enter course ID: ", complaint));

    cli_handlers::handle_enroll(scheduler, student_id, course_id, Format::Text, out)?;
    Ok(Step::Continue)
}

fn roster<R: BufRead>(
    scheduler: &Scheduler,
    input: &mut R,
    out: &mut dyn Write,
) -> Result<Step> {
    let complaint = "Please enter a numeric course ID.";
    let course_id = read_id!(prompt_id(input, out, "Enter course ID: ", complaint));

    cli_handlers::handle_roster(scheduler, course_id, Format::Text, out)?;
    Ok(Step::Continue)
}

fn courses_for<R: BufRead>(
    scheduler: &Scheduler,
    input: &mut R,
    out: &mut dyn Write,
) -> Result<Step> {
    let complaint = "Please enter a numeric student ID.";
    let student_id = read_id!(prompt_id(input, out, "Enter student ID: ", complaint));

    cli_handlers::handle_courses_for(scheduler, student_id, Format::Text, out)?;
    Ok(Step::Continue)
}

fn schedule<R: BufRead>(
    scheduler: &Scheduler,
    input: &mut R,
    out: &mut dyn Write,
) -> Result<Step> {
    let complaint = "Please enter a numeric student ID.";
    let student_id = read_id!(prompt_id(input, out, "Enter student ID: ", complaint));
    let day = read_or_end!(prompt(input, out, "Enter the day (e.g., 'Monday'): "));

    cli_handlers::handle_schedule(scheduler, student_id, &capitalize(&day), Format::Text, out)?;
    Ok(Step::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn setup() -> (Scheduler, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let scheduler = Scheduler::open_at(temp_dir.path().join("test.db"));
        scheduler.init().unwrap();
        (scheduler, temp_dir)
    }

    fn drive(scheduler: &Scheduler, script: &str) -> String {
        let mut out = Vec::new();
        run(scheduler, Cursor::new(script.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_choice() {
        let (scheduler, _temp) = setup();
        let output = drive(&scheduler, "8\n");
        assert!(output.contains("1. Add Student"));
        assert!(output.ends_with("Exiting the program. Goodbye!\n"));
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let (scheduler, _temp) = setup();
        let output = drive(&scheduler, "9\nabc\n8\n");
        assert_eq!(output.matches("Invalid option. Please try again.").count(), 2);
        assert_eq!(output.matches("Enter your choice: ").count(), 3);
    }

    #[test]
    fn test_end_of_input_exits() {
        let (scheduler, _temp) = setup();
        let output = drive(&scheduler, "1\n");
        assert!(output.ends_with("Exiting the program. Goodbye!\n"));
        assert!(scheduler.list_students().unwrap().is_empty());
    }

    #[test]
    fn test_full_session() {
        let (scheduler, _temp) = setup();
        let script = "\
1\nJim Tim\n\
1\nJim\n\
2\nMath 101\n9:00 AM\nmonday\n\
2\nArt 5\n9:00 AM\nMonday\n\
2\nGym 1\n10:00 AM\nSaturday\n\
3\n1\n1\n\
3\n1\n1\n\
3\nx\n\
6\n1\nmonday\n\
4\n1\n\
8\n";
        let output = drive(&scheduler, script);

        assert!(output.contains("Student 'Jim Tim' added successfully (ID 1)."));
        assert!(output.contains("Error: Please enter both first and last name"));
        assert!(output.contains("Course 'Math 101' at 9:00 AM on Monday added successfully"));
        assert!(output.contains("Error: Time conflict: 'Math 101' is already at 9:00 AM on Monday"));
        assert!(output.contains("Error: Classes cannot be scheduled on weekends (Saturday)"));
        assert!(output.contains("Current students:\nID: 1, Name: Jim Tim"));
        assert!(output.contains("Enrolled 'Jim Tim' in course 'Math 101' successfully."));
        assert!(output.contains("Error: Student 'Jim Tim' is already enrolled in 'Math 101'"));
        assert!(output.contains("Please enter numeric IDs."));
        assert!(output.contains("Schedule for 'Jim Tim' on Monday:\n- Math 101 at 9:00 AM"));
        assert!(output.contains("Students enrolled in 'Math 101':\n- Jim Tim"));
        assert!(output.ends_with("Exiting the program. Goodbye!\n"));
    }

    #[test]
    fn test_non_numeric_course_id() {
        let (scheduler, _temp) = setup();
        let output = drive(&scheduler, "4\nfour\n8\n");
        assert!(output.contains("Please enter a numeric course ID."));
        assert_eq!(output.matches("Enter your choice: ").count(), 2);
    }

    #[test]
    fn test_end_of_input_at_id_prompt() {
        let (scheduler, _temp) = setup();
        let output = drive(&scheduler, "5\n");
        assert!(!output.contains("Please enter a numeric student ID."));
        assert_eq!(output.matches("Enter your choice: ").count(), 1);
        assert!(output.ends_with("Exiting the program. Goodbye!\n"));
    }
}
