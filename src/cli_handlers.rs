use crate::cli::Commands;
use crate::core::Scheduler;
use crate::error::Result;
use crate::menu;
use crate::models::{Course, CourseRoster, Student, StudentCourses};
use crate::validate::capitalize;
use serde::Serialize;
use std::io::{BufRead, Write};

/// How command results are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Run one subcommand, writing its result to `out`. Only the menu reads
/// from `input`.
pub fn dispatch(
    scheduler: &Scheduler,
    command: Commands,
    format: Format,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Init => handle_init(scheduler, out),
        Commands::AddStudent { name } => handle_add_student(scheduler, &name.join(" "), format, out),
        Commands::AddCourse { name, time, day } => {
            handle_add_course(scheduler, &name, &time, &day, format, out)
        }
        Commands::Enroll {
            student_id,
            course_id,
        } => handle_enroll(scheduler, student_id, course_id, format, out),
        Commands::Roster { course_id } => handle_roster(scheduler, course_id, format, out),
        Commands::CoursesFor { student_id } => {
            handle_courses_for(scheduler, student_id, format, out)
        }
        Commands::Schedule { student_id, day } => {
            handle_schedule(scheduler, student_id, &day, format, out)
        }
        Commands::List => handle_list(scheduler, format, out),
        Commands::Menu => menu::run(scheduler, input, out),
    }
}

/// Handle the init command
pub fn handle_init(scheduler: &Scheduler, out: &mut dyn Write) -> Result<()> {
    scheduler.init()?;
    writeln!(out, "Database tables are ready.")?;
    Ok(())
}

/// Handle the add-student command
pub fn handle_add_student(
    scheduler: &Scheduler,
    name: &str,
    format: Format,
    out: &mut dyn Write,
) -> Result<()> {
    let student = scheduler.add_student(name)?;

    match format {
        Format::Json => write_json(out, &student),
        Format::Text => {
            writeln!(
                out,
                "Student '{}' added successfully (ID {}).",
                student.name, student.id
            )?;
            Ok(())
        }
    }
}

/// Handle the add-course command. The day is capitalized first so that
/// `monday` is accepted.
pub fn handle_add_course(
    scheduler: &Scheduler,
    name: &str,
    time: &str,
    day: &str,
    format: Format,
    out: &mut dyn Write,
) -> Result<()> {
    let course = scheduler.add_course(name, time, &capitalize(day))?;

    match format {
        Format::Json => write_json(out, &course),
        Format::Text => {
            writeln!(
                out,
                "Course '{}' at {} on {} added successfully (ID {}).",
                course.name, course.time, course.day, course.id
            )?;
            Ok(())
        }
    }
}

/// Handle the enroll command
pub fn handle_enroll(
    scheduler: &Scheduler,
    student_id: i64,
    course_id: i64,
    format: Format,
    out: &mut dyn Write,
) -> Result<()> {
    let detail = scheduler.enroll(student_id, course_id)?;

    match format {
        Format::Json => write_json(out, &detail),
        Format::Text => {
            writeln!(
                out,
                "Enrolled '{}' in course '{}' successfully.",
                detail.student.name, detail.course.name
            )?;
            Ok(())
        }
    }
}

/// Handle the roster command
pub fn handle_roster(
    scheduler: &Scheduler,
    course_id: i64,
    format: Format,
    out: &mut dyn Write,
) -> Result<()> {
    let roster = scheduler.students_in_course(course_id)?;

    match format {
        Format::Json => write_json(out, &roster),
        Format::Text => print_roster(out, &roster),
    }
}

/// Handle the courses-for command
pub fn handle_courses_for(
    scheduler: &Scheduler,
    student_id: i64,
    format: Format,
    out: &mut dyn Write,
) -> Result<()> {
    let result = scheduler.courses_for_student(student_id)?;

    match format {
        Format::Json => write_json(out, &result),
        Format::Text => print_student_courses(out, &result),
    }
}

/// Handle the schedule command
pub fn handle_schedule(
    scheduler: &Scheduler,
    student_id: i64,
    day: &str,
    format: Format,
    out: &mut dyn Write,
) -> Result<()> {
    let schedule = scheduler.day_schedule(student_id, &capitalize(day))?;

    match format {
        Format::Json => write_json(out, &schedule),
        Format::Text => print_student_courses(out, &schedule),
    }
}

/// Handle the list command
pub fn handle_list(scheduler: &Scheduler, format: Format, out: &mut dyn Write) -> Result<()> {
    let catalogue = scheduler.catalogue()?;

    match format {
        Format::Json => write_json(out, &catalogue),
        Format::Text => {
            writeln!(out, "All students:")?;
            print_students(out, &catalogue.students)?;
            writeln!(out)?;
            writeln!(out, "All courses:")?;
            print_courses(out, &catalogue.courses)
        }
    }
}

// ==================== Text Output ====================

pub fn print_students(out: &mut dyn Write, students: &[Student]) -> Result<()> {
    if students.is_empty() {
        writeln!(out, "No students found.")?;
    }
    for student in students {
        writeln!(out, "ID: {}, Name: {}", student.id, student.name)?;
    }
    Ok(())
}

pub fn print_courses(out: &mut dyn Write, courses: &[Course]) -> Result<()> {
    if courses.is_empty() {
        writeln!(out, "No courses found.")?;
    }
    for course in courses {
        writeln!(
            out,
            "ID: {}, Name: {}, Time: {}, Day: {}",
            course.id, course.name, course.time, course.day
        )?;
    }
    Ok(())
}

fn print_roster(out: &mut dyn Write, roster: &CourseRoster) -> Result<()> {
    if roster.students.is_empty() {
        writeln!(out, "No students enrolled in '{}'.", roster.course.name)?;
        return Ok(());
    }

    writeln!(out, "Students enrolled in '{}':", roster.course.name)?;
    for student in &roster.students {
        writeln!(out, "- {}", student.name)?;
    }
    Ok(())
}

fn print_student_courses(out: &mut dyn Write, result: &StudentCourses) -> Result<()> {
    let name = &result.student.name;

    match result.day {
        Some(day) if result.courses.is_empty() => {
            writeln!(out, "No courses scheduled for '{name}' on {day}.")?;
        }
        Some(day) => {
            writeln!(out, "Schedule for '{name}' on {day}:")?;
            for course in &result.courses {
                writeln!(out, "- {} at {}", course.name, course.time)?;
            }
        }
        None if result.courses.is_empty() => {
            writeln!(out, "No courses found for '{name}'.")?;
        }
        None => {
            writeln!(out, "Courses for '{name}':")?;
            for course in &result.courses {
                writeln!(out, "- {} at {} on {}", course.name, course.time, course.day)?;
            }
        }
    }
    Ok(())
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
