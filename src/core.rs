use crate::config::Config;
use crate::db::Database;
use crate::error::{Result, SchedulerError};
use crate::models::{
    Catalogue, Course, CourseRoster, CourseTime, EnrollmentDetail, Student, StudentCourses,
    Weekday,
};
use crate::validate;
use std::path::Path;
use tracing::{debug, info, warn};

/// Business rules over the scheduler database.
///
/// Holds no connection: every operation opens its own session, runs its
/// checks and writes, commits, and closes the session before returning.
pub struct Scheduler {
    config: Config,
}

impl Scheduler {
    pub fn new(config: Config) -> Self {
        Scheduler { config }
    }

    /// Scheduler over the database file at `path`
    pub fn open_at<P: AsRef<Path>>(path: P) -> Self {
        Scheduler::new(Config::new(path))
    }

    fn connect(&self) -> Result<Database> {
        Database::connect(&self.config)
    }

    /// Create the tables if absent. Safe to call on every startup.
    pub fn init(&self) -> Result<()> {
        let db = self.connect()?;
        db.init()?;
        info!(database = %self.config.database.display(), "database tables are ready");
        Ok(())
    }

    // ==================== Mutations ====================

    pub fn add_student(&self, name: &str) -> Result<Student> {
        let name = validate::student_name(name)?;

        let db = self.connect()?;
        let student = db.insert_student(name).inspect_err(log_rejection)?;

        info!(id = student.id, name = %student.name, "added student");
        Ok(student)
    }

    pub fn add_course(&self, name: &str, time: &str, day: &str) -> Result<Course> {
        let time = validate::parse_time(time)?;
        let day = validate::parse_day(day)?;
        if day.is_weekend() {
            return Err(SchedulerError::WeekendCourse(day.to_string()));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(SchedulerError::InvalidCourseName);
        }

        let db = self.connect()?;
        let tx = db.transaction()?;

        let course = checked_insert_course(&db, name, time, day).inspect_err(log_rejection)?;

        tx.commit()?;
        info!(id = course.id, name = %course.name, time = %course.time, day = %course.day, "added course");
        Ok(course)
    }

    pub fn enroll(&self, student_id: i64, course_id: i64) -> Result<EnrollmentDetail> {
        let db = self.connect()?;
        let tx = db.transaction()?;

        let detail = checked_enroll(&db, student_id, course_id).inspect_err(log_rejection)?;

        tx.commit()?;
        info!(
            student = %detail.student.name,
            course = %detail.course.name,
            "enrolled student"
        );
        Ok(detail)
    }

    // ==================== Queries ====================

    pub fn list_students(&self) -> Result<Vec<Student>> {
        self.connect()?.get_all_students()
    }

    pub fn list_courses(&self) -> Result<Vec<Course>> {
        self.connect()?.get_all_courses()
    }

    /// All students and all courses from a single session
    pub fn catalogue(&self) -> Result<Catalogue> {
        let db = self.connect()?;
        Ok(Catalogue {
            students: db.get_all_students()?,
            courses: db.get_all_courses()?,
        })
    }

    /// Students enrolled in a course, ordered by name
    pub fn students_in_course(&self, course_id: i64) -> Result<CourseRoster> {
        let db = self.connect()?;
        let course = db
            .get_course(course_id)?
            .ok_or(SchedulerError::CourseNotFound(course_id))?;
        let students = db.get_students_in_course(course_id)?;
        debug!(course_id, count = students.len(), "listed course roster");
        Ok(CourseRoster { course, students })
    }

    /// Courses a student is enrolled in, ordered by day then time
    pub fn courses_for_student(&self, student_id: i64) -> Result<StudentCourses> {
        let db = self.connect()?;
        let student = db
            .get_student(student_id)?
            .ok_or(SchedulerError::StudentNotFound(student_id))?;
        let courses = db.get_courses_for_student(student_id)?;
        debug!(student_id, count = courses.len(), "listed student courses");
        Ok(StudentCourses {
            student,
            day: None,
            courses,
        })
    }

    /// A student's courses on one day, ordered by time
    pub fn day_schedule(&self, student_id: i64, day: &str) -> Result<StudentCourses> {
        let day = validate::parse_day(day)?;

        let db = self.connect()?;
        let student = db
            .get_student(student_id)?
            .ok_or(SchedulerError::StudentNotFound(student_id))?;
        let courses = db.get_courses_for_student_on(student_id, day)?;
        debug!(student_id, %day, count = courses.len(), "listed day schedule");
        Ok(StudentCourses {
            student,
            day: Some(day),
            courses,
        })
    }
}

/// Duplicate check first, so re-adding an identical course is reported as
/// a duplicate rather than as a clash with itself
fn checked_insert_course(
    db: &Database,
    name: &str,
    time: CourseTime,
    day: Weekday,
) -> Result<Course> {
    if db.find_course(name, time, day)?.is_some() {
        return Err(SchedulerError::DuplicateCourse {
            name: name.to_string(),
            time: time.to_string(),
            day: day.to_string(),
        });
    }

    if let Some(existing) = db.get_course_in_slot(time, day)? {
        return Err(SchedulerError::TimeConflict {
            existing: existing.name,
            time: time.to_string(),
            day: day.to_string(),
        });
    }

    db.insert_course(name, time, day)
}

fn checked_enroll(db: &Database, student_id: i64, course_id: i64) -> Result<EnrollmentDetail> {
    let student = db
        .get_student(student_id)?
        .ok_or(SchedulerError::StudentNotFound(student_id))?;
    let course = db
        .get_course(course_id)?
        .ok_or(SchedulerError::CourseNotFound(course_id))?;

    if db.is_enrolled(student_id, course_id)? {
        return Err(SchedulerError::AlreadyEnrolled {
            student: student.name,
            course: course.name,
        });
    }

    let enrollment = db.insert_enrollment(student_id, course_id)?;
    Ok(EnrollmentDetail {
        enrollment,
        student,
        course,
    })
}

fn log_rejection(err: &SchedulerError) {
    if err.is_rejection() {
        warn!("rejected: {err}");
    }
}
