use crate::config::Config;
use crate::error::{Result, SchedulerError};
use crate::models::{Course, CourseTime, Enrollment, Student, Weekday};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, Transaction, ffi};
use std::path::Path;

const COURSE_COLUMNS: &str = "c.id, c.name, c.time, c.day";

/// One database session. Dropping it closes the connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a connection to the database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening database connection");
        let conn = Connection::open(path)?;

        // Referential constraints are off by default in SQLite
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Database { conn })
    }

    /// Open the database named by the config
    pub fn connect(config: &Config) -> Result<Self> {
        Self::open(&config.database)
    }

    /// Begin a transaction. Statements issued through `self` while the
    /// returned guard is alive belong to it; dropping it uncommitted rolls
    /// back.
    pub fn transaction(&self) -> Result<Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    /// Create the schema if it does not exist yet
    pub fn init(&self) -> Result<()> {
        self.create_tables()?;
        self.create_indexes()?;
        Ok(())
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0)
            )",
            [],
        )?;

        // Weekend names pass the CHECK; the application rejects them
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS courses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                time TEXT NOT NULL,
                day TEXT NOT NULL CHECK (day IN ('Monday', 'Tuesday', 'Wednesday', 'Thursday', 'Friday', 'Saturday', 'Sunday')),
                day_index INTEGER NOT NULL,
                start_minutes INTEGER NOT NULL,
                UNIQUE (name, time, day),
                UNIQUE (time, day)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS enrollments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id INTEGER NOT NULL REFERENCES students(id),
                course_id INTEGER NOT NULL REFERENCES courses(id),
                UNIQUE (student_id, course_id)
            )",
            [],
        )?;

        Ok(())
    }

    fn create_indexes(&self) -> Result<()> {
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_enrollments_course_id ON enrollments(course_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_courses_schedule ON courses(day_index, start_minutes)",
            [],
        )?;
        Ok(())
    }

    // ==================== Student Operations ====================

    pub fn insert_student(&self, name: &str) -> Result<Student> {
        self.conn
            .execute("INSERT INTO students (name) VALUES (?1)", [name])
            .map_err(|e| {
                if is_unique_violation(&e) {
                    SchedulerError::DuplicateStudent(name.to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(Student {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub fn get_student(&self, id: i64) -> Result<Option<Student>> {
        self.conn
            .query_row(
                "SELECT id, name FROM students WHERE id = ?1",
                [id],
                student_from_row,
            )
            .optional()
            .map_err(|e| e.into())
    }

    pub fn get_all_students(&self) -> Result<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM students ORDER BY id")?;

        let students = stmt.query_map([], student_from_row)?;
        students
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    pub fn get_students_in_course(&self, course_id: i64) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.name
             FROM enrollments e
             JOIN students s ON e.student_id = s.id
             WHERE e.course_id = ?1
             ORDER BY s.name",
        )?;

        let students = stmt.query_map([course_id], student_from_row)?;
        students
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    // ==================== Course Operations ====================

    pub fn insert_course(&self, name: &str, time: CourseTime, day: Weekday) -> Result<Course> {
        let time_str = time.to_string();
        self.conn.execute(
            "INSERT INTO courses (name, time, day, day_index, start_minutes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (name, &time_str, day, day.index(), time.minutes()),
        )?;

        Ok(Course {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            time: time_str,
            day,
        })
    }

    pub fn get_course(&self, id: i64) -> Result<Option<Course>> {
        self.conn
            .query_row(
                &format!("SELECT {COURSE_COLUMNS} FROM courses c WHERE c.id = ?1"),
                [id],
                course_from_row,
            )
            .optional()
            .map_err(|e| e.into())
    }

    /// The course occupying a (time, day) slot, if any
    pub fn get_course_in_slot(&self, time: CourseTime, day: Weekday) -> Result<Option<Course>> {
        self.conn
            .query_row(
                &format!("SELECT {COURSE_COLUMNS} FROM courses c WHERE c.time = ?1 AND c.day = ?2"),
                (time.to_string(), day),
                course_from_row,
            )
            .optional()
            .map_err(|e| e.into())
    }

    pub fn find_course(&self, name: &str, time: CourseTime, day: Weekday) -> Result<Option<Course>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {COURSE_COLUMNS} FROM courses c
                     WHERE c.name = ?1 AND c.time = ?2 AND c.day = ?3"
                ),
                (name, time.to_string(), day),
                course_from_row,
            )
            .optional()
            .map_err(|e| e.into())
    }

    pub fn get_all_courses(&self) -> Result<Vec<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COURSE_COLUMNS} FROM courses c ORDER BY c.id"))?;

        let courses = stmt.query_map([], course_from_row)?;
        courses
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    /// Courses of a student in calendar order: by day, then start time
    pub fn get_courses_for_student(&self, student_id: i64) -> Result<Vec<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COURSE_COLUMNS}
             FROM enrollments e
             JOIN courses c ON e.course_id = c.id
             WHERE e.student_id = ?1
             ORDER BY c.day_index, c.start_minutes"
        ))?;

        let courses = stmt.query_map([student_id], course_from_row)?;
        courses
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    pub fn get_courses_for_student_on(&self, student_id: i64, day: Weekday) -> Result<Vec<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COURSE_COLUMNS}
             FROM enrollments e
             JOIN courses c ON e.course_id = c.id
             WHERE e.student_id = ?1 AND c.day = ?2
             ORDER BY c.start_minutes"
        ))?;

        let courses = stmt.query_map((student_id, day), course_from_row)?;
        courses
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| e.into())
    }

    // ==================== Enrollment Operations ====================

    pub fn is_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM enrollments WHERE student_id = ?1 AND course_id = ?2",
                (student_id, course_id),
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn insert_enrollment(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        self.conn.execute(
            "INSERT INTO enrollments (student_id, course_id) VALUES (?1, ?2)",
            (student_id, course_id),
        )?;

        Ok(Enrollment {
            id: self.conn.last_insert_rowid(),
            student_id,
            course_id,
        })
    }
}

fn student_from_row(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn course_from_row(row: &Row) -> rusqlite::Result<Course> {
    Ok(Course {
        id: row.get(0)?,
        name: row.get(1)?,
        time: row.get(2)?,
        day: row.get(3)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (Database, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::open(temp_dir.path().join("test.db")).unwrap();
        db.init().unwrap();
        (db, temp_dir)
    }

    #[test]
    fn test_init_is_idempotent() {
        let (db, _temp) = setup();
        db.insert_student("Jim Tim").unwrap();
        db.init().unwrap();
        assert_eq!(db.get_all_students().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_student_maps_to_conflict() {
        let (db, _temp) = setup();
        db.insert_student("Jim Tim").unwrap();
        let result = db.insert_student("Jim Tim");
        assert!(matches!(result, Err(SchedulerError::DuplicateStudent(name)) if name == "Jim Tim"));
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let (db, _temp) = setup();
        let result = db.insert_enrollment(42, 7);
        assert!(matches!(result, Err(SchedulerError::Db(_))));
    }

    #[test]
    fn test_slot_uniqueness_enforced_by_schema() {
        let (db, _temp) = setup();
        let nine = CourseTime::parse("9:00 AM").unwrap();
        db.insert_course("Math 101", nine, Weekday::Monday).unwrap();
        let result = db.insert_course("History 200", nine, Weekday::Monday);
        assert!(matches!(result, Err(SchedulerError::Db(_))));
    }

    #[test]
    fn test_rolled_back_transaction_leaves_no_rows() {
        let (db, _temp) = setup();
        {
            let _tx = db.transaction().unwrap();
            db.insert_student("Jim Tim").unwrap();
        }
        assert!(db.get_all_students().unwrap().is_empty());
    }

    #[test]
    fn test_course_lookup_by_slot() {
        let (db, _temp) = setup();
        let nine = CourseTime::parse("9:00 AM").unwrap();
        let created = db.insert_course("Math 101", nine, Weekday::Monday).unwrap();

        let same_slot = CourseTime::parse("09:00 am").unwrap();
        let found = db.get_course_in_slot(same_slot, Weekday::Monday).unwrap();
        assert_eq!(found, Some(created));
        assert!(
            db.get_course_in_slot(nine, Weekday::Tuesday)
                .unwrap()
                .is_none()
        );
    }
}
