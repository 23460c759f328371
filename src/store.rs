//! SQLite-backed record store for the Student and Teacher tables.
//!
//! The store is an explicitly constructed value handed to the operation
//! layer; tests run against `Store::open_in_memory()`. All operations are
//! single-record; no multi-record transactions are needed by any caller.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::model::{Student, StudentView, Teacher};

pub struct Store {
    conn: Connection,
}

/// Filter for student listings. Both fields are ANDed when present.
#[derive(Debug, Default)]
pub struct StudentFilter<'a> {
    /// Exact match on the assigned teacher id.
    pub assigned_teacher_id: Option<&'a str>,
    /// Case-insensitive substring match on the student name.
    pub name_contains: Option<&'a str>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Store> {
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Store { conn })
    }

    pub fn open_in_memory() -> anyhow::Result<Store> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        init_schema(&conn)?;
        Ok(Store { conn })
    }

    pub fn create_student(&self, name: &str) -> anyhow::Result<Student> {
        let now = now_rfc3339();
        let student = Student {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            assigned_teacher_id: None,
            progress_report_grade: None,
            final_report_grade: None,
            finalized: false,
            created_at: now.clone(),
            updated_at: now,
        };
        self.conn.execute(
            "INSERT INTO students(id, name, assigned_teacher_id, progress_report_grade,
                                  final_report_grade, finalized, created_at, updated_at)
             VALUES(?, ?, ?, ?, ?, ?, ?, ?)",
            (
                &student.id,
                &student.name,
                &student.assigned_teacher_id,
                &student.progress_report_grade,
                &student.final_report_grade,
                student.finalized,
                &student.created_at,
                &student.updated_at,
            ),
        )?;
        Ok(student)
    }

    pub fn student_by_id(&self, id: &str) -> anyhow::Result<Option<Student>> {
        let student = self
            .conn
            .query_row(
                "SELECT id, name, assigned_teacher_id, progress_report_grade,
                        final_report_grade, finalized, created_at, updated_at
                 FROM students WHERE id = ?",
                [id],
                map_student,
            )
            .optional()?;
        Ok(student)
    }

    /// Fetch one student with the assigned teacher joined in.
    pub fn student_view(&self, id: &str) -> anyhow::Result<Option<StudentView>> {
        let view = self
            .conn
            .query_row(
                &format!("{VIEW_SELECT} WHERE s.id = ?"),
                [id],
                map_student_view,
            )
            .optional()?;
        Ok(view)
    }

    /// List students matching the filter, each with the assigned teacher
    /// joined in. Ordered by name for stable display.
    pub fn list_students(&self, filter: &StudentFilter) -> anyhow::Result<Vec<StudentView>> {
        let mut sql = String::from(VIEW_SELECT);
        let mut conds: Vec<&str> = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(teacher_id) = filter.assigned_teacher_id {
            conds.push("s.assigned_teacher_id = ?");
            args.push(teacher_id.to_string());
        }
        if let Some(fragment) = filter.name_contains {
            conds.push("LOWER(s.name) LIKE '%' || LOWER(?) || '%'");
            args.push(fragment.to_string());
        }
        if !conds.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conds.join(" AND "));
        }
        sql.push_str(" ORDER BY s.name, s.id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args.iter()), map_student_view)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Overwrite the mutable fields of an existing student and bump
    /// `updated_at`. Returns the stored row.
    pub fn save_student(&self, student: &Student) -> anyhow::Result<Student> {
        let updated_at = now_rfc3339();
        let changed = self.conn.execute(
            "UPDATE students
             SET name = ?, assigned_teacher_id = ?, progress_report_grade = ?,
                 final_report_grade = ?, finalized = ?, updated_at = ?
             WHERE id = ?",
            (
                &student.name,
                &student.assigned_teacher_id,
                &student.progress_report_grade,
                &student.final_report_grade,
                student.finalized,
                &updated_at,
                &student.id,
            ),
        )?;
        anyhow::ensure!(changed == 1, "student {} vanished during save", student.id);
        Ok(Student {
            updated_at,
            ..student.clone()
        })
    }

    pub fn delete_student(&self, id: &str) -> anyhow::Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?", [id])?;
        Ok(changed > 0)
    }

    pub fn create_teacher(&self, name: &str) -> anyhow::Result<Teacher> {
        let now = now_rfc3339();
        let teacher = Teacher {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.conn.execute(
            "INSERT INTO teachers(id, name, created_at, updated_at) VALUES(?, ?, ?, ?)",
            (
                &teacher.id,
                &teacher.name,
                &teacher.created_at,
                &teacher.updated_at,
            ),
        )?;
        Ok(teacher)
    }

    pub fn teacher_by_id(&self, id: &str) -> anyhow::Result<Option<Teacher>> {
        let teacher = self
            .conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM teachers WHERE id = ?",
                [id],
                map_teacher,
            )
            .optional()?;
        Ok(teacher)
    }

    /// Name is the natural key used by idempotent seeding.
    pub fn teacher_by_name(&self, name: &str) -> anyhow::Result<Option<Teacher>> {
        let teacher = self
            .conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM teachers WHERE name = ?",
                [name],
                map_teacher,
            )
            .optional()?;
        Ok(teacher)
    }

    pub fn list_teachers(&self) -> anyhow::Result<Vec<Teacher>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at FROM teachers ORDER BY name, id",
        )?;
        let rows = stmt
            .query_map([], map_teacher)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

const VIEW_SELECT: &str = "SELECT s.id, s.name, s.assigned_teacher_id, s.progress_report_grade,
        s.final_report_grade, s.finalized, s.created_at, s.updated_at,
        t.id, t.name, t.created_at, t.updated_at
 FROM students s
 LEFT JOIN teachers t ON t.id = s.assigned_teacher_id";

fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS teachers(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            assigned_teacher_id TEXT,
            progress_report_grade INTEGER,
            final_report_grade INTEGER,
            finalized INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(assigned_teacher_id) REFERENCES teachers(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_teacher ON students(assigned_teacher_id)",
        [],
    )?;

    Ok(())
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn map_student(row: &rusqlite::Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        assigned_teacher_id: row.get(2)?,
        progress_report_grade: row.get(3)?,
        final_report_grade: row.get(4)?,
        finalized: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn map_student_view(row: &rusqlite::Row<'_>) -> rusqlite::Result<StudentView> {
    let student = map_student(row)?;
    let teacher_id: Option<String> = row.get(8)?;
    let teacher = match teacher_id {
        Some(id) => Some(Teacher {
            id,
            name: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        }),
        None => None,
    };
    Ok(StudentView { student, teacher })
}

fn map_teacher(row: &rusqlite::Row<'_>) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}
