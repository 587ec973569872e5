use anyhow::Result;
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::Mark;
use crate::domain::validation::MarkFields;
use crate::storage::connection::DbConnection;

/// Build a detached mark from a `marks` row
pub(crate) fn mark_from_row(row: &SqliteRow) -> Mark {
    Mark::new(
        row.get("id"),
        row.get("value"),
        row.get::<String, _>("subject"),
    )
}

/// Repository for mark operations
#[derive(Clone)]
pub struct MarkRepository {
    db: DbConnection,
}

impl MarkRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a mark and return it with its new id.
    ///
    /// Returns `None` when the owning student row no longer exists. The
    /// returned mark is detached; callers attach it to the owning student
    /// with `Student::add_mark`.
    pub async fn insert(&self, fields: &MarkFields) -> Result<Option<Mark>> {
        let result = sqlx::query(
            r#"
            INSERT INTO marks (value, subject, student_id)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(fields.value)
        .bind(&fields.subject)
        .bind(fields.student_id)
        .execute(self.db.pool())
        .await;

        match result {
            Ok(done) => Ok(Some(Mark::new(
                done.last_insert_rowid(),
                fields.value,
                fields.subject.clone(),
            ))),
            Err(sqlx::Error::Database(err)) if err.is_foreign_key_violation() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Id of the student owning `mark_id`, if the mark exists
    pub async fn find_owner(&self, mark_id: i64) -> Result<Option<i64>> {
        let row = sqlx::query("SELECT student_id FROM marks WHERE id = ?")
            .bind(mark_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|r| r.get("student_id")))
    }

    /// Every mark value in the classroom
    pub async fn list_values(&self) -> Result<Vec<f64>> {
        let rows = sqlx::query("SELECT value FROM marks ORDER BY id")
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(|r| r.get("value")).collect())
    }
}
