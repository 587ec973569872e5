use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row};
use std::collections::HashMap;

use super::mark_repository::mark_from_row;
use crate::domain::models::Student;
use crate::domain::validation::StudentFields;
use crate::storage::connection::DbConnection;

fn student_from_row(row: &SqliteRow) -> Result<Student> {
    let birthday: NaiveDate = row.try_get("birthday")?;
    Ok(Student::new(
        row.get("id"),
        row.get::<String, _>("first_name"),
        row.get::<String, _>("last_name"),
        birthday,
    ))
}

/// Repository for student operations.
///
/// Students are always loaded together with their marks, attached through
/// `Student::add_mark` so every mark carries its back-reference.
#[derive(Clone)]
pub struct StudentRepository {
    db: DbConnection,
}

impl StudentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new student and return it with its id
    pub async fn insert(&self, fields: &StudentFields) -> Result<Student> {
        let id = sqlx::query(
            r#"
            INSERT INTO students (first_name, last_name, birthday)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.birthday)
        .execute(self.db.pool())
        .await?
        .last_insert_rowid();

        Ok(Student::new(
            id,
            fields.first_name.clone(),
            fields.last_name.clone(),
            fields.birthday,
        ))
    }

    /// Get a student and its marks by ID
    pub async fn find(&self, student_id: i64) -> Result<Option<Student>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, birthday
            FROM students
            WHERE id = ?
            "#,
        )
        .bind(student_id)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut student = student_from_row(&row)?;

        let marks = sqlx::query(
            r#"
            SELECT id, value, subject
            FROM marks
            WHERE student_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(student_id)
        .fetch_all(self.db.pool())
        .await?;

        for mark in &marks {
            student.add_mark(mark_from_row(mark));
        }

        Ok(Some(student))
    }

    /// List all students with their marks, ordered by id
    pub async fn list(&self) -> Result<Vec<Student>> {
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, birthday
            FROM students
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        let mut students = rows
            .iter()
            .map(student_from_row)
            .collect::<Result<Vec<_>>>()?;

        let positions: HashMap<i64, usize> = students
            .iter()
            .enumerate()
            .map(|(index, student)| (student.id(), index))
            .collect();

        let marks = sqlx::query(
            r#"
            SELECT id, value, subject, student_id
            FROM marks
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        for row in &marks {
            let owner: i64 = row.get("student_id");
            if let Some(&index) = positions.get(&owner) {
                students[index].add_mark(mark_from_row(row));
            }
        }

        Ok(students)
    }

    /// Persist the scalar fields of `student`; marks are left untouched
    pub async fn update(&self, student: &Student) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE students
            SET first_name = ?, last_name = ?, birthday = ?
            WHERE id = ?
            "#,
        )
        .bind(student.first_name())
        .bind(student.last_name())
        .bind(student.birthday())
        .bind(student.id())
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    /// Delete a student and all of its marks in one transaction.
    ///
    /// Returns false if the student did not exist.
    pub async fn delete_with_marks(&self, student_id: i64) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM marks WHERE student_id = ?")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(student_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::MarkFields;
    use crate::storage::repositories::MarkRepository;

    async fn setup_test() -> (StudentRepository, MarkRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        (StudentRepository::new(db.clone()), MarkRepository::new(db))
    }

    fn student_fields(first_name: &str) -> StudentFields {
        StudentFields {
            first_name: first_name.to_string(),
            last_name: "Durand".to_string(),
            birthday: NaiveDate::from_ymd_opt(2008, 3, 14).unwrap(),
        }
    }

    async fn add_mark(marks: &MarkRepository, student_id: i64, value: f64) {
        marks
            .insert(&MarkFields {
                value,
                subject: "Physique".to_string(),
                student_id,
            })
            .await
            .expect("Failed to insert mark");
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let (students, _) = setup_test().await;

        let created = students.insert(&student_fields("Lina")).await.unwrap();
        let found = students.find(created.id()).await.unwrap().expect("student should exist");

        assert_eq!(found, created);
        assert!(found.marks().is_empty());
    }

    #[tokio::test]
    async fn test_find_nonexistent_student() {
        let (students, _) = setup_test().await;
        assert!(students.find(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_attaches_marks_in_order() {
        let (students, marks) = setup_test().await;
        let lina = students.insert(&student_fields("Lina")).await.unwrap();
        add_mark(&marks, lina.id(), 12.0).await;
        add_mark(&marks, lina.id(), 15.0).await;

        let found = students.find(lina.id()).await.unwrap().unwrap();
        let values: Vec<f64> = found.marks().iter().map(|m| m.value()).collect();

        assert_eq!(values, vec![12.0, 15.0]);
        assert!(found.marks().iter().all(|m| m.student_id() == Some(lina.id())));
    }

    #[tokio::test]
    async fn test_list_groups_marks_by_student() {
        let (students, marks) = setup_test().await;
        let lina = students.insert(&student_fields("Lina")).await.unwrap();
        let hugo = students.insert(&student_fields("Hugo")).await.unwrap();
        add_mark(&marks, hugo.id(), 8.0).await;
        add_mark(&marks, lina.id(), 12.0).await;
        add_mark(&marks, hugo.id(), 11.0).await;

        let all = students.list().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].first_name(), "Lina");
        assert_eq!(all[0].marks().len(), 1);
        assert_eq!(all[1].marks().len(), 2);
        assert_eq!(all[1].average(), Some(9.5));
    }

    #[tokio::test]
    async fn test_update_student() {
        let (students, _) = setup_test().await;
        let mut lina = students.insert(&student_fields("Lina")).await.unwrap();

        lina.set_first_name("Léa");
        lina.set_birthday(NaiveDate::from_ymd_opt(2009, 1, 2).unwrap());
        students.update(&lina).await.unwrap();

        let found = students.find(lina.id()).await.unwrap().unwrap();
        assert_eq!(found.first_name(), "Léa");
        assert_eq!(found.birthday(), NaiveDate::from_ymd_opt(2009, 1, 2).unwrap());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_own_marks_only() {
        let (students, marks) = setup_test().await;
        let lina = students.insert(&student_fields("Lina")).await.unwrap();
        let hugo = students.insert(&student_fields("Hugo")).await.unwrap();
        add_mark(&marks, lina.id(), 12.0).await;
        add_mark(&marks, lina.id(), 15.0).await;
        add_mark(&marks, hugo.id(), 9.0).await;

        assert!(students.delete_with_marks(lina.id()).await.unwrap());

        assert!(students.find(lina.id()).await.unwrap().is_none());
        assert_eq!(marks.list_values().await.unwrap(), vec![9.0]);
        let hugo = students.find(hugo.id()).await.unwrap().unwrap();
        assert_eq!(hugo.marks().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_student() {
        let (students, _) = setup_test().await;
        assert!(!students.delete_with_marks(42).await.unwrap());
    }
}
