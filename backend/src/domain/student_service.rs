use tracing::{info, warn};

use super::error::{DomainError, DomainResult};
use super::models::{Student, StudentDraft};
use super::validation;
use crate::storage::StudentRepository;

/// Service for managing students
#[derive(Clone)]
pub struct StudentService {
    students: StudentRepository,
}

impl StudentService {
    pub fn new(students: StudentRepository) -> Self {
        Self { students }
    }

    /// List all students with their marks
    pub async fn list_students(&self) -> DomainResult<Vec<Student>> {
        let students = self.students.list().await?;
        info!("Found {} students", students.len());
        Ok(students)
    }

    /// Validate and store a new student
    pub async fn create_student(&self, draft: StudentDraft) -> DomainResult<Student> {
        let fields = validation::validate_student(&draft)?;
        let student = self.students.insert(&fields).await?;

        info!(
            "Created student {} {} with ID: {}",
            student.first_name(),
            student.last_name(),
            student.id()
        );
        Ok(student)
    }

    pub async fn get_student(&self, student_id: i64) -> DomainResult<Student> {
        match self.students.find(student_id).await? {
            Some(student) => Ok(student),
            None => {
                warn!("Student not found: {}", student_id);
                Err(DomainError::student_not_found(student_id))
            }
        }
    }

    /// Replace the scalar fields of a student.
    ///
    /// Fields absent from `draft` keep their stored value; the merged record
    /// is validated as a whole. Marks are never touched.
    pub async fn update_student(&self, student_id: i64, draft: StudentDraft) -> DomainResult<Student> {
        let mut student = self.get_student(student_id).await?;

        let fields = validation::validate_student(&draft.merged_over(&student))?;
        student.set_first_name(fields.first_name);
        student.set_last_name(fields.last_name);
        student.set_birthday(fields.birthday);

        self.students.update(&student).await?;

        info!("Updated student with ID: {}", student.id());
        Ok(student)
    }

    /// Delete a student together with all of its marks
    pub async fn delete_student(&self, student_id: i64) -> DomainResult<()> {
        if !self.students.delete_with_marks(student_id).await? {
            warn!("Student not found: {}", student_id);
            return Err(DomainError::student_not_found(student_id));
        }

        info!("Deleted student with ID: {}", student_id);
        Ok(())
    }

    /// Average of one student's marks; `None` if the student has none
    pub async fn student_average(&self, student_id: i64) -> DomainResult<Option<f64>> {
        let student = self.get_student(student_id).await?;
        let average = student.average();

        info!(
            "Average for student {} over {} marks: {:?}",
            student_id,
            student.marks().len(),
            average
        );
        Ok(average)
    }
}
