use tracing::{info, warn};

use super::average;
use super::error::{DomainError, DomainResult};
use super::models::{GradedMark, MarkDraft, Student};
use super::validation::{self, ValidationErrors};
use crate::storage::{MarkRepository, StudentRepository};

/// Service for recording marks and computing the classroom average
#[derive(Clone)]
pub struct MarkService {
    marks: MarkRepository,
    students: StudentRepository,
}

impl MarkService {
    pub fn new(marks: MarkRepository, students: StudentRepository) -> Self {
        Self { marks, students }
    }

    /// All marks with their owning student, ordered by mark id
    pub async fn list_marks(&self) -> DomainResult<Vec<GradedMark>> {
        let students = self.students.list().await?;

        let mut marks: Vec<GradedMark> = students
            .iter()
            .flat_map(|student| {
                let profile = student.profile();
                student.marks().iter().map(move |mark| GradedMark {
                    mark: mark.clone(),
                    student: profile.clone(),
                })
            })
            .collect();
        marks.sort_by_key(|graded| graded.mark.id());

        info!("Found {} marks", marks.len());
        Ok(marks)
    }

    /// Validate and record a mark for an existing student
    pub async fn create_mark(&self, draft: MarkDraft) -> DomainResult<GradedMark> {
        let owner = match draft.student.as_ref().and_then(|link| link.resolve()) {
            Some(student_id) => self.students.find(student_id).await?,
            None => None,
        };

        let fields = validation::validate_mark(&draft, owner.is_some())?;
        let Some(mut student) = owner else {
            return Err(DomainError::student_not_found(fields.student_id));
        };

        // The student may have been deleted since it was looked up.
        let Some(mark) = self.marks.insert(&fields).await? else {
            warn!("Student {} vanished before mark was stored", fields.student_id);
            return Err(
                ValidationErrors::single("student", validation::STUDENT_UNKNOWN).into(),
            );
        };
        let mark_id = mark.id();
        student.add_mark(mark);

        info!(
            "Recorded mark {} ({}) for student {}",
            mark_id, fields.value, fields.student_id
        );
        self.graded(&student, mark_id)
    }

    pub async fn get_mark(&self, mark_id: i64) -> DomainResult<GradedMark> {
        let Some(student_id) = self.marks.find_owner(mark_id).await? else {
            warn!("Mark not found: {}", mark_id);
            return Err(DomainError::mark_not_found(mark_id));
        };

        let student = self
            .students
            .find(student_id)
            .await?
            .ok_or_else(|| DomainError::mark_not_found(mark_id))?;

        self.graded(&student, mark_id)
    }

    /// Average over every mark in the classroom; `None` when there are none
    pub async fn classroom_average(&self) -> DomainResult<Option<f64>> {
        let values = self.marks.list_values().await?;
        let count = values.len();
        let average = average::mean(values);

        info!("Classroom average over {} marks: {:?}", count, average);
        Ok(average)
    }

    fn graded(&self, student: &Student, mark_id: i64) -> DomainResult<GradedMark> {
        let mark = student
            .marks()
            .iter()
            .find(|m| m.id() == mark_id)
            .cloned()
            .ok_or_else(|| DomainError::mark_not_found(mark_id))?;

        Ok(GradedMark {
            mark,
            student: student.profile(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{RawMarkValue, StudentLink};
    use crate::domain::validation::StudentFields;
    use crate::storage::DbConnection;
    use chrono::NaiveDate;

    async fn create_test_service() -> (MarkService, StudentRepository) {
        let db = DbConnection::init_test().await.expect("Failed to init test DB");
        let students = StudentRepository::new(db.clone());
        (
            MarkService::new(MarkRepository::new(db), students.clone()),
            students,
        )
    }

    async fn insert_student(students: &StudentRepository, first_name: &str) -> i64 {
        students
            .insert(&StudentFields {
                first_name: first_name.to_string(),
                last_name: "Durand".to_string(),
                birthday: NaiveDate::from_ymd_opt(2008, 3, 14).unwrap(),
            })
            .await
            .unwrap()
            .id()
    }

    fn draft(value: f64, student: StudentLink) -> MarkDraft {
        MarkDraft {
            value: Some(RawMarkValue::Number(value)),
            subject: Some("Histoire".into()),
            student: Some(student),
        }
    }

    #[tokio::test]
    async fn test_create_mark() {
        let (service, students) = create_test_service().await;
        let lina = insert_student(&students, "Lina").await;

        let graded = service.create_mark(draft(14.0, StudentLink::Id(lina))).await.unwrap();

        assert_eq!(graded.mark.value(), 14.0);
        assert_eq!(graded.mark.student_id(), Some(lina));
        assert_eq!(graded.student.first_name, "Lina");
    }

    #[tokio::test]
    async fn test_create_mark_by_iri() {
        let (service, students) = create_test_service().await;
        let lina = insert_student(&students, "Lina").await;

        let link = StudentLink::Iri(format!("/api/students/{}", lina));
        let graded = service.create_mark(draft(8.5, link)).await.unwrap();

        assert_eq!(graded.student.id, lina);
    }

    #[tokio::test]
    async fn test_create_mark_for_unknown_student() {
        let (service, _) = create_test_service().await;

        let result = service.create_mark(draft(14.0, StudentLink::Id(99))).await;

        match result {
            Err(DomainError::Validation(errors)) => assert!(errors.has_violation_for("student")),
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_out_of_range_mark_writes_nothing() {
        let (service, students) = create_test_service().await;
        let lina = insert_student(&students, "Lina").await;

        let result = service.create_mark(draft(20.5, StudentLink::Id(lina))).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(service.list_marks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_mark() {
        let (service, students) = create_test_service().await;
        let lina = insert_student(&students, "Lina").await;
        let created = service.create_mark(draft(11.0, StudentLink::Id(lina))).await.unwrap();

        let found = service.get_mark(created.mark.id()).await.unwrap();

        assert_eq!(found, created);
        assert!(matches!(
            service.get_mark(created.mark.id() + 1).await,
            Err(DomainError::NotFound { entity: "Mark", .. })
        ));
    }

    #[tokio::test]
    async fn test_list_marks_across_students() {
        let (service, students) = create_test_service().await;
        let lina = insert_student(&students, "Lina").await;
        let hugo = insert_student(&students, "Hugo").await;
        service.create_mark(draft(10.0, StudentLink::Id(hugo))).await.unwrap();
        service.create_mark(draft(12.0, StudentLink::Id(lina))).await.unwrap();

        let marks = service.list_marks().await.unwrap();

        let owners: Vec<&str> = marks.iter().map(|g| g.student.first_name.as_str()).collect();
        assert_eq!(owners, vec!["Hugo", "Lina"]);
    }

    #[tokio::test]
    async fn test_classroom_average() {
        let (service, students) = create_test_service().await;
        assert_eq!(service.classroom_average().await.unwrap(), None);

        let lina = insert_student(&students, "Lina").await;
        let hugo = insert_student(&students, "Hugo").await;
        for value in [12.0, 15.0, 9.0] {
            service.create_mark(draft(value, StudentLink::Id(lina))).await.unwrap();
        }
        for value in [20.0, 0.0] {
            service.create_mark(draft(value, StudentLink::Id(hugo))).await.unwrap();
        }

        assert_eq!(service.classroom_average().await.unwrap(), Some(11.2));
    }
}
