use super::raw_text;
use crate::domain::models::{Student, StudentDraft, StudentProfile};
use shared::{
    CreateStudentRequest, MarkSummary, StudentSummary, StudentView, UpdateStudentRequest,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Mapper between student DTOs and domain students
pub struct StudentMapper;

impl StudentMapper {
    /// Student view: scalar fields plus mark summaries, no nested student.
    pub fn to_view(student: &Student) -> StudentView {
        StudentView {
            id: student.id(),
            first_name: student.first_name().to_string(),
            last_name: student.last_name().to_string(),
            birthday: student.birthday().format(DATE_FORMAT).to_string(),
            marks: student
                .marks()
                .iter()
                .map(|mark| MarkSummary {
                    id: mark.id(),
                    value: mark.value(),
                    subject: mark.subject().to_string(),
                })
                .collect(),
        }
    }

    pub fn to_view_list(students: &[Student]) -> Vec<StudentView> {
        students.iter().map(Self::to_view).collect()
    }

    /// Student as embedded in a mark view
    pub fn to_summary(profile: &StudentProfile) -> StudentSummary {
        StudentSummary {
            id: profile.id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            birthday: profile.birthday.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn create_to_draft(request: CreateStudentRequest) -> StudentDraft {
        StudentDraft {
            first_name: request.first_name.map(raw_text),
            last_name: request.last_name.map(raw_text),
            birthday: request.birthday.map(raw_text),
        }
    }

    pub fn update_to_draft(request: UpdateStudentRequest) -> StudentDraft {
        StudentDraft {
            first_name: request.first_name.map(raw_text),
            last_name: request.last_name.map(raw_text),
            birthday: request.birthday.map(raw_text),
        }
    }
}
