use serde_json::Value;

use super::raw_text;
use super::student_mapper::StudentMapper;
use crate::domain::models::{GradedMark, MarkDraft, RawMarkValue, StudentLink};
use shared::{CreateMarkRequest, MarkView};

/// Mapper between mark DTOs and domain marks
pub struct MarkMapper;

impl MarkMapper {
    /// Mark view: mark fields plus the owning student's summary, no marks
    /// nested inside that student.
    pub fn to_view(graded: &GradedMark) -> MarkView {
        MarkView {
            id: graded.mark.id(),
            value: graded.mark.value(),
            subject: graded.mark.subject().to_string(),
            student: StudentMapper::to_summary(&graded.student),
        }
    }

    pub fn to_view_list(marks: &[GradedMark]) -> Vec<MarkView> {
        marks.iter().map(Self::to_view).collect()
    }

    pub fn to_draft(request: CreateMarkRequest) -> MarkDraft {
        MarkDraft {
            value: request.value.map(Self::raw_value),
            subject: request.subject.map(raw_text),
            student: request.student.map(Self::student_link),
        }
    }

    /// An integer id or an IRI string; anything else cannot name a student.
    fn student_link(value: Value) -> StudentLink {
        match value {
            Value::Number(number) => number
                .as_i64()
                .map(StudentLink::Id)
                .unwrap_or(StudentLink::Other),
            Value::String(iri) => StudentLink::Iri(iri),
            _ => StudentLink::Other,
        }
    }

    fn raw_value(value: Value) -> RawMarkValue {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(RawMarkValue::Number)
                .unwrap_or(RawMarkValue::Other),
            Value::String(text) => RawMarkValue::Text(text),
            _ => RawMarkValue::Other,
        }
    }
}
