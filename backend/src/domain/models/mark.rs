use super::input::RawText;
use super::student::StudentProfile;

/// A single graded value for one subject.
///
/// Setters do not validate; input is checked by
/// [`crate::domain::validation`] before anything reaches storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    id: i64,
    value: f64,
    subject: String,
    student_id: Option<i64>,
}

impl Mark {
    /// Build a mark that does not belong to any student yet.
    /// Attach it with [`super::Student::add_mark`].
    pub fn new(id: i64, value: f64, subject: impl Into<String>) -> Self {
        Self {
            id,
            value,
            subject: subject.into(),
            student_id: None,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    /// Back-reference to the owning student
    pub fn student_id(&self) -> Option<i64> {
        self.student_id
    }

    pub fn set_student_id(&mut self, student_id: Option<i64>) {
        self.student_id = student_id;
    }
}

/// A mark paired with the student it belongs to, as served by the mark
/// endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedMark {
    pub mark: Mark,
    pub student: StudentProfile,
}

/// Reference to a student as supplied by a client
#[derive(Debug, Clone, PartialEq)]
pub enum StudentLink {
    Id(i64),
    /// Resource path, e.g. `/api/students/3`
    Iri(String),
    /// Neither an integer nor a string
    Other,
}

impl StudentLink {
    const IRI_PREFIX: &'static str = "/api/students/";

    /// The student id this link points to, if it can be read at all.
    pub fn resolve(&self) -> Option<i64> {
        match self {
            StudentLink::Id(id) => Some(*id),
            StudentLink::Iri(iri) => iri
                .strip_prefix(Self::IRI_PREFIX)
                .and_then(|rest| rest.trim_end_matches('/').parse().ok()),
            StudentLink::Other => None,
        }
    }
}

/// Mark value as received, before numeric coercion
#[derive(Debug, Clone, PartialEq)]
pub enum RawMarkValue {
    Number(f64),
    Text(String),
    /// Anything that is neither a number nor a string (bool, array, object)
    Other,
}

/// Unvalidated input for creating a mark
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkDraft {
    pub value: Option<RawMarkValue>,
    pub subject: Option<RawText>,
    pub student: Option<StudentLink>,
}
