use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Student as rendered by the student endpoints, with its marks embedded.
///
/// Embedded marks are [`MarkSummary`] values and never carry the student
/// again, which keeps the Student/Mark graph from nesting endlessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Calendar date (YYYY-MM-DD)
    pub birthday: String,
    /// Marks in insertion order
    pub marks: Vec<MarkSummary>,
}

/// Mark as embedded inside a [`StudentView`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkSummary {
    pub id: i64,
    pub value: f64,
    pub subject: String,
}

/// Mark as rendered by the mark endpoints, with its owning student embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkView {
    pub id: i64,
    pub value: f64,
    pub subject: String,
    pub student: StudentSummary,
}

/// Student as embedded inside a [`MarkView`]: no marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birthday: String,
}

/// Body of POST /api/students.
///
/// Fields are kept as raw JSON so that a missing or wrongly typed field is
/// reported as a validation violation on that field instead of a decoding
/// failure of the whole body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateStudentRequest {
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    /// Calendar date as text (YYYY-MM-DD)
    pub birthday: Option<Value>,
}

/// Body of PUT /api/students/{id}.
///
/// Absent fields keep their stored value. A `marks` member, if sent, is
/// ignored: marks are managed through the mark endpoints only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateStudentRequest {
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub birthday: Option<Value>,
}

/// Body of POST /api/marks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMarkRequest {
    /// A JSON number or a numeric string
    pub value: Option<Value>,
    pub subject: Option<Value>,
    /// Student id, or its IRI (`/api/students/{id}`)
    pub student: Option<Value>,
}

/// Average endpoints answer with a bare JSON number, or `null` when there
/// are no marks to average.
pub type AverageResponse = Option<f64>;

/// Error body shared by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub title: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationDto>,
}

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationDto {
    pub property_path: String,
    pub message: String,
}
