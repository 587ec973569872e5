pub mod mark_mapper;
pub mod student_mapper;

pub use mark_mapper::MarkMapper;
pub use student_mapper::StudentMapper;

use serde_json::Value;

use crate::domain::models::RawText;

/// Text input as received; numbers are kept as their decimal text.
fn raw_text(value: Value) -> RawText {
    match value {
        Value::String(text) => RawText::Text(text),
        Value::Number(number) => RawText::Text(number.to_string()),
        _ => RawText::Other,
    }
}
