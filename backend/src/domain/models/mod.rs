pub mod input;
pub mod mark;
pub mod student;

pub use input::RawText;
pub use mark::{GradedMark, Mark, MarkDraft, RawMarkValue, StudentLink};
pub use student::{Student, StudentDraft, StudentProfile};
