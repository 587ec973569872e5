use chrono::NaiveDate;

use super::input::RawText;
use super::mark::Mark;
use crate::domain::average;

/// A learner and the marks it owns.
///
/// The student is the only place where the Student/Mark back-reference is
/// maintained: [`Student::add_mark`] sets it and [`Student::remove_mark`]
/// clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    id: i64,
    first_name: String,
    last_name: String,
    birthday: NaiveDate,
    marks: Vec<Mark>,
}

impl Student {
    pub fn new(
        id: i64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthday: NaiveDate,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthday,
            marks: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn birthday(&self) -> NaiveDate {
        self.birthday
    }

    pub fn set_birthday(&mut self, birthday: NaiveDate) {
        self.birthday = birthday;
    }

    /// Owned marks, in insertion order
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    #[cfg(test)]
    pub fn mark_mut(&mut self, mark_id: i64) -> Option<&mut Mark> {
        self.marks.iter_mut().find(|m| m.id() == mark_id)
    }

    /// Append `mark` unless a mark with the same id is already owned, and
    /// point its back-reference at this student.
    ///
    /// Returns `false` when the mark was already present.
    pub fn add_mark(&mut self, mut mark: Mark) -> bool {
        if self.marks.iter().any(|m| m.id() == mark.id()) {
            return false;
        }
        mark.set_student_id(Some(self.id));
        self.marks.push(mark);
        true
    }

    /// Detach the mark with `mark_id` and hand it back.
    ///
    /// The back-reference is cleared only if it still names this student.
    /// Removing an unknown mark is a no-op.
    pub fn remove_mark(&mut self, mark_id: i64) -> Option<Mark> {
        let index = self.marks.iter().position(|m| m.id() == mark_id)?;
        let mut mark = self.marks.remove(index);
        if mark.student_id() == Some(self.id) {
            mark.set_student_id(None);
        }
        Some(mark)
    }

    /// Mean of this student's marks; `None` without marks.
    pub fn average(&self) -> Option<f64> {
        average::mean(self.marks.iter().map(Mark::value))
    }

    pub fn profile(&self) -> StudentProfile {
        StudentProfile {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birthday: self.birthday,
        }
    }
}

/// Student identity without its marks
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
}

/// Unvalidated input for creating or replacing a student
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentDraft {
    pub first_name: Option<RawText>,
    pub last_name: Option<RawText>,
    /// Date as text, parsed during validation
    pub birthday: Option<RawText>,
}

impl StudentDraft {
    /// Fill the fields missing from `self` with the current values of `student`.
    pub fn merged_over(self, student: &Student) -> Self {
        Self {
            first_name: self
                .first_name
                .or_else(|| Some(student.first_name().into())),
            last_name: self
                .last_name
                .or_else(|| Some(student.last_name().into())),
            birthday: self
                .birthday
                .or_else(|| Some(student.birthday().format("%Y-%m-%d").to_string().into())),
        }
    }
}
