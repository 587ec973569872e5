//! # Validation
//!
//! Field rules for students and marks, run as a pipeline before any write.
//!
//! Each field has a "required" check followed by a list of named [`Rule`]s.
//! A missing value reports only the required violation; a present value
//! reports every rule it fails. Nothing is written unless the whole input
//! passes.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{MarkDraft, RawMarkValue, RawText, StudentDraft, StudentLink};

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new("[0-9]").expect("digit pattern is valid"));

pub const MARK_MIN: f64 = 0.0;
pub const MARK_MAX: f64 = 20.0;
pub const SUBJECT_MIN_CHARS: usize = 5;
pub const SUBJECT_MAX_CHARS: usize = 32;
pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 64;

/// A named check on one field value
pub struct Rule<T: ?Sized> {
    pub name: &'static str,
    pub message: &'static str,
    check: fn(&T) -> bool,
}

impl<T: ?Sized> Rule<T> {
    /// `Err(message)` when `value` fails the rule
    pub fn apply(&self, value: &T) -> Result<(), &'static str> {
        if (self.check)(value) {
            Ok(())
        } else {
            Err(self.message)
        }
    }
}

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub property_path: &'static str,
    pub message: &'static str,
}

/// Every violation found in one input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn single(property_path: &'static str, message: &'static str) -> Self {
        Self(vec![Violation {
            property_path,
            message,
        }])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_violation_for(&self, property_path: &str) -> bool {
        self.0.iter().any(|v| v.property_path == property_path)
    }

    fn push(&mut self, property_path: &'static str, message: &'static str) {
        self.0.push(Violation {
            property_path,
            message,
        });
    }

    fn into_result<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            _ => Err(self),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .0
            .iter()
            .map(|v| format!("{}: {}", v.property_path, v.message))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

/// Student fields that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct StudentFields {
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
}

/// Mark fields that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct MarkFields {
    pub value: f64,
    pub subject: String,
    pub student_id: i64,
}

fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn name_long_enough(value: &str) -> bool {
    char_count(value) >= NAME_MIN_CHARS
}

fn name_short_enough(value: &str) -> bool {
    char_count(value) <= NAME_MAX_CHARS
}

fn has_no_digit(value: &str) -> bool {
    !DIGIT.is_match(value)
}

fn subject_long_enough(value: &str) -> bool {
    char_count(value) >= SUBJECT_MIN_CHARS
}

fn subject_short_enough(value: &str) -> bool {
    char_count(value) <= SUBJECT_MAX_CHARS
}

fn within_mark_range(value: &f64) -> bool {
    (MARK_MIN..=MARK_MAX).contains(value)
}

const FIRST_NAME_RULES: &[Rule<str>] = &[
    Rule {
        name: "min_length",
        message: "Le prénom doit faire au moins deux caractères !",
        check: name_long_enough,
    },
    Rule {
        name: "max_length",
        message: "Le prénom ne peut pas dépasser 64 caractères !",
        check: name_short_enough,
    },
    Rule {
        name: "no_digit",
        message: "Le prénom ne peut pas contenir de chiffre !",
        check: has_no_digit,
    },
];

const LAST_NAME_RULES: &[Rule<str>] = &[
    Rule {
        name: "min_length",
        message: "Le nom doit faire au moins deux caractères !",
        check: name_long_enough,
    },
    Rule {
        name: "max_length",
        message: "Le nom ne peut pas dépasser 64 caractères !",
        check: name_short_enough,
    },
    Rule {
        name: "no_digit",
        message: "Le nom ne peut pas contenir de chiffre !",
        check: has_no_digit,
    },
];

const SUBJECT_RULES: &[Rule<str>] = &[
    Rule {
        name: "min_length",
        message: "Le matière doit faire au moins cinq caractères !",
        check: subject_long_enough,
    },
    Rule {
        name: "max_length",
        message: "La matière ne peut pas dépasser 32 caractères !",
        check: subject_short_enough,
    },
];

const VALUE_RULES: &[Rule<f64>] = &[Rule {
    name: "range",
    message: "La note doit être comprise entre 0 et 20 !",
    check: within_mark_range,
}];

const FIRST_NAME_REQUIRED: &str = "Le prénom de l'élève est obligatoire !";
const LAST_NAME_REQUIRED: &str = "Le nom de l'élève est obligatoire !";
const BIRTHDAY_REQUIRED: &str = "Le date de naissance de l'élève est obligatoire !";
const BIRTHDAY_INVALID: &str = "La date renseignée doit être au format YYYY-MM-DD !";
const TEXT_EXPECTED: &str = "Cette valeur doit être une chaîne de caractères !";
const VALUE_REQUIRED: &str = "La note est obligatoire !";
const VALUE_NOT_A_NUMBER: &str = "La note doit obligatoirement être un nombre !";
const SUBJECT_REQUIRED: &str = "La matière est obligatoire !";
const STUDENT_REQUIRED: &str = "L'élève doit obligatoirement être renseigné !";
const STUDENT_INVALID: &str = "L'élève doit être désigné par son identifiant ou son IRI !";
pub const STUDENT_UNKNOWN: &str = "L'élève renseigné est introuvable !";

/// Check a text field: required first, then its type, then every rule.
fn check_text<'a>(
    errors: &mut ValidationErrors,
    property_path: &'static str,
    value: Option<&'a RawText>,
    required_message: &'static str,
    rules: &[Rule<str>],
) -> Option<&'a str> {
    let value = match value {
        None => None,
        Some(RawText::Text(text)) if text.is_empty() => None,
        Some(RawText::Text(text)) => Some(text.as_str()),
        Some(RawText::Other) => {
            errors.push(property_path, TEXT_EXPECTED);
            return None;
        }
    };
    let Some(value) = value else {
        errors.push(property_path, required_message);
        return None;
    };

    let mut passed = true;
    for rule in rules {
        if let Err(message) = rule.apply(value) {
            errors.push(property_path, message);
            passed = false;
        }
    }
    passed.then_some(value)
}

/// Parse a calendar date, accepting `YYYY-MM-DD` or an RFC 3339 date-time.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Coerce a raw mark value to a finite number. Numeric strings are accepted.
pub fn parse_mark_value(value: &RawMarkValue) -> Option<f64> {
    let number = match value {
        RawMarkValue::Number(n) => *n,
        RawMarkValue::Text(text) => text.trim().parse::<f64>().ok()?,
        RawMarkValue::Other => return None,
    };
    number.is_finite().then_some(number)
}

pub fn validate_student(draft: &StudentDraft) -> Result<StudentFields, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let first_name = check_text(
        &mut errors,
        "firstName",
        draft.first_name.as_ref(),
        FIRST_NAME_REQUIRED,
        FIRST_NAME_RULES,
    );
    let last_name = check_text(
        &mut errors,
        "lastName",
        draft.last_name.as_ref(),
        LAST_NAME_REQUIRED,
        LAST_NAME_RULES,
    );

    let birthday = match draft.birthday.as_ref() {
        None => {
            errors.push("birthday", BIRTHDAY_REQUIRED);
            None
        }
        Some(RawText::Text(text)) if text.is_empty() => {
            errors.push("birthday", BIRTHDAY_REQUIRED);
            None
        }
        Some(raw) => {
            let parsed = raw.as_text().and_then(parse_date);
            if parsed.is_none() {
                errors.push("birthday", BIRTHDAY_INVALID);
            }
            parsed
        }
    };

    let fields = match (first_name, last_name, birthday) {
        (Some(first_name), Some(last_name), Some(birthday)) => Some(StudentFields {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birthday,
        }),
        _ => None,
    };
    errors.into_result(fields)
}

/// Validate a mark draft. `student_exists` tells whether the referenced
/// student was found in storage.
pub fn validate_mark(draft: &MarkDraft, student_exists: bool) -> Result<MarkFields, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let value = match &draft.value {
        None => {
            errors.push("value", VALUE_REQUIRED);
            None
        }
        Some(RawMarkValue::Text(text)) if text.is_empty() => {
            errors.push("value", VALUE_REQUIRED);
            None
        }
        Some(raw) => match parse_mark_value(raw) {
            None => {
                errors.push("value", VALUE_NOT_A_NUMBER);
                None
            }
            Some(number) => {
                let mut passed = true;
                for rule in VALUE_RULES {
                    if let Err(message) = rule.apply(&number) {
                        errors.push("value", message);
                        passed = false;
                    }
                }
                passed.then_some(number)
            }
        },
    };

    let subject = check_text(
        &mut errors,
        "subject",
        draft.subject.as_ref(),
        SUBJECT_REQUIRED,
        SUBJECT_RULES,
    );

    let student_id = match &draft.student {
        None => {
            errors.push("student", STUDENT_REQUIRED);
            None
        }
        Some(StudentLink::Other) => {
            errors.push("student", STUDENT_INVALID);
            None
        }
        Some(link) => match link.resolve() {
            Some(id) if student_exists => Some(id),
            _ => {
                errors.push("student", STUDENT_UNKNOWN);
                None
            }
        },
    };

    let fields = match (value, subject, student_id) {
        (Some(value), Some(subject), Some(student_id)) => Some(MarkFields {
            value,
            subject: subject.to_string(),
            student_id,
        }),
        _ => None,
    };
    errors.into_result(fields)
}
