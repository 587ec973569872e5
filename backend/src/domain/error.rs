use super::validation::ValidationErrors;

/// Everything a gradebook operation can fail with
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("validation failed:\n{0}")]
    Validation(ValidationErrors),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}

impl DomainError {
    pub fn student_not_found(id: i64) -> Self {
        DomainError::NotFound {
            entity: "Student",
            id,
        }
    }

    pub fn mark_not_found(id: i64) -> Self {
        DomainError::NotFound { entity: "Mark", id }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
