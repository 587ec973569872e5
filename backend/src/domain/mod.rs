//! # Domain Module
//!
//! Business rules of the gradebook, independent of HTTP and SQL.
//!
//! ## Module Organization
//!
//! - **models**: Student and Mark records; the student maintains the
//!   Student/Mark back-reference
//! - **validation**: named field rules run before every write
//! - **average**: arithmetic mean of mark values
//! - **student_service** / **mark_service**: operations exposed to the io layer
//!
//! ## Business Rules
//!
//! - A mark is worth between 0 and 20 inclusive and names a subject of at
//!   least five characters
//! - Student names have at least two characters and no digits
//! - A mark always belongs to exactly one existing student
//! - Deleting a student deletes its marks
//! - The average of no marks is undefined and reported as `None`

pub mod average;
pub mod error;
pub mod mark_service;
pub mod models;
pub mod student_service;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use mark_service::MarkService;
pub use student_service::StudentService;
