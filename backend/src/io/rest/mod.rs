//! # REST API Interface Layer
//!
//! HTTP endpoints for the gradebook. Handlers translate JSON requests into
//! domain drafts, call the services and shape the results into views.
//! Domain errors become HTTP statuses in [`error::ApiError`].

pub mod error;
pub mod mappers;
pub mod mark_apis;
pub mod student_apis;

pub use error::ApiError;
