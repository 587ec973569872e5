//! # Storage Module
//!
//! SQLite persistence for students and marks.
//!
//! The repositories hide SQL from the domain layer. They assign ids, load
//! students together with their marks, and run multi-statement writes such
//! as the student cascade delete inside a single transaction.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{MarkRepository, StudentRepository};
