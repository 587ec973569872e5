pub mod mark_repository;
pub mod student_repository;

pub use mark_repository::MarkRepository;
pub use student_repository::StudentRepository;
