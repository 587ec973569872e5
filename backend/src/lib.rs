//! # Gradebook Backend
//!
//! REST service for students and their marks.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! IO Layer (REST handlers, DTO mappers)
//!     ↓
//! Domain Layer (models, validation, averages, services)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod logging;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{MarkService, StudentService};
pub use crate::storage::DbConnection;
use crate::storage::{MarkRepository, StudentRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub student_service: StudentService,
    pub mark_service: MarkService,
}

impl AppState {
    /// Wire the services on top of one database connection
    pub fn new(db: DbConnection) -> Self {
        let students = StudentRepository::new(db.clone());
        let marks = MarkRepository::new(db);

        Self {
            student_service: StudentService::new(students.clone()),
            mark_service: MarkService::new(marks, students),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up application state");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/students", io::rest::student_apis::router())
        .nest("/marks", io::rest::mark_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
