//! # REST API for Student Management
//!
//! Endpoints for listing, creating, reading, replacing and deleting students,
//! plus the per-student average.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tracing::info;

use super::error::ApiError;
use super::mappers::StudentMapper;
use crate::AppState;
use shared::{AverageResponse, CreateStudentRequest, StudentView, UpdateStudentRequest};

/// Create a router for student related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route(
            "/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/:id/average", get(get_student_average))
}

/// List all students with their marks
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentView>>, ApiError> {
    info!("GET /api/students");

    let students = state.student_service.list_students().await?;
    Ok(Json(StudentMapper::to_view_list(&students)))
}

/// Create a new student
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentView>), ApiError> {
    let Json(request) = payload?;
    info!("POST /api/students - request: {:?}", request);

    let student = state
        .student_service
        .create_student(StudentMapper::create_to_draft(request))
        .await?;
    Ok((StatusCode::CREATED, Json(StudentMapper::to_view(&student))))
}

/// Get a student by ID
pub async fn get_student(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<StudentView>, ApiError> {
    let Path(student_id) = path?;
    info!("GET /api/students/{}", student_id);

    let student = state.student_service.get_student(student_id).await?;
    Ok(Json(StudentMapper::to_view(&student)))
}

/// Replace the fields of a student; its marks are left as they are
pub async fn update_student(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> Result<Json<StudentView>, ApiError> {
    let Path(student_id) = path?;
    let Json(request) = payload?;
    info!("PUT /api/students/{} - request: {:?}", student_id, request);

    let student = state
        .student_service
        .update_student(student_id, StudentMapper::update_to_draft(request))
        .await?;
    Ok(Json(StudentMapper::to_view(&student)))
}

/// Delete a student and its marks
pub async fn delete_student(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(student_id) = path?;
    info!("DELETE /api/students/{}", student_id);

    state.student_service.delete_student(student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Average of one student's marks
pub async fn get_student_average(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<AverageResponse>, ApiError> {
    let Path(student_id) = path?;
    info!("GET /api/students/{}/average", student_id);

    let average = state.student_service.student_average(student_id).await?;
    Ok(Json(average))
}
