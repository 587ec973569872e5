//! # REST API for Mark Management
//!
//! Endpoints for listing, recording and reading marks, plus the classroom
//! average.

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
use super::mappers::MarkMapper;
use crate::AppState;
use shared::{AverageResponse, CreateMarkRequest, MarkView};

/// Create a router for mark related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_marks).post(create_mark))
        .route("/average", get(get_classroom_average))
        .route("/:id", get(get_mark))
}

/// List all marks with their student
pub async fn list_marks(State(state): State<AppState>) -> Result<Json<Vec<MarkView>>, ApiError> {
    info!("GET /api/marks");

    let marks = state.mark_service.list_marks().await?;
    Ok(Json(MarkMapper::to_view_list(&marks)))
}

/// Record a new mark for an existing student
pub async fn create_mark(
    State(state): State<AppState>,
    payload: Result<Json<CreateMarkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MarkView>), ApiError> {
    let Json(request) = payload?;
    info!("POST /api/marks - request: {:?}", request);

    let graded = state
        .mark_service
        .create_mark(MarkMapper::to_draft(request))
        .await?;
    Ok((StatusCode::CREATED, Json(MarkMapper::to_view(&graded))))
}

/// Get a mark by ID
pub async fn get_mark(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MarkView>, ApiError> {
    let Path(mark_id) = path?;
    info!("GET /api/marks/{}", mark_id);

    let graded = state.mark_service.get_mark(mark_id).await?;
    Ok(Json(MarkMapper::to_view(&graded)))
}

/// Average of every mark in the classroom
pub async fn get_classroom_average(
    State(state): State<AppState>,
) -> Result<Json<AverageResponse>, ApiError> {
    info!("GET /api/marks/average");

    let average = state.mark_service.classroom_average().await?;
    Ok(Json(average))
}

#[cfg(test)]
mod tests {
    use crate::{create_router, AppState, DbConnection};
    use axum::{
        body::Body,
        http::{HeaderValue, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use shared::{ErrorResponse, MarkView, StudentView};
    use tower::ServiceExt;

    async fn setup_test_app() -> Router {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        create_router(
            AppState::new(db),
            HeaderValue::from_static("http://localhost:8080"),
        )
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn create_student(app: &Router, first_name: &str) -> i64 {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/students",
            Some(json!({ "firstName": first_name, "lastName": "Durand", "birthday": "2008-03-14" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice::<StudentView>(&body).unwrap().id
    }

    async fn post_mark(app: &Router, body: Value) -> (StatusCode, Vec<u8>) {
        send(app, Method::POST, "/api/marks", Some(body)).await
    }

    #[tokio::test]
    async fn test_create_and_get_mark() {
        let app = setup_test_app().await;
        let lina = create_student(&app, "Lina").await;

        let (status, body) = post_mark(
            &app,
            json!({ "value": 14.5, "subject": "Histoire", "student": format!("/api/students/{}", lina) }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: MarkView = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.value, 14.5);
        assert_eq!(created.student.id, lina);

        let (status, body) = send(&app, Method::GET, &format!("/api/marks/{}", created.id), None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: MarkView = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_mark_view_does_not_embed_student_marks() {
        let app = setup_test_app().await;
        let lina = create_student(&app, "Lina").await;
        post_mark(&app, json!({ "value": 10, "subject": "Histoire", "student": lina })).await;

        let (_, body) = send(&app, Method::GET, "/api/marks", None).await;
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json[0]["student"]["firstName"], "Lina");
        assert_eq!(json[0]["student"]["birthday"], "2008-03-14");
        assert!(json[0]["student"].get("marks").is_none());
    }

    #[tokio::test]
    async fn test_numeric_string_value_is_accepted() {
        let app = setup_test_app().await;
        let lina = create_student(&app, "Lina").await;

        let (status, body) =
            post_mark(&app, json!({ "value": "17", "subject": "Histoire", "student": lina })).await;

        assert_eq!(status, StatusCode::CREATED);
        let created: MarkView = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.value, 17.0);
    }

    #[tokio::test]
    async fn test_value_bounds() {
        let app = setup_test_app().await;
        let lina = create_student(&app, "Lina").await;

        for value in [0.0, 20.0] {
            let (status, _) =
                post_mark(&app, json!({ "value": value, "subject": "Histoire", "student": lina })).await;
            assert_eq!(status, StatusCode::CREATED, "{} should be accepted", value);
        }

        for value in [-0.01, 20.01] {
            let (status, body) =
                post_mark(&app, json!({ "value": value, "subject": "Histoire", "student": lina })).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{} should be rejected", value);
            let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(error.violations[0].property_path, "value");
        }
    }

    #[tokio::test]
    async fn test_invalid_mark_reports_every_field() {
        let app = setup_test_app().await;

        let (status, body) = post_mark(&app, json!({ "value": "abc", "subject": "Art" })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        let paths: Vec<&str> = error.violations.iter().map(|v| v.property_path.as_str()).collect();
        assert_eq!(paths, vec!["value", "subject", "student"]);
    }

    #[tokio::test]
    async fn test_wrongly_typed_fields_are_violations() {
        let app = setup_test_app().await;
        let lina = create_student(&app, "Lina").await;

        let (status, body) =
            post_mark(&app, json!({ "value": 12, "subject": 123, "student": 1.0 })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        let paths: Vec<&str> = error.violations.iter().map(|v| v.property_path.as_str()).collect();
        assert_eq!(paths, vec!["subject", "student"]);

        let (status, body) =
            post_mark(&app, json!({ "value": 12, "subject": 12345, "student": lina })).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: MarkView = serde_json::from_slice(&body).unwrap();
        assert_eq!(created.subject, "12345");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let app = setup_test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/marks/abc", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.title, "Not Found");
    }

    #[tokio::test]
    async fn test_mark_for_unknown_student() {
        let app = setup_test_app().await;

        let (status, _) =
            post_mark(&app, json!({ "value": 12, "subject": "Histoire", "student": 77 })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_get_missing_mark() {
        let app = setup_test_app().await;

        let (status, _) = send(&app, Method::GET, "/api/marks/5", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_classroom_average() {
        let app = setup_test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/marks/average", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), Value::Null);

        let lina = create_student(&app, "Lina").await;
        let hugo = create_student(&app, "Hugo").await;
        for (student, value) in [(lina, 12.0), (lina, 15.0), (hugo, 9.0), (hugo, 20.0), (lina, 0.0)] {
            post_mark(&app, json!({ "value": value, "subject": "Histoire", "student": student })).await;
        }

        let (_, body) = send(&app, Method::GET, "/api/marks/average", None).await;
        assert_eq!(serde_json::from_slice::<Option<f64>>(&body).unwrap(), Some(11.2));
    }
}
