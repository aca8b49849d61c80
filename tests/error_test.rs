use axum::{http::StatusCode, response::IntoResponse};
use http_body_util::BodyExt;
use serde_json::Value;

use trainlog::error::AppError;

async fn render(error: AppError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_not_found_keeps_message() {
    let (status, body) = render(AppError::NotFound("Training not found".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Training not found");
}

#[tokio::test]
async fn test_unauthorized() {
    let (status, body) = render(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_validation_and_bad_request_are_400() {
    let (status, body) = render(AppError::Validation("weight is required".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
    assert_eq!(body["message"], "weight is required");

    let (status, body) = render(AppError::BadRequest("invalid date".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let (status, body) = render(AppError::Internal("secret detail".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal");
    assert_eq!(body["message"], "Internal error");

    let (status, body) = render(AppError::Database(rusqlite::Error::QueryReturnedNoRows)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal error");
}

#[test]
fn test_status_mapping() {
    assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::NotFound("x".to_string()).status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_display_includes_context() {
    let error = AppError::Validation("rpe must be between 0 and 10".to_string());
    assert_eq!(error.to_string(), "Validation error: rpe must be between 0 and 10");
}
