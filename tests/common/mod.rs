#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;

use trainlog::config::Config;
use trainlog::db::{create_memory_pool, DbPool};
use trainlog::identity::SessionIdentity;
use trainlog::migrations::run_migrations_for_tests;
use trainlog::models::Exercise;
use trainlog::repositories::{ExerciseRepository, SessionRepository, SqliteStore};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    create_test_app_with_config(pool, &Config::default())
}

pub fn create_test_app_with_config(pool: DbPool, config: &Config) -> Router {
    let store = Arc::new(SqliteStore::new(pool.clone()));
    let identity = Arc::new(SessionIdentity::new(SessionRepository::new(pool)));
    trainlog::routes::build_router(store, identity, config)
}

pub async fn create_test_exercise(pool: &DbPool, name: &str) -> Exercise {
    let (exercise, _) = ExerciseRepository::new(pool.clone())
        .insert_if_missing(name)
        .await
        .expect("Failed to create exercise");
    exercise
}

pub async fn create_session_token(pool: &DbPool, user_id: &str) -> String {
    SessionRepository::new(pool.clone())
        .create(user_id, chrono::Duration::days(7))
        .await
        .expect("Failed to create session")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(token))
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(token))
        .body(Body::empty())
        .unwrap()
}

pub fn send_json(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).expect("response body is not JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}
