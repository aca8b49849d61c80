use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::date::{deserialize_optional_date, today};
use crate::models::{Training, TrainingPayload};
use crate::services::{TrainingLog, TrainingService};

#[derive(Clone)]
pub struct TrainingsState {
    pub service: TrainingService,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub to: Option<NaiveDate>,
}

pub async fn list(
    State(state): State<TrainingsState>,
    auth_user: AuthUser,
    query: std::result::Result<Query<LogQuery>, QueryRejection>,
) -> Result<Json<TrainingLog>> {
    let Query(query) = query?;
    let log = state
        .service
        .list(&auth_user.id, query.from, query.to, today())
        .await?;
    Ok(Json(log))
}

pub async fn show(
    State(state): State<TrainingsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Training>> {
    let training = state.service.get(&auth_user.id, &id).await?;
    Ok(Json(training))
}

pub async fn create(
    State(state): State<TrainingsState>,
    auth_user: AuthUser,
    payload: std::result::Result<Json<TrainingPayload>, JsonRejection>,
) -> Result<Json<Training>> {
    let Json(payload) = payload?;
    let training = state
        .service
        .create(&auth_user.id, payload, today())
        .await?;
    Ok(Json(training))
}

pub async fn update(
    State(state): State<TrainingsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    payload: std::result::Result<Json<TrainingPayload>, JsonRejection>,
) -> Result<Json<Training>> {
    let Json(payload) = payload?;
    let training = state
        .service
        .update(&auth_user.id, &id, payload, today())
        .await?;
    Ok(Json(training))
}

pub async fn delete(
    State(state): State<TrainingsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Training>> {
    let training = state.service.delete(&auth_user.id, &id).await?;
    Ok(Json(training))
}
