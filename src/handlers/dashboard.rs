use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::date::{deserialize_optional_date, today};
use crate::services::{Dashboard, DashboardService};

#[derive(Clone)]
pub struct DashboardState {
    pub service: DashboardService,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub to: Option<NaiveDate>,
    /// Exercise id.
    pub exercise: Option<String>,
}

pub async fn index(
    State(state): State<DashboardState>,
    auth_user: AuthUser,
    query: std::result::Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<Dashboard>> {
    let Query(query) = query?;
    let dashboard = state
        .service
        .build(
            &auth_user.id,
            query.exercise.as_deref(),
            query.from,
            query.to,
            today(),
        )
        .await?;
    Ok(Json(dashboard))
}
