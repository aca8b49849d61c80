use std::sync::Arc;

use axum::{extract::State, Json};

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::Exercise;
use crate::repositories::TrainingStore;

#[derive(Clone)]
pub struct ExercisesState {
    pub store: Arc<dyn TrainingStore>,
}

pub async fn list(
    State(state): State<ExercisesState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Exercise>>> {
    let exercises = state.store.list_exercises().await?;
    Ok(Json(exercises))
}
