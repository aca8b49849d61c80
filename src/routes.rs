use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers::{dashboard, exercises, health, trainings};
use crate::identity::SharedIdentity;
use crate::repositories::TrainingStore;
use crate::services::{DashboardService, TrainingService};

pub fn create_router(
    dashboard_state: dashboard::DashboardState,
    trainings_state: trainings::TrainingsState,
    exercises_state: exercises::ExercisesState,
    identity: SharedIdentity,
) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Dashboard
        .route("/dashboard", get(dashboard::index))
        .with_state(dashboard_state)
        // Training log
        .route("/training", get(trainings::list).post(trainings::create))
        .route(
            "/training/{id}",
            get(trainings::show)
                .patch(trainings::update)
                .delete(trainings::delete),
        )
        .with_state(trainings_state)
        // Exercise catalog
        .route("/exercises", get(exercises::list))
        .with_state(exercises_state)
        // Identity provider via Extension layer
        .layer(Extension(identity))
        .layer(TraceLayer::new_for_http())
}

/// Wire services over `store` with the settings from `config`.
pub fn build_router(
    store: Arc<dyn TrainingStore>,
    identity: SharedIdentity,
    config: &Config,
) -> Router {
    let dashboard_state = dashboard::DashboardState {
        service: DashboardService::new(
            store.clone(),
            config.zero_reps_policy,
            config.default_range_days,
        ),
    };
    let trainings_state = trainings::TrainingsState {
        service: TrainingService::new(store.clone(), config.default_range_days),
    };
    let exercises_state = exercises::ExercisesState { store };

    create_router(dashboard_state, trainings_state, exercises_state, identity)
}
