use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::range::DateRange;
use crate::error::{AppError, Result};
use crate::models::{Training, TrainingFilter, TrainingInput, TrainingPayload};
use crate::repositories::TrainingStore;

/// Result of listing a user's training log.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingLog {
    pub range: DateRange,
    pub total: usize,
    pub trainings: Vec<Training>,
}

/// Owner-scoped training CRUD with validation in front of the store.
#[derive(Clone)]
pub struct TrainingService {
    store: Arc<dyn TrainingStore>,
    default_range_days: Option<u32>,
}

impl TrainingService {
    pub fn new(store: Arc<dyn TrainingStore>, default_range_days: Option<u32>) -> Self {
        Self {
            store,
            default_range_days,
        }
    }

    pub fn resolve_range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<DateRange> {
        DateRange::resolve(from, to, today, self.default_range_days)
    }

    pub async fn list(
        &self,
        user_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<TrainingLog> {
        let range = self.resolve_range(from, to, today)?;
        let trainings = self
            .store
            .list_trainings(
                user_id,
                &TrainingFilter {
                    from: range.from,
                    to: range.to,
                    exercise_id: None,
                },
            )
            .await?;

        Ok(TrainingLog {
            range,
            total: trainings.len(),
            trainings,
        })
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Training> {
        self.store
            .find_training(user_id, id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create(
        &self,
        user_id: &str,
        payload: TrainingPayload,
        today: NaiveDate,
    ) -> Result<Training> {
        let input = payload.validate(today)?;
        self.ensure_exercises_exist(&input).await?;

        let training = self.store.create_training(user_id, input).await?;
        tracing::info!(
            training_id = %training.id,
            user_id,
            results = training.exercises.len(),
            "Training created"
        );
        Ok(training)
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        payload: TrainingPayload,
        today: NaiveDate,
    ) -> Result<Training> {
        if id.trim().is_empty() {
            return Err(AppError::Validation("training id is required".to_string()));
        }
        let input = payload.validate(today)?;
        self.ensure_exercises_exist(&input).await?;

        let training = self
            .store
            .update_training(user_id, id, input)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(training_id = %training.id, user_id, "Training updated");
        Ok(training)
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<Training> {
        let training = self
            .store
            .delete_training(user_id, id)
            .await?
            .ok_or_else(not_found)?;
        tracing::info!(training_id = %training.id, user_id, "Training deleted");
        Ok(training)
    }

    async fn ensure_exercises_exist(&self, input: &TrainingInput) -> Result<()> {
        let ids: HashSet<&str> = input
            .exercises
            .iter()
            .map(|r| r.exercise_id.as_str())
            .collect();

        for id in ids {
            if self.store.find_exercise(id).await?.is_none() {
                return Err(AppError::Validation(format!("unknown exercise: {id}")));
            }
        }
        Ok(())
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Training not found".to_string())
}
