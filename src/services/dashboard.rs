use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::range::DateRange;
use super::reporting::{summarize, TrainingSummary, ZeroRepsPolicy};
use crate::error::{AppError, Result};
use crate::models::date::format_display;
use crate::models::{Exercise, Training, TrainingFilter};
use crate::repositories::TrainingStore;

/// One row of the "recent trainings" list for the selected exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTraining {
    pub training_id: String,
    pub performed_at: NaiveDate,
    pub date: String,
    pub location: Option<String>,
    pub weight: f64,
    pub repetitions: i64,
    pub rpe: f64,
}

impl RecentTraining {
    fn from_training(training: &Training, exercise_id: &str) -> Option<Self> {
        let result = training.first_result_for(exercise_id)?;
        Some(Self {
            training_id: training.id.clone(),
            performed_at: training.performed_at,
            date: format_display(training.performed_at),
            location: training.location.clone(),
            weight: result.weight,
            repetitions: result.repetitions,
            rpe: result.rpe,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// `None` until the client picks an exercise.
    pub exercise: Option<Exercise>,
    pub range: DateRange,
    pub zero_reps_policy: ZeroRepsPolicy,
    pub summary: Option<TrainingSummary>,
    pub recent: Vec<RecentTraining>,
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn TrainingStore>,
    policy: ZeroRepsPolicy,
    default_range_days: Option<u32>,
}

impl DashboardService {
    pub fn new(
        store: Arc<dyn TrainingStore>,
        policy: ZeroRepsPolicy,
        default_range_days: Option<u32>,
    ) -> Self {
        Self {
            store,
            policy,
            default_range_days,
        }
    }

    pub async fn build(
        &self,
        user_id: &str,
        exercise_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Dashboard> {
        let range = DateRange::resolve(from, to, today, self.default_range_days)?;

        let Some(exercise_id) = exercise_id.filter(|id| !id.is_empty()) else {
            return Ok(Dashboard {
                exercise: None,
                range,
                zero_reps_policy: self.policy,
                summary: None,
                recent: Vec::new(),
            });
        };

        let exercise = self
            .store
            .find_exercise(exercise_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;

        let trainings = self
            .store
            .list_trainings(
                user_id,
                &TrainingFilter {
                    from: range.from,
                    to: range.to,
                    exercise_id: Some(exercise.id.clone()),
                },
            )
            .await?;

        let summary = summarize(&trainings, &exercise.id, self.policy);
        let recent = trainings
            .iter()
            .filter_map(|t| RecentTraining::from_training(t, &exercise.id))
            .collect();

        tracing::debug!(
            user_id,
            exercise_id = %exercise.id,
            trainings = trainings.len(),
            "Dashboard built"
        );

        Ok(Dashboard {
            exercise: Some(exercise),
            range,
            zero_reps_policy: self.policy,
            summary: Some(summary),
            recent,
        })
    }
}
