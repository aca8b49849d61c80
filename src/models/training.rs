use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::date::deserialize_optional_date;
use super::FromSqliteRow;
use crate::error::{AppError, Result};

pub const MAX_LOCATION_LEN: usize = 50;
pub const MAX_RPE: f64 = 10.0;
/// Upper bound on repetitions of a single line item.
pub const MAX_REPETITIONS: i64 = 10_000;

/// A logged session together with its line items, newest-first friendly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: String,
    pub user_id: String,
    pub performed_at: NaiveDate,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub exercises: Vec<ExerciseResult>,
}

impl Training {
    /// First line item for `exercise_id`, which is what the dashboard reports per training.
    pub fn first_result_for(&self, exercise_id: &str) -> Option<&ExerciseResult> {
        self.exercises.iter().find(|r| r.exercise_id == exercise_id)
    }

    pub fn contains_exercise(&self, exercise_id: &str) -> bool {
        self.first_result_for(exercise_id).is_some()
    }
}

impl FromSqliteRow for Training {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            performed_at: row.get("performed_at")?,
            location: row.get("location")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            exercises: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResult {
    pub id: String,
    pub training_id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub weight: f64,
    pub repetitions: i64,
    pub rpe: f64,
}

impl FromSqliteRow for ExerciseResult {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            training_id: row.get("training_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            weight: row.get("weight")?,
            repetitions: row.get("repetitions")?,
            rpe: row.get("rpe")?,
        })
    }
}

/// Query applied by the stores when listing a user's trainings.
/// Both bounds are inclusive; `exercise_id` keeps trainings that contain it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub exercise_id: Option<String>,
}

impl TrainingFilter {
    pub fn matches(&self, training: &Training) -> bool {
        if self.from.is_some_and(|from| training.performed_at < from) {
            return false;
        }
        if self.to.is_some_and(|to| training.performed_at > to) {
            return false;
        }
        match &self.exercise_id {
            Some(exercise_id) => training.contains_exercise(exercise_id),
            None => true,
        }
    }
}

/// Request body of `POST /training` and `PATCH /training/{id}`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a validation failure instead of a body rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPayload {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub performed_at: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub exercises: Option<Vec<ExerciseResultPayload>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResultPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub exercise_id: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub repetitions: Option<i64>,
    #[serde(default)]
    pub rpe: Option<f64>,
}

/// A payload that passed field validation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingInput {
    pub performed_at: NaiveDate,
    pub location: Option<String>,
    pub exercises: Vec<ExerciseResultInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseResultInput {
    /// Existing line item to update; ignored on create.
    pub id: Option<String>,
    pub exercise_id: String,
    pub weight: f64,
    pub repetitions: i64,
    pub rpe: f64,
}

impl TrainingPayload {
    /// Check required fields and ranges. `today` is the latest accepted date.
    pub fn validate(self, today: NaiveDate) -> Result<TrainingInput> {
        let performed_at = self
            .performed_at
            .ok_or_else(|| AppError::Validation("performedAt is required".to_string()))?;
        if performed_at > today {
            return Err(AppError::Validation(
                "performedAt cannot be in the future".to_string(),
            ));
        }

        let exercises = self
            .exercises
            .ok_or_else(|| AppError::Validation("exercises is required".to_string()))?;

        let location = self
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        if location
            .as_ref()
            .is_some_and(|l| l.chars().count() > MAX_LOCATION_LEN)
        {
            return Err(AppError::Validation(format!(
                "location cannot be longer than {MAX_LOCATION_LEN} characters"
            )));
        }

        let exercises = exercises
            .into_iter()
            .enumerate()
            .map(|(index, item)| item.validate(index))
            .collect::<Result<Vec<_>>>()?;

        Ok(TrainingInput {
            performed_at,
            location,
            exercises,
        })
    }
}

impl ExerciseResultPayload {
    fn validate(self, index: usize) -> Result<ExerciseResultInput> {
        let invalid = |msg: &str| AppError::Validation(format!("exercises[{index}]: {msg}"));

        let exercise_id = self
            .exercise_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid("exerciseId is required"))?;

        let weight = self.weight.ok_or_else(|| invalid("weight is required"))?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(invalid("weight must be a non-negative number"));
        }

        let repetitions = self.repetitions.unwrap_or(0);
        if repetitions < 0 {
            return Err(invalid("repetitions cannot be negative"));
        }
        if repetitions > MAX_REPETITIONS {
            let msg = format!("repetitions cannot be more than {MAX_REPETITIONS}");
            return Err(invalid(msg.as_str()));
        }

        let rpe = self.rpe.unwrap_or(0.0);
        if !(0.0..=MAX_RPE).contains(&rpe) {
            return Err(invalid("rpe must be between 0 and 10"));
        }

        Ok(ExerciseResultInput {
            id: self.id.filter(|id| !id.is_empty()),
            exercise_id,
            weight,
            repetitions,
            rpe,
        })
    }
}
