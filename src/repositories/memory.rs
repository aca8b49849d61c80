use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::TrainingStore;
use crate::error::{AppError, Result};
use crate::models::{
    Exercise, ExerciseResult, ExerciseResultInput, Training, TrainingFilter, TrainingInput,
};

/// In-memory `TrainingStore` for tests of the services and handlers.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    exercises: Vec<Exercise>,
    // Insertion order; listing re-sorts.
    trainings: Vec<Training>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_exercise(&self, name: impl Into<String>) -> Result<Exercise> {
        let exercise = Exercise {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        };
        self.lock()?.exercises.push(exercise.clone());
        Ok(exercise)
    }

    /// Total line items across every user, for orphan checks in tests.
    pub fn result_count(&self) -> Result<usize> {
        Ok(self.lock()?.trainings.iter().map(|t| t.exercises.len()).sum())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Internal("memory store poisoned".to_string()))
    }
}

impl Inner {
    fn resolve(&self, training_id: &str, item: &ExerciseResultInput) -> Result<ExerciseResult> {
        let exercise = self
            .exercises
            .iter()
            .find(|e| e.id == item.exercise_id)
            .ok_or_else(|| AppError::Internal(format!("unknown exercise {}", item.exercise_id)))?;

        Ok(ExerciseResult {
            id: Uuid::new_v4().to_string(),
            training_id: training_id.to_string(),
            exercise_id: exercise.id.clone(),
            exercise_name: exercise.name.clone(),
            weight: item.weight,
            repetitions: item.repetitions,
            rpe: item.rpe,
        })
    }

    fn owned_mut(&mut self, user_id: &str, id: &str) -> Option<&mut Training> {
        self.trainings
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
    }
}

#[async_trait]
impl TrainingStore for MemoryStore {
    async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let mut exercises = self.lock()?.exercises.clone();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(exercises)
    }

    async fn find_exercise(&self, id: &str) -> Result<Option<Exercise>> {
        Ok(self.lock()?.exercises.iter().find(|e| e.id == id).cloned())
    }

    async fn list_trainings(
        &self,
        user_id: &str,
        filter: &TrainingFilter,
    ) -> Result<Vec<Training>> {
        let inner = self.lock()?;
        let mut trainings: Vec<Training> = inner
            .trainings
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .cloned()
            .collect();
        // Stable, so equal dates keep newest-inserted first.
        trainings.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
        Ok(trainings)
    }

    async fn find_training(&self, user_id: &str, id: &str) -> Result<Option<Training>> {
        Ok(self
            .lock()?
            .trainings
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn create_training(&self, user_id: &str, input: TrainingInput) -> Result<Training> {
        let mut inner = self.lock()?;
        let id = Uuid::new_v4().to_string();
        let exercises = input
            .exercises
            .iter()
            .map(|item| inner.resolve(&id, item))
            .collect::<Result<Vec<_>>>()?;

        let now = Utc::now();
        let training = Training {
            id,
            user_id: user_id.to_string(),
            performed_at: input.performed_at,
            location: input.location,
            created_at: now,
            updated_at: now,
            exercises,
        };
        inner.trainings.push(training.clone());
        Ok(training)
    }

    async fn update_training(
        &self,
        user_id: &str,
        id: &str,
        input: TrainingInput,
    ) -> Result<Option<Training>> {
        let mut inner = self.lock()?;
        let Some(existing) = inner.owned_mut(user_id, id) else {
            return Ok(None);
        };

        // Resolve everything first so a bad line item leaves the record untouched.
        let mut exercises = existing.exercises.clone();
        for item in &input.exercises {
            let resolved = inner.resolve(id, item)?;
            let slot = item
                .id
                .as_ref()
                .and_then(|result_id| exercises.iter_mut().find(|r| &r.id == result_id));
            match slot {
                Some(current) => {
                    *current = ExerciseResult {
                        id: current.id.clone(),
                        ..resolved
                    }
                }
                None => exercises.push(resolved),
            }
        }

        let training = inner
            .owned_mut(user_id, id)
            .ok_or_else(|| AppError::Internal("training vanished during update".to_string()))?;
        training.performed_at = input.performed_at;
        training.location = input.location;
        training.updated_at = Utc::now();
        training.exercises = exercises;
        Ok(Some(training.clone()))
    }

    async fn delete_training(&self, user_id: &str, id: &str) -> Result<Option<Training>> {
        let mut inner = self.lock()?;
        let position = inner
            .trainings
            .iter()
            .position(|t| t.id == id && t.user_id == user_id);
        Ok(position.map(|index| inner.trainings.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_add_exercise_is_listed() {
        let store = MemoryStore::new();
        let squat = store.add_exercise("Squats").unwrap();

        let inner = store.lock().unwrap();
        assert_eq!(inner.exercises, vec![squat]);
    }

    #[test]
    fn test_poisoned_lock_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        let holder = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.inner.lock().unwrap();
            panic!("poison the store");
        })
        .join();

        assert!(matches!(store.add_exercise("Squats"), Err(AppError::Internal(_))));
        assert!(matches!(store.result_count(), Err(AppError::Internal(_))));
    }
}
