use async_trait::async_trait;

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{Exercise, Training, TrainingFilter, TrainingInput};

use super::{ExerciseRepository, TrainingRepository};

/// Persistence seen by the services: exercise catalog lookups plus
/// owner-scoped training CRUD. Every training operation takes the caller's
/// user id and behaves as if other users' records do not exist.
#[async_trait]
pub trait TrainingStore: Send + Sync {
    async fn list_exercises(&self) -> Result<Vec<Exercise>>;

    async fn find_exercise(&self, id: &str) -> Result<Option<Exercise>>;

    /// Newest `performed_at` first, line items in the order they were logged.
    async fn list_trainings(&self, user_id: &str, filter: &TrainingFilter) -> Result<Vec<Training>>;

    async fn find_training(&self, user_id: &str, id: &str) -> Result<Option<Training>>;

    async fn create_training(&self, user_id: &str, input: TrainingInput) -> Result<Training>;

    async fn update_training(
        &self,
        user_id: &str,
        id: &str,
        input: TrainingInput,
    ) -> Result<Option<Training>>;

    async fn delete_training(&self, user_id: &str, id: &str) -> Result<Option<Training>>;
}

/// SQLite-backed store used by the server.
#[derive(Clone)]
pub struct SqliteStore {
    exercises: ExerciseRepository,
    trainings: TrainingRepository,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            exercises: ExerciseRepository::new(pool.clone()),
            trainings: TrainingRepository::new(pool),
        }
    }
}

#[async_trait]
impl TrainingStore for SqliteStore {
    async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        self.exercises.find_all().await
    }

    async fn find_exercise(&self, id: &str) -> Result<Option<Exercise>> {
        self.exercises.find_by_id(id).await
    }

    async fn list_trainings(
        &self,
        user_id: &str,
        filter: &TrainingFilter,
    ) -> Result<Vec<Training>> {
        self.trainings.find_by_user(user_id, filter).await
    }

    async fn find_training(&self, user_id: &str, id: &str) -> Result<Option<Training>> {
        self.trainings.find_for_user(id, user_id).await
    }

    async fn create_training(&self, user_id: &str, input: TrainingInput) -> Result<Training> {
        self.trainings.create(user_id, input).await
    }

    async fn update_training(
        &self,
        user_id: &str,
        id: &str,
        input: TrainingInput,
    ) -> Result<Option<Training>> {
        self.trainings.update(id, user_id, input).await
    }

    async fn delete_training(&self, user_id: &str, id: &str) -> Result<Option<Training>> {
        self.trainings.delete(id, user_id).await
    }
}
