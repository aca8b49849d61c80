use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::Result;
use crate::models::{Exercise, FromSqliteRow};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Exercise>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT id, name FROM exercises WHERE id = ?")?;
            let result = stmt.query_row([&id], Exercise::from_row).optional()?;
            Ok(result)
        })
        .await?
    }

    pub async fn find_all(&self) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT id, name FROM exercises ORDER BY name")?;
            Ok(Exercise::query_all(&mut stmt, [])?)
        })
        .await?
    }

    /// Insert an exercise unless one with the same name exists.
    /// Returns the stored exercise and whether it was newly created.
    pub async fn insert_if_missing(&self, name: &str) -> Result<(Exercise, bool)> {
        let pool = self.pool.clone();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let inserted = conn.execute(
                "INSERT INTO exercises (id, name) VALUES (?, ?) ON CONFLICT(name) DO NOTHING",
                rusqlite::params![Uuid::new_v4().to_string(), name],
            )?;
            let exercise =
                conn.query_row("SELECT id, name FROM exercises WHERE name = ?", [&name], |row| {
                    Exercise::from_row(row)
                })?;
            Ok((exercise, inserted > 0))
        })
        .await?
    }
}
