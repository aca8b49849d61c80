use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{ExerciseResult, FromSqliteRow, Training, TrainingFilter, TrainingInput};

#[derive(Clone)]
pub struct TrainingRepository {
    pool: DbPool,
}

impl TrainingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Trainings of `user_id` matching `filter`, newest `performed_at` first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        filter: &TrainingFilter,
    ) -> Result<Vec<Training>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let filter = filter.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT t.* FROM trainings t
                 WHERE t.user_id = ?1
                   AND (?2 IS NULL OR t.performed_at >= ?2)
                   AND (?3 IS NULL OR t.performed_at <= ?3)
                   AND (?4 IS NULL OR EXISTS (
                        SELECT 1 FROM exercise_results r
                        WHERE r.training_id = t.id AND r.exercise_id = ?4))
                 ORDER BY t.performed_at DESC, t.rowid DESC",
            )?;
            let mut trainings = Training::query_all(
                &mut stmt,
                rusqlite::params![user_id, filter.from, filter.to, filter.exercise_id],
            )?;

            for training in &mut trainings {
                training.exercises = load_results(&conn, &training.id)?;
            }
            Ok(trainings)
        })
        .await?
    }

    pub async fn find_for_user(&self, id: &str, user_id: &str) -> Result<Option<Training>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            load_training(&conn, &id, &user_id)
        })
        .await?
    }

    /// Insert a training and all of its line items in one transaction.
    pub async fn create(&self, user_id: &str, input: TrainingInput) -> Result<Training> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let id = Uuid::new_v4().to_string();
            let now = Utc::now();
            tx.execute(
                "INSERT INTO trainings (id, user_id, performed_at, location, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![id, user_id, input.performed_at, input.location, now, now],
            )?;

            for (position, item) in input.exercises.iter().enumerate() {
                tx.execute(
                    "INSERT INTO exercise_results
                        (id, training_id, exercise_id, weight, repetitions, rpe, position)
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        Uuid::new_v4().to_string(),
                        id,
                        item.exercise_id,
                        item.weight,
                        item.repetitions,
                        item.rpe,
                        position as i64
                    ],
                )?;
            }

            let training = load_training(&tx, &id, &user_id)?
                .ok_or_else(|| AppError::Internal("created training vanished".to_string()))?;
            tx.commit()?;
            Ok(training)
        })
        .await?
    }

    /// Replace date and location, then upsert line items by id.
    /// Line items that are not mentioned stay untouched.
    /// Returns `None` when `id` does not exist or belongs to someone else.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        input: TrainingInput,
    ) -> Result<Option<Training>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let rows = tx.execute(
                "UPDATE trainings SET performed_at = ?, location = ?, updated_at = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![input.performed_at, input.location, Utc::now(), id, user_id],
            )?;
            if rows == 0 {
                return Ok(None);
            }

            let mut next_position: i64 = tx.query_row(
                "SELECT COALESCE(MAX(position) + 1, 0) FROM exercise_results WHERE training_id = ?",
                [&id],
                |row| row.get(0),
            )?;

            for item in &input.exercises {
                let updated = match &item.id {
                    Some(result_id) => tx.execute(
                        "UPDATE exercise_results
                         SET exercise_id = ?, weight = ?, repetitions = ?, rpe = ?
                         WHERE id = ? AND training_id = ?",
                        rusqlite::params![
                            item.exercise_id,
                            item.weight,
                            item.repetitions,
                            item.rpe,
                            result_id,
                            id
                        ],
                    )? > 0,
                    None => false,
                };

                if !updated {
                    tx.execute(
                        "INSERT INTO exercise_results
                            (id, training_id, exercise_id, weight, repetitions, rpe, position)
                         VALUES (?, ?, ?, ?, ?, ?, ?)",
                        rusqlite::params![
                            Uuid::new_v4().to_string(),
                            id,
                            item.exercise_id,
                            item.weight,
                            item.repetitions,
                            item.rpe,
                            next_position
                        ],
                    )?;
                    next_position += 1;
                }
            }

            let training = load_training(&tx, &id, &user_id)?;
            tx.commit()?;
            Ok(training)
        })
        .await?
    }

    /// Delete a training owned by `user_id`; its line items go with it.
    /// Returns the record as it was before deletion.
    pub async fn delete(&self, id: &str, user_id: &str) -> Result<Option<Training>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let Some(training) = load_training(&tx, &id, &user_id)? else {
                return Ok(None);
            };
            tx.execute(
                "DELETE FROM trainings WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            tx.commit()?;
            Ok(Some(training))
        })
        .await?
    }
}

fn load_training(conn: &Connection, id: &str, user_id: &str) -> Result<Option<Training>> {
    let training = conn
        .query_row(
            "SELECT * FROM trainings WHERE id = ? AND user_id = ?",
            [id, user_id],
            Training::from_row,
        )
        .optional()?;

    match training {
        Some(mut training) => {
            training.exercises = load_results(conn, &training.id)?;
            Ok(Some(training))
        }
        None => Ok(None),
    }
}

fn load_results(conn: &Connection, training_id: &str) -> Result<Vec<ExerciseResult>> {
    let mut stmt = conn.prepare_cached(
        "SELECT r.id, r.training_id, r.exercise_id, e.name AS exercise_name,
                r.weight, r.repetitions, r.rpe
         FROM exercise_results r
         JOIN exercises e ON e.id = r.exercise_id
         WHERE r.training_id = ?
         ORDER BY r.position",
    )?;
    Ok(ExerciseResult::query_all(&mut stmt, [training_id])?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use crate::models::ExerciseResultInput;
    use crate::repositories::ExerciseRepository;

    struct Fixture {
        pool: DbPool,
        repo: TrainingRepository,
        squat: String,
        bench: String,
    }

    async fn setup() -> Fixture {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        let exercises = ExerciseRepository::new(pool.clone());
        let (squat, _) = exercises.insert_if_missing("Squats").await.unwrap();
        let (bench, _) = exercises.insert_if_missing("Bench Presses").await.unwrap();
        Fixture {
            repo: TrainingRepository::new(pool.clone()),
            pool,
            squat: squat.id,
            bench: bench.id,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn result(exercise_id: &str, weight: f64, repetitions: i64) -> ExerciseResultInput {
        ExerciseResultInput {
            id: None,
            exercise_id: exercise_id.to_string(),
            weight,
            repetitions,
            rpe: 8.0,
        }
    }

    fn input(performed_at: NaiveDate, exercises: Vec<ExerciseResultInput>) -> TrainingInput {
        TrainingInput {
            performed_at,
            location: Some("Gym".to_string()),
            exercises,
        }
    }

    fn result_count(pool: &DbPool) -> i64 {
        let conn = pool.get().unwrap();
        conn.query_row("SELECT COUNT(*) FROM exercise_results", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_nested_results() {
        let f = setup().await;
        let training = f
            .repo
            .create(
                "user1",
                input(
                    date(2024, 1, 1),
                    vec![result(&f.squat, 100.0, 5), result(&f.bench, 80.0, 8)],
                ),
            )
            .await
            .unwrap();

        assert_eq!(training.user_id, "user1");
        assert_eq!(training.performed_at, date(2024, 1, 1));
        assert_eq!(training.exercises.len(), 2);
        assert_eq!(training.exercises[0].exercise_name, "Squats");
        assert_eq!(training.exercises[1].exercise_name, "Bench Presses");
        assert!(training.exercises.iter().all(|r| r.training_id == training.id));
    }

    #[tokio::test]
    async fn test_find_by_user_orders_newest_first_and_filters() {
        let f = setup().await;
        let older = f
            .repo
            .create("user1", input(date(2024, 1, 1), vec![result(&f.squat, 100.0, 5)]))
            .await
            .unwrap();
        let newer = f
            .repo
            .create("user1", input(date(2024, 1, 8), vec![result(&f.bench, 80.0, 5)]))
            .await
            .unwrap();
        f.repo
            .create("user2", input(date(2024, 1, 5), vec![result(&f.squat, 60.0, 5)]))
            .await
            .unwrap();

        let all = f
            .repo
            .find_by_user("user1", &TrainingFilter::default())
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![newer.id.clone(), older.id.clone()]);

        let squats_only = f
            .repo
            .find_by_user(
                "user1",
                &TrainingFilter {
                    exercise_id: Some(f.squat.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(squats_only.len(), 1);
        assert_eq!(squats_only[0].id, older.id);

        let ranged = f
            .repo
            .find_by_user(
                "user1",
                &TrainingFilter {
                    from: Some(date(2024, 1, 8)),
                    to: Some(date(2024, 1, 8)),
                    exercise_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(ranged.len(), 1);
        assert_eq!(ranged[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_update_upserts_results() {
        let f = setup().await;
        let training = f
            .repo
            .create("user1", input(date(2024, 1, 1), vec![result(&f.squat, 100.0, 5)]))
            .await
            .unwrap();
        let existing = training.exercises[0].id.clone();

        let mut changed = result(&f.squat, 105.0, 3);
        changed.id = Some(existing.clone());
        let mut unknown_id = result(&f.bench, 70.0, 10);
        unknown_id.id = Some("not-a-result".to_string());

        let updated = f
            .repo
            .update(
                &training.id,
                "user1",
                TrainingInput {
                    performed_at: date(2024, 1, 2),
                    location: None,
                    exercises: vec![changed, unknown_id],
                },
            )
            .await
            .unwrap()
            .expect("training should exist");

        assert_eq!(updated.performed_at, date(2024, 1, 2));
        assert_eq!(updated.location, None);
        assert_eq!(updated.exercises.len(), 2);
        assert_eq!(updated.exercises[0].id, existing);
        assert_eq!(updated.exercises[0].weight, 105.0);
        assert_eq!(updated.exercises[1].exercise_name, "Bench Presses");
        assert_ne!(updated.exercises[1].id, "not-a-result");
    }

    #[tokio::test]
    async fn test_update_wrong_user() {
        let f = setup().await;
        let training = f
            .repo
            .create("user1", input(date(2024, 1, 1), vec![result(&f.squat, 100.0, 5)]))
            .await
            .unwrap();

        let updated = f
            .repo
            .update(&training.id, "user2", input(date(2024, 2, 1), vec![]))
            .await
            .unwrap();
        assert!(updated.is_none());

        let found = f
            .repo
            .find_for_user(&training.id, "user1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.performed_at, date(2024, 1, 1));
    }

    #[tokio::test]
    async fn test_delete_cascades_results() {
        let f = setup().await;
        let training = f
            .repo
            .create(
                "user1",
                input(
                    date(2024, 1, 1),
                    vec![result(&f.squat, 100.0, 5), result(&f.bench, 80.0, 5)],
                ),
            )
            .await
            .unwrap();
        assert_eq!(result_count(&f.pool), 2);

        let deleted = f.repo.delete(&training.id, "user1").await.unwrap();
        assert_eq!(deleted.map(|t| t.exercises.len()), Some(2));
        assert_eq!(result_count(&f.pool), 0);
        assert!(f
            .repo
            .find_for_user(&training.id, "user1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_wrong_user() {
        let f = setup().await;
        let training = f
            .repo
            .create("user1", input(date(2024, 1, 1), vec![result(&f.squat, 100.0, 5)]))
            .await
            .unwrap();

        assert!(f.repo.delete(&training.id, "user2").await.unwrap().is_none());
        assert!(f
            .repo
            .find_for_user(&training.id, "user1")
            .await
            .unwrap()
            .is_some());
    }
}
