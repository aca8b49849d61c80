use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
}

impl FromSqliteRow for Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

/// Catalog installed by `trainlog-seed exercises`.
pub const DEFAULT_EXERCISES: &[&str] = &[
    "Squats",
    "Front Squats",
    "Overhead Squats",
    "Snatches",
    "Hang Snatches",
    "Power Snatches",
    "Cleans",
    "Hang Cleans",
    "Power Cleans",
    "Jerks",
    "Push Jerks",
    "Split Jerks",
    "Deadlifts",
    "Sumo Deadlifts",
    "Romanian Deadlifts",
    "Presses",
    "Push Presses",
    "Strict Presses",
    "Bench Presses",
];
