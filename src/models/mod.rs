pub mod date;
pub mod exercise;
pub mod from_row;
pub mod training;

pub use exercise::{Exercise, DEFAULT_EXERCISES};
pub use from_row::FromSqliteRow;
pub use training::{
    ExerciseResult, ExerciseResultInput, ExerciseResultPayload, Training, TrainingFilter,
    TrainingInput, TrainingPayload,
};
