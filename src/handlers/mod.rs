pub mod dashboard;
pub mod exercises;
pub mod health;
pub mod trainings;
