pub mod exercise_repo;
pub mod memory;
pub mod session_repo;
pub mod store;
pub mod training_repo;

pub use exercise_repo::ExerciseRepository;
pub use memory::MemoryStore;
pub use session_repo::SessionRepository;
pub use store::{SqliteStore, TrainingStore};
pub use training_repo::TrainingRepository;
