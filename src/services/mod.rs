pub mod dashboard;
pub mod range;
pub mod reporting;
pub mod trainings;

pub use dashboard::{Dashboard, DashboardService, RecentTraining};
pub use range::DateRange;
pub use reporting::{summarize, ChartPoint, TrainingSummary, ZeroRepsPolicy};
pub use trainings::{TrainingLog, TrainingService};
