//! Dashboard statistics for one exercise over a set of trainings.
//!
//! Everything here is a pure function of the trainings handed in; the caller
//! is responsible for the user and date filtering.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::date::format_display;
use crate::models::Training;

/// How a line item logged with zero repetitions contributes to the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroRepsPolicy {
    /// Count it as one repetition of its weight.
    #[default]
    CountAsOne,
    /// Count it as nothing lifted.
    CountAsZero,
}

impl ZeroRepsPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count-as-one" | "one" => Some(ZeroRepsPolicy::CountAsOne),
            "count-as-zero" | "zero" => Some(ZeroRepsPolicy::CountAsZero),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZeroRepsPolicy::CountAsOne => "count-as-one",
            ZeroRepsPolicy::CountAsZero => "count-as-zero",
        }
    }

    pub fn effective_reps(&self, repetitions: i64) -> i64 {
        match self {
            ZeroRepsPolicy::CountAsOne => repetitions.max(1),
            ZeroRepsPolicy::CountAsZero => repetitions.max(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// `dd.MM.yyyy`
    pub date: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSummary {
    pub max_weight: f64,
    pub total_weight_lifted: f64,
    pub total_reps: i64,
    pub total_trainings: usize,
    /// Oldest first. Empty means there is nothing to chart.
    pub chart_series: Vec<ChartPoint>,
}

impl TrainingSummary {
    pub fn has_chart_data(&self) -> bool {
        !self.chart_series.is_empty()
    }
}

/// Reduce `trainings` (newest first, as the stores return them) to the
/// statistics for `exercise_id`.
///
/// `total_trainings` counts every training passed in, matching or not. The
/// chart gets one point per training that logged the exercise, using the
/// first matching line item's weight.
pub fn summarize(
    trainings: &[Training],
    exercise_id: &str,
    policy: ZeroRepsPolicy,
) -> TrainingSummary {
    let mut summary = TrainingSummary {
        total_trainings: trainings.len(),
        ..Default::default()
    };

    let matching = trainings
        .iter()
        .flat_map(|t| t.exercises.iter())
        .filter(|r| r.exercise_id == exercise_id);

    for result in matching {
        let reps = policy.effective_reps(result.repetitions);
        summary.max_weight = summary.max_weight.max(result.weight);
        summary.total_weight_lifted += result.weight * reps as f64;
        summary.total_reps = summary.total_reps.saturating_add(reps);
    }

    let mut points: Vec<(NaiveDate, f64)> = trainings
        .iter()
        .rev()
        .filter_map(|t| t.first_result_for(exercise_id).map(|r| (t.performed_at, r.weight)))
        .collect();
    points.sort_by_key(|(date, _)| *date);

    summary.chart_series = points
        .into_iter()
        .map(|(date, weight)| ChartPoint {
            date: format_display(date),
            weight,
        })
        .collect();

    summary
}
