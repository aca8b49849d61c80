use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::{AppError, Result};

/// Inclusive date window of a list or dashboard read. `None` bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Fill in a missing `from` with the `default_days` window ending at `to`
    /// (or `today` when `to` is open as well). A missing `to` stays open.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
        default_days: Option<u32>,
    ) -> Result<Self> {
        let from = from.or_else(|| {
            let days = default_days?;
            to.unwrap_or(today).checked_sub_days(Days::new(days.into()))
        });

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::BadRequest(format!(
                    "from ({from}) must not be after to ({to})"
                )));
            }
        }

        Ok(Self { from, to })
    }
}
