use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::ProgressEntry;

/// One Saturday→Friday window of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyProgress {
    /// Oldest window is 1
    pub week_number: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_memorized: f64,
    pub total_revised: u32,
    pub memorization_goal: f64,
    pub revision_goal: u32,
    pub memorization_progress: u32,
    pub revision_progress: u32,
    pub days: Vec<ProgressEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
}

/// A day of the trailing week as seen by the commitment view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayCommitment {
    pub date: NaiveDate,
    pub day_index: usize,
    pub planned: bool,
    pub memorized: bool,
}

/// Per-day chart point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub day_index: usize,
    pub memorized: f64,
    pub revised: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KhatmaProgress {
    pub count: u32,
    pub pages_revised: f64,
    pub pages_remaining: f64,
    pub percent: f64,
}
