use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Plan, ProgressEntry};

/// Page count of a complete memorization.
pub const TOTAL_QURAN_PAGES: u32 = 604;

/// The whole persisted record for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub plan: Plan,
    pub initial_memorized_pages: u32,
    /// Sorted ascending by date, one entry per date
    pub progress: Vec<ProgressEntry>,
    pub revision_khatma_count: u32,
    pub pages_revised_in_current_khatma: f64,
    pub earned_badges: BTreeSet<String>,
}

impl UserData {
    pub fn new(plan: Plan, initial_memorized_pages: u32) -> Self {
        Self {
            plan,
            initial_memorized_pages: initial_memorized_pages.min(TOTAL_QURAN_PAGES),
            progress: Vec::new(),
            revision_khatma_count: 0,
            pages_revised_in_current_khatma: 0.0,
            earned_badges: BTreeSet::new(),
        }
    }
}

/// A record as found in storage. Older versions lack the khatma counters and
/// the badge list, so those are optional here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUserData {
    pub plan: Plan,
    #[serde(default)]
    pub initial_memorized_pages: u32,
    #[serde(default)]
    pub progress: Vec<ProgressEntry>,
    pub revision_khatma_count: Option<u32>,
    pub pages_revised_in_current_khatma: Option<f64>,
    pub earned_badges: Option<Vec<String>>,
}
