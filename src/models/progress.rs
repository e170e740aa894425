use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub memorized_pages: f64,
    pub revised_pages: u32,
}

impl ProgressEntry {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            memorized_pages: 0.0,
            revised_pages: 0,
        }
    }

    pub fn get(&self, field: EntryField) -> f64 {
        match field {
            EntryField::Memorized => self.memorized_pages,
            EntryField::Revised => self.revised_pages as f64,
        }
    }
}

/// The two editable columns of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    Memorized,
    Revised,
}

impl EntryField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryField::Memorized => "memorizedPages",
            EntryField::Revised => "revisedPages",
        }
    }
}

impl std::fmt::Display for EntryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a single ledger write, after clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryChange {
    pub date: NaiveDate,
    pub field: EntryField,
    pub old: f64,
    pub new: f64,
}

impl EntryChange {
    pub fn delta(&self) -> f64 {
        self.new - self.old
    }
}

/// Memorized and revised page sums over some set of days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PageTotals {
    pub memorized: f64,
    pub revised: u32,
}
