//! Progress accounting: the ledger, the khatma counter, derived statistics
//! and badges, tied together by [`Tracker`] which runs each user action as
//! load → mutate → recompute → evaluate badges → save.

pub mod badges;
pub mod khatma;
pub mod ledger;
pub mod migration;
pub mod stats;

use chrono::NaiveDate;
use log::{debug, info};
use thiserror::Error;

use crate::db::{Store, StoreError};
use crate::models::{EntryField, Plan, UserData, TOTAL_QURAN_PAGES};

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("no memorization plan yet; run `rafiq setup` first")]
    NotSetUp,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Build the record produced by saving the plan form. A first save starts
/// from zero counters; later saves keep the ledger, counters and badges.
pub fn apply_plan(existing: Option<&UserData>, plan: Plan, initial_pages: Option<u32>) -> UserData {
    let mut next = match existing {
        Some(data) => {
            let mut data = data.clone();
            data.plan = plan;
            data
        }
        None => UserData::new(plan, 0),
    };

    if let Some(pages) = initial_pages {
        let logged = ledger::total_memorized(&next) - next.initial_memorized_pages as f64;
        let room = (TOTAL_QURAN_PAGES as f64 - logged).max(0.0).floor() as u32;
        next.initial_memorized_pages = pages.min(room);
        khatma::rebalance(&mut next);
    }
    next
}

/// Apply one field edit to a copy of `data`: ledger write with clamping,
/// khatma counter on a revised-pages change (or a rollover check when the
/// memorized total moved), then badge re-evaluation.
pub fn apply_entry(
    data: &UserData,
    date: NaiveDate,
    field: EntryField,
    raw: f64,
    today: NaiveDate,
) -> UserData {
    let mut next = data.clone();
    let change = ledger::upsert(&mut next, date, field, raw);
    debug!(
        "{} on {}: {} -> {}",
        change.field, change.date, change.old, change.new
    );

    match change.field {
        EntryField::Revised => khatma::apply_revision_delta(&mut next, change.delta()),
        EntryField::Memorized => {
            khatma::rebalance(&mut next);
        }
    }
    next.earned_badges = badges::evaluate(&next, today);
    next
}

/// Owns the current record and the store it is persisted to.
pub struct Tracker<S: Store> {
    store: S,
    data: Option<UserData>,
}

impl<S: Store> Tracker<S> {
    /// Load, migrate and re-evaluate badges, writing back only when the
    /// record changed.
    pub fn open(store: S, today: NaiveDate) -> Result<Self, TrackerError> {
        let mut tracker = Self { store, data: None };

        let Some(stored) = tracker.store.load()? else {
            info!("no stored record, first run");
            return Ok(tracker);
        };

        let migration::Normalized { mut data, dirty } = migration::normalize(stored);
        let earned = badges::evaluate(&data, today);
        let badges_changed = earned != data.earned_badges;
        data.earned_badges = earned;

        if dirty || badges_changed {
            info!(
                "re-saving record (migrated: {}, badges changed: {})",
                dirty, badges_changed
            );
            tracker.store.save(&data)?;
        }
        tracker.data = Some(data);
        Ok(tracker)
    }

    pub fn data(&self) -> Option<&UserData> {
        self.data.as_ref()
    }

    pub fn is_set_up(&self) -> bool {
        self.data.is_some()
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the record on first run, or replace the plan of an existing one.
    pub fn submit_plan(
        &mut self,
        plan: Plan,
        initial_pages: Option<u32>,
        today: NaiveDate,
    ) -> Result<&UserData, TrackerError> {
        let mut next = apply_plan(self.data.as_ref(), plan, initial_pages);
        next.earned_badges = badges::evaluate(&next, today);
        self.commit(next)
    }

    /// Set one field of one day's entry.
    pub fn set_daily_entry(
        &mut self,
        date: NaiveDate,
        field: EntryField,
        raw: f64,
        today: NaiveDate,
    ) -> Result<&UserData, TrackerError> {
        let current = self.data.as_ref().ok_or(TrackerError::NotSetUp)?;
        let next = apply_entry(current, date, field, raw, today);
        self.commit(next)
    }

    fn commit(&mut self, next: UserData) -> Result<&UserData, TrackerError> {
        self.store.save(&next)?;
        let data: &UserData = self.data.insert(next);
        Ok(data)
    }
}
