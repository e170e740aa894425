use log::{debug, info};

use crate::models::{KhatmaProgress, UserData};
use crate::tracker::ledger::total_memorized;

/// `(revision_khatma_count, pages_revised_in_current_khatma)` as a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KhatmaState {
    pub count: u32,
    pub pages_in_current: f64,
}

impl KhatmaState {
    pub fn of(data: &UserData) -> Self {
        Self {
            count: data.revision_khatma_count,
            pages_in_current: data.pages_revised_in_current_khatma,
        }
    }

    /// Add `delta` revised pages against a cycle of `denom` pages, rolling over
    /// once per full cycle. A negative remainder is dropped, not borrowed from
    /// the completed count.
    pub fn advance(self, delta: f64, denom: f64) -> Self {
        let mut count = self.count;
        let mut pending = self.pages_in_current + delta;

        if denom > 0.0 {
            while pending >= denom {
                count += 1;
                pending -= denom;
            }
        }
        if pending < 0.0 {
            debug!("revision correction of {} absorbed at 0", pending);
            pending = 0.0;
        }

        Self {
            count,
            pages_in_current: pending,
        }
    }
}

/// Apply a change in one entry's revised pages to the khatma counters. The
/// ledger edit must already be in `data` so the denominator is current.
pub fn apply_revision_delta(data: &mut UserData, delta: f64) {
    if delta == 0.0 {
        return;
    }
    let denom = total_memorized(data);
    let after = KhatmaState::of(data).advance(delta, denom);
    write_state(data, after);
}

/// Roll the counter over after the memorized total shrank to or below the
/// pages already revised in the current khatma. Returns whether anything
/// changed.
pub fn rebalance(data: &mut UserData) -> bool {
    let total = total_memorized(data);
    if total <= 0.0 || data.pages_revised_in_current_khatma < total {
        return false;
    }
    debug!(
        "{} pages pending against a total of {}, rolling over",
        data.pages_revised_in_current_khatma, total
    );
    let after = KhatmaState::of(data).advance(0.0, total);
    write_state(data, after);
    true
}

fn write_state(data: &mut UserData, after: KhatmaState) {
    let before = data.revision_khatma_count;
    if after.count > before {
        info!(
            "completed {} revision khatma(s), total now {}",
            after.count - before,
            after.count
        );
    }
    data.revision_khatma_count = after.count;
    data.pages_revised_in_current_khatma = after.pages_in_current;
}

pub fn khatma_progress(data: &UserData) -> KhatmaProgress {
    let total = total_memorized(data);
    let pages = data.pages_revised_in_current_khatma;
    let (remaining, percent) = if total > 0.0 {
        ((total - pages).max(0.0), pages / total * 100.0)
    } else {
        (0.0, 0.0)
    };
    KhatmaProgress {
        count: data.revision_khatma_count,
        pages_revised: pages,
        pages_remaining: remaining,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plan;

    fn state(count: u32, pages: f64) -> KhatmaState {
        KhatmaState {
            count,
            pages_in_current: pages,
        }
    }

    #[test]
    fn test_single_rollover() {
        assert_eq!(state(0, 8.0).advance(5.0, 10.0), state(1, 3.0));
    }

    #[test]
    fn test_exact_cycle_rolls_over_to_zero() {
        assert_eq!(state(2, 6.0).advance(4.0, 10.0), state(3, 0.0));
    }

    #[test]
    fn test_large_edit_spans_several_khatmas() {
        assert_eq!(state(0, 0.0).advance(35.0, 10.0), state(3, 5.0));
        assert_eq!(state(1, 1.5).advance(4.0, 2.5), state(3, 0.5));
    }

    #[test]
    fn test_downward_correction_clamps_at_zero() {
        assert_eq!(state(4, 3.0).advance(-5.0, 10.0), state(4, 0.0));
        assert_eq!(state(4, 3.0).advance(-2.0, 10.0), state(4, 1.0));
    }

    #[test]
    fn test_nothing_memorized_never_rolls_over() {
        assert_eq!(state(0, 0.0).advance(7.0, 0.0), state(0, 7.0));
        assert_eq!(state(0, 2.0).advance(-7.0, 0.0), state(0, 0.0));
    }

    #[test]
    fn test_apply_uses_current_total_as_denominator() {
        let mut data = UserData::new(Plan::default(), 10);
        data.pages_revised_in_current_khatma = 8.0;
        apply_revision_delta(&mut data, 5.0);
        assert_eq!(data.revision_khatma_count, 1);
        assert_eq!(data.pages_revised_in_current_khatma, 3.0);

        apply_revision_delta(&mut data, 0.0);
        assert_eq!(data.revision_khatma_count, 1);
        assert_eq!(data.pages_revised_in_current_khatma, 3.0);
    }

    #[test]
    fn test_rebalance_after_total_shrinks() {
        let mut data = UserData::new(Plan::default(), 10);
        data.pages_revised_in_current_khatma = 12.0;
        assert!(rebalance(&mut data));
        assert_eq!(data.revision_khatma_count, 1);
        assert_eq!(data.pages_revised_in_current_khatma, 2.0);
        assert!(khatma_progress(&data).percent < 100.0);

        assert!(!rebalance(&mut data));
        assert_eq!(data.revision_khatma_count, 1);
    }

    #[test]
    fn test_rebalance_leaves_empty_memorization_alone() {
        let mut data = UserData::new(Plan::default(), 0);
        data.pages_revised_in_current_khatma = 7.0;
        assert!(!rebalance(&mut data));
        assert_eq!(data.pages_revised_in_current_khatma, 7.0);
        assert_eq!(data.revision_khatma_count, 0);
    }

    #[test]
    fn test_khatma_progress_report() {
        let mut data = UserData::new(Plan::default(), 20);
        data.revision_khatma_count = 2;
        data.pages_revised_in_current_khatma = 5.0;
        let progress = khatma_progress(&data);
        assert_eq!(progress.count, 2);
        assert_eq!(progress.pages_remaining, 15.0);
        assert_eq!(progress.percent, 25.0);

        let empty = khatma_progress(&UserData::new(Plan::default(), 0));
        assert_eq!(empty.pages_remaining, 0.0);
        assert_eq!(empty.percent, 0.0);
    }
}
