use log::{info, warn};

use crate::models::{ProgressEntry, StoredUserData, UserData, TOTAL_QURAN_PAGES};
use crate::tracker::khatma;
use crate::tracker::ledger::sanitize_pages;

/// Outcome of normalizing a stored record. `dirty` means the record should be
/// written back right away.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub data: UserData,
    pub dirty: bool,
}

/// Fill in fields missing from older records, restore ledger ordering and
/// bring a hand-edited record back within the page bounds.
pub fn normalize(stored: StoredUserData) -> Normalized {
    let mut dirty = false;

    let revision_khatma_count = stored.revision_khatma_count.unwrap_or_else(|| {
        info!("record has no revisionKhatmaCount, defaulting to 0");
        dirty = true;
        0
    });
    let pages_revised_in_current_khatma = match stored.pages_revised_in_current_khatma {
        Some(pages) => pages.max(0.0),
        None => {
            info!("record has no pagesRevisedInCurrentKhatma, defaulting to 0");
            dirty = true;
            0.0
        }
    };
    let earned_badges = match stored.earned_badges {
        Some(ids) => ids.into_iter().collect(),
        None => {
            info!("record has no earnedBadges, defaulting to none");
            dirty = true;
            Default::default()
        }
    };

    let mut progress = stored.progress;
    progress.sort_by_key(|p| p.date);
    let before = progress.len();
    // Stable sort keeps storage order within a date; keep the last one
    progress.reverse();
    progress.dedup_by_key(|p| p.date);
    progress.reverse();
    if progress.len() != before {
        warn!("dropped {} duplicate ledger entries", before - progress.len());
        dirty = true;
    }

    for entry in &mut progress {
        let pages = sanitize_pages(entry.memorized_pages);
        if pages != entry.memorized_pages {
            warn!(
                "memorized pages on {} reset from {} to {}",
                entry.date, entry.memorized_pages, pages
            );
            entry.memorized_pages = pages;
            dirty = true;
        }
    }

    let initial_memorized_pages = match clamp_to_quran(stored.initial_memorized_pages, &mut progress) {
        Some(initial) => {
            warn!(
                "record exceeded {} pages; initialMemorizedPages {} -> {}",
                TOTAL_QURAN_PAGES, stored.initial_memorized_pages, initial
            );
            dirty = true;
            initial
        }
        None => stored.initial_memorized_pages,
    };

    let mut data = UserData {
        plan: stored.plan,
        initial_memorized_pages,
        progress,
        revision_khatma_count,
        pages_revised_in_current_khatma,
        earned_badges,
    };
    if khatma::rebalance(&mut data) {
        dirty = true;
    }

    Normalized { data, dirty }
}

/// Lower the starting pages, then the newest ledger entries, until the total
/// fits in the Quran. Returns the new starting pages, or `None` when the
/// record already fits.
fn clamp_to_quran(initial: u32, progress: &mut [ProgressEntry]) -> Option<u32> {
    let limit = TOTAL_QURAN_PAGES as f64;
    let logged: f64 = progress.iter().map(|p| p.memorized_pages).sum();
    if initial as f64 + logged <= limit {
        return None;
    }

    let room = (limit - logged).max(0.0).floor() as u32;
    let initial = initial.min(room);
    let mut excess = initial as f64 + logged - limit;
    for entry in progress.iter_mut().rev() {
        if excess <= 0.0 {
            break;
        }
        let cut = entry.memorized_pages.min(excess);
        warn!(
            "memorized pages on {} lowered by {} to stay within {} pages",
            entry.date, cut, TOTAL_QURAN_PAGES
        );
        entry.memorized_pages -= cut;
        excess -= cut;
    }
    Some(initial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::ledger::total_memorized;

    fn parse(json: &str) -> StoredUserData {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_old_record_gets_defaults_and_is_dirty() {
        let stored = parse(
            r#"{
                "plan": {"dailyGoal": 1.5, "memorizationDays": [true,true,true,true,true,false,false]},
                "initialMemorizedPages": 40,
                "progress": [{"date": "2024-01-02", "memorizedPages": 1, "revisedPages": 4}]
            }"#,
        );
        let normalized = normalize(stored);
        assert!(normalized.dirty);
        assert_eq!(normalized.data.revision_khatma_count, 0);
        assert_eq!(normalized.data.pages_revised_in_current_khatma, 0.0);
        assert!(normalized.data.earned_badges.is_empty());
        assert_eq!(normalized.data.plan.daily_goal, 1.5);
        assert_eq!(normalized.data.progress[0].revised_pages, 4);
    }

    #[test]
    fn test_current_record_is_clean() {
        let stored = parse(
            r#"{
                "plan": {"dailyGoal": 1, "memorizationDays": [true,true,true,true,true,true,true]},
                "initialMemorizedPages": 0,
                "progress": [],
                "revisionKhatmaCount": 3,
                "pagesRevisedInCurrentKhatma": 2.5,
                "earnedBadges": ["rev_khatma_2", "rev_khatma_1"]
            }"#,
        );
        let normalized = normalize(stored);
        assert!(!normalized.dirty);
        assert_eq!(normalized.data.revision_khatma_count, 3);
        assert_eq!(normalized.data.pages_revised_in_current_khatma, 2.5);
        let badges: Vec<_> = normalized.data.earned_badges.iter().cloned().collect();
        assert_eq!(badges, vec!["rev_khatma_1", "rev_khatma_2"]);
    }

    #[test]
    fn test_ledger_is_sorted_and_deduplicated() {
        let stored = parse(
            r#"{
                "plan": {"dailyGoal": 1, "memorizationDays": [true,true,true,true,true,true,true]},
                "initialMemorizedPages": 0,
                "progress": [
                    {"date": "2024-01-05", "memorizedPages": 1, "revisedPages": 0},
                    {"date": "2024-01-02", "memorizedPages": 2, "revisedPages": 0},
                    {"date": "2024-01-05", "memorizedPages": 3, "revisedPages": 0}
                ],
                "revisionKhatmaCount": 0,
                "pagesRevisedInCurrentKhatma": 0,
                "earnedBadges": []
            }"#,
        );
        let normalized = normalize(stored);
        assert!(normalized.dirty);
        let pages: Vec<f64> = normalized
            .data
            .progress
            .iter()
            .map(|p| p.memorized_pages)
            .collect();
        assert_eq!(pages, vec![2.0, 3.0]);
    }

    #[test]
    fn test_overfull_record_is_brought_within_the_quran() {
        let stored = parse(
            r#"{
                "plan": {"dailyGoal": 1, "memorizationDays": [true,true,true,true,true,true,true]},
                "initialMemorizedPages": 600,
                "progress": [
                    {"date": "2024-01-02", "memorizedPages": 5, "revisedPages": 0},
                    {"date": "2024-01-03", "memorizedPages": -2, "revisedPages": 0},
                    {"date": "2024-01-04", "memorizedPages": 6, "revisedPages": 0}
                ],
                "revisionKhatmaCount": 0,
                "pagesRevisedInCurrentKhatma": 0,
                "earnedBadges": []
            }"#,
        );
        let normalized = normalize(stored);
        assert!(normalized.dirty);
        let data = &normalized.data;
        assert_eq!(data.initial_memorized_pages, 593);
        let pages: Vec<f64> = data.progress.iter().map(|p| p.memorized_pages).collect();
        assert_eq!(pages, vec![5.0, 0.0, 6.0]);
        assert_eq!(total_memorized(data), 604.0);
    }

    #[test]
    fn test_ledger_alone_over_the_limit_trims_newest_entries() {
        let stored = parse(
            r#"{
                "plan": {"dailyGoal": 1, "memorizationDays": [true,true,true,true,true,true,true]},
                "initialMemorizedPages": 50,
                "progress": [
                    {"date": "2024-01-02", "memorizedPages": 600, "revisedPages": 0},
                    {"date": "2024-01-03", "memorizedPages": 10, "revisedPages": 0}
                ],
                "revisionKhatmaCount": 0,
                "pagesRevisedInCurrentKhatma": 0,
                "earnedBadges": []
            }"#,
        );
        let normalized = normalize(stored);
        assert!(normalized.dirty);
        let data = &normalized.data;
        assert_eq!(data.initial_memorized_pages, 0);
        let pages: Vec<f64> = data.progress.iter().map(|p| p.memorized_pages).collect();
        assert_eq!(pages, vec![600.0, 4.0]);
    }

    #[test]
    fn test_pending_revision_above_total_rolls_over_on_load() {
        let stored = parse(
            r#"{
                "plan": {"dailyGoal": 1, "memorizationDays": [true,true,true,true,true,true,true]},
                "initialMemorizedPages": 10,
                "progress": [],
                "revisionKhatmaCount": 1,
                "pagesRevisedInCurrentKhatma": 13,
                "earnedBadges": []
            }"#,
        );
        let normalized = normalize(stored);
        assert!(normalized.dirty);
        assert_eq!(normalized.data.revision_khatma_count, 2);
        assert_eq!(normalized.data.pages_revised_in_current_khatma, 3.0);
    }
}
