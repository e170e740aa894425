use chrono::NaiveDate;
use log::debug;

use crate::models::{
    EntryChange, EntryField, PageTotals, ProgressEntry, UserData, TOTAL_QURAN_PAGES,
};

/// `initial_memorized_pages + Σ memorized_pages`. Every other component
/// reads the memorized total through here.
pub fn total_memorized(data: &UserData) -> f64 {
    data.initial_memorized_pages as f64 + logged_memorized(&data.progress)
}

fn logged_memorized(progress: &[ProgressEntry]) -> f64 {
    progress.iter().map(|p| p.memorized_pages).sum()
}

pub fn entry_for(progress: &[ProgressEntry], date: NaiveDate) -> Option<&ProgressEntry> {
    progress
        .binary_search_by_key(&date, |p| p.date)
        .ok()
        .map(|i| &progress[i])
}

/// Sum both columns over entries whose date satisfies `pred`.
pub fn sum_in_window<F>(progress: &[ProgressEntry], pred: F) -> PageTotals
where
    F: Fn(NaiveDate) -> bool,
{
    progress
        .iter()
        .filter(|p| pred(p.date))
        .fold(PageTotals::default(), |mut acc, p| {
            acc.memorized += p.memorized_pages;
            acc.revised += p.revised_pages;
            acc
        })
}

/// Turn user input into a usable page count: non-finite and negative values
/// become 0.
pub fn sanitize_pages(raw: f64) -> f64 {
    if raw.is_finite() { raw.max(0.0) } else { 0.0 }
}

/// Write `raw` into `field` of the entry for `date`, creating the entry if
/// needed, then clamp it against the memorization ceiling (memorized) or the
/// current memorized total (revised).
pub fn upsert(data: &mut UserData, date: NaiveDate, field: EntryField, raw: f64) -> EntryChange {
    let mut value = sanitize_pages(raw);
    if field == EntryField::Revised {
        value = value.trunc();
    }

    let idx = match data.progress.binary_search_by_key(&date, |p| p.date) {
        Ok(i) => i,
        Err(i) => {
            debug!("creating ledger entry for {}", date);
            data.progress.insert(i, ProgressEntry::empty(date));
            i
        }
    };
    let old = data.progress[idx].get(field);

    match field {
        EntryField::Memorized => {
            let others = total_memorized(data) - data.progress[idx].memorized_pages;
            let capacity = (TOTAL_QURAN_PAGES as f64 - others).max(0.0);
            if value > capacity {
                debug!(
                    "memorized pages for {} clamped from {} to {}",
                    date, value, capacity
                );
                value = capacity;
            }
            data.progress[idx].memorized_pages = value;
        }
        EntryField::Revised => {
            let ceiling = total_memorized(data).floor();
            if value > ceiling {
                debug!(
                    "revised pages for {} clamped from {} to {}",
                    date, value, ceiling
                );
                value = ceiling;
            }
            data.progress[idx].revised_pages = value as u32;
        }
    }

    EntryChange {
        date,
        field,
        old,
        new: value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Plan;
    use crate::utils::date::parse_date_key;

    fn d(s: &str) -> NaiveDate {
        parse_date_key(s).unwrap()
    }

    fn user(initial: u32) -> UserData {
        UserData::new(Plan::default(), initial)
    }

    #[test]
    fn test_upsert_creates_entries_in_date_order() {
        let mut data = user(0);
        upsert(&mut data, d("2024-05-03"), EntryField::Memorized, 1.0);
        upsert(&mut data, d("2024-05-01"), EntryField::Memorized, 2.0);
        upsert(&mut data, d("2024-05-02"), EntryField::Revised, 1.0);

        let dates: Vec<_> = data.progress.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d("2024-05-01"), d("2024-05-02"), d("2024-05-03")]);
        let created = entry_for(&data.progress, d("2024-05-02")).unwrap();
        assert_eq!(created.memorized_pages, 0.0);
        assert_eq!(created.revised_pages, 1);
    }

    #[test]
    fn test_upsert_replaces_only_the_given_field() {
        let mut data = user(20);
        upsert(&mut data, d("2024-05-01"), EntryField::Memorized, 1.5);
        upsert(&mut data, d("2024-05-01"), EntryField::Revised, 6.0);
        let change = upsert(&mut data, d("2024-05-01"), EntryField::Memorized, 0.5);

        assert_eq!(data.progress.len(), 1);
        assert_eq!(data.progress[0].memorized_pages, 0.5);
        assert_eq!(data.progress[0].revised_pages, 6);
        assert_eq!(change.old, 1.5);
        assert_eq!(change.new, 0.5);
    }

    #[test]
    fn test_negative_and_garbage_input_become_zero() {
        let mut data = user(10);
        let change = upsert(&mut data, d("2024-05-01"), EntryField::Memorized, -4.0);
        assert_eq!(change.new, 0.0);
        let change = upsert(&mut data, d("2024-05-01"), EntryField::Revised, f64::NAN);
        assert_eq!(change.new, 0.0);
        assert_eq!(data.progress.len(), 1);
    }

    #[test]
    fn test_memorized_overflow_is_clamped_to_ceiling() {
        let mut data = user(600);
        let change = upsert(&mut data, d("2024-05-01"), EntryField::Memorized, 10.0);
        assert_eq!(change.new, 4.0);
        assert_eq!(data.progress[0].memorized_pages, 4.0);
        assert_eq!(total_memorized(&data), 604.0);

        // Editing the same day counts its own previous value as free capacity
        let change = upsert(&mut data, d("2024-05-01"), EntryField::Memorized, 3.0);
        assert_eq!(change.new, 3.0);
        let change = upsert(&mut data, d("2024-05-02"), EntryField::Memorized, 5.0);
        assert_eq!(change.new, 1.0);
    }

    #[test]
    fn test_revised_cannot_exceed_memorized_total() {
        let mut data = user(10);
        upsert(&mut data, d("2024-05-01"), EntryField::Memorized, 2.5);
        let change = upsert(&mut data, d("2024-05-01"), EntryField::Revised, 50.0);
        assert_eq!(change.new, 12.0);
        assert_eq!(data.progress[0].revised_pages, 12);

        let change = upsert(&mut data, d("2024-05-02"), EntryField::Revised, 3.7);
        assert_eq!(change.new, 3.0);
    }

    #[test]
    fn test_total_memorized_never_leaves_bounds() {
        let mut data = user(590);
        let inputs = [5.0, 30.0, -2.0, 9.5, 604.0, 0.5, 1000.0];
        for (i, raw) in inputs.iter().enumerate() {
            let date = d("2024-05-01") + chrono::Duration::days(i as i64 % 3);
            upsert(&mut data, date, EntryField::Memorized, *raw);
            let total = total_memorized(&data);
            assert!((0.0..=604.0).contains(&total), "total {} out of range", total);
        }
    }

    #[test]
    fn test_same_value_twice_is_idempotent() {
        let mut data = user(100);
        upsert(&mut data, d("2024-05-01"), EntryField::Memorized, 2.0);
        let once = data.clone();
        upsert(&mut data, d("2024-05-01"), EntryField::Memorized, 2.0);
        assert_eq!(data, once);
    }

    #[test]
    fn test_sum_in_window() {
        let mut data = user(0);
        upsert(&mut data, d("2024-05-01"), EntryField::Memorized, 1.0);
        upsert(&mut data, d("2024-05-02"), EntryField::Memorized, 2.0);
        upsert(&mut data, d("2024-05-02"), EntryField::Revised, 2.0);
        upsert(&mut data, d("2024-05-09"), EntryField::Memorized, 4.0);

        let first_week = sum_in_window(&data.progress, |date| date <= d("2024-05-07"));
        assert_eq!(first_week.memorized, 3.0);
        assert_eq!(first_week.revised, 2);
        let none = sum_in_window(&data.progress, |date| date > d("2024-06-01"));
        assert_eq!(none, PageTotals::default());
    }
}
