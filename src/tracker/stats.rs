use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::models::{
    DailyPoint, DayCommitment, PageTotals, ProgressEntry, Streak, UserData, WeeklyProgress,
};
use crate::tracker::ledger::{entry_for, sum_in_window};
use crate::utils::date::{day_index, days_between, trailing_days, week_anchor};

/// Weekly revision goal never drops below this many pages.
pub const MIN_WEEKLY_REVISION_GOAL: u32 = 7;
/// Daily revision suggestion is this share of the memorized total.
pub const REVISION_SHARE_DIVISOR: f64 = 10.0;

fn percent_of(actual: f64, goal: f64) -> u32 {
    if goal > 0.0 {
        (actual / goal * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        100
    }
}

/// `max(1, ceil(total / 10))`
pub fn suggested_daily_revision(total_memorized: f64) -> u32 {
    ((total_memorized / REVISION_SHARE_DIVISOR).ceil() as u32).max(1)
}

/// Group the ledger into Saturday-anchored weeks, newest first. Windows are
/// evaluated oldest first because each week's revision goal depends on the
/// pages memorized before it started.
pub fn weekly_progress(data: &UserData) -> Vec<WeeklyProgress> {
    let mut groups: BTreeMap<NaiveDate, Vec<ProgressEntry>> = BTreeMap::new();
    for entry in &data.progress {
        groups
            .entry(week_anchor(entry.date))
            .or_default()
            .push(entry.clone());
    }

    let mut memorized_before = data.initial_memorized_pages as f64;
    let mut weeks: Vec<WeeklyProgress> = groups
        .into_iter()
        .enumerate()
        .map(|(i, (start, days))| {
            let totals = sum_in_window(&days, |_| true);

            let memorization_goal: f64 = (0..7)
                .map(|offset| start + Duration::days(offset))
                .filter(|day| data.plan.is_planned(day_index(*day)))
                .map(|_| data.plan.daily_goal)
                .sum();

            let revision_goal = (suggested_revision_at(memorized_before) * 7)
                .max(MIN_WEEKLY_REVISION_GOAL);
            memorized_before += totals.memorized;

            WeeklyProgress {
                week_number: i + 1,
                start_date: start,
                end_date: start + Duration::days(6),
                total_memorized: totals.memorized,
                total_revised: totals.revised,
                memorization_goal,
                revision_goal,
                memorization_progress: percent_of(totals.memorized, memorization_goal),
                revision_progress: percent_of(totals.revised as f64, revision_goal as f64),
                days,
            }
        })
        .collect();

    weeks.reverse();
    weeks
}

// Unlike the dashboard suggestion, a week that starts from nothing has no
// floor of 1 here; the weekly minimum covers it.
fn suggested_revision_at(memorized: f64) -> u32 {
    (memorized / REVISION_SHARE_DIVISOR).ceil() as u32
}

/// Percentage of the planned memorization achieved over the 7 days ending
/// `today`. 100 when no day in the window is planned.
pub fn commitment_rate(data: &UserData, today: NaiveDate) -> u32 {
    let window = trailing_days(today, 7);
    let goal: f64 = window
        .iter()
        .filter(|day| data.plan.is_planned(day_index(**day)))
        .map(|_| data.plan.daily_goal)
        .sum();
    let first = window[0];
    let actual = sum_in_window(&data.progress, |d| d >= first && d <= today).memorized;
    percent_of(actual, goal)
}

/// Planned/achieved status for each of the last 7 days, oldest first.
pub fn daily_commitment(data: &UserData, today: NaiveDate) -> Vec<DayCommitment> {
    trailing_days(today, 7)
        .into_iter()
        .map(|date| {
            let idx = day_index(date);
            DayCommitment {
                date,
                day_index: idx,
                planned: data.plan.is_planned(idx),
                memorized: entry_for(&data.progress, date)
                    .map(|p| p.memorized_pages > 0.0)
                    .unwrap_or(false),
            }
        })
        .collect()
}

pub fn revised_last_seven_days(data: &UserData, today: NaiveDate) -> u32 {
    let first = today - Duration::days(6);
    sum_in_window(&data.progress, |d| d >= first && d <= today).revised
}

fn memorization_days(progress: &[ProgressEntry]) -> Vec<NaiveDate> {
    progress
        .iter()
        .filter(|p| p.memorized_pages > 0.0)
        .map(|p| p.date)
        .collect()
}

/// Consecutive memorization days ending at the most recent one. Broken (0)
/// when that day is more than one day away from `today`.
pub fn current_streak(progress: &[ProgressEntry], today: NaiveDate) -> u32 {
    let days = memorization_days(progress);
    let Some(&last) = days.last() else {
        return 0;
    };
    if days_between(last, today).abs() > 1 {
        return 0;
    }

    let mut streak = 1u32;
    for pair in days.windows(2).rev() {
        if days_between(pair[0], pair[1]) == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Longest run of consecutive memorization days anywhere in the ledger.
pub fn best_streak(progress: &[ProgressEntry]) -> u32 {
    let days = memorization_days(progress);
    if days.is_empty() {
        return 0;
    }

    let mut best = 1u32;
    let mut current = 1u32;
    for pair in days.windows(2) {
        if days_between(pair[0], pair[1]) == 1 {
            current += 1;
        } else {
            current = 1;
        }
        best = best.max(current);
    }
    best
}

pub fn streak(progress: &[ProgressEntry], today: NaiveDate) -> Streak {
    let current = current_streak(progress, today);
    Streak {
        current,
        best: best_streak(progress).max(current),
    }
}

/// Per-day totals for the 7 days ending `today`, oldest first.
pub fn last_seven_days(data: &UserData, today: NaiveDate) -> Vec<DailyPoint> {
    trailing_days(today, 7)
        .into_iter()
        .map(|date| {
            let entry = entry_for(&data.progress, date);
            DailyPoint {
                date,
                day_index: day_index(date),
                memorized: entry.map(|p| p.memorized_pages).unwrap_or(0.0),
                revised: entry.map(|p| p.revised_pages).unwrap_or(0),
            }
        })
        .collect()
}

/// Four 7-day buckets covering the last 28 days; index 3 ends `today`.
pub fn four_week_buckets(data: &UserData, today: NaiveDate) -> [PageTotals; 4] {
    let mut buckets = [PageTotals::default(); 4];
    for entry in &data.progress {
        let diff = days_between(entry.date, today);
        if (0..28).contains(&diff) {
            let bucket = &mut buckets[3 - (diff / 7) as usize];
            bucket.memorized += entry.memorized_pages;
            bucket.revised += entry.revised_pages;
        }
    }
    buckets
}
