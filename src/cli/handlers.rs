use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::config::AppConfig;
use crate::db::Store;
use crate::models::{Badge, BadgeCategory, BadgeProgress, EntryField, Plan, UserData};
use crate::tracker::ledger::{entry_for, sanitize_pages, total_memorized};
use crate::tracker::{badges, khatma, stats, Tracker};
use crate::utils::date::{date_key, day_name, parse_date_key};
use crate::utils::format::{
    format_khatma_count, format_pages, pad_to_width, parse_pages, progress_bar,
};
use crate::utils::hijri::date_label;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn require_data<S: Store>(tracker: &Tracker<S>) -> Result<&UserData> {
    tracker
        .data()
        .ok_or_else(|| anyhow!("No plan yet. Run `rafiq setup` first."))
}

// ─── Setup ───────────────────────────────────────────────────────────────────

pub fn handle_setup<S: Store>(
    tracker: &mut Tracker<S>,
    config: &AppConfig,
    goal: Option<f64>,
    days: Option<&str>,
    initial: Option<u32>,
    today: NaiveDate,
) -> Result<()> {
    let first_run = !tracker.is_set_up();
    let base = tracker
        .data()
        .map(|d| d.plan.clone())
        .unwrap_or_else(|| config.plan.to_plan());

    let memorization_days = match days {
        Some(s) => parse_days(s)?,
        None => base.memorization_days,
    };
    let plan = Plan::new(goal.unwrap_or(base.daily_goal), memorization_days);
    let initial = if first_run { Some(initial.unwrap_or(0)) } else { initial };

    let data = tracker.submit_plan(plan, initial, today)?;

    println!();
    if first_run {
        println_colored!(GREEN, "  ✓ Plan created. May Allah make it easy for you.");
    } else {
        println_colored!(GREEN, "  ✓ Plan updated");
    }
    print_plan(data);
    if let Some(asked) = initial {
        if asked > data.initial_memorized_pages {
            println_colored!(
                AMBER,
                "  Starting pages capped at {} so the total stays within 604",
                data.initial_memorized_pages
            );
        }
    }
    println!();
    Ok(())
}

fn print_plan(data: &UserData) {
    let days: Vec<&str> = (0..7)
        .filter(|i| data.plan.is_planned(*i))
        .map(day_name)
        .collect();
    println!(
        "  Daily goal:     {} pages on {} days a week",
        format_pages(data.plan.daily_goal),
        data.plan.planned_day_count()
    );
    if days.is_empty() {
        println!("  Planned days:   none");
    } else {
        println!("  Planned days:   {}", days.join(", "));
    }
    println!("  Starting pages: {}", data.initial_memorized_pages);
}

/// Parse "sun,mon,thu" into a Sunday-first weekday mask.
pub fn parse_days(s: &str) -> Result<[bool; 7]> {
    let mut mask = [false; 7];
    for part in s.split(',').map(|p| p.trim().to_lowercase()) {
        if part.is_empty() {
            continue;
        }
        let idx = match part.get(..3).unwrap_or(&part) {
            "sun" => 0,
            "mon" => 1,
            "tue" => 2,
            "wed" => 3,
            "thu" => 4,
            "fri" => 5,
            "sat" => 6,
            _ => bail!("Unknown day '{}'. Use: sun, mon, tue, wed, thu, fri, sat", part),
        };
        mask[idx] = true;
    }
    Ok(mask)
}

// ─── Log ─────────────────────────────────────────────────────────────────────

pub fn handle_log<S: Store>(
    tracker: &mut Tracker<S>,
    date: Option<&str>,
    memorized: Option<&str>,
    revised: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    if memorized.is_none() && revised.is_none() {
        bail!("Nothing to log. Pass --memorized and/or --revised.");
    }
    let date = match date {
        Some(s) => parse_date_key(s).context("Reading --date")?,
        None => today,
    };

    let before = require_data(tracker)?.clone();

    // Memorized first: the revised clamp and the khatma cycle use the new total
    let edits = [
        (EntryField::Memorized, memorized),
        (EntryField::Revised, revised),
    ];
    for (field, input) in edits {
        let Some(input) = input else { continue };
        let requested = parse_pages(input);
        let data = tracker.set_daily_entry(date, field, requested, today)?;
        let stored = entry_for(&data.progress, date)
            .map(|p| p.get(field))
            .unwrap_or(0.0);
        let wanted = match field {
            EntryField::Memorized => sanitize_pages(requested),
            EntryField::Revised => sanitize_pages(requested).trunc(),
        };
        if stored < wanted {
            let reason = match field {
                EntryField::Memorized => "the Quran has 604 pages",
                EntryField::Revised => "you cannot revise more than you have memorized",
            };
            println_colored!(
                AMBER,
                "  {} capped at {} ({})",
                field_label(field),
                format_pages(stored),
                reason
            );
        }
    }

    let after = require_data(tracker)?;
    let entry = entry_for(&after.progress, date);
    println_colored!(
        GREEN,
        "  ✓ {} — memorized {}, revised {}",
        date_key(date),
        format_pages(entry.map(|p| p.memorized_pages).unwrap_or(0.0)),
        entry.map(|p| p.revised_pages).unwrap_or(0)
    );

    if after.revision_khatma_count > before.revision_khatma_count {
        println_colored!(
            GOLD,
            "  ★ Revision khatma complete! {} so far",
            format_khatma_count(after.revision_khatma_count)
        );
    }
    print_new_badges(&before.earned_badges, &after.earned_badges);
    Ok(())
}

fn field_label(field: EntryField) -> &'static str {
    match field {
        EntryField::Memorized => "Memorized pages",
        EntryField::Revised => "Revised pages",
    }
}

fn print_new_badges(before: &BTreeSet<String>, after: &BTreeSet<String>) {
    for id in after.difference(before) {
        if let Some(badge) = badges::find(id) {
            println_colored!(GOLD, "  ★ New badge: {} ({})", badge.name, badge.arabic_name);
        }
    }
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

pub fn handle_today<S: Store>(
    tracker: &Tracker<S>,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<()> {
    let data = require_data(tracker)?;
    let total = total_memorized(data);
    let khatma = khatma::khatma_progress(data);
    let streak = stats::streak(&data.progress, today);

    println!();
    println_colored!(
        GOLD,
        "  Dashboard — {}  {}",
        date_key(today),
        hijri_suffix(today, config)
    );
    println!();

    println!(
        "  Memorized:       {}  {} / 604 pages",
        progress_bar(total, 604.0, 20),
        format_pages(total)
    );
    println!(
        "  Revised (7d):    {} pages",
        stats::revised_last_seven_days(data, today)
    );

    let rate = stats::commitment_rate(data, today);
    let color = match rate {
        80..=100 => GREEN,
        40..=79 => AMBER,
        _ => RED,
    };
    println_colored!(color, "  Commitment:      {}%", rate);
    print!("                   ");
    for day in stats::daily_commitment(data, today) {
        let mark = match (day.planned, day.memorized) {
            (true, true) => format!("{}✓\x1b[0m", GREEN),
            (true, false) => format!("{}✗\x1b[0m", RED),
            (false, true) => format!("{}+\x1b[0m", GREEN),
            (false, false) => format!("{}-\x1b[0m", DIM),
        };
        print!("{} {}  ", day_name(day.day_index), mark);
    }
    println!();

    print!("  Khatmas:         {}", format_khatma_count(khatma.count));
    if total > 0.0 {
        print!(
            "  ·  {:.0}% of current ({} pages to go)",
            khatma.percent,
            format_pages(khatma.pages_remaining.round())
        );
    }
    println!();
    println!(
        "  Streak:          {} days current  |  {} days best",
        streak.current, streak.best
    );
    println_colored!(
        BOLD,
        "  Suggested revision: at least {} pages a day",
        stats::suggested_daily_revision(total)
    );

    let entry = entry_for(&data.progress, today);
    println!(
        "  Today:           memorized {} / {}, revised {}",
        format_pages(entry.map(|p| p.memorized_pages).unwrap_or(0.0)),
        format_pages(data.plan.daily_goal),
        entry.map(|p| p.revised_pages).unwrap_or(0)
    );

    let upcoming = badges::upcoming(data, today);
    if !upcoming.is_empty() {
        println!();
        println_colored!(GOLD, "  Upcoming badges");
        for next in upcoming {
            println!(
                "  {}  {}  {} / {}",
                pad_to_width(next.badge.name, 24),
                progress_bar(next.progress.current, next.progress.goal as f64, 12),
                next.progress.current.floor(),
                next.progress.goal
            );
        }
    }
    println!();
    Ok(())
}

fn hijri_suffix(date: NaiveDate, config: &AppConfig) -> String {
    if config.display.hijri_dates {
        format!("({})", date_label(date, true, config.display.hijri_offset))
    } else {
        String::new()
    }
}

// ─── History ─────────────────────────────────────────────────────────────────

pub fn handle_history<S: Store>(tracker: &Tracker<S>, config: &AppConfig) -> Result<()> {
    let data = require_data(tracker)?;
    let weeks = stats::weekly_progress(data);

    println!();
    println_colored!(GOLD, "  Weekly History");
    println!();
    if weeks.is_empty() {
        println_colored!(DIM, "  Nothing logged yet. Start with `rafiq log --memorized 1`.");
        println!();
        return Ok(());
    }

    let label = |d: NaiveDate| {
        date_label(d, config.display.hijri_dates, config.display.hijri_offset)
    };
    for week in &weeks {
        println_colored!(
            BOLD,
            "  Week {}  {} → {}",
            week.week_number,
            label(week.start_date),
            label(week.end_date)
        );
        println!(
            "    Memorized  {}  {:>3}%  {} / {} pages",
            progress_bar(week.total_memorized, week.memorization_goal, 16),
            week.memorization_progress,
            format_pages(week.total_memorized),
            format_pages(week.memorization_goal)
        );
        println!(
            "    Revised    {}  {:>3}%  {} / {} pages",
            progress_bar(week.total_revised as f64, week.revision_goal as f64, 16),
            week.revision_progress,
            week.total_revised,
            week.revision_goal
        );
        for day in week.days.iter().rev() {
            println_colored!(
                DIM,
                "      {} {}  memorized {}, revised {}",
                day_name(crate::utils::date::day_index(day.date)),
                date_key(day.date),
                format_pages(day.memorized_pages),
                day.revised_pages
            );
        }
        println!();
    }
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats<S: Store>(tracker: &Tracker<S>, today: NaiveDate) -> Result<()> {
    let data = require_data(tracker)?;

    let days = stats::last_seven_days(data, today);
    let day_max = days
        .iter()
        .map(|p| p.memorized.max(p.revised as f64))
        .fold(1.0, f64::max);

    println!();
    println_colored!(GOLD, "  Last 7 days");
    println!();
    for point in &days {
        println!(
            "  {}  {} {:>5}   {} {:>4}",
            day_name(point.day_index),
            progress_bar(point.memorized, day_max, 12),
            format_pages(point.memorized),
            progress_bar(point.revised as f64, day_max, 12),
            point.revised
        );
    }
    println_colored!(DIM, "       memorized              revised");

    let weeks = stats::four_week_buckets(data, today);
    let week_max = weeks
        .iter()
        .map(|w| w.memorized.max(w.revised as f64))
        .fold(1.0, f64::max);

    println!();
    println_colored!(GOLD, "  Last 4 weeks");
    println!();
    for (i, bucket) in weeks.iter().enumerate() {
        println!(
            "  Week {}  {} {:>5}   {} {:>4}",
            i + 1,
            progress_bar(bucket.memorized, week_max, 12),
            format_pages(bucket.memorized),
            progress_bar(bucket.revised as f64, week_max, 12),
            bucket.revised
        );
    }
    println!();
    Ok(())
}

// ─── Badges ──────────────────────────────────────────────────────────────────

pub fn handle_badges<S: Store>(
    tracker: &Tracker<S>,
    category: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let data = require_data(tracker)?;
    let categories: Vec<BadgeCategory> = match category {
        Some(s) => vec![s.parse()?],
        None => BadgeCategory::all().to_vec(),
    };

    println!();
    for category in categories {
        println_colored!(GOLD, "  {}", category.display_name());
        for badge in badges::in_category(category) {
            let progress = badges::progress(badge, data, today);
            let earned = data.earned_badges.contains(badge.id);
            let line = badge_row(badge, progress, earned);
            if earned {
                println_colored!(GREEN, "{}", line);
            } else {
                println_colored!(DIM, "{}", line);
            }
        }
        println!();
    }
    println!(
        "  Earned {} of {} badges",
        data.earned_badges.len(),
        badges::CATALOG.len()
    );
    println!();
    Ok(())
}

/// Catalog entry: status, names, progress, then the description underneath.
fn badge_row(badge: &Badge, progress: BadgeProgress, earned: bool) -> String {
    format!(
        "  {} {} {} {} {:>3.0}%  {} / {} {}\n      {}",
        if earned { "★" } else { "·" },
        pad_to_width(badge.name, 24),
        pad_to_width(badge.arabic_name, 20),
        progress_bar(progress.current, progress.goal as f64, 10),
        progress.percentage(),
        progress.current.floor(),
        progress.goal,
        badge.category.unit(),
        badge.description
    )
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export<S: Store>(tracker: &Tracker<S>) -> Result<()> {
    let data = require_data(tracker)?;
    let json = serde_json::to_string_pretty(data).context("Serializing record")?;
    println!("{}", json);
    Ok(())
}

// ─── Tips ────────────────────────────────────────────────────────────────────

const TIPS: &[(&str, &str)] = &[
    ("Sincerity", "Renew your intention that your memorization is for Allah alone; it is the root of success and blessing."),
    ("Pick the right time and place", "Memorize when your mind is clear, such as after Fajr, somewhere quiet and free of distractions."),
    ("Repetition is the key", "Repeat new verses many times until they settle firmly in your memory."),
    ("Connect the verses", "Understand the meaning and link each verse to what comes before and after it."),
    ("Revise constantly", "Revision matters more than new memorization. Keep a fixed daily portion of revision."),
    ("Listen to a skilled reciter", "Listening corrects pronunciation and strengthens what you have memorized."),
    ("Pray with what you memorize", "Recite your new verses in your prayers; it is one of the best ways to fix them."),
    ("Good company", "Find a friend to memorize with, so you can recite to each other and keep each other going."),
];

pub fn handle_tips() -> Result<()> {
    println!();
    println_colored!(GOLD, "  Tips for memorization and revision");
    println!();
    for (title, content) in TIPS {
        println_colored!(BOLD, "  {}", title);
        println!("    {}", content);
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days() {
        assert_eq!(
            parse_days("sun,mon,tue,wed,thu").unwrap(),
            [true, true, true, true, true, false, false]
        );
        assert_eq!(
            parse_days(" Saturday , FRI ").unwrap(),
            [false, false, false, false, false, true, true]
        );
        assert_eq!(parse_days("").unwrap(), [false; 7]);
        assert!(parse_days("sun,funday").is_err());
    }

    #[test]
    fn test_badge_row_shows_description_and_progress() {
        let badge = badges::find("memo_juz_5").unwrap();
        let progress = BadgeProgress {
            current: 51.5,
            goal: 103,
        };
        let row = badge_row(badge, progress, false);
        let lines: Vec<&str> = row.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  · Five Juz"));
        assert!(lines[0].contains(" 50%"));
        assert!(lines[0].contains("51 / 103 pages"));
        assert_eq!(lines[1].trim(), badge.description);

        let earned = badge_row(badge, BadgeProgress { current: 103.0, goal: 103 }, true);
        assert!(earned.starts_with("  ★"));
    }
}
