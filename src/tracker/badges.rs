use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::{Badge, BadgeCategory, BadgeProgress, UpcomingBadge, UserData};
use crate::tracker::ledger::total_memorized;
use crate::tracker::stats::current_streak;

const fn badge(
    id: &'static str,
    name: &'static str,
    arabic_name: &'static str,
    description: &'static str,
    category: BadgeCategory,
    threshold: u32,
) -> Badge {
    Badge {
        id,
        name,
        arabic_name,
        description,
        category,
        threshold,
    }
}

use BadgeCategory::{Consistency, Memorization, Revision};

/// Every badge, grouped by category and ordered by threshold.
pub static CATALOG: &[Badge] = &[
    badge("memo_juz_1", "One Juz", "حافظ جزء", "Memorize a full juz (23 pages)", Memorization, 23),
    badge("memo_juz_5", "Five Juz", "حافظ 5 أجزاء", "Memorize 5 juz (103 pages)", Memorization, 103),
    badge("memo_juz_15", "Half the Quran", "حافظ نصف القرآن", "Memorize 15 juz (303 pages)", Memorization, 303),
    badge("memo_quran", "Hafiz", "حافظ القرآن الكريم", "Memorize the whole Quran (604 pages)", Memorization, 604),
    badge("rev_khatma_1", "First Khatma", "الختمة الأولى", "Complete your first revision khatma", Revision, 1),
    badge("rev_khatma_2", "Two Khatmas", "ختمتان", "Complete 2 revision khatmas", Revision, 2),
    badge("rev_khatma_5", "Five Khatmas", "خمس ختمات", "Complete 5 revision khatmas", Revision, 5),
    badge("rev_khatma_10", "Ten Khatmas", "عشر ختمات", "Complete 10 revision khatmas", Revision, 10),
    badge("rev_khatma_20", "Twenty Khatmas", "عشرون ختمة", "Complete 20 revision khatmas", Revision, 20),
    badge("rev_khatma_50", "Fifty Khatmas", "خمسون ختمة", "Complete 50 revision khatmas", Revision, 50),
    badge("rev_khatma_100", "A Hundred Khatmas", "مائة ختمة", "Complete 100 revision khatmas", Revision, 100),
    badge("rev_khatma_250", "Companion of the Quran", "رفيق القرآن", "Complete 250 revision khatmas", Revision, 250),
    badge("rev_khatma_500", "Keeper of the Quran", "صاحب القرآن", "Complete 500 revision khatmas", Revision, 500),
    badge("rev_khatma_1000", "People of the Quran", "أهل القرآن", "Complete 1000 revision khatmas", Revision, 1000),
    badge("con_streak_7", "A Week of Resolve", "همة أسبوع", "Memorize 7 days in a row", Consistency, 7),
    badge("con_streak_30", "Long Breath", "نفس طويل", "Memorize 30 days in a row", Consistency, 30),
    badge("con_streak_90", "Three Months", "همة 3 أشهر", "Memorize 90 days in a row", Consistency, 90),
    badge("con_streak_180", "Half a Year", "مثابرة نصف عام", "Memorize 180 days in a row", Consistency, 180),
    badge("con_streak_365", "A Year Together", "رفقة عام", "Memorize 365 days in a row", Consistency, 365),
    badge("con_streak_547", "A Year and a Half", "عام ونصف من العطاء", "Memorize 547 days in a row", Consistency, 547),
    badge("con_streak_730", "Two Years Together", "رفقة عامين", "Memorize two full years in a row", Consistency, 730),
];

pub fn find(id: &str) -> Option<&'static Badge> {
    CATALOG.iter().find(|b| b.id == id)
}

pub fn in_category(category: BadgeCategory) -> impl Iterator<Item = &'static Badge> {
    CATALOG.iter().filter(move |b| b.category == category)
}

/// Value a category's thresholds are compared against.
pub fn metric(category: BadgeCategory, data: &UserData, today: NaiveDate) -> f64 {
    match category {
        BadgeCategory::Memorization => total_memorized(data),
        BadgeCategory::Revision => data.revision_khatma_count as f64,
        BadgeCategory::Consistency => current_streak(&data.progress, today) as f64,
    }
}

pub fn check_earned(badge: &Badge, data: &UserData, today: NaiveDate) -> bool {
    metric(badge.category, data, today) >= badge.threshold as f64
}

pub fn progress(badge: &Badge, data: &UserData, today: NaiveDate) -> BadgeProgress {
    let goal = badge.threshold;
    BadgeProgress {
        current: metric(badge.category, data, today).min(goal as f64),
        goal,
    }
}

/// Ids of every badge `data` currently qualifies for.
pub fn evaluate(data: &UserData, today: NaiveDate) -> BTreeSet<String> {
    CATALOG
        .iter()
        .filter(|b| check_earned(b, data, today))
        .map(|b| b.id.to_string())
        .collect()
}

/// Nearest unearned milestone per category, skipping any whose progress has
/// already reached its goal.
pub fn upcoming(data: &UserData, today: NaiveDate) -> Vec<UpcomingBadge> {
    BadgeCategory::all()
        .into_iter()
        .filter_map(|category| {
            let next = in_category(category)
                .filter(|b| !data.earned_badges.contains(b.id))
                .min_by_key(|b| b.threshold)?;
            let progress = progress(next, data, today);
            (!progress.is_complete()).then_some(UpcomingBadge {
                badge: next,
                progress,
            })
        })
        .collect()
}
