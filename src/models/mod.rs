pub mod badge;
pub mod plan;
pub mod progress;
pub mod stats;
pub mod user_data;

pub use badge::{Badge, BadgeCategory, BadgeProgress, UpcomingBadge};
pub use plan::Plan;
pub use progress::{EntryChange, EntryField, PageTotals, ProgressEntry};
pub use stats::{DailyPoint, DayCommitment, KhatmaProgress, Streak, WeeklyProgress};
pub use user_data::{StoredUserData, UserData, TOTAL_QURAN_PAGES};
