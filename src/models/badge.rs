use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Memorization,
    Revision,
    Consistency,
}

impl BadgeCategory {
    pub fn all() -> [BadgeCategory; 3] {
        [
            BadgeCategory::Memorization,
            BadgeCategory::Revision,
            BadgeCategory::Consistency,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeCategory::Memorization => "memorization",
            BadgeCategory::Revision => "revision",
            BadgeCategory::Consistency => "consistency",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BadgeCategory::Memorization => "Memorization",
            BadgeCategory::Revision => "Revision & Khatmas",
            BadgeCategory::Consistency => "Consistency",
        }
    }

    /// What the category's thresholds are measured in.
    pub fn unit(&self) -> &'static str {
        match self {
            BadgeCategory::Memorization => "pages",
            BadgeCategory::Revision => "khatmas",
            BadgeCategory::Consistency => "days",
        }
    }
}

impl std::fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for BadgeCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        BadgeCategory::all()
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = BadgeCategory::all().iter().map(|c| c.as_str()).collect();
                anyhow::anyhow!("Unknown badge category '{}'. Use: {}", s, known.join(", "))
            })
    }
}

/// A static catalog entry. Whether it is earned is decided by comparing the
/// category's metric against `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub arabic_name: &'static str,
    pub description: &'static str,
    pub category: BadgeCategory,
    pub threshold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BadgeProgress {
    pub current: f64,
    pub goal: u32,
}

impl BadgeProgress {
    pub fn is_complete(&self) -> bool {
        self.current >= self.goal as f64
    }

    pub fn percentage(&self) -> f64 {
        if self.goal == 0 {
            100.0
        } else {
            self.current / self.goal as f64 * 100.0
        }
    }
}

/// The nearest unearned milestone of one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpcomingBadge {
    pub badge: &'static Badge,
    pub progress: BadgeProgress,
}
