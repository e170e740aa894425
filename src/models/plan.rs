use serde::{Deserialize, Serialize};

pub const MIN_DAILY_GOAL: f64 = 0.5;
pub const MAX_DAILY_GOAL: f64 = 20.0;

/// Memorization plan: pages per planned day, and which weekdays are planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub daily_goal: f64,
    /// Index 0 = Sunday .. 6 = Saturday
    pub memorization_days: [bool; 7],
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            daily_goal: 1.0,
            memorization_days: [true, true, true, true, true, false, false],
        }
    }
}

impl Plan {
    /// Build a plan, snapping the goal into 0.5..=20 on half-page steps.
    pub fn new(daily_goal: f64, memorization_days: [bool; 7]) -> Self {
        Self {
            daily_goal: normalize_daily_goal(daily_goal),
            memorization_days,
        }
    }

    pub fn is_planned(&self, day_index: usize) -> bool {
        self.memorization_days.get(day_index).copied().unwrap_or(false)
    }

    pub fn planned_day_count(&self) -> usize {
        self.memorization_days.iter().filter(|d| **d).count()
    }
}

pub fn normalize_daily_goal(goal: f64) -> f64 {
    if !goal.is_finite() {
        return MIN_DAILY_GOAL;
    }
    let stepped = (goal * 2.0).round() / 2.0;
    stepped.clamp(MIN_DAILY_GOAL, MAX_DAILY_GOAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_goal_is_snapped_and_clamped() {
        assert_eq!(normalize_daily_goal(1.5), 1.5);
        assert_eq!(normalize_daily_goal(1.3), 1.5);
        assert_eq!(normalize_daily_goal(0.0), 0.5);
        assert_eq!(normalize_daily_goal(-3.0), 0.5);
        assert_eq!(normalize_daily_goal(42.0), 20.0);
        assert_eq!(normalize_daily_goal(f64::NAN), 0.5);
    }

    #[test]
    fn test_plan_serializes_camel_case() {
        let plan = Plan::default();
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("\"dailyGoal\":1.0"));
        assert!(json.contains("\"memorizationDays\":[true,true,true,true,true,false,false]"));
        assert_eq!(plan.planned_day_count(), 5);
        assert!(plan.is_planned(0));
        assert!(!plan.is_planned(6));
        assert!(!plan.is_planned(9));
    }
}
