//! Goal configuration and display preferences stored alongside the ledger.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Per-weekday goal values, index 0 = Sunday.
pub type WeekdayGoals = [i64; 7];

/// Amount the secondary goal exceeds the primary goal when it is not configured.
pub const SECONDARY_GOAL_STRETCH: i64 = 100;

/// Position of `date` inside a [`WeekdayGoals`] array.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// Which of the two daily earning targets is being asked about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GoalTier {
    Primary,
    /// Stretch target above the primary goal.
    Secondary,
}

impl fmt::Display for GoalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalTier::Primary => "primary",
            GoalTier::Secondary => "secondary",
        };
        f.write_str(label)
    }
}

impl FromStr for GoalTier {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "primary" | "p" => Ok(GoalTier::Primary),
            "secondary" | "s" => Ok(GoalTier::Secondary),
            other => Err(format!("unknown goal tier `{other}`")),
        }
    }
}

/// Canonical settings shape.
///
/// Older shapes (a lone `dailyGoal`, or a `dailyGoals` weekday array) are
/// normalised into this type at load/import time, and the legacy fields are
/// kept mirrored from the primary tier so exports stay readable by older
/// builds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_goal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_goals: Option<WeekdayGoals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_goal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_goals: Option<WeekdayGoals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_goal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_goals: Option<WeekdayGoals>,
    #[serde(default = "Settings::default_flag")]
    pub show_goal_line: bool,
    #[serde(default = "Settings::default_flag")]
    pub show_debt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debt_reset_date: Option<NaiveDate>,
    /// Screenshot crop used by the OCR reader; carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_crop: Option<OcrCrop>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_goal: None,
            primary_goals: None,
            secondary_goal: None,
            secondary_goals: None,
            daily_goal: None,
            daily_goals: None,
            show_goal_line: Self::default_flag(),
            show_debt: Self::default_flag(),
            debt_reset_date: None,
            ocr_crop: None,
        }
    }
}

impl Settings {
    pub fn default_flag() -> bool {
        true
    }

    pub fn has_secondary(&self) -> bool {
        self.secondary_goal.is_some() || self.secondary_goals.is_some()
    }

    /// Sets a flat goal for `tier`, clearing any weekday array for it.
    pub fn set_flat_goal(&mut self, tier: GoalTier, amount: i64) {
        match tier {
            GoalTier::Primary => {
                self.primary_goal = Some(amount);
                self.primary_goals = None;
            }
            GoalTier::Secondary => {
                self.secondary_goal = Some(amount);
                self.secondary_goals = None;
            }
        }
    }

    pub fn set_weekday_goals(&mut self, tier: GoalTier, goals: WeekdayGoals) {
        match tier {
            GoalTier::Primary => self.primary_goals = Some(goals),
            GoalTier::Secondary => self.secondary_goals = Some(goals),
        }
    }

    /// Drops every configured value for `tier`, legacy mirrors included.
    pub fn clear_goal(&mut self, tier: GoalTier) {
        match tier {
            GoalTier::Primary => {
                self.primary_goal = None;
                self.primary_goals = None;
                self.daily_goal = None;
                self.daily_goals = None;
            }
            GoalTier::Secondary => {
                self.secondary_goal = None;
                self.secondary_goals = None;
            }
        }
    }
}

/// Crop rectangle in percent of the screenshot edges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct OcrCrop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_index_starts_on_sunday() {
        // 2024-01-07 is a Sunday, 2024-01-13 a Saturday.
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()), 0);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()), 3);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2024, 1, 13).unwrap()), 6);
    }

    #[test]
    fn missing_flags_default_to_true() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert!(settings.show_goal_line);
        assert!(settings.show_debt);
        assert!(!settings.has_secondary());
    }

    #[test]
    fn flat_goal_replaces_weekday_array() {
        let mut settings = Settings::default();
        settings.set_weekday_goals(GoalTier::Primary, [1, 2, 3, 4, 5, 6, 7]);
        settings.set_flat_goal(GoalTier::Primary, 300);
        assert_eq!(settings.primary_goal, Some(300));
        assert_eq!(settings.primary_goals, None);
    }

    #[test]
    fn goal_tier_parses_short_and_long_names() {
        assert_eq!("Primary".parse::<GoalTier>(), Ok(GoalTier::Primary));
        assert_eq!(" s ".parse::<GoalTier>(), Ok(GoalTier::Secondary));
        assert!("tertiary".parse::<GoalTier>().is_err());
        assert_eq!(GoalTier::Secondary.to_string(), "secondary");
        assert_eq!(serde_json::to_string(&GoalTier::Primary).unwrap(), "\"primary\"");
    }

    #[test]
    fn clearing_primary_drops_legacy_mirrors() {
        let mut settings = Settings {
            primary_goal: Some(10),
            daily_goal: Some(10),
            secondary_goal: Some(50),
            ..Settings::default()
        };
        settings.clear_goal(GoalTier::Primary);
        assert_eq!(settings.primary_goal, None);
        assert_eq!(settings.daily_goal, None);
        assert_eq!(settings.secondary_goal, Some(50));
    }
}
