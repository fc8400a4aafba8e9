//! Resolution of daily goals across every settings shape the app has stored.

use chrono::NaiveDate;

use coin_domain::{weekday_index, CoinRecord, GoalTier, Settings, SECONDARY_GOAL_STRETCH};

/// Resolves effective primary/secondary goals for a day or a record.
///
/// Resolution never fails: missing configuration resolves to `0` for the
/// primary tier and to `primary + 100` for the secondary tier.
pub struct GoalService;

impl GoalService {
    /// Goal in effect on `date` under `settings`.
    pub fn resolve_goal(tier: GoalTier, date: NaiveDate, settings: &Settings) -> i64 {
        match tier {
            GoalTier::Primary => Self::resolve_primary(date, settings),
            GoalTier::Secondary => Self::resolve_secondary(date, settings),
        }
    }

    /// Goal attached to `record`.
    ///
    /// A value frozen on the record at write time always wins, even when the
    /// current settings disagree; live resolution is only the fallback for
    /// records written before goals were stamped.
    pub fn resolve_record_goal(tier: GoalTier, record: &CoinRecord, settings: &Settings) -> i64 {
        let frozen = match tier {
            GoalTier::Primary => record.primary_goal_at_that_day,
            GoalTier::Secondary => record.secondary_goal_at_that_day,
        };
        frozen.unwrap_or_else(|| Self::resolve_goal(tier, record.date, settings))
    }

    /// `(primary, secondary)` for `date`.
    pub fn goals_for(date: NaiveDate, settings: &Settings) -> (i64, i64) {
        (
            Self::resolve_primary(date, settings),
            Self::resolve_secondary(date, settings),
        )
    }

    fn resolve_primary(date: NaiveDate, settings: &Settings) -> i64 {
        let day = weekday_index(date);
        settings
            .primary_goals
            .map(|goals| goals[day])
            .or(settings.primary_goal)
            .or_else(|| settings.daily_goals.map(|goals| goals[day]))
            .or(settings.daily_goal)
            .unwrap_or(0)
    }

    fn resolve_secondary(date: NaiveDate, settings: &Settings) -> i64 {
        let day = weekday_index(date);
        settings
            .secondary_goals
            .map(|goals| goals[day])
            .or(settings.secondary_goal)
            .unwrap_or_else(|| Self::resolve_primary(date, settings) + SECONDARY_GOAL_STRETCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coin_domain::RecordMode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wed() -> NaiveDate {
        date(2024, 1, 10)
    }

    fn sat() -> NaiveDate {
        date(2024, 1, 13)
    }

    #[test]
    fn weekday_array_picks_entry_for_the_day() {
        let settings = Settings {
            primary_goals: Some([0, 100, 100, 100, 100, 100, 200]),
            ..Settings::default()
        };
        assert_eq!(GoalService::resolve_goal(GoalTier::Primary, wed(), &settings), 100);
        assert_eq!(GoalService::resolve_goal(GoalTier::Primary, sat(), &settings), 200);
    }

    #[test]
    fn weekday_array_beats_scalar() {
        let settings = Settings {
            primary_goal: Some(999),
            primary_goals: Some([1, 2, 3, 4, 5, 6, 7]),
            ..Settings::default()
        };
        assert_eq!(GoalService::resolve_goal(GoalTier::Primary, wed(), &settings), 4);
    }

    #[test]
    fn primary_falls_back_to_legacy_fields() {
        let legacy_array = Settings {
            daily_goal: Some(50),
            daily_goals: Some([10, 20, 30, 40, 50, 60, 70]),
            ..Settings::default()
        };
        assert_eq!(GoalService::resolve_goal(GoalTier::Primary, sat(), &legacy_array), 70);

        let legacy_scalar = Settings {
            daily_goal: Some(50),
            ..Settings::default()
        };
        assert_eq!(GoalService::resolve_goal(GoalTier::Primary, sat(), &legacy_scalar), 50);
    }

    #[test]
    fn unconfigured_goals_resolve_to_defaults() {
        let settings = Settings::default();
        assert_eq!(GoalService::resolve_goal(GoalTier::Primary, wed(), &settings), 0);
        assert_eq!(GoalService::resolve_goal(GoalTier::Secondary, wed(), &settings), 100);
    }

    #[test]
    fn secondary_defaults_to_primary_plus_stretch() {
        let settings = Settings {
            primary_goals: Some([0, 100, 100, 100, 100, 100, 200]),
            ..Settings::default()
        };
        assert_eq!(GoalService::goals_for(sat(), &settings), (200, 300));

        let explicit = Settings {
            primary_goal: Some(500),
            secondary_goal: Some(550),
            ..Settings::default()
        };
        assert_eq!(GoalService::goals_for(wed(), &explicit), (500, 550));
    }

    #[test]
    fn frozen_record_goal_wins_over_current_settings() {
        let settings = Settings {
            primary_goal: Some(800),
            ..Settings::default()
        };
        let frozen = CoinRecord::new(wed(), 1, 10, RecordMode::Add, 10).with_goals(300, 450);
        assert_eq!(
            GoalService::resolve_record_goal(GoalTier::Primary, &frozen, &settings),
            300
        );
        assert_eq!(
            GoalService::resolve_record_goal(GoalTier::Secondary, &frozen, &settings),
            450
        );

        let unfrozen = CoinRecord::new(wed(), 1, 10, RecordMode::Add, 10);
        assert_eq!(
            GoalService::resolve_record_goal(GoalTier::Primary, &unfrozen, &settings),
            800
        );
        assert_eq!(
            GoalService::resolve_record_goal(GoalTier::Secondary, &unfrozen, &settings),
            900
        );
    }
}
