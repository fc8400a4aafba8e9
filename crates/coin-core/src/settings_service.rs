use chrono::NaiveDate;
use tracing::info;

use coin_domain::{AppData, Settings};

use crate::migration_service::MigrationService;

/// Writes to the settings portion of the ledger. Records are never touched,
/// so goals already frozen on them keep their values.
pub struct SettingsService;

impl SettingsService {
    /// Replaces the settings wholesale after normalising legacy mirrors.
    pub fn apply(data: &AppData, settings: Settings) -> AppData {
        let mut next = data.clone();
        next.settings = MigrationService::normalize_settings(settings);
        info!(
            primary = ?next.settings.primary_goal,
            secondary = ?next.settings.secondary_goal,
            "settings applied"
        );
        next
    }

    /// Starts debt accrual over from `today`.
    pub fn reset_debt(data: &AppData, today: NaiveDate) -> AppData {
        let mut settings = data.settings.clone();
        settings.debt_reset_date = Some(today);
        Self::apply(data, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{debt_service::DebtService, ledger_service::LedgerService, time::FixedClock};
    use coin_domain::{GoalTier, RecordMode};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn apply_mirrors_primary_into_legacy_fields() {
        let mut settings = Settings::default();
        settings.set_flat_goal(GoalTier::Primary, 700);
        let data = SettingsService::apply(&AppData::new(0), settings);
        assert_eq!(data.settings.primary_goal, Some(700));
        assert_eq!(data.settings.daily_goal, Some(700));
    }

    #[test]
    fn changing_goals_leaves_frozen_history_alone() {
        let clock = FixedClock::at_date(date(1));
        let mut settings = Settings::default();
        settings.set_flat_goal(GoalTier::Primary, 500);
        let data = SettingsService::apply(&AppData::new(0), settings);
        let (data, _) =
            LedgerService::add_record(&data, date(1), 100, RecordMode::Add, &clock).unwrap();

        let mut raised = data.settings.clone();
        raised.set_flat_goal(GoalTier::Primary, 5000);
        let data = SettingsService::apply(&data, raised);

        assert_eq!(data.records[0].primary_goal_at_that_day, Some(500));
        assert_eq!(
            DebtService::calculate_debt(&data.records, &data.settings, date(2)),
            400
        );
    }

    #[test]
    fn reset_debt_stamps_today() {
        let clock = FixedClock::at_date(date(1));
        let mut settings = Settings::default();
        settings.set_flat_goal(GoalTier::Primary, 500);
        let data = SettingsService::apply(&AppData::new(0), settings);
        let (data, _) =
            LedgerService::add_record(&data, date(1), 100, RecordMode::Add, &clock).unwrap();

        let data = SettingsService::reset_debt(&data, date(2));
        assert_eq!(data.settings.debt_reset_date, Some(date(2)));
        assert_eq!(
            DebtService::calculate_debt(&data.records, &data.settings, date(3)),
            0
        );
    }
}
