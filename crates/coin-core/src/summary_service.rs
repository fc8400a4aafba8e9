//! Read-side aggregation over the ledger. Everything here is recomputed per read.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Months, NaiveDate};

use coin_domain::{
    AppData, CategoryTotals, CoinRecord, DailyStats, DayProgress, GoalTier, PeriodStats, Settings,
    TodayProgress, UsageBreakdown,
};

use crate::{goal_service::GoalService, ledger_service::LedgerService};

/// Longest window `recent_days` will produce, about ten years.
pub const MAX_RECENT_DAYS: u32 = 3660;

pub struct SummaryService;

impl SummaryService {
    /// All-time sums of every category slot.
    pub fn totals(records: &[CoinRecord]) -> CategoryTotals {
        records.iter().collect()
    }

    /// Per-day totals keyed by date (calendar view).
    pub fn daily_stats(records: &[CoinRecord]) -> BTreeMap<NaiveDate, DailyStats> {
        let mut days: BTreeMap<NaiveDate, DailyStats> = BTreeMap::new();
        for record in records {
            days.entry(record.date)
                .or_insert_with(|| DailyStats {
                    date: record.date,
                    totals: CategoryTotals::default(),
                })
                .totals
                .add(record);
        }
        days
    }

    /// Monday-start weeks, oldest first. Weeks without activity are omitted.
    pub fn weekly_stats(records: &[CoinRecord]) -> Vec<PeriodStats> {
        let mut weeks: BTreeMap<NaiveDate, CategoryTotals> = BTreeMap::new();
        for record in records {
            weeks
                .entry(week_start(record.date))
                .or_default()
                .add(record);
        }
        weeks
            .into_iter()
            .filter(|(_, totals)| !totals.is_empty())
            .map(|(start, totals)| {
                let end = start
                    .checked_add_signed(Duration::days(6))
                    .unwrap_or(NaiveDate::MAX);
                PeriodStats {
                    label: format!(
                        "{}/{} - {}/{}",
                        start.month(),
                        start.day(),
                        end.month(),
                        end.day()
                    ),
                    start_date: start,
                    end_date: end,
                    totals,
                }
            })
            .collect()
    }

    /// Calendar months, newest first.
    pub fn monthly_stats(records: &[CoinRecord]) -> Vec<PeriodStats> {
        let mut months: BTreeMap<NaiveDate, CategoryTotals> = BTreeMap::new();
        for record in records {
            months
                .entry(month_start(record.date))
                .or_default()
                .add(record);
        }
        months
            .into_iter()
            .rev()
            .map(|(start, totals)| PeriodStats {
                label: start.format("%Y-%m").to_string(),
                start_date: start,
                end_date: month_end(start),
                totals,
            })
            .collect()
    }

    /// Spending split across the spending categories.
    pub fn usage_breakdown(records: &[CoinRecord]) -> UsageBreakdown {
        let totals = Self::totals(records);
        UsageBreakdown {
            premium: totals.premium_box,
            serebo: totals.serebo,
            pick: totals.pick,
            other: totals.other,
            total: totals.spent(),
        }
    }

    /// The `days` days ending at `today`, oldest first, with each day's goal.
    ///
    /// A day with records uses the goal frozen on its chronologically last
    /// record; a day without records uses the goal resolved from `settings`.
    pub fn recent_days(
        records: &[CoinRecord],
        settings: &Settings,
        today: NaiveDate,
        days: u32,
    ) -> Vec<DayProgress> {
        let span = days.clamp(1, MAX_RECENT_DAYS) - 1;
        let first = today
            .checked_sub_signed(Duration::days(i64::from(span)))
            .unwrap_or(NaiveDate::MIN);
        let mut window: BTreeMap<NaiveDate, (i64, Option<(i64, i64)>)> = BTreeMap::new();
        for record in records
            .iter()
            .filter(|record| record.date >= first && record.date <= today)
        {
            let goal = GoalService::resolve_record_goal(GoalTier::Primary, record, settings);
            let entry = window.entry(record.date).or_insert((0, None));
            entry.0 += record.earned;
            if entry.1.map_or(true, |(timestamp, _)| record.timestamp >= timestamp) {
                entry.1 = Some((record.timestamp, goal));
            }
        }

        first
            .iter_days()
            .take_while(|date| *date <= today)
            .map(|date| {
                let (earned, frozen) = window.get(&date).copied().unwrap_or((0, None));
                let goal = frozen.map(|(_, goal)| goal).unwrap_or_else(|| {
                    GoalService::resolve_goal(GoalTier::Primary, date, settings)
                });
                DayProgress { date, earned, goal }
            })
            .collect()
    }

    /// Today's earnings against the live goals and the balance needed to meet them.
    pub fn today_progress(data: &AppData, today: NaiveDate) -> TodayProgress {
        let earned: i64 = data
            .records
            .iter()
            .filter(|record| record.date == today)
            .map(|record| record.earned)
            .sum();
        let (primary_goal, secondary_goal) = GoalService::goals_for(today, &data.settings);
        let remaining_primary = (primary_goal - earned).max(0);
        let remaining_secondary = (secondary_goal - earned).max(0);
        let current_coins = LedgerService::last_coin_amount(data);
        TodayProgress {
            date: today,
            earned,
            primary_goal,
            secondary_goal,
            remaining_primary,
            remaining_secondary,
            current_coins,
            target_total: current_coins + remaining_primary,
        }
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_signed(Duration::days(i64::from(
        date.weekday().num_days_from_monday(),
    )))
    .unwrap_or(NaiveDate::MIN)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn month_end(start: NaiveDate) -> NaiveDate {
    start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coin_domain::RecordMode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(day: NaiveDate, timestamp: i64, mode: RecordMode, amount: i64) -> CoinRecord {
        CoinRecord::new(day, timestamp, 0, mode, amount)
    }

    fn sample() -> Vec<CoinRecord> {
        vec![
            record(date(2024, 1, 29), 1, RecordMode::Add, 300),
            record(date(2024, 1, 31), 2, RecordMode::Premium, 100),
            record(date(2024, 2, 1), 3, RecordMode::Add, 200),
            record(date(2024, 2, 5), 4, RecordMode::Serebo, 50),
            record(date(2024, 2, 19), 5, RecordMode::Pick, 25),
        ]
    }

    #[test]
    fn totals_sum_every_slot() {
        let totals = SummaryService::totals(&sample());
        assert_eq!(totals.earned, 500);
        assert_eq!(totals.premium_box, 100);
        assert_eq!(totals.serebo, 50);
        assert_eq!(totals.pick, 25);
        assert_eq!(totals.spent(), 175);
    }

    #[test]
    fn weekly_stats_start_on_monday_and_skip_empty_weeks() {
        let weeks = SummaryService::weekly_stats(&sample());
        let starts: Vec<NaiveDate> = weeks.iter().map(|week| week.start_date).collect();
        assert_eq!(starts, vec![date(2024, 1, 29), date(2024, 2, 5), date(2024, 2, 19)]);
        assert_eq!(weeks[0].end_date, date(2024, 2, 4));
        assert_eq!(weeks[0].label, "1/29 - 2/4");
        assert_eq!(weeks[0].totals.earned, 500);
        assert_eq!(weeks[0].totals.premium_box, 100);
    }

    #[test]
    fn monthly_stats_are_newest_first() {
        let months = SummaryService::monthly_stats(&sample());
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].label, "2024-02");
        assert_eq!(months[0].end_date, date(2024, 2, 29));
        assert_eq!(months[0].totals.earned, 200);
        assert_eq!(months[1].start_date, date(2024, 1, 1));
        assert_eq!(months[1].end_date, date(2024, 1, 31));
    }

    #[test]
    fn december_month_end_rolls_over_the_year() {
        let months =
            SummaryService::monthly_stats(&[record(date(2023, 12, 9), 1, RecordMode::Add, 1)]);
        assert_eq!(months[0].end_date, date(2023, 12, 31));
    }

    #[test]
    fn usage_breakdown_ignores_earnings() {
        let usage = SummaryService::usage_breakdown(&sample());
        assert_eq!(usage.total, 175);
        assert_eq!(usage.premium, 100);
        assert_eq!(usage.percent(usage.pick).map(|p| p.round()), Some(14.0));
        assert_eq!(UsageBreakdown::default().percent(0), None);
    }

    #[test]
    fn recent_days_fill_gaps_with_live_goals() {
        let settings = Settings {
            primary_goal: Some(250),
            ..Settings::default()
        };
        let records = vec![
            record(date(2024, 2, 1), 1, RecordMode::Add, 300).with_goals(200, 300),
            record(date(2024, 2, 3), 2, RecordMode::Add, 100),
        ];
        let days = SummaryService::recent_days(&records, &settings, date(2024, 2, 3), 3);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].goal, 200);
        assert!(days[0].met());
        assert_eq!(days[1].earned, 0);
        assert_eq!(days[1].goal, 250);
        assert!(!days[2].met());
    }

    #[test]
    fn recent_days_caps_oversized_windows() {
        let today = date(2024, 1, 1);
        let days = SummaryService::recent_days(&[], &Settings::default(), today, 200_000_000);
        assert_eq!(days.len(), MAX_RECENT_DAYS as usize);
        assert_eq!(days.last().map(|day| day.date), Some(today));

        let near_start = NaiveDate::MIN + Duration::days(2);
        let days = SummaryService::recent_days(&[], &Settings::default(), near_start, 30);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, NaiveDate::MIN);
    }

    #[test]
    fn today_progress_reports_remaining_and_target() {
        let mut data = AppData::new(1000);
        data.settings.primary_goal = Some(500);
        let mut earned = record(date(2024, 2, 3), 1, RecordMode::Add, 200);
        earned.coin_amount = 1200;
        data.records.push(earned);

        let progress = SummaryService::today_progress(&data, date(2024, 2, 3));
        assert_eq!(progress.earned, 200);
        assert_eq!(progress.remaining_primary, 300);
        assert_eq!(progress.secondary_goal, 600);
        assert_eq!(progress.remaining_secondary, 400);
        assert_eq!(progress.current_coins, 1200);
        assert_eq!(progress.target_total, 1500);
    }
}
