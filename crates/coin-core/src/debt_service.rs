//! Carry-forward accrual of shortfall against the primary daily goal.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use coin_domain::{CoinRecord, GoalTier, Settings};

use crate::goal_service::GoalService;

/// Earned total and primary goal for one closed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtDay {
    pub date: NaiveDate,
    pub earned: i64,
    pub goal: i64,
    /// Debt carried after folding this day.
    pub debt_after: i64,
}

pub struct DebtService;

impl DebtService {
    /// Current debt as of `today`. Always `>= 0`.
    pub fn calculate_debt(records: &[CoinRecord], settings: &Settings, today: NaiveDate) -> i64 {
        Self::debt_timeline(records, settings, today)
            .last()
            .map(|day| day.debt_after)
            .unwrap_or(0)
            .max(0)
    }

    /// Day-by-day trace of the accrual fold, oldest first.
    ///
    /// Only days strictly before `today` count, and none before the settings'
    /// `debt_reset_date`. Each day's goal comes from its chronologically last
    /// record; a shortfall adds to the debt, a surplus repays it down to zero.
    pub fn debt_timeline(
        records: &[CoinRecord],
        settings: &Settings,
        today: NaiveDate,
    ) -> Vec<DebtDay> {
        let mut ordered: Vec<&CoinRecord> = records
            .iter()
            .filter(|record| record.date < today)
            .filter(|record| {
                settings
                    .debt_reset_date
                    .map_or(true, |reset| record.date >= reset)
            })
            .collect();
        ordered.sort_by_key(|record| record.order_key());

        let mut days: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
        for record in ordered {
            let goal = GoalService::resolve_record_goal(GoalTier::Primary, record, settings);
            let entry = days.entry(record.date).or_insert((0, goal));
            entry.0 += record.earned;
            entry.1 = goal;
        }

        let mut debt = 0i64;
        let timeline: Vec<DebtDay> = days
            .into_iter()
            .map(|(date, (earned, goal))| {
                if earned < goal {
                    debt += goal - earned;
                } else {
                    debt = (debt - (earned - goal)).max(0);
                }
                DebtDay {
                    date,
                    earned,
                    goal,
                    debt_after: debt,
                }
            })
            .collect();
        debug!(days = timeline.len(), debt, "computed debt");
        timeline
    }
}
