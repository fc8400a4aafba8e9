//! Aggregate views derived from the ledger. Never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::CoinRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
/// Sums of the five category slots over some set of records.
pub struct CategoryTotals {
    pub earned: i64,
    pub premium_box: i64,
    pub other: i64,
    pub serebo: i64,
    pub pick: i64,
}

impl CategoryTotals {
    pub fn add(&mut self, record: &CoinRecord) {
        self.earned += record.earned;
        self.premium_box += record.premium_box;
        self.other += record.other;
        self.serebo += record.serebo;
        self.pick += record.pick;
    }

    pub fn spent(&self) -> i64 {
        self.premium_box + self.other + self.serebo + self.pick
    }

    pub fn is_empty(&self) -> bool {
        self.earned == 0 && self.spent() == 0
    }
}

impl<'a> FromIterator<&'a CoinRecord> for CategoryTotals {
    fn from_iter<I: IntoIterator<Item = &'a CoinRecord>>(iter: I) -> Self {
        let mut totals = CategoryTotals::default();
        for record in iter {
            totals.add(record);
        }
        totals
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: CategoryTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Totals for a week or calendar month.
pub struct PeriodStats {
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub totals: CategoryTotals,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
/// How spending splits across the spending categories.
pub struct UsageBreakdown {
    pub premium: i64,
    pub serebo: i64,
    pub pick: i64,
    pub other: i64,
    pub total: i64,
}

impl UsageBreakdown {
    /// Share of `part` in the total, in percent. `None` when nothing was spent.
    pub fn percent(&self, part: i64) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(part as f64 * 100.0 / self.total as f64)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Earned amount for one day against that day's primary goal.
pub struct DayProgress {
    pub date: NaiveDate,
    pub earned: i64,
    pub goal: i64,
}

impl DayProgress {
    /// A zero goal counts as no goal, so it is never "met".
    pub fn met(&self) -> bool {
        self.goal > 0 && self.earned >= self.goal
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodayProgress {
    pub date: NaiveDate,
    pub earned: i64,
    pub primary_goal: i64,
    pub secondary_goal: i64,
    pub remaining_primary: i64,
    pub remaining_secondary: i64,
    pub current_coins: i64,
    /// Balance to reach to meet today's primary goal.
    pub target_total: i64,
}
