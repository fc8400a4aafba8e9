//! The persisted blob: baseline balance, ledger and settings.

use serde::{Deserialize, Serialize};

use crate::{record::CoinRecord, settings::Settings};

/// Whole persisted state. Every mutation replaces the blob as one unit.
///
/// `records` keeps insertion order, which is not meaningful; the logical
/// order is `(date, timestamp)` ascending, see [`AppData::sorted_records`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    /// Balance before any record exists.
    pub initial_coin_amount: i64,
    pub records: Vec<CoinRecord>,
    #[serde(default)]
    pub settings: Settings,
}

impl AppData {
    pub fn new(initial_coin_amount: i64) -> Self {
        Self {
            initial_coin_amount,
            records: Vec::new(),
            settings: Settings::default(),
        }
    }

    pub fn record(&self, id: &str) -> Option<&CoinRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Record with the greatest creation timestamp.
    pub fn latest_record(&self) -> Option<&CoinRecord> {
        self.records.iter().max_by_key(|record| record.timestamp)
    }

    /// Records in `(date, timestamp)` order.
    pub fn sorted_records(&self) -> Vec<&CoinRecord> {
        let mut sorted: Vec<&CoinRecord> = self.records.iter().collect();
        sorted.sort_by_key(|record| record.order_key());
        sorted
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordMode;
    use chrono::NaiveDate;

    fn record(date: (i32, u32, u32), timestamp: i64, coins: i64) -> CoinRecord {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        CoinRecord::new(date, timestamp, coins, RecordMode::Add, 1)
    }

    #[test]
    fn latest_record_is_chosen_by_timestamp() {
        let mut data = AppData::new(0);
        data.records.push(record((2024, 1, 3), 10, 30));
        data.records.push(record((2024, 1, 2), 20, 20));
        assert_eq!(data.latest_record().map(|r| r.coin_amount), Some(20));
    }

    #[test]
    fn sorted_records_order_by_date_then_timestamp() {
        let mut data = AppData::new(0);
        data.records.push(record((2024, 1, 2), 5, 3));
        data.records.push(record((2024, 1, 1), 9, 2));
        data.records.push(record((2024, 1, 1), 1, 1));
        let amounts: Vec<i64> = data.sorted_records().iter().map(|r| r.coin_amount).collect();
        assert_eq!(amounts, vec![1, 2, 3]);
    }

    #[test]
    fn settings_default_when_missing() {
        let data: AppData =
            serde_json::from_str(r#"{"initialCoinAmount":1000,"records":[]}"#).unwrap();
        assert_eq!(data, AppData::new(1000));
    }
}
