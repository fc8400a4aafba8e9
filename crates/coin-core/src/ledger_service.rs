//! The validated, append-only ledger writer and the queries it depends on.

use chrono::NaiveDate;
use tracing::{debug, warn};

use coin_domain::{AppData, CoinRecord, RecordMode};

use crate::{goal_service::GoalService, time::Clock, CoreError};

/// Constructors, queries and the single validated write path for [`AppData`].
pub struct LedgerService;

impl LedgerService {
    /// Creates an empty ledger starting from `initial_coin_amount`.
    pub fn initialize(initial_coin_amount: i64) -> AppData {
        AppData::new(initial_coin_amount)
    }

    /// Balance after the most recent record, or the baseline when empty.
    pub fn last_coin_amount(data: &AppData) -> i64 {
        data.latest_record()
            .map(|record| record.coin_amount)
            .unwrap_or(data.initial_coin_amount)
    }

    /// The record with the greatest `timestamp`.
    pub fn latest_record(data: &AppData) -> Option<&CoinRecord> {
        data.latest_record()
    }

    /// Records in logical `(date, timestamp)` order.
    pub fn sorted_records(records: &[CoinRecord]) -> Vec<&CoinRecord> {
        let mut sorted: Vec<&CoinRecord> = records.iter().collect();
        sorted.sort_by_key(|record| record.order_key());
        sorted
    }

    pub fn last_record_date(data: &AppData) -> Option<NaiveDate> {
        data.latest_record().map(|record| record.date)
    }

    pub fn last_record_timestamp(data: &AppData) -> Option<i64> {
        data.latest_record().map(|record| record.timestamp)
    }

    /// Validates a new balance reading against the ledger and appends it.
    ///
    /// Returns the new state together with the appended record. `data` is
    /// never modified; on error the caller keeps its previous state.
    pub fn add_record(
        data: &AppData,
        date: NaiveDate,
        new_coin_amount: i64,
        mode: RecordMode,
        clock: &dyn Clock,
    ) -> Result<(AppData, CoinRecord), CoreError> {
        let last_coin = Self::last_coin_amount(data);
        let diff = new_coin_amount - last_coin;

        if let Some(last_date) = Self::last_record_date(data) {
            if date < last_date {
                warn!(%date, %last_date, "rejected back-dated record");
                return Err(CoreError::DateOrder { date, last_date });
            }
        }

        let magnitude = match mode {
            RecordMode::Add if diff <= 0 => {
                warn!(diff, "rejected earning without a balance increase");
                return Err(CoreError::NonPositiveEarning { diff });
            }
            RecordMode::Add => diff,
            spend if diff >= 0 => {
                warn!(diff, mode = %spend, "rejected spend without a balance decrease");
                return Err(CoreError::NonNegativeSpend { mode: spend, diff });
            }
            _ => diff.abs(),
        };

        // Keep creation order strict even when two writes share a millisecond.
        let timestamp = match Self::last_record_timestamp(data) {
            Some(last) => clock.now_millis().max(last.saturating_add(1)),
            None => clock.now_millis(),
        };

        let (primary, secondary) = GoalService::goals_for(date, &data.settings);
        let record = CoinRecord::new(date, timestamp, new_coin_amount, mode, magnitude)
            .with_goals(primary, secondary);
        debug!(id = %record.id, %date, %mode, magnitude, "appending record");

        let mut next = data.clone();
        next.records.push(record.clone());
        Ok((next, record))
    }

    /// Removes exactly the record with `id`, regardless of its position.
    pub fn remove_record(data: &AppData, id: &str) -> Result<(AppData, CoinRecord), CoreError> {
        let index = data
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))?;
        let mut next = data.clone();
        let removed = next.records.remove(index);
        Ok((next, removed))
    }
}
