//! Ledger entries and the balance-change categories they are filed under.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-declared category of a balance change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordMode {
    /// Earning: the balance must have grown.
    Add,
    Premium,
    Other,
    Serebo,
    Pick,
}

impl RecordMode {
    pub const ALL: [RecordMode; 5] = [
        RecordMode::Add,
        RecordMode::Premium,
        RecordMode::Other,
        RecordMode::Serebo,
        RecordMode::Pick,
    ];

    /// Spending modes require the balance to shrink.
    pub fn is_spend(self) -> bool {
        !matches!(self, RecordMode::Add)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordMode::Add => "add",
            RecordMode::Premium => "premium",
            RecordMode::Other => "other",
            RecordMode::Serebo => "serebo",
            RecordMode::Pick => "pick",
        }
    }
}

impl fmt::Display for RecordMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRecordMode(pub String);

impl fmt::Display for UnknownRecordMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown mode `{}` (expected add, premium, other, serebo or pick)",
            self.0
        )
    }
}

impl std::error::Error for UnknownRecordMode {}

impl FromStr for RecordMode {
    type Err = UnknownRecordMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "add" | "earn" => Ok(RecordMode::Add),
            "premium" | "premiumbox" => Ok(RecordMode::Premium),
            "other" => Ok(RecordMode::Other),
            "serebo" => Ok(RecordMode::Serebo),
            "pick" => Ok(RecordMode::Pick),
            other => Err(UnknownRecordMode(other.to_string())),
        }
    }
}

/// One logged balance snapshot and the categorized delta that produced it.
///
/// Exactly one of the five category slots is non-zero for records written by
/// the ledger writer. `serebo` and `pick` default to zero so exports made
/// before those categories existed still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CoinRecord {
    pub id: String,
    pub date: NaiveDate,
    /// Creation instant in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Absolute balance after this event.
    pub coin_amount: i64,
    pub earned: i64,
    pub premium_box: i64,
    pub other: i64,
    #[serde(default)]
    pub serebo: i64,
    #[serde(default)]
    pub pick: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_goal_at_that_day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_goal_at_that_day: Option<i64>,
}

impl CoinRecord {
    /// Builds a record with a fresh identifier, filing `magnitude` under `mode`.
    pub fn new(
        date: NaiveDate,
        timestamp: i64,
        coin_amount: i64,
        mode: RecordMode,
        magnitude: i64,
    ) -> Self {
        let mut record = Self {
            id: Uuid::new_v4().to_string(),
            date,
            timestamp,
            coin_amount,
            earned: 0,
            premium_box: 0,
            other: 0,
            serebo: 0,
            pick: 0,
            primary_goal_at_that_day: None,
            secondary_goal_at_that_day: None,
        };
        *record.slot_mut(mode) = magnitude;
        record
    }

    pub fn with_goals(mut self, primary: i64, secondary: i64) -> Self {
        self.primary_goal_at_that_day = Some(primary);
        self.secondary_goal_at_that_day = Some(secondary);
        self
    }

    pub fn amount_for(&self, mode: RecordMode) -> i64 {
        match mode {
            RecordMode::Add => self.earned,
            RecordMode::Premium => self.premium_box,
            RecordMode::Other => self.other,
            RecordMode::Serebo => self.serebo,
            RecordMode::Pick => self.pick,
        }
    }

    fn slot_mut(&mut self, mode: RecordMode) -> &mut i64 {
        match mode {
            RecordMode::Add => &mut self.earned,
            RecordMode::Premium => &mut self.premium_box,
            RecordMode::Other => &mut self.other,
            RecordMode::Serebo => &mut self.serebo,
            RecordMode::Pick => &mut self.pick,
        }
    }

    /// The first non-zero slot, if any.
    pub fn mode(&self) -> Option<RecordMode> {
        RecordMode::ALL
            .into_iter()
            .find(|mode| self.amount_for(*mode) != 0)
    }

    pub fn spent(&self) -> i64 {
        self.premium_box + self.other + self.serebo + self.pick
    }

    /// Signed balance change this record represents.
    pub fn net_change(&self) -> i64 {
        self.earned - self.spent()
    }

    /// Sort key for the ledger's logical order.
    pub fn order_key(&self) -> (NaiveDate, i64) {
        (self.date, self.timestamp)
    }
}
