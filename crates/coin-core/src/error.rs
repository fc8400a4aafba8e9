use chrono::NaiveDate;
use coin_domain::RecordMode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("date {date} is earlier than the latest record's date {last_date}")]
    DateOrder { date: NaiveDate, last_date: NaiveDate },
    #[error("earning requires the balance to increase (change was {diff})")]
    NonPositiveEarning { diff: i64 },
    #[error("spending as `{mode}` requires the balance to decrease (change was {diff})")]
    NonNegativeSpend { mode: RecordMode, diff: i64 },
    #[error("nothing to undo in this session")]
    NoSessionUndo,
    #[error("Record not found: {0}")]
    RecordNotFound(String),
    #[error("Invalid data format: {0}")]
    Schema(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// True for rejections caused by user input rather than by the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::DateOrder { .. }
                | CoreError::NonPositiveEarning { .. }
                | CoreError::NonNegativeSpend { .. }
                | CoreError::NoSessionUndo
                | CoreError::Schema(_)
        )
    }
}
