use std::collections::HashSet;

use coin_domain::AppData;

use crate::CoreError;

/// Abstraction over persistence backends holding the single ledger blob.
pub trait AppDataStorage: Send + Sync {
    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<AppData>, CoreError>;
    fn save(&self, data: &AppData) -> Result<(), CoreError>;
}

/// Detects anomalies an external edit or a faulty import may leave behind.
///
/// None of these block loading; the ledger stays usable and callers decide
/// whether to surface them.
pub fn ledger_warnings(data: &AppData) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    for record in &data.records {
        if !seen.insert(record.id.as_str()) {
            warnings.push(format!("record id {} appears more than once", record.id));
        }
        if record.spent() > 0 && record.earned > 0 {
            warnings.push(format!(
                "record {} carries both an earning and a spend",
                record.id
            ));
        }
        if record.coin_amount < 0 {
            warnings.push(format!("record {} has a negative balance", record.id));
        }
    }

    let sorted = data.sorted_records();
    for pair in sorted.windows(2) {
        if pair[1].timestamp == pair[0].timestamp {
            warnings.push(format!(
                "records {} and {} share timestamp {}",
                pair[0].id, pair[1].id, pair[0].timestamp
            ));
        }
    }
    warnings
}
