//! Import/export of the persisted blob and normalisation of older shapes.
//!
//! Three settings shapes have been written over time: a lone `dailyGoal`, a
//! `dailyGoals` weekday array, and the tiered `primary*`/`secondary*` fields.
//! All of them are folded into [`Settings`] here, once, at the load/import
//! boundary; nothing downstream looks at raw JSON.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use coin_domain::{AppData, CoinRecord, OcrCrop, Settings, WeekdayGoals};

use crate::CoreError;

const REQUIRED_STRING_FIELDS: [&str; 2] = ["id", "date"];
const REQUIRED_NUMBER_FIELDS: [&str; 5] = ["timestamp", "coinAmount", "earned", "premiumBox", "other"];
const OPTIONAL_NUMBER_FIELDS: [&str; 4] = [
    "serebo",
    "pick",
    "primaryGoalAtThatDay",
    "secondaryGoalAtThatDay",
];

pub struct MigrationService;

impl MigrationService {
    /// Pretty-printed JSON of the current shape.
    pub fn export_data(data: &AppData) -> Result<String, CoreError> {
        serde_json::to_string_pretty(data).map_err(|err| CoreError::Serde(err.to_string()))
    }

    /// Parses, validates and normalises a blob of any supported shape.
    ///
    /// All-or-nothing: the first problem aborts the whole import with a
    /// single [`CoreError::Schema`].
    pub fn import_data(json: &str) -> Result<AppData, CoreError> {
        let value: Value =
            serde_json::from_str(json).map_err(|err| CoreError::Schema(err.to_string()))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<AppData, CoreError> {
        let root = value
            .as_object()
            .ok_or_else(|| CoreError::Schema("top-level value is not an object".into()))?;

        let initial_coin_amount = root
            .get("initialCoinAmount")
            .and_then(whole_number)
            .ok_or_else(|| CoreError::Schema("initialCoinAmount is missing or invalid".into()))?;

        let raw_records = root
            .get("records")
            .and_then(Value::as_array)
            .ok_or_else(|| CoreError::Schema("records is missing or not an array".into()))?;

        let records = raw_records
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_record(index, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let settings = Self::settings_from_value(root.get("settings"));
        debug!(records = records.len(), "imported ledger blob");

        Ok(AppData {
            initial_coin_amount,
            records,
            settings,
        })
    }

    /// Reads whatever settings shape is present. Unusable fields are dropped.
    pub fn settings_from_value(raw: Option<&Value>) -> Settings {
        let Some(obj) = raw.and_then(Value::as_object) else {
            return Self::normalize_settings(Settings::default());
        };
        let settings = Settings {
            primary_goal: number_field(obj, "primaryGoal"),
            primary_goals: weekday_field(obj, "primaryGoals"),
            secondary_goal: number_field(obj, "secondaryGoal"),
            secondary_goals: weekday_field(obj, "secondaryGoals"),
            daily_goal: number_field(obj, "dailyGoal"),
            daily_goals: weekday_field(obj, "dailyGoals"),
            show_goal_line: bool_field(obj, "showGoalLine").unwrap_or_else(Settings::default_flag),
            show_debt: bool_field(obj, "showDebt").unwrap_or_else(Settings::default_flag),
            debt_reset_date: date_field(obj, "debtResetDate"),
            ocr_crop: obj
                .get("ocrCrop")
                .and_then(|crop| serde_json::from_value::<OcrCrop>(crop.clone()).ok()),
        };
        Self::normalize_settings(settings)
    }

    /// Back-fills tiered fields from legacy ones when no primary tier is
    /// configured, then mirrors the primary tier into the legacy fields.
    ///
    /// Resolution results are unchanged by this, and applying it twice is the
    /// same as applying it once.
    pub fn normalize_settings(mut settings: Settings) -> Settings {
        if settings.primary_goal.is_none() && settings.primary_goals.is_none() {
            settings.primary_goal = settings.daily_goal;
            settings.primary_goals = settings.daily_goals;
        }
        settings.daily_goal = settings.primary_goal;
        settings.daily_goals = settings.primary_goals;
        settings
    }
}

fn parse_record(index: usize, raw: &Value) -> Result<CoinRecord, CoreError> {
    let invalid = |detail: String| CoreError::Schema(format!("record {index} is invalid: {detail}"));
    let obj = raw
        .as_object()
        .ok_or_else(|| invalid("not an object".into()))?;

    for field in REQUIRED_STRING_FIELDS {
        if !obj.get(field).is_some_and(Value::is_string) {
            return Err(invalid(format!("`{field}` is missing or not a string")));
        }
    }
    for field in REQUIRED_NUMBER_FIELDS {
        if !obj.get(field).is_some_and(Value::is_number) {
            return Err(invalid(format!("`{field}` is missing or not a number")));
        }
    }

    let mut normalized = obj.clone();
    for field in REQUIRED_NUMBER_FIELDS
        .into_iter()
        .chain(OPTIONAL_NUMBER_FIELDS)
    {
        if let Some(value) = normalized.get_mut(field) {
            if value.is_null() {
                continue;
            }
            let whole = whole_number(value)
                .ok_or_else(|| invalid(format!("`{field}` is not a whole number")))?;
            *value = Value::from(whole);
        }
    }

    serde_json::from_value(Value::Object(normalized)).map_err(|err| invalid(err.to_string()))
}

fn whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|float| float.is_finite() && float.fract() == 0.0)
            // i64::MAX as f64 is 2^63, one past the range.
            .filter(|float| *float >= i64::MIN as f64 && *float < i64::MAX as f64)
            .map(|float| float as i64)
    })
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(whole_number)
}

fn weekday_field(obj: &Map<String, Value>, key: &str) -> Option<WeekdayGoals> {
    let entries = obj.get(key)?.as_array()?;
    if entries.len() != 7 {
        warn!(key, len = entries.len(), "ignoring weekday goals without 7 entries");
        return None;
    }
    let mut goals = [0i64; 7];
    for (slot, entry) in goals.iter_mut().zip(entries) {
        *slot = whole_number(entry).unwrap_or(0);
    }
    Some(goals)
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

fn date_field(obj: &Map<String, Value>, key: &str) -> Option<NaiveDate> {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coin_domain::RecordMode;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn current_shape() -> AppData {
        let mut data = AppData::new(1000);
        data.records.push(
            CoinRecord::new(date(2024, 1, 1), 10, 1500, RecordMode::Add, 500).with_goals(400, 500),
        );
        data.records.push(CoinRecord::new(
            date(2024, 1, 2),
            20,
            1400,
            RecordMode::Pick,
            100,
        ));
        data.settings = MigrationService::normalize_settings(Settings {
            primary_goals: Some([0, 100, 100, 100, 100, 100, 200]),
            secondary_goal: Some(400),
            show_debt: false,
            debt_reset_date: Some(date(2024, 1, 1)),
            ocr_crop: Some(OcrCrop {
                left: Some(10.0),
                top: None,
                right: Some(90.0),
                bottom: Some(50.5),
            }),
            ..Settings::default()
        });
        data
    }

    #[test]
    fn export_then_import_is_identity_for_current_shape() {
        let data = current_shape();
        let json = MigrationService::export_data(&data).unwrap();
        let imported = MigrationService::import_data(&json).unwrap();
        assert_eq!(imported, data);
        assert_eq!(MigrationService::export_data(&imported).unwrap(), json);
    }

    #[test]
    fn export_is_pretty_printed() {
        let json = MigrationService::export_data(&AppData::new(5)).unwrap();
        assert!(json.contains("\n  \"initialCoinAmount\": 5"));
    }

    #[test]
    fn oldest_shape_imports_with_defaults() {
        let raw = json!({
            "initialCoinAmount": 300,
            "records": [{
                "id": "1700000000000-abc",
                "date": "2023-11-14",
                "timestamp": 1700000000000i64,
                "coinAmount": 250,
                "earned": 0,
                "premiumBox": 50,
                "other": 0
            }],
            "settings": { "dailyGoal": 1200 }
        });
        let data = MigrationService::from_value(&raw).unwrap();
        let record = &data.records[0];
        assert_eq!(record.serebo, 0);
        assert_eq!(record.pick, 0);
        assert_eq!(record.primary_goal_at_that_day, None);
        assert_eq!(data.settings.primary_goal, Some(1200));
        assert_eq!(data.settings.daily_goal, Some(1200));
        assert!(data.settings.show_goal_line);
    }

    #[test]
    fn weekday_legacy_array_is_promoted_to_primary() {
        let raw = json!({
            "initialCoinAmount": 0,
            "records": [],
            "settings": { "dailyGoals": [7, 1, 2, 3, 4, 5, 6], "showGoalLine": false }
        });
        let settings = MigrationService::from_value(&raw).unwrap().settings;
        assert_eq!(settings.primary_goals, Some([7, 1, 2, 3, 4, 5, 6]));
        assert_eq!(settings.daily_goals, Some([7, 1, 2, 3, 4, 5, 6]));
        assert!(!settings.show_goal_line);
    }

    #[test]
    fn tiered_fields_are_mirrored_into_legacy_fields() {
        let settings = MigrationService::normalize_settings(Settings {
            primary_goal: Some(250),
            daily_goals: Some([1; 7]),
            ..Settings::default()
        });
        assert_eq!(settings.daily_goal, Some(250));
        assert_eq!(settings.daily_goals, None);
        assert_eq!(settings.primary_goals, None);
    }

    #[test]
    fn malformed_weekday_arrays_are_dropped() {
        let raw = json!({ "primaryGoals": [1, 2, 3], "secondaryGoals": [1, "x", 3, 4, 5, 6, 7] });
        let settings = MigrationService::settings_from_value(Some(&raw));
        assert_eq!(settings.primary_goals, None);
        assert_eq!(settings.secondary_goals, Some([1, 0, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn missing_initial_amount_is_rejected() {
        let err = MigrationService::import_data(r#"{"records": []}"#).expect_err("schema");
        assert!(matches!(err, CoreError::Schema(ref msg) if msg.contains("initialCoinAmount")));
    }

    #[test]
    fn non_array_records_are_rejected() {
        let err = MigrationService::import_data(r#"{"initialCoinAmount": 1, "records": {}}"#)
            .expect_err("schema");
        assert!(matches!(err, CoreError::Schema(ref msg) if msg.contains("records")));
    }

    #[test]
    fn record_missing_required_field_is_rejected() {
        let raw = json!({
            "initialCoinAmount": 0,
            "records": [{ "id": "a", "date": "2024-01-01", "timestamp": 1, "coinAmount": 1, "earned": 1, "other": 0 }]
        });
        let err = MigrationService::from_value(&raw).expect_err("schema");
        assert!(matches!(err, CoreError::Schema(ref msg) if msg.contains("premiumBox")));
    }

    #[test]
    fn record_with_bad_date_is_rejected() {
        let raw = json!({
            "initialCoinAmount": 0,
            "records": [{ "id": "a", "date": "01/02/2024", "timestamp": 1, "coinAmount": 1,
                          "earned": 1, "premiumBox": 0, "other": 0 }]
        });
        assert!(matches!(
            MigrationService::from_value(&raw),
            Err(CoreError::Schema(_))
        ));
    }

    #[test]
    fn whole_floats_are_accepted_as_integers() {
        let raw = json!({
            "initialCoinAmount": 10.0,
            "records": [{ "id": "a", "date": "2024-01-01", "timestamp": 1.0, "coinAmount": 12.0,
                          "earned": 2.0, "premiumBox": 0, "other": 0 }]
        });
        let data = MigrationService::from_value(&raw).unwrap();
        assert_eq!(data.initial_coin_amount, 10);
        assert_eq!(data.records[0].earned, 2);
    }

    #[test]
    fn out_of_range_floats_are_rejected() {
        let raw = json!({ "initialCoinAmount": 1e300, "records": [] });
        assert!(matches!(
            MigrationService::from_value(&raw),
            Err(CoreError::Schema(_))
        ));

        let raw = json!({
            "initialCoinAmount": 0,
            "records": [{ "id": "a", "date": "2024-01-01", "timestamp": 9.3e18, "coinAmount": 1,
                          "earned": 1, "premiumBox": 0, "other": 0 }]
        });
        let err = MigrationService::from_value(&raw).expect_err("timestamp overflows i64");
        assert!(err.to_string().contains("`timestamp` is not a whole number"));
    }

    #[test]
    fn invalid_json_is_a_schema_error() {
        assert!(matches!(
            MigrationService::import_data("{not json"),
            Err(CoreError::Schema(_))
        ));
    }
}
