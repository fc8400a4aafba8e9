mod data;
mod goals;
mod stats;
mod system;
mod wallet;

use chrono::NaiveDate;

use crate::cli::{context::CommandError, registry::CommandRegistry};

/// Every shell command in help order.
pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for entry in wallet::definitions()
        .into_iter()
        .chain(goals::definitions())
        .chain(stats::definitions())
        .chain(data::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
    registry.alias("quit", "exit");
    registry
}

pub(crate) fn parse_amount(input: &str) -> Result<i64, CommandError> {
    input
        .trim()
        .replace('_', "")
        .parse::<i64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{input}`")))
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{input}` (use YYYY-MM-DD)"))
    })
}

pub(crate) fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_accept_digit_separators() {
        assert_eq!(parse_amount("12_500").unwrap(), 12_500);
        assert_eq!(parse_amount(" -3 ").unwrap(), -3);
        assert!(parse_amount("12.5").is_err());
    }

    #[test]
    fn dates_use_iso_format() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("29/02/2024").is_err());
    }

    #[test]
    fn registry_resolves_aliases() {
        let registry = registry();
        assert_eq!(registry.get("quit").map(|entry| entry.name), Some("exit"));
        assert!(registry.get("add").is_some());
    }
}
