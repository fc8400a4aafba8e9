use chrono::Datelike;

use coin_core::GoalService;
use coin_domain::{GoalTier, Settings, WeekdayGoals};

use crate::cli::{
    commands::{parse_amount, parse_date, usage},
    context::{CommandError, CommandResult, ShellContext},
    output,
    registry::CommandEntry,
};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "debt",
            "Show accrued debt or restart accrual from today",
            "debt [reset]",
            cmd_debt,
        )
        .with_subcommands(&["reset"]),
        CommandEntry::new(
            "goal",
            "Show or configure the daily goals",
            "goal show [YYYY-MM-DD] | goal set <primary|secondary> <amount|7 comma values> | goal clear <primary|secondary>",
            cmd_goal,
        )
        .with_subcommands(&["show", "set", "clear"]),
        CommandEntry::new(
            "settings",
            "Show settings or toggle debt and goal-line display",
            "settings [debt|goal-line <on|off>]",
            cmd_settings,
        )
        .with_subcommands(&["debt", "goal-line"]),
    ]
}

fn cmd_debt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => show_debt(context),
        ["reset"] => {
            if !context.confirm("Restart debt accrual from today?")? {
                output::info("Debt reset cancelled.");
                return Ok(());
            }
            let date = context.manager.reset_debt()?;
            output::success(format!("Debt accrual restarts from {date}."));
            Ok(())
        }
        _ => Err(usage("debt [reset]")),
    }
}

fn show_debt(context: &ShellContext) -> CommandResult {
    let manager = &context.manager;
    output::section("Debt");
    output::field("Current debt", manager.debt()?);
    if let Some(reset) = manager.settings()?.debt_reset_date {
        output::field("Counting since", reset);
    }
    let timeline = manager.debt_timeline()?;
    let start = timeline.len().saturating_sub(context.config.recent_days as usize);
    let rows: Vec<Vec<String>> = timeline[start..]
        .iter()
        .map(|day| {
            vec![
                day.date.to_string(),
                day.earned.to_string(),
                day.goal.to_string(),
                day.debt_after.to_string(),
            ]
        })
        .collect();
    if !rows.is_empty() {
        output::table(&["Date", "Earned", "Goal", "Debt"], &rows);
    }
    Ok(())
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show_goals(context, None),
        ["show", date] => show_goals(context, Some(*date)),
        ["set", tier, value] => {
            let tier = parse_tier(tier)?;
            let mut settings = context.manager.settings()?.clone();
            match parse_goal_value(value)? {
                GoalValue::Flat(amount) => settings.set_flat_goal(tier, amount),
                GoalValue::Weekday(goals) => settings.set_weekday_goals(tier, goals),
            }
            context.manager.save_settings(settings)?;
            output::success(format!("Updated the {tier} goal."));
            Ok(())
        }
        ["clear", tier] => {
            let tier = parse_tier(tier)?;
            let mut settings = context.manager.settings()?.clone();
            settings.clear_goal(tier);
            context.manager.save_settings(settings)?;
            output::success(format!("Cleared the {tier} goal."));
            Ok(())
        }
        _ => Err(usage(
            "goal show [YYYY-MM-DD] | goal set <tier> <value> | goal clear <tier>",
        )),
    }
}

fn show_goals(context: &ShellContext, date: Option<&str>) -> CommandResult {
    let date = match date {
        Some(raw) => parse_date(raw)?,
        None => context.manager.today(),
    };
    let settings = context.manager.settings()?;
    let (primary, secondary) = GoalService::goals_for(date, settings);
    let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];

    output::section(format!("Goals for {date} ({weekday})"));
    output::field("Primary", primary);
    output::field("Secondary", secondary);
    output::field("Configured", describe_tier(settings, GoalTier::Primary));
    output::field("", describe_tier(settings, GoalTier::Secondary));
    Ok(())
}

fn describe_tier(settings: &Settings, tier: GoalTier) -> String {
    let (flat, weekly) = match tier {
        GoalTier::Primary => (settings.primary_goal, settings.primary_goals),
        GoalTier::Secondary => (settings.secondary_goal, settings.secondary_goals),
    };
    match (weekly, flat) {
        (Some(goals), _) => {
            let days: Vec<String> = WEEKDAYS
                .iter()
                .zip(goals)
                .map(|(day, goal)| format!("{day} {goal}"))
                .collect();
            format!("{tier}: {}", days.join(", "))
        }
        (None, Some(goal)) => format!("{tier}: {goal} every day"),
        (None, None) if tier == GoalTier::Secondary => format!("{tier}: primary + 100"),
        (None, None) => format!("{tier}: not set"),
    }
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let settings = context.manager.settings()?;
            output::section("Settings");
            output::field("Show debt", on_off(settings.show_debt));
            output::field("Show goal line", on_off(settings.show_goal_line));
            output::field(
                "Debt reset date",
                settings
                    .debt_reset_date
                    .map(|date| date.to_string())
                    .unwrap_or_else(|| "never".into()),
            );
            output::field("Primary", describe_tier(settings, GoalTier::Primary));
            output::field("Secondary", describe_tier(settings, GoalTier::Secondary));
            output::field("Data file", context.storage.path().display());
            Ok(())
        }
        [key, value] => {
            let enabled = parse_switch(value)?;
            let mut settings = context.manager.settings()?.clone();
            match key.to_ascii_lowercase().as_str() {
                "debt" => settings.show_debt = enabled,
                "goal-line" => settings.show_goal_line = enabled,
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown setting `{other}` (expected debt or goal-line)"
                    )))
                }
            }
            context.manager.save_settings(settings)?;
            output::success(format!("Set {key} to {}.", on_off(enabled)));
            Ok(())
        }
        _ => Err(usage("settings [debt|goal-line <on|off>]")),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn parse_switch(input: &str) -> Result<bool, CommandError> {
    match input.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{input}`"
        ))),
    }
}

fn parse_tier(input: &str) -> Result<GoalTier, CommandError> {
    input.parse().map_err(CommandError::InvalidArguments)
}

#[derive(Debug, PartialEq, Eq)]
enum GoalValue {
    Flat(i64),
    Weekday(WeekdayGoals),
}

/// A single amount, or seven comma-separated amounts starting on Sunday.
fn parse_goal_value(input: &str) -> Result<GoalValue, CommandError> {
    if !input.contains(',') {
        return Ok(GoalValue::Flat(parse_amount(input)?));
    }
    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() != 7 {
        return Err(CommandError::InvalidArguments(format!(
            "expected 7 weekday goals (Sun..Sat), got {}",
            parts.len()
        )));
    }
    let mut goals = [0i64; 7];
    for (slot, part) in goals.iter_mut().zip(parts) {
        *slot = parse_amount(part)?;
    }
    Ok(GoalValue::Weekday(goals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_values_parse_flat_and_weekday_forms() {
        assert_eq!(parse_goal_value("500").unwrap(), GoalValue::Flat(500));
        assert_eq!(
            parse_goal_value("0,100,100,100,100,100,200").unwrap(),
            GoalValue::Weekday([0, 100, 100, 100, 100, 100, 200])
        );
        assert!(parse_goal_value("1,2,3").is_err());
        assert!(parse_goal_value("1,2,x,4,5,6,7").is_err());
    }

    #[test]
    fn secondary_without_config_describes_fallback() {
        let settings = Settings::default();
        assert_eq!(
            describe_tier(&settings, GoalTier::Secondary),
            "secondary: primary + 100"
        );
        let mut settings = Settings::default();
        settings.set_weekday_goals(GoalTier::Primary, [1, 2, 3, 4, 5, 6, 7]);
        assert!(describe_tier(&settings, GoalTier::Primary).starts_with("primary: Sun 1, Mon 2"));
    }
}
