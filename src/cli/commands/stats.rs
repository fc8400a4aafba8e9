use coin_core::MAX_RECENT_DAYS;
use coin_domain::PeriodStats;

use crate::cli::{
    commands::{parse_amount, usage},
    context::{CommandError, CommandResult, ShellContext},
    output,
    registry::CommandEntry,
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "stats",
        "Show earning and spending summaries",
        "stats [totals|weekly|monthly|usage|recent [days]]",
        cmd_stats,
    )
    .with_subcommands(&["totals", "weekly", "monthly", "usage", "recent"])]
}

fn cmd_stats(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["totals"] => show_totals(context),
        ["weekly"] => show_periods("Weekly", &context.manager.weekly_stats()?),
        ["monthly"] => show_periods("Monthly", &context.manager.monthly_stats()?),
        ["usage"] => show_usage(context),
        ["recent"] => {
            let days = context.config.recent_days.clamp(1, MAX_RECENT_DAYS);
            show_recent(context, days)
        }
        ["recent", days] => {
            let days = parse_recent_days(days)?;
            show_recent(context, days)
        }
        _ => Err(usage("stats [totals|weekly|monthly|usage|recent [days]]")),
    }
}

fn parse_recent_days(input: &str) -> Result<u32, CommandError> {
    u32::try_from(parse_amount(input)?)
        .ok()
        .filter(|days| (1..=MAX_RECENT_DAYS).contains(days))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "days must be between 1 and {MAX_RECENT_DAYS}"
            ))
        })
}

fn show_totals(context: &ShellContext) -> CommandResult {
    let totals = context.manager.totals()?;
    output::section("Totals");
    output::field("Earned", totals.earned);
    output::field("Premium box", totals.premium_box);
    output::field("Serebo", totals.serebo);
    output::field("Pick", totals.pick);
    output::field("Other", totals.other);
    output::field("Spent", totals.spent());
    Ok(())
}

fn show_periods(title: &str, periods: &[PeriodStats]) -> CommandResult {
    output::section(title);
    if periods.is_empty() {
        output::info("No records yet.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = periods
        .iter()
        .map(|period| {
            vec![
                period.label.clone(),
                period.totals.earned.to_string(),
                period.totals.premium_box.to_string(),
                period.totals.serebo.to_string(),
                period.totals.pick.to_string(),
                period.totals.other.to_string(),
            ]
        })
        .collect();
    output::table(
        &["Period", "Earned", "Premium", "Serebo", "Pick", "Other"],
        &rows,
    );
    Ok(())
}

fn show_usage(context: &ShellContext) -> CommandResult {
    let breakdown = context.manager.usage_breakdown()?;
    output::section("Usage");
    if breakdown.total == 0 {
        output::info("Nothing spent yet.");
        return Ok(());
    }
    for (label, amount) in [
        ("Premium box", breakdown.premium),
        ("Serebo", breakdown.serebo),
        ("Pick", breakdown.pick),
        ("Other", breakdown.other),
    ] {
        let share = breakdown.percent(amount).unwrap_or(0.0);
        output::field(label, format!("{amount} ({share:.1}%)"));
    }
    output::field("Total", breakdown.total);
    Ok(())
}

fn show_recent(context: &ShellContext, days: u32) -> CommandResult {
    let recent = context.manager.recent_days(days)?;
    output::section(format!("Last {days} days"));
    let rows: Vec<Vec<String>> = recent
        .iter()
        .map(|day| {
            vec![
                day.date.to_string(),
                day.earned.to_string(),
                day.goal.to_string(),
                if day.met() { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    output::table(&["Date", "Earned", "Goal", "Met"], &rows);
    Ok(())
}
