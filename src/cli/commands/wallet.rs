use coin_domain::{CoinRecord, RecordMode};

use crate::cli::{
    commands::{parse_amount, parse_date, usage},
    context::{CommandError, CommandResult, ShellContext},
    output,
    registry::CommandEntry,
};

const MODES: &[&str] = &["add", "earn", "premium", "other", "serebo", "pick"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "init",
            "Start a ledger from the current coin balance",
            "init <amount>",
            cmd_init,
        ),
        CommandEntry::new(
            "add",
            "Record a new balance reading",
            "add <add|premium|other|serebo|pick> <new balance> [YYYY-MM-DD]",
            cmd_add,
        )
        .with_subcommands(MODES),
        CommandEntry::new(
            "undo",
            "Remove the newest record written in this session",
            "undo",
            cmd_undo,
        ),
        CommandEntry::new(
            "status",
            "Show balance, today's goals and debt",
            "status",
            cmd_status,
        ),
    ]
}

fn describe(record: &CoinRecord) -> String {
    match record.mode() {
        Some(mode) => format!(
            "{mode} of {} on {}",
            record.amount_for(mode),
            record.date
        ),
        None => format!("record on {}", record.date),
    }
}

fn cmd_init(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [amount] = args else {
        return Err(usage("init <amount>"));
    };
    let amount = parse_amount(amount)?;
    context.manager.initialize(amount)?;
    output::success(format!("Wallet initialized with {amount} coins."));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (mode, amount, date) = match args {
        [mode, amount] => (mode, amount, None),
        [mode, amount, date] => (mode, amount, Some(parse_date(date)?)),
        _ => return Err(usage("add <mode> <new balance> [YYYY-MM-DD]")),
    };
    let mode: RecordMode = mode
        .parse()
        .map_err(|err: coin_domain::UnknownRecordMode| {
            CommandError::InvalidArguments(err.to_string())
        })?;
    let amount = parse_amount(amount)?;

    let record = context.manager.add_record(date, amount, mode)?;
    output::success(format!(
        "Recorded {}. Balance: {}.",
        describe(&record),
        record.coin_amount
    ));
    Ok(())
}

fn cmd_undo(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage("undo"));
    }
    if let Some(pending) = context.manager.pending_undo() {
        let prompt = format!("Undo {}?", describe(pending));
        if !context.confirm(&prompt)? {
            output::info("Undo cancelled.");
            return Ok(());
        }
    }
    let removed = context.manager.undo()?;
    output::success(format!(
        "Undid {}. Balance: {}.",
        describe(&removed),
        context.manager.last_coin_amount()?
    ));
    Ok(())
}

fn cmd_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage("status"));
    }
    let manager = &context.manager;
    let progress = manager.today_progress()?;
    let settings = manager.settings()?;

    output::section(format!("Status {}", progress.date));
    output::field("Balance", progress.current_coins);
    output::field(
        "Earned today",
        format!("{} / {}", progress.earned, progress.primary_goal),
    );
    output::field(
        "Remaining",
        format!(
            "{} (secondary {})",
            progress.remaining_primary, progress.remaining_secondary
        ),
    );
    output::field("Target balance", progress.target_total);
    if settings.show_debt {
        output::field("Debt", manager.debt()?);
    }
    output::field(
        "Undo available",
        if manager.has_undo() { "yes" } else { "no" },
    );
    Ok(())
}
