use crate::cli::{
    context::{CommandError, CommandResult, ShellContext},
    help, output,
    registry::CommandEntry,
};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Coin Ledger {}", meta.version));
    output::field("Build hash", format!("{} ({})", meta.git_hash, meta.git_status));
    output::field("Built at", meta.timestamp);
    output::field("Target", meta.target);
    output::field("Profile", meta.profile);
    output::field("Rustc", meta.rustc);
    output::field("Config", context.config_manager.config_path().display());
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry.get(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
