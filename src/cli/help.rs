use crate::cli::{
    output,
    registry::{CommandEntry, CommandRegistry},
};

pub fn print_overview(registry: &CommandRegistry) {
    output::section("Commands");
    let rows: Vec<Vec<String>> = registry
        .list()
        .into_iter()
        .map(|entry| vec![entry.name.to_string(), entry.description.to_string()])
        .collect();
    output::table(&["Command", "Description"], &rows);
    output::hint("Type `help <command>` for usage.");
}

pub fn print_command(entry: &CommandEntry) {
    output::section(entry.name);
    output::field("Description", entry.description);
    output::field("Usage", entry.usage);
    if !entry.subcommands.is_empty() {
        output::field("Options", entry.subcommands.join(", "));
    }
}
