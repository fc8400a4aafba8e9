use std::collections::HashMap;

use crate::cli::context::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    /// First-argument keywords offered by tab completion.
    pub subcommands: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            subcommands: &[],
            handler,
        }
    }

    pub fn with_subcommands(mut self, subcommands: &'static [&'static str]) -> Self {
        self.subcommands = subcommands;
        self
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    aliases: HashMap<&'static str, &'static str>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn alias(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.insert(alias, target);
    }

    /// Looks a command up by name or alias.
    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        let name = self.aliases.get(name).copied().unwrap_or(name);
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    /// Completion candidates: command names, then `command sub` pairs.
    pub fn completions(&self) -> Vec<(String, Vec<String>)> {
        self.list()
            .into_iter()
            .map(|entry| {
                (
                    entry.name.to_string(),
                    entry.subcommands.iter().map(|sub| sub.to_string()).collect(),
                )
            })
            .collect()
    }
}
