//! Shared runtime state for the shell plus dispatch and error reporting.

use std::io;

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;

use coin_config::{app_home, Config, ConfigManager};
use coin_core::{CoreError, SystemClock};
use coin_storage_json::JsonAppDataStorage;

use crate::{
    cli::{commands, io as cli_io, output, registry::CommandRegistry},
    errors::{CliError, WalletError},
    manager::WalletManager,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Wallet(WalletError::from(err))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Wallet(inner) => CliError::Wallet(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

/// One shell run. The wallet's undo stack lives exactly as long as this.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: WalletManager,
    pub storage: JsonAppDataStorage,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Builds the context from the application directory and its config.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let home = app_home();
        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled);

        let storage = JsonAppDataStorage::with_retention(
            config.resolve_data_file(&home),
            config.effective_retention(),
        )?;
        let manager = WalletManager::open(Box::new(storage.clone()), Box::new(SystemClock))?;
        Ok(Self::with_parts(
            mode,
            manager,
            storage,
            config,
            config_manager,
        ))
    }

    pub fn with_parts(
        mode: CliMode,
        manager: WalletManager,
        storage: JsonAppDataStorage,
        config: Config,
        config_manager: ConfigManager,
    ) -> Self {
        Self {
            mode,
            registry: commands::registry(),
            manager,
            storage,
            config,
            config_manager,
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        }
    }

    pub(crate) fn prompt(&self) -> String {
        match self.manager.last_coin_amount() {
            Ok(balance) => format!("coin [{balance}]> "),
            Err(_) => "coin> ".to_string(),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes and runs one line. Used by both loops and by tests.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };

        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = closest_command(self.registry.names(), input) {
            output::hint(format!("Did you mean `{best}`?"));
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, true)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Wallet(WalletError::NotInitialized) => {
                output::error(WalletError::NotInitialized);
                output::hint("Try `init 1000` to start tracking.");
            }
            other => output::error(other),
        }
    }
}

/// Registered name within edit distance 3 of `input`, if any.
pub(crate) fn closest_command<'a>(
    names: impl Iterator<Item = &'a str>,
    input: &str,
) -> Option<&'a str> {
    let input = input.to_lowercase();
    names
        .map(|name| (levenshtein(name, &input), name))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}
