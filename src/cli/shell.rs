use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::{
    context::{CliMode, LoopControl, ShellContext},
    output,
};
use crate::errors::CliError;

/// Set to any value to read commands from stdin without prompts.
pub const SCRIPT_ENV_VAR: &str = "COIN_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV_VAR).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.registry.completions())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    if !context.manager.is_initialized() {
        output::info("No ledger yet. Start with `init <amount>`.");
    }

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                run_line(context, trimmed);
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm("Exit shell?").unwrap_or(true) {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        run_line(context, trimmed);
    }
    Ok(())
}

fn run_line(context: &mut ShellContext, line: &str) {
    match context.process_line(line) {
        Ok(LoopControl::Continue) | Ok(LoopControl::Exit) => {}
        Err(err) => context.report_error(err),
    }
}

struct CommandHelper {
    commands: Vec<(String, Vec<String>)>,
}

impl CommandHelper {
    fn new(mut commands: Vec<(String, Vec<String>)>) -> Self {
        commands.sort_by(|a, b| a.0.cmp(&b.0));
        Self { commands }
    }

    fn candidates(&self, words: &[&str], needle: &str) -> Vec<String> {
        match words {
            [] => self
                .commands
                .iter()
                .map(|(name, _)| name.clone())
                .filter(|name| name.starts_with(needle))
                .collect(),
            [command] => self
                .commands
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(command))
                .map(|(_, subs)| {
                    subs.iter()
                        .filter(|sub| sub.starts_with(needle))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();
        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .candidates(&words, &needle)
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
