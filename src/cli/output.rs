use std::fmt;

use colored::Colorize;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

/// Turns colour on or off for the rest of the process.
pub fn set_color_enabled(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}

fn label(kind: MessageKind) -> Option<(&'static str, &'static str)> {
    match kind {
        MessageKind::Info => Some(("INFO", "[i]")),
        MessageKind::Success => Some(("SUCCESS", "[ok]")),
        MessageKind::Warning => Some(("WARNING", "[!]")),
        MessageKind::Error => Some(("ERROR", "[x]")),
        MessageKind::Hint => Some(("HINT", "[?]")),
        MessageKind::Section => None,
    }
}

pub(crate) fn format_message(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let base = match label(kind) {
        Some((name, icon)) => format!("{name}: {icon} {text}"),
        None => format!("=== {} ===", text.trim()),
    };
    match kind {
        MessageKind::Success => base.bright_green().to_string(),
        MessageKind::Warning => base.bright_yellow().to_string(),
        MessageKind::Error => base.bright_red().to_string(),
        MessageKind::Hint => base.bright_cyan().to_string(),
        MessageKind::Section => base.bold().to_string(),
        MessageKind::Info => base,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = format_message(kind, message);
    match kind {
        MessageKind::Section => println!("\n{formatted}"),
        MessageKind::Error | MessageKind::Warning => eprintln!("{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Left-aligned `label : value` line used by the status views.
pub fn field(label: &str, value: impl fmt::Display) {
    println!("  {label:<16}: {value}");
}

/// Renders rows under a header with columns padded to the widest cell.
pub fn table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let render = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<w$}", w = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    println!(
        "  {}",
        render(headers.iter().map(|h| h.to_string()).collect()).bold()
    );
    for row in rows {
        println!("  {}", render(row.clone()));
    }
}
