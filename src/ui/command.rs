//! Command parsing for the TUI command line
//!
//! Parses user input in Command mode, supporting:
//! - `:q` or `:quit` → Quit
//! - `:h` or `:help` → Help
//! - `:wpm N`, `:words N` → settings
//! - `:ls`, `:r N`, `:d N`, `:clear` → history
//! - `@path` → read a text file, `@@` → read the clipboard
//! - anything else → synopsis for a new story

use crate::app::AppEvent;

/// Commands that can be parsed from command line input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Generate(String),
    LoadFile(String),
    LoadClipboard,
    SetWordsPerMinute(u32),
    SetNumberOfWords(u32),
    ListHistory,
    ReadHistory(u64),
    DeleteHistory(u64),
    ClearHistory,
    Unknown(String),
}

/// Parse command line input into a Command
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();

    if input.is_empty() {
        return Command::Unknown(input.to_string());
    }

    if let Some(cmd) = input.strip_prefix(':') {
        let mut parts = cmd.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();
        if parts.next().is_some() {
            return Command::Unknown(input.to_string());
        }

        match (name, arg) {
            ("q" | "quit", None) => Command::Quit,
            ("h" | "help", None) => Command::Help,
            ("ls" | "history", None) => Command::ListHistory,
            ("clear", None) => Command::ClearHistory,
            ("wpm", Some(n)) => n
                .parse()
                .map(Command::SetWordsPerMinute)
                .unwrap_or_else(|_| Command::Unknown(input.to_string())),
            ("words", Some(n)) => n
                .parse()
                .map(Command::SetNumberOfWords)
                .unwrap_or_else(|_| Command::Unknown(input.to_string())),
            ("r" | "read", Some(id)) => id
                .parse()
                .map(Command::ReadHistory)
                .unwrap_or_else(|_| Command::Unknown(input.to_string())),
            ("d" | "delete", Some(id)) => id
                .parse()
                .map(Command::DeleteHistory)
                .unwrap_or_else(|_| Command::Unknown(input.to_string())),
            _ => Command::Unknown(input.to_string()),
        }
    } else if let Some(rest) = input.strip_prefix('@') {
        let filename = rest.trim();
        if filename.is_empty() || filename == "@" {
            Command::LoadClipboard
        } else {
            Command::LoadFile(filename.to_string())
        }
    } else {
        Command::Generate(input.to_string())
    }
}

/// Convert a parsed command into an AppEvent
pub fn command_to_app_event(command: Command) -> AppEvent {
    match command {
        Command::Quit => AppEvent::Quit,
        Command::Help => AppEvent::Help,
        Command::Generate(synopsis) => AppEvent::Generate(synopsis),
        Command::LoadFile(path) => AppEvent::LoadFile(path),
        Command::LoadClipboard => AppEvent::LoadClipboard,
        Command::SetWordsPerMinute(wpm) => AppEvent::SetWordsPerMinute(wpm),
        Command::SetNumberOfWords(words) => AppEvent::SetNumberOfWords(words),
        Command::ListHistory => AppEvent::ShowHistory,
        Command::ReadHistory(id) => AppEvent::ReadHistory(id),
        Command::DeleteHistory(id) => AppEvent::DeleteHistory(id),
        Command::ClearHistory => AppEvent::ClearHistory,
        Command::Unknown(input) => AppEvent::InvalidCommand(input),
    }
}
