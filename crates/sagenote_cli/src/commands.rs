//! Line command parsing.
//!
//! # Responsibility
//! - Turn one input line into one front-end event.

use std::fmt::{Display, Formatter};

pub const USAGE: &str = "commands: new | list | show | select <id> | title <text> | content <text> | delete [id] | theme | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    List,
    Show,
    Select(String),
    Title(String),
    Content(String),
    Delete(Option<String>),
    Theme,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Unknown(String),
    MissingArgument(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(word) => write!(f, "unknown command `{word}`; {USAGE}"),
            Self::MissingArgument(command) => write!(f, "`{command}` needs an argument"),
        }
    }
}

/// Parses one line. Blank lines yield `Ok(None)`.
///
/// `title` and `content` take the rest of the line verbatim (an empty rest
/// clears the field); `\n` in `content` is expanded to a newline.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "new" => Command::New,
        "list" | "ls" => Command::List,
        "show" => Command::Show,
        "select" => Command::Select(required_arg("select", rest)?),
        "title" => Command::Title(rest.to_string()),
        "content" => Command::Content(rest.replace("\\n", "\n")),
        "delete" | "rm" => Command::Delete(optional_arg(rest)),
        "theme" => Command::Theme,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn optional_arg(rest: &str) -> Option<String> {
    let value = rest.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn required_arg(command: &'static str, rest: &str) -> Result<String, ParseError> {
    optional_arg(rest).ok_or(ParseError::MissingArgument(command))
}
