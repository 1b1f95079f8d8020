//! Command grammar for the single text field.
//!
//! A line of input is split on `;` into tokens. The first token (or any
//! token without a leading `;`) is an implicit title filter. Tokens after a
//! `;` are classified by a single command letter; `l` and `d` are hard
//! token-shape rules that take no argument text.

pub const SEPARATOR: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Unknown,
    Title,
    Exe,
    Set,
    Get,
    Limit,
    Delete,
    Order,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub text: String,
}

impl Command {
    fn new(kind: CommandKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Splits one line of raw input into an ordered sequence of commands.
/// Blank input yields an empty sequence.
pub fn parse_cmds(input: &str) -> Vec<Command> {
    let mut cmds = Vec::new();
    for tok in tokenize(input) {
        if tok.is_empty() {
            continue;
        }
        let tok = tok.trim();
        let Some(rest) = tok.strip_prefix(SEPARATOR) else {
            cmds.push(Command::new(CommandKind::Title, tok));
            continue;
        };
        // Spaces between the separator and the command letter are allowed.
        let tok = rest.trim_start();
        if is_command_char(tok, "t", true) {
            cmds.push(Command::new(CommandKind::Title, get_text(tok)));
        } else if is_command_char(tok, "e", true) {
            cmds.push(Command::new(CommandKind::Exe, get_text(tok)));
        } else if is_command_char(tok, "g", true) {
            cmds.push(Command::new(CommandKind::Get, get_text(tok)));
        } else if is_command_char(tok, "s", true) {
            cmds.push(Command::new(CommandKind::Set, get_text(tok)));
        } else if is_command_char(tok, "o", true) {
            cmds.push(Command::new(CommandKind::Order, get_text(tok)));
        } else if is_command_char(tok, "l", false) {
            cmds.push(Command::new(CommandKind::Limit, ""));
        } else if is_command_char(tok, "d", false) {
            cmds.push(Command::new(CommandKind::Delete, ""));
        } else {
            cmds.push(Command::new(CommandKind::Unknown, get_text(tok)));
        }
    }
    cmds
}

/// Text after the first command letter, if any. Tokens are already trimmed
/// so the remainder carries no outer whitespace.
fn get_text(tok: &str) -> String {
    match tok.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.trim_start().to_string(),
        None => String::new(),
    }
}

/// A token matches a command letter when it is exactly that letter, or, when
/// argument text is allowed, the letter followed by a space. Anything longer
/// (`ge`, `get`, `title`) is not a command.
fn is_command_char(tok: &str, letter: &str, allow_text: bool) -> bool {
    if tok == letter {
        return true;
    }
    if allow_text {
        if let Some(rest) = tok.strip_prefix(letter) {
            return rest.starts_with(' ');
        }
    }
    false
}

/// Splits on the separator; every token after the first keeps its leading
/// separator so classification can tell implicit titles apart.
fn tokenize(input: &str) -> Vec<String> {
    let mut toks = Vec::new();
    let mut tok = String::new();
    for c in input.trim().chars() {
        if c == SEPARATOR && !tok.is_empty() {
            toks.push(std::mem::take(&mut tok));
        }
        tok.push(c);
    }
    toks.push(tok);
    toks
}
