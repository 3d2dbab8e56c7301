//! Command line parser.
//!
//! Turns a raw line into a command name plus arguments. Pipes, redirects and
//! `&&`/`||` chains are only detected, never executed.

mod lexer;

pub use lexer::Lexer;

// =============================================================================
// Parsed Command
// =============================================================================

/// A command line split into its name and arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Empty when the line had no words.
    pub command: String,
    pub args: Vec<String>,
    /// The line as typed (trimmed), kept for history.
    pub raw: String,
}

impl ParsedCommand {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a command line.
///
/// Blank input yields an empty command with no arguments and an empty `raw`.
pub fn parse(line: &str) -> ParsedCommand {
    let trimmed = line.trim();
    let mut words = Lexer::new(trimmed);

    match words.next() {
        Some(command) => ParsedCommand {
            command,
            args: words.collect(),
            raw: trimmed.to_string(),
        },
        None => ParsedCommand {
            raw: trimmed.to_string(),
            ..ParsedCommand::default()
        },
    }
}

// =============================================================================
// Syntax Detectors
// =============================================================================

/// True if the line contains a `|`.
pub fn has_pipes(line: &str) -> bool {
    line.contains('|')
}

/// True if the line contains `<` or `>`.
pub fn has_redirects(line: &str) -> bool {
    line.contains(['<', '>'])
}

/// True if the line contains `&&` or `||`.
pub fn has_chaining(line: &str) -> bool {
    line.contains("&&") || line.contains("||")
}
