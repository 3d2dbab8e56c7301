//! Command catalog and dispatch.
//!
//! This module provides:
//! - [`Command`] descriptors and the [`CommandRegistry`] that holds them
//! - [`CommandContext`] handed to every handler
//! - [`CommandHandler`], which looks commands up and runs them
//!
//! # Architecture
//!
//! Handlers are plain functions, either synchronous or returning a boxed
//! future. User mistakes (bad path, missing operand) are printed by the
//! handler and reported through the exit code. `Err` is reserved for
//! failures inside a handler; the dispatcher turns it into one error line.

mod context;
mod filesystem;
mod fun;
mod handler;
mod portfolio;
mod system;

pub use context::{CommandContext, OnComplete};
pub use handler::{CommandHandler, EXIT_INTERRUPTED};

use std::collections::HashMap;

use crate::core::effects::LocalFuture;
use crate::core::error::CommandError;
use crate::models::Category;

/// Exit code of a command that did what was asked.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code of a command that reported a user error.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code on success, [`CommandError`] when the handler itself failed.
pub type CommandResult = Result<i32, CommandError>;

// =============================================================================
// Command Descriptor
// =============================================================================

/// How a command runs.
#[derive(Clone, Copy)]
pub enum Handler {
    Sync(fn(&CommandContext) -> CommandResult),
    Async(fn(CommandContext) -> LocalFuture<'static, CommandResult>),
}

/// One entry of the command catalog.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: Option<&'static str>,
    pub category: Category,
    pub handler: Handler,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Autocomplete
// =============================================================================

/// Outcome of completing a partial command name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutocompleteResult {
    /// Exactly one command matches.
    Single(String),
    /// Several commands match, in registry order.
    Multiple(Vec<String>),
    None,
}

impl AutocompleteResult {
    pub fn from_matches(mut matches: Vec<String>) -> Self {
        match matches.len() {
            0 => Self::None,
            1 => Self::Single(matches.remove(0)),
            _ => Self::Multiple(matches),
        }
    }
}

/// Something that can suggest command names for a partial input.
pub trait Completer {
    /// Names starting with the trimmed `partial`, in registry order. Blank
    /// input matches nothing.
    fn complete(&self, partial: &str) -> Vec<String>;
}

// =============================================================================
// Registry
// =============================================================================

/// Fixed set of commands, looked up by exact name.
pub struct CommandRegistry {
    commands: Vec<Command>,
    index: HashMap<&'static str, usize>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommandRegistry {
    /// Build a registry. A name given twice keeps its first definition.
    pub fn new(commands: Vec<Command>) -> Self {
        let mut kept = Vec::with_capacity(commands.len());
        let mut index = HashMap::with_capacity(commands.len());
        for command in commands {
            if index.contains_key(command.name) {
                log::warn!("duplicate command '{}' ignored", command.name);
                continue;
            }
            index.insert(command.name, kept.len());
            kept.push(command);
        }
        Self {
            commands: kept,
            index,
        }
    }

    /// A fresh registry holding the full built-in catalog.
    pub fn builtin() -> Self {
        let mut commands = portfolio::commands();
        commands.extend(filesystem::commands());
        commands.extend(system::commands());
        commands.extend(fun::commands());
        Self::new(commands)
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All commands in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name).collect()
    }

    pub fn by_category(&self, category: Category) -> Vec<&Command> {
        self.commands
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Classified completion of `partial`.
    pub fn autocomplete(&self, partial: &str) -> AutocompleteResult {
        AutocompleteResult::from_matches(self.complete(partial))
    }
}

impl Completer for CommandRegistry {
    fn complete(&self, partial: &str) -> Vec<String> {
        let partial = partial.trim();
        if partial.is_empty() {
            return Vec::new();
        }
        self.commands
            .iter()
            .filter(|c| c.name.starts_with(partial))
            .map(|c| c.name.to_string())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn noop(_: &CommandContext) -> CommandResult {
        Ok(EXIT_SUCCESS)
    }

    pub(crate) fn command(name: &'static str, category: Category) -> Command {
        Command {
            name,
            description: "test command",
            usage: None,
            category,
            handler: Handler::Sync(noop),
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let registry = CommandRegistry::builtin();
        for name in [
            "help", "about", "skills", "experience", "links", "ls", "cat", "cd", "pwd", "touch",
            "mkdir", "clear", "echo", "date", "whoami", "history", "alias", "unalias", "export",
            "unset", "env", "achievements", "fortune", "matrix", "hack", "coffee",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert_eq!(registry.len(), 26);
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = CommandRegistry::builtin();
        assert!(registry.get("ls").is_some());
        assert!(registry.get("l").is_none());
        assert!(registry.get("LS").is_none());
        assert!(registry.get("ls ").is_none());
    }

    #[test]
    fn test_by_category() {
        let registry = CommandRegistry::builtin();
        let portfolio: Vec<&str> = registry
            .by_category(Category::Portfolio)
            .iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(portfolio, vec!["about", "skills", "experience", "links"]);
        assert!(
            registry
                .by_category(Category::System)
                .iter()
                .all(|c| c.category == Category::System)
        );
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut first = command("x", Category::System);
        first.description = "first";
        let registry = CommandRegistry::new(vec![first, command("x", Category::Portfolio)]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").map(|c| c.description), Some("first"));
    }

    #[test]
    fn test_complete_prefix_in_registry_order() {
        let registry = CommandRegistry::new(vec![
            command("test", Category::System),
            command("tea", Category::System),
            command("echo", Category::System),
        ]);
        assert_eq!(registry.complete("te"), vec!["test", "tea"]);
        assert_eq!(registry.complete("  tes "), vec!["test"]);
        assert!(registry.complete("Te").is_empty());
        assert!(registry.complete("   ").is_empty());
    }

    #[test]
    fn test_autocomplete_classification() {
        let registry = CommandRegistry::builtin();
        assert_eq!(
            registry.autocomplete("wh"),
            AutocompleteResult::Single("whoami".to_string())
        );
        assert_eq!(
            registry.autocomplete("c"),
            AutocompleteResult::Multiple(vec![
                "cat".to_string(),
                "cd".to_string(),
                "clear".to_string(),
                "coffee".to_string(),
            ])
        );
        assert_eq!(registry.autocomplete("zz"), AutocompleteResult::None);
    }
}
