//! Per-session shell state.
//!
//! [`ShellRuntime`] owns the environment, history, alias table and process
//! bookkeeping, and shares the filesystem with the command handlers.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::{self, BINARY_DIRS, DEFAULT_ALIASES};
use crate::core::env::Environment;
use crate::core::filesystem::{VirtualFileSystem, format_path};
use crate::core::parser::{self, ParsedCommand};
use crate::models::Process;
use crate::utils::RingBuffer;
use crate::utils::ansi::{BLUE, CYAN, GREEN, RESET};
use crate::utils::format::now_millis;

// =============================================================================
// History
// =============================================================================

/// Executed command lines, oldest first.
///
/// Blank lines are ignored and a line equal to the one right before it is
/// collapsed. Older duplicates are kept.
#[derive(Clone, Debug)]
pub struct CommandHistory {
    entries: RingBuffer<String>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(config::history::MAX_ENTRIES)
    }
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::new(capacity),
        }
    }

    /// Record a line. Returns `false` when it was skipped.
    pub fn add(&mut self, line: &str) -> bool {
        if line.trim().is_empty() || self.entries.last().is_some_and(|last| last == line) {
            return false;
        }
        self.entries.push(line.to_string());
        true
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.to_vec()
    }
}

// =============================================================================
// Shell Runtime
// =============================================================================

pub struct ShellRuntime {
    env: Environment,
    fs: Rc<RefCell<VirtualFileSystem>>,
    history: CommandHistory,
    aliases: BTreeMap<String, String>,
    processes: RingBuffer<Process>,
    next_pid: u32,
    last_exit_code: i32,
}

impl ShellRuntime {
    /// Create a runtime over `fs`. `PWD` starts at the filesystem's working
    /// directory.
    pub fn new(fs: Rc<RefCell<VirtualFileSystem>>) -> Self {
        let mut env = Environment::new();
        env.set_pwd(fs.borrow().current_path_string());

        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Self {
            env,
            fs,
            history: CommandHistory::default(),
            aliases,
            processes: RingBuffer::new(config::process::MAX_RECORDS),
            next_pid: 1,
            last_exit_code: 0,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn fs(&self) -> Rc<RefCell<VirtualFileSystem>> {
        Rc::clone(&self.fs)
    }

    pub fn last_exit_code(&self) -> i32 {
        self.last_exit_code
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Expand variables, split into words, then apply aliases.
    ///
    /// An alias contributes its own words first and the typed arguments
    /// follow. `raw` is always the line as typed.
    pub fn parse_command(&self, line: &str) -> ParsedCommand {
        let expanded = self.env.expand(line);
        let parsed = parser::parse(&expanded);

        match self.aliases.get(&parsed.command) {
            Some(value) => {
                let alias = parser::parse(value);
                let mut args = alias.args;
                args.extend(parsed.args);
                ParsedCommand {
                    command: alias.command,
                    args,
                    raw: line.trim().to_string(),
                }
            }
            None => ParsedCommand {
                raw: line.trim().to_string(),
                ..parsed
            },
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    pub fn add_to_history(&mut self, line: &str) -> bool {
        self.history.add(line)
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // =========================================================================
    // Processes
    // =========================================================================

    /// Record the start of a command and return its pid.
    pub fn create_process(&mut self, command: &str, args: &[String]) -> u32 {
        let pid = self.next_pid;
        self.next_pid += 1;
        self.processes.push(Process {
            pid,
            command: command.to_string(),
            args: args.to_vec(),
            started_at: now_millis(),
            exit_code: None,
        });
        pid
    }

    /// Record an exit code. Unknown pids are ignored.
    pub fn complete_process(&mut self, pid: u32, exit_code: i32) {
        if let Some(process) = self.processes.iter_mut().find(|p| p.pid == pid) {
            process.exit_code = Some(exit_code);
            self.last_exit_code = exit_code;
        } else {
            log::warn!("complete_process: no record for pid {}", pid);
        }
    }

    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    pub fn active_processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(|p| p.is_running())
    }

    // =========================================================================
    // Aliases
    // =========================================================================

    pub fn set_alias(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.aliases.insert(name.into(), value.into());
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn remove_alias(&mut self, name: &str) -> bool {
        self.aliases.remove(name).is_some()
    }

    /// All aliases, sorted by name.
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    // =========================================================================
    // Paths
    // =========================================================================

    /// Best-effort location of a command binary.
    ///
    /// Paths resolve syntactically. Bare names map into the first `PATH`
    /// entry that is a known binary directory; the filesystem is not
    /// consulted.
    pub fn resolve_command(&self, name: &str) -> Option<String> {
        if name.starts_with('/') {
            return Some(name.to_string());
        }
        if name.contains('/') {
            return Some(format_path(&self.fs.borrow().resolve_path(name)));
        }
        self.env
            .path()
            .into_iter()
            .find(|dir| BINARY_DIRS.contains(&dir.as_str()))
            .map(|dir| format!("{}/{}", dir, name))
    }

    /// Change the working directory and keep `PWD` in sync.
    pub fn change_directory(&mut self, segments: &[String]) -> bool {
        let mut fs = self.fs.borrow_mut();
        if !fs.set_current_path(segments) {
            return false;
        }
        self.env.set_pwd(fs.current_path_string());
        true
    }

    /// `user@host:path$ `, with the home directory shown as `~`.
    pub fn generate_prompt(&self) -> String {
        let host = self.env.get("HOSTNAME").unwrap_or(config::HOSTNAME);
        format!(
            "{GREEN}{}{RESET}@{CYAN}{}{RESET}:{BLUE}{}{RESET}$ ",
            self.env.user(),
            host,
            abbreviate_home(self.env.pwd(), self.env.home()),
        )
    }
}

fn abbreviate_home(path: &str, home: &str) -> String {
    if home.is_empty() || home == "/" {
        return path.to_string();
    }
    match path.strip_prefix(home) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("~{}", rest),
        _ => path.to_string(),
    }
}
