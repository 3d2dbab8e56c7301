//! Core runtime of the terminal.
//!
//! This module provides:
//! - [`parser`] and [`env`] for turning typed lines into commands
//! - [`VirtualFileSystem`] and [`ShellRuntime`], the per-session state
//! - [`CommandHandler`] and the built-in command catalog
//! - [`InputManager`], the line editor
//! - [`TerminalSession`], which wires all of the above to a [`Terminal`]

pub mod boot;
pub mod commands;
pub mod effects;
pub mod env;
pub mod error;
pub mod filesystem;
pub mod input;
pub mod parser;
pub mod session;
pub mod shell;
pub mod terminal;
pub mod transport;

pub use commands::{CommandHandler, CommandRegistry};
pub use filesystem::{LocalStorageStore, MemoryStore, VfsStore, VirtualFileSystem};
pub use input::{InputManager, KeyOutcome};
pub use session::{Phase, SessionBuilder, TerminalSession};
pub use shell::ShellRuntime;
pub use terminal::{ScreenBuffer, Terminal, Transcript};
