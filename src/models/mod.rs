//! Data models and types for the terminal.
//!
//! Contains domain types for:
//! - [`VirtualNode`], [`VirtualFile`], [`VirtualDirectory`] - Virtual filesystem tree
//! - [`Process`] - Command execution records
//! - [`Category`] - Command groups
//! - [`KeyInput`] - Decoded keystrokes
//! - [`Cell`], [`Style`], [`Color`], [`Span`] - Rendered screen contents

mod category;
pub mod key;
mod node;
mod process;
mod screen;

pub use category::Category;
pub use key::KeyInput;
pub use node::{
    DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS, VirtualDirectory, VirtualFile, VirtualNode,
};
pub use process::Process;
pub use screen::{Cell, Color, Span, Style};
