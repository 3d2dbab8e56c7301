//! UI components built with Leptos.
//!
//! - [`terminal`] - The CRT screen and its keyboard wiring

pub mod terminal;

pub use terminal::{LiveScreen, TerminalView};
