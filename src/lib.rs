//! A CRT-styled portfolio terminal for the browser.
//!
//! The [`core`] runtime (virtual filesystem, shell, line editor, commands)
//! is target independent and writes through the [`crate::core::Terminal`] trait;
//! [`app`] and [`components`] put it on a page with Leptos.

pub mod app;
pub mod components;
pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use app::App;
pub use crate::core::{Phase, TerminalSession};
