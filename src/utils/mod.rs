//! Utility modules for formatting, escape codes, and browser access.
//!
//! Provides:
//! - [`RingBuffer`] - Bounded FIFO used by history and scrollback
//! - [`format`] - ISO-8601 timestamps and display formatting
//! - [`ansi`] - Colour constants, escape parsing, box drawing
//! - [`dom`] - localStorage and navigator access
//! - [`logger`] - `log` backend for the browser console

pub mod ansi;
pub mod dom;
pub mod format;
pub mod logger;
mod ring_buffer;

pub use ring_buffer::RingBuffer;
