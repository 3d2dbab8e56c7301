mod terminal;

pub use terminal::{LiveScreen, TerminalView};
