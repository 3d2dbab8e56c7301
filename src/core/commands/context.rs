use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::CommandRegistry;
use crate::config::DeviceProfile;
use crate::core::effects::TimeoutRegistry;
use crate::core::filesystem::VirtualFileSystem;
use crate::core::shell::ShellRuntime;
use crate::core::terminal::Terminal;

/// Completion callback shared by a handler and the dispatcher.
///
/// Firing is idempotent; the dispatcher fires it after every command, so a
/// handler that forgets is still released.
#[derive(Clone, Debug, Default)]
pub struct OnComplete(Rc<Cell<bool>>);

impl OnComplete {
    pub fn fire(&self) {
        self.0.set(true);
    }

    pub fn is_fired(&self) -> bool {
        self.0.get()
    }
}

/// Everything a command may touch.
///
/// The filesystem and the shell are optional; handlers that need one print
/// a "not available" line when it is missing.
#[derive(Clone)]
pub struct CommandContext {
    pub terminal: Rc<dyn Terminal>,
    pub args: Vec<String>,
    pub on_complete: OnComplete,
    pub registry: Rc<CommandRegistry>,
    pub timers: TimeoutRegistry,
    pub device: DeviceProfile,
    pub(super) fs: Option<Rc<RefCell<VirtualFileSystem>>>,
    pub(super) shell: Option<Rc<RefCell<ShellRuntime>>>,
}

impl CommandContext {
    pub fn filesystem(&self) -> Option<Rc<RefCell<VirtualFileSystem>>> {
        self.fs.clone()
    }

    pub fn shell(&self) -> Option<Rc<RefCell<ShellRuntime>>> {
        self.shell.clone()
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    pub fn writeln(&self, text: &str) {
        self.terminal.writeln(text);
    }
}
