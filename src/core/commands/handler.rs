use std::cell::RefCell;
use std::rc::Rc;

use super::{CommandContext, CommandRegistry, Completer, EXIT_FAILURE, Handler, OnComplete};
use crate::config::{DeviceProfile, HELP_HINT};
use crate::core::effects::TimeoutRegistry;
use crate::core::error::CommandError;
use crate::core::filesystem::VirtualFileSystem;
use crate::core::shell::ShellRuntime;
use crate::core::terminal::Terminal;
use crate::utils::ansi::{BRIGHT_RED, GRAY, paint};

/// Exit code reported when a command's timers were cancelled under it.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Resolves command names against the registry and runs them.
pub struct CommandHandler {
    registry: Rc<CommandRegistry>,
    terminal: Rc<dyn Terminal>,
    fs: Option<Rc<RefCell<VirtualFileSystem>>>,
    shell: Option<Rc<RefCell<ShellRuntime>>>,
    timers: TimeoutRegistry,
    device: DeviceProfile,
}

impl CommandHandler {
    pub fn new(registry: Rc<CommandRegistry>, terminal: Rc<dyn Terminal>) -> Self {
        Self {
            registry,
            terminal,
            fs: None,
            shell: None,
            timers: TimeoutRegistry::default(),
            device: DeviceProfile::default(),
        }
    }

    pub fn with_filesystem(mut self, fs: Rc<RefCell<VirtualFileSystem>>) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn with_shell(mut self, shell: Rc<RefCell<ShellRuntime>>) -> Self {
        self.shell = Some(shell);
        self
    }

    pub fn with_timers(mut self, timers: TimeoutRegistry) -> Self {
        self.timers = timers;
        self
    }

    pub fn with_device(mut self, device: DeviceProfile) -> Self {
        self.device = device;
        self
    }

    pub fn registry(&self) -> &Rc<CommandRegistry> {
        &self.registry
    }

    pub fn autocomplete(&self, partial: &str) -> Vec<String> {
        self.registry.complete(partial)
    }

    fn context(&self, args: Vec<String>) -> CommandContext {
        CommandContext {
            terminal: Rc::clone(&self.terminal),
            args,
            on_complete: OnComplete::default(),
            registry: Rc::clone(&self.registry),
            timers: self.timers.clone(),
            device: self.device,
            fs: self.fs.clone(),
            shell: self.shell.clone(),
        }
    }

    /// Run a command and return its exit code.
    ///
    /// Unknown names and handler failures are reported on the terminal and
    /// yield [`EXIT_FAILURE`]; nothing propagates to the caller.
    pub async fn execute(&self, name: &str, args: Vec<String>) -> i32 {
        let Some(command) = self.registry.get(name).copied() else {
            self.terminal
                .writeln(&paint(BRIGHT_RED, &format!("Command not found: {}", name)));
            self.terminal.writeln(&paint(GRAY, HELP_HINT));
            return EXIT_FAILURE;
        };

        log::debug!("dispatch: {} {:?}", name, args);
        let ctx = self.context(args);
        let on_complete = ctx.on_complete.clone();

        let result = match command.handler {
            Handler::Sync(run) => run(&ctx),
            Handler::Async(run) => run(ctx).await,
        };
        on_complete.fire();

        match result {
            Ok(code) => code,
            Err(CommandError::Interrupted(e)) => {
                log::debug!("command {} interrupted: {}", name, e);
                EXIT_INTERRUPTED
            }
            Err(e) => {
                log::error!("error executing command {}: {}", name, e);
                self.terminal
                    .writeln(&paint(BRIGHT_RED, "Error executing command"));
                EXIT_FAILURE
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::core::effects::InstantSleeper;
    use crate::core::terminal::Transcript;

    /// A dispatcher wired to a seeded filesystem and a recording terminal.
    pub(crate) struct Harness {
        pub handler: CommandHandler,
        pub term: Rc<Transcript>,
        pub fs: Rc<RefCell<VirtualFileSystem>>,
        pub shell: Rc<RefCell<ShellRuntime>>,
        pub sleeper: Rc<InstantSleeper>,
    }

    impl Harness {
        pub(crate) fn new() -> Self {
            Self::with_registry(CommandRegistry::builtin())
        }

        pub(crate) fn with_registry(registry: CommandRegistry) -> Self {
            let term = Rc::new(Transcript::new());
            let fs = Rc::new(RefCell::new(VirtualFileSystem::seeded()));
            let shell = Rc::new(RefCell::new(ShellRuntime::new(Rc::clone(&fs))));
            let sleeper = Rc::new(InstantSleeper::new());
            let handler = CommandHandler::new(Rc::new(registry), term.clone())
                .with_filesystem(Rc::clone(&fs))
                .with_shell(Rc::clone(&shell))
                .with_timers(TimeoutRegistry::new(sleeper.clone()));
            Self {
                handler,
                term,
                fs,
                shell,
                sleeper,
            }
        }

        /// Run a command line through the shell's parser, like the session
        /// does, and return `(exit code, plain output)`.
        pub(crate) async fn run(&self, line: &str) -> (i32, String) {
            self.term.take();
            let parsed = self.shell.borrow().parse_command(line);
            let code = self.handler.execute(&parsed.command, parsed.args).await;
            (code, self.term.plain())
        }
    }
}
