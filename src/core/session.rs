//! Session orchestration.
//!
//! A [`TerminalSession`] is one page load worth of terminal: the filesystem,
//! the shell runtime, the dispatcher and the line editor, plus the boot
//! screen in front of them and an optional remote shell behind them.
//!
//! # Phases
//!
//! ```text
//! Booting ──(boot finished | any key)──> Interactive <──(attach/detach)──> Passthrough
//! ```
//!
//! All raw input enters through [`TerminalSession::handle_data`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::DeviceProfile;
use crate::core::boot::{self, BootSequence};
use crate::core::commands::{CommandHandler, CommandRegistry};
use crate::core::effects::TimeoutRegistry;
use crate::core::filesystem::{VfsStore, VirtualFileSystem};
use crate::core::input::{InputManager, KeyOutcome};
use crate::core::parser::ParsedCommand;
use crate::core::shell::ShellRuntime;
use crate::core::terminal::Terminal;
use crate::core::transport::{Transport, TransportMessage};
use crate::models::key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Boot messages are playing. Any key skips them.
    Booting,
    /// Keys go to the line editor.
    Interactive,
    /// Keys go to the attached transport.
    Passthrough,
}

// =============================================================================
// Builder
// =============================================================================

/// Assembles a [`TerminalSession`].
pub struct SessionBuilder {
    terminal: Rc<dyn Terminal>,
    device: DeviceProfile,
    timers: Option<TimeoutRegistry>,
    store: Option<Rc<dyn VfsStore>>,
    boot: BootSequence,
}

impl SessionBuilder {
    pub fn new(terminal: Rc<dyn Terminal>) -> Self {
        Self {
            terminal,
            device: DeviceProfile::default(),
            timers: None,
            store: None,
            boot: BootSequence::default(),
        }
    }

    pub fn device(mut self, device: DeviceProfile) -> Self {
        self.device = device;
        self
    }

    pub fn timers(mut self, timers: TimeoutRegistry) -> Self {
        self.timers = Some(timers);
        self
    }

    /// Restore the filesystem from `store` now and save to it after every
    /// command.
    pub fn store(mut self, store: Rc<dyn VfsStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn boot(mut self, boot: BootSequence) -> Self {
        self.boot = boot;
        self
    }

    pub fn build(self) -> TerminalSession {
        let fs = Rc::new(RefCell::new(load_filesystem(self.store.as_deref())));
        let shell = Rc::new(RefCell::new(ShellRuntime::new(Rc::clone(&fs))));
        let timers = self.timers.unwrap_or_default();

        let handler = CommandHandler::new(
            Rc::new(CommandRegistry::builtin()),
            Rc::clone(&self.terminal),
        )
        .with_filesystem(Rc::clone(&fs))
        .with_shell(Rc::clone(&shell))
        .with_timers(timers.clone())
        .with_device(self.device);

        let prompt = shell.borrow().generate_prompt();

        TerminalSession {
            inner: Rc::new(Inner {
                terminal: self.terminal,
                fs,
                shell,
                handler,
                input: RefCell::new(InputManager::new(prompt)),
                timers,
                device: self.device,
                phase: Cell::new(Phase::Booting),
                transport: RefCell::new(None),
                store: self.store,
                boot: self.boot,
            }),
        }
    }
}

fn load_filesystem(store: Option<&dyn VfsStore>) -> VirtualFileSystem {
    let Some(data) = store.and_then(|s| s.load()) else {
        return VirtualFileSystem::seeded();
    };
    match VirtualFileSystem::from_snapshot(&data) {
        Ok(fs) => {
            log::debug!("restored filesystem snapshot ({} bytes)", data.len());
            fs
        }
        Err(e) => {
            log::warn!("discarding stored filesystem: {}", e);
            VirtualFileSystem::seeded()
        }
    }
}

// =============================================================================
// Session
// =============================================================================

struct Inner {
    terminal: Rc<dyn Terminal>,
    fs: Rc<RefCell<VirtualFileSystem>>,
    shell: Rc<RefCell<ShellRuntime>>,
    handler: CommandHandler,
    input: RefCell<InputManager>,
    timers: TimeoutRegistry,
    device: DeviceProfile,
    phase: Cell<Phase>,
    transport: RefCell<Option<Box<dyn Transport>>>,
    store: Option<Rc<dyn VfsStore>>,
    boot: BootSequence,
}

/// One terminal session. Cloning yields another handle to the same session.
#[derive(Clone)]
pub struct TerminalSession {
    inner: Rc<Inner>,
}

impl TerminalSession {
    pub fn builder(terminal: Rc<dyn Terminal>) -> SessionBuilder {
        SessionBuilder::new(terminal)
    }

    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    pub fn terminal(&self) -> Rc<dyn Terminal> {
        Rc::clone(&self.inner.terminal)
    }

    pub fn filesystem(&self) -> Rc<RefCell<VirtualFileSystem>> {
        Rc::clone(&self.inner.fs)
    }

    pub fn shell(&self) -> Rc<RefCell<ShellRuntime>> {
        Rc::clone(&self.inner.shell)
    }

    pub fn timers(&self) -> &TimeoutRegistry {
        &self.inner.timers
    }

    pub fn prompt(&self) -> String {
        self.inner.input.borrow().prompt().to_string()
    }

    /// Whether a submitted command is still running.
    pub fn is_busy(&self) -> bool {
        self.inner.input.borrow().is_running()
    }

    // =========================================================================
    // Boot
    // =========================================================================

    /// Play the boot messages, then greet. A skip during playback makes this
    /// return early without greeting twice.
    pub async fn boot(&self) {
        let inner = &self.inner;
        let result = inner
            .boot
            .run(inner.terminal.as_ref(), &inner.timers, inner.device)
            .await;
        match result {
            Ok(()) => self.enter_interactive(),
            Err(e) => log::debug!("boot stopped: {}", e),
        }
    }

    /// Cancel the boot messages and jump to the prompt.
    pub fn skip_boot(&self) {
        if self.phase() != Phase::Booting {
            return;
        }
        let cancelled = self.inner.timers.clear_all();
        log::debug!("boot skipped, {} timers cancelled", cancelled);
        self.enter_interactive();
    }

    fn enter_interactive(&self) {
        if self.phase() != Phase::Booting {
            return;
        }
        self.inner.phase.set(Phase::Interactive);
        boot::welcome(self.inner.terminal.as_ref(), &self.prompt());
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Feed raw terminal input (keystrokes or a paste).
    ///
    /// Submitted lines run to completion before the rest of `data` is
    /// applied, so a pasted block runs line by line.
    pub async fn handle_data(&self, data: &str) {
        match self.phase() {
            Phase::Booting => self.skip_boot(),
            Phase::Passthrough => self.forward(TransportMessage::Input(data.to_string())),
            Phase::Interactive => {
                for key in key::decode(data) {
                    // A command run from an earlier line may have attached a
                    // transport.
                    if self.phase() != Phase::Interactive {
                        break;
                    }
                    let outcome = {
                        let inner = &self.inner;
                        inner.input.borrow_mut().handle_key(
                            &key,
                            inner.terminal.as_ref(),
                            &**inner.handler.registry(),
                        )
                    };
                    if let KeyOutcome::Submit(parsed) = outcome {
                        self.run_submitted(parsed).await;
                    }
                }
            }
        }
    }

    /// Run a submitted line through the shell and the dispatcher.
    async fn run_submitted(&self, submitted: ParsedCommand) {
        let inner = &self.inner;
        let (parsed, pid) = {
            let mut shell = inner.shell.borrow_mut();
            shell.add_to_history(&submitted.raw);
            let parsed = shell.parse_command(&submitted.raw);
            let pid = shell.create_process(&parsed.command, &parsed.args);
            (parsed, pid)
        };

        let code = if parsed.is_empty() {
            0
        } else {
            inner.handler.execute(&parsed.command, parsed.args).await
        };

        let prompt = {
            let mut shell = inner.shell.borrow_mut();
            shell.complete_process(pid, code);
            shell.generate_prompt()
        };
        {
            let mut input = inner.input.borrow_mut();
            input.set_prompt(prompt);
            input.finish();
        }

        self.persist();
        if self.phase() == Phase::Interactive {
            inner.input.borrow().show_prompt(inner.terminal.as_ref());
        }
    }

    fn persist(&self) {
        let Some(store) = &self.inner.store else {
            return;
        };
        let result = self
            .inner
            .fs
            .borrow()
            .serialize()
            .and_then(|snapshot| store.save(&snapshot));
        if let Err(e) = result {
            log::warn!("failed to save filesystem: {}", e);
        }
    }

    // =========================================================================
    // Remote shell
    // =========================================================================

    /// Route keystrokes to `transport` until [`detach_transport`] is called.
    ///
    /// Refused while booting or while a command runs.
    ///
    /// [`detach_transport`]: Self::detach_transport
    pub fn attach_transport(&self, transport: Box<dyn Transport>) -> bool {
        if self.phase() != Phase::Interactive || self.is_busy() {
            log::warn!("transport refused in phase {:?}", self.phase());
            return false;
        }
        *self.inner.transport.borrow_mut() = Some(transport);
        self.inner.phase.set(Phase::Passthrough);
        log::debug!("transport attached");
        true
    }

    /// Close the transport and resume local editing on a fresh prompt.
    pub fn detach_transport(&self) {
        let Some(transport) = self.inner.transport.borrow_mut().take() else {
            return;
        };
        transport.close();
        self.inner.phase.set(Phase::Interactive);

        let term = self.inner.terminal.as_ref();
        term.write("\r\n");
        self.inner.input.borrow().show_prompt(term);
    }

    /// Tell the remote side the screen size changed.
    pub fn resize(&self, cols: u16, rows: u16) {
        if self.phase() == Phase::Passthrough {
            self.forward(TransportMessage::Resize { cols, rows });
        }
    }

    /// Output arriving from the remote shell.
    pub fn receive(&self, data: &str) {
        if self.phase() == Phase::Passthrough {
            self.inner.terminal.write(data);
        }
    }

    fn forward(&self, message: TransportMessage) {
        if let Some(transport) = self.inner.transport.borrow().as_ref()
            && let Err(e) = transport.send(&message)
        {
            log::warn!("transport send failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::effects::InstantSleeper;
    use crate::core::effects::testing::CancelOnSleep;
    use crate::core::filesystem::MemoryStore;
    use crate::core::terminal::Transcript;
    use crate::core::transport::ConnectionStatus;
    use crate::core::transport::testing::RecordingTransport;
    use crate::utils::ansi::strip;

    fn session() -> (TerminalSession, Rc<Transcript>) {
        let term = Rc::new(Transcript::new());
        let session = TerminalSession::builder(term.clone())
            .timers(TimeoutRegistry::new(Rc::new(InstantSleeper::new())))
            .build();
        (session, term)
    }

    async fn interactive() -> (TerminalSession, Rc<Transcript>) {
        let (session, term) = session();
        session.boot().await;
        term.take();
        (session, term)
    }

    #[tokio::test]
    async fn test_boot_then_welcome() {
        let (session, term) = session();
        assert_eq!(session.phase(), Phase::Booting);
        session.boot().await;

        assert_eq!(session.phase(), Phase::Interactive);
        let out = term.plain();
        assert!(out.contains("BIOS v2.1.7"));
        assert!(out.contains("Welcome to the Interactive Terminal!"));
        assert!(out.ends_with(&strip(&session.prompt())));
        assert_eq!(term.clears(), 1);
    }

    #[tokio::test]
    async fn test_key_during_boot_skips_once() {
        let term = Rc::new(Transcript::new());
        let session = TerminalSession::builder(term.clone())
            .timers(TimeoutRegistry::new(Rc::new(InstantSleeper::new())))
            .build();

        session.handle_data("x").await;
        assert_eq!(session.phase(), Phase::Interactive);
        assert_eq!(term.clears(), 1);

        // A boot run racing the skip must not greet again.
        session.skip_boot();
        session.enter_interactive();
        assert_eq!(term.clears(), 1);
        assert_eq!(term.plain().matches("Welcome").count(), 1);
    }

    #[tokio::test]
    async fn test_skip_mid_boot_stops_playback() {
        let term = Rc::new(Transcript::new());
        let sleeper = CancelOnSleep::on_call(4);
        let timers = TimeoutRegistry::new(sleeper.clone());
        sleeper.arm(&timers);
        let session = TerminalSession::builder(term.clone())
            .timers(timers)
            .build();

        session.boot().await;
        // Cancelled by the registry, not by a key: still booting.
        assert_eq!(session.phase(), Phase::Booting);
        assert!(!term.plain().contains("Welcome"));

        session.skip_boot();
        assert_eq!(session.phase(), Phase::Interactive);
        assert!(term.plain().contains("Welcome"));
    }

    #[tokio::test]
    async fn test_submit_runs_command_and_restores_prompt() {
        let (session, term) = interactive().await;
        let prompt = session.prompt();

        session.handle_data("pwd\r").await;
        let out = term.plain();
        assert!(out.starts_with("pwd\r\n"));
        assert!(out.contains("/home/guest\r\n"));
        assert!(out.ends_with(&strip(&prompt)));
        assert!(!session.is_busy());

        let shell = session.shell();
        let shell = shell.borrow();
        assert_eq!(shell.history().to_vec(), vec!["pwd".to_string()]);
        assert_eq!(shell.last_exit_code(), 0);
        assert_eq!(shell.processes().count(), 1);
    }

    #[tokio::test]
    async fn test_prompt_follows_cd() {
        let (session, _term) = interactive().await;
        session.handle_data("cd /\r").await;
        assert!(strip(&session.prompt()).ends_with(":/$ "));
    }

    #[tokio::test]
    async fn test_unknown_command_sets_exit_code() {
        let (session, term) = interactive().await;
        session.handle_data("nope\r").await;
        assert!(term.plain().contains("Command not found: nope"));
        assert_eq!(session.shell().borrow().last_exit_code(), 1);
    }

    #[tokio::test]
    async fn test_aliases_are_applied() {
        let (session, term) = interactive().await;
        session.handle_data("alias hi='echo hello'\r").await;
        term.take();
        session.handle_data("hi there\r").await;
        assert!(term.plain().contains("hello there\r\n"));
    }

    #[tokio::test]
    async fn test_pasted_lines_run_in_order() {
        let (session, term) = interactive().await;
        session.handle_data("echo one\recho two\r").await;
        let out = term.plain();
        let one = out.find("one\r\n").unwrap();
        let two = out.find("two\r\n").unwrap();
        assert!(one < two);
        assert_eq!(session.shell().borrow().history().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_line_records_nothing() {
        let (session, _term) = interactive().await;
        session.handle_data("   \r").await;
        assert!(session.shell().borrow().history().is_empty());
        assert_eq!(session.shell().borrow().processes().count(), 0);
    }

    #[tokio::test]
    async fn test_filesystem_is_saved_and_restored() {
        let store = Rc::new(MemoryStore::default());
        let term = Rc::new(Transcript::new());
        let session = TerminalSession::builder(term.clone())
            .timers(TimeoutRegistry::new(Rc::new(InstantSleeper::new())))
            .store(store.clone())
            .build();
        session.boot().await;
        session.handle_data("mkdir saved\r").await;
        assert!(store.load().is_some());

        let restored = TerminalSession::builder(Rc::new(Transcript::new()))
            .store(store)
            .build();
        let fs = restored.filesystem();
        let fs = fs.borrow();
        let path = fs.resolve_path("saved");
        assert!(fs.get_node(&path).is_some_and(|n| n.is_dir()));
    }

    #[test]
    fn test_bad_snapshot_falls_back_to_seed() {
        let store = Rc::new(MemoryStore::with_snapshot("{not json"));
        let session = TerminalSession::builder(Rc::new(Transcript::new()))
            .store(store)
            .build();
        let fs = session.filesystem();
        assert!(fs.borrow().list_directory(None).is_some_and(|l| !l.is_empty()));
    }

    #[tokio::test]
    async fn test_passthrough_forwards_keys() {
        let (session, term) = interactive().await;
        let transport = Rc::new(RecordingTransport::connected());
        assert!(session.attach_transport(Box::new(SharedTransport(transport.clone()))));
        assert_eq!(session.phase(), Phase::Passthrough);

        session.handle_data("ls\r").await;
        session.resize(100, 30);
        session.receive("remote output");
        assert_eq!(
            *transport.sent.borrow(),
            vec![
                TransportMessage::Input("ls\r".into()),
                TransportMessage::Resize { cols: 100, rows: 30 },
            ]
        );
        assert!(session.shell().borrow().history().is_empty());
        assert_eq!(term.plain(), "remote output");

        session.detach_transport();
        assert!(transport.closed.get());
        assert_eq!(session.phase(), Phase::Interactive);
        assert!(term.plain().starts_with("remote output\r\n"));

        session.handle_data("echo back\r").await;
        assert!(term.plain().contains("back\r\n"));
    }

    #[tokio::test]
    async fn test_send_failure_is_not_fatal() {
        let (session, _term) = interactive().await;
        let transport = Rc::new(RecordingTransport::connected());
        transport.status.set(ConnectionStatus::Reconnecting { attempt: 1 });
        session.attach_transport(Box::new(SharedTransport(transport.clone())));

        session.handle_data("x").await;
        assert!(transport.sent.borrow().is_empty());
        assert_eq!(session.phase(), Phase::Passthrough);
    }

    #[test]
    fn test_transport_refused_while_booting() {
        let (session, _term) = session();
        let transport = RecordingTransport::connected();
        assert!(!session.attach_transport(Box::new(transport)));
        assert_eq!(session.phase(), Phase::Booting);
    }

    /// Lets a test keep a handle on the transport it attached.
    struct SharedTransport(Rc<RecordingTransport>);

    impl Transport for SharedTransport {
        fn send(&self, message: &TransportMessage) -> Result<(), crate::core::error::TransportError> {
            self.0.send(message)
        }

        fn status(&self) -> ConnectionStatus {
            self.0.status()
        }

        fn close(&self) {
            self.0.close();
        }
    }
}
