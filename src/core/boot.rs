//! Boot screen shown before the prompt.

use crate::config::{self, BootMessage, DeviceProfile, HELP_HINT, WELCOME_MESSAGE};
use crate::core::effects::TimeoutRegistry;
use crate::core::error::TimerError;
use crate::core::terminal::Terminal;
use crate::utils::ansi::{BRIGHT_CYAN, RESET, paint};

/// Plays a list of boot messages through the timeout registry.
///
/// Clearing the registry stops playback at the next pause; the caller then
/// shows the welcome screen itself.
#[derive(Clone, Copy, Debug)]
pub struct BootSequence {
    messages: &'static [BootMessage],
    initial_delay: u32,
}

impl Default for BootSequence {
    fn default() -> Self {
        Self::new(config::BOOT_MESSAGES)
    }
}

impl BootSequence {
    pub fn new(messages: &'static [BootMessage]) -> Self {
        Self {
            messages,
            initial_delay: config::boot_delays::INITIAL,
        }
    }

    pub fn with_initial_delay(mut self, ms: u32) -> Self {
        self.initial_delay = ms;
        self
    }

    pub fn messages(&self) -> &'static [BootMessage] {
        self.messages
    }

    /// Print every message, typed or at once, waiting between them.
    pub async fn run(
        &self,
        term: &dyn Terminal,
        timers: &TimeoutRegistry,
        device: DeviceProfile,
    ) -> Result<(), TimerError> {
        timers.delay(self.initial_delay).await?;

        for message in self.messages {
            timers.delay(message.delay_ms).await?;
            if message.text.is_empty() {
                term.writeln("");
            } else if message.instant {
                term.writeln(&paint(message.color, message.text));
            } else {
                for c in message.text.chars() {
                    term.write(&format!("{}{}{}", message.color, c, RESET));
                    timers.delay(device.boot_type_delay()).await?;
                }
                term.writeln("");
            }
        }
        Ok(())
    }
}

/// Clear the screen and greet: welcome line, help hint, blank, prompt.
pub fn welcome(term: &dyn Terminal, prompt: &str) {
    term.clear();
    term.writeln(&paint(BRIGHT_CYAN, WELCOME_MESSAGE));
    term.writeln(HELP_HINT);
    term.writeln("");
    term.write(prompt);
}
