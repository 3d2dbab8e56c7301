//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the terminal.
//! Text assets are loaded at compile time using `include_str!`.

use regex::Regex;

// =============================================================================
// Text Assets (loaded at compile time)
// =============================================================================

/// Body of the `about` command.
pub const ABOUT_TEXT: &str = include_str!("../assets/text/about.txt");

/// Body of the `experience` command.
pub const EXPERIENCE_TEXT: &str = include_str!("../assets/text/experience.txt");

/// Skills table shown by the `skills` command.
pub const SKILLS_TEXT: &str = include_str!("../assets/text/skills.txt");

/// Steaming cup printed by `coffee`.
pub const COFFEE_ART: &str = include_str!("../assets/text/coffee.txt");

/// Navigation tips appended to the generated `help` listing.
pub const HELP_FOOTER: &str = include_str!("../assets/text/help_footer.txt");

// =============================================================================
// Session Identity
// =============================================================================

/// Host name shown in the prompt.
pub const HOSTNAME: &str = "genar-terminal";

/// Login name of the simulated user.
pub const USER: &str = "guest";

/// Home directory of the simulated user.
pub const HOME_DIR: &str = "/home/guest";

/// Environment present in every new session.
pub const DEFAULT_ENV: &[(&str, &str)] = &[
    ("HOME", HOME_DIR),
    ("USER", USER),
    ("PATH", "/usr/bin:/bin:/usr/local/bin"),
    ("PWD", HOME_DIR),
    ("SHELL", "/bin/bash"),
    ("TERM", "xterm-256color"),
    ("HOSTNAME", HOSTNAME),
];

/// Aliases installed in every new session.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[("ll", "ls -la"), ("la", "ls -a")];

/// Directories `resolve_command` accepts as binary locations.
pub const BINARY_DIRS: &[&str] = &["/usr/bin", "/bin"];

// =============================================================================
// Shell Limits
// =============================================================================

/// Command history limits.
pub mod history {
    /// Maximum number of history entries kept per session.
    pub const MAX_ENTRIES: usize = 1000;
}

/// Process bookkeeping limits.
pub mod process {
    /// Completed process records retained for inspection.
    pub const MAX_RECORDS: usize = 100;
}

/// Display truncation limits.
pub mod display {
    /// Maximum length of a variable value before truncation in `env` output.
    pub const MAX_VAR_DISPLAY_LEN: usize = 60;
    /// Length of truncated preview (with "..." appended).
    pub const TRUNCATED_PREVIEW_LEN: usize = 57;
}

// =============================================================================
// Screen Configuration
// =============================================================================

/// Screen geometry of the rendered terminal.
pub mod screen {
    /// Columns before the cursor wraps.
    pub const COLS: usize = 80;
    /// Rows considered "on screen" for cursor-home addressing.
    pub const ROWS: usize = 24;
    /// Rows retained in scrollback.
    pub const SCROLLBACK: usize = 1000;
}

// =============================================================================
// Timing Configuration
// =============================================================================

/// Timeout registry limits.
pub mod timeouts {
    /// Pending delayed callbacks tracked before the oldest is cancelled.
    pub const MAX_PENDING: usize = 100;
}

/// Typewriter effect pacing (milliseconds).
pub mod typewriter {
    pub const MOBILE_CHAR_DELAY: u32 = 5;
    pub const DESKTOP_CHAR_DELAY: u32 = 10;
    pub const MOBILE_LINE_DELAY: u32 = 20;
    pub const DESKTOP_LINE_DELAY: u32 = 30;
}

/// Boot sequence pacing (milliseconds).
pub mod boot_delays {
    /// Pause before the first boot message.
    pub const INITIAL: u32 = 500;
    /// Per-character delay on touch devices.
    pub const MOBILE_TYPE: u32 = 15;
    /// Per-character delay on desktop browsers.
    pub const DESKTOP_TYPE: u32 = 25;
}

// =============================================================================
// Links
// =============================================================================

/// A profile link shown by `links`.
#[derive(Clone, Copy, Debug)]
pub struct PersonalLink {
    pub name: &'static str,
    pub url: &'static str,
}

pub const PERSONAL_LINKS: &[PersonalLink] = &[
    PersonalLink {
        name: "Github",
        url: "https://github.com/gtrias",
    },
    PersonalLink {
        name: "Gitlab",
        url: "https://gitlab.com/gtrias",
    },
    PersonalLink {
        name: "fika.bar",
        url: "https://genar.fika.bar",
    },
    PersonalLink {
        name: "LinkedIn",
        url: "https://www.linkedin.com/pub/genar-trias-ortiz/9/592/b90",
    },
    PersonalLink {
        name: "Twitter",
        url: "https://twitter.com/genar_tr",
    },
];

// =============================================================================
// Storage
// =============================================================================

/// localStorage key holding the serialized filesystem.
pub const VFS_STORAGE_KEY: &str = "crt-term.vfs";

// =============================================================================
// Boot Messages
// =============================================================================

/// One line of the boot sequence.
#[derive(Clone, Copy, Debug)]
pub struct BootMessage {
    pub text: &'static str,
    /// SGR colour prefix, empty for the default colour.
    pub color: &'static str,
    /// Pause before this message starts.
    pub delay_ms: u32,
    /// Print the whole line at once instead of typing it out.
    pub instant: bool,
}

const fn typed(text: &'static str, color: &'static str, delay_ms: u32) -> BootMessage {
    BootMessage {
        text,
        color,
        delay_ms,
        instant: false,
    }
}

const fn blank(delay_ms: u32) -> BootMessage {
    typed("", "", delay_ms)
}

const CYAN: &str = "\x1b[96m";
const MAGENTA: &str = "\x1b[95m";
const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";

pub const BOOT_MESSAGES: &[BootMessage] = &[
    typed("BIOS v2.1.7 - Cyber Systems Inc.", CYAN, 0),
    typed("Copyright (c) 2024 Cyber Systems", CYAN, 200),
    blank(100),
    typed("CPU: Quantum Processor X9 @ 4.2GHz", MAGENTA, 300),
    typed("CPU Test: [OK]", GREEN, 800),
    blank(200),
    typed("Memory: 32768MB DDR7", MAGENTA, 300),
    typed("Memory Test: ", MAGENTA, 600),
    BootMessage {
        text: "████████████████████",
        color: GREEN,
        delay_ms: 900,
        instant: true,
    },
    typed("[OK]", GREEN, 100),
    blank(200),
    typed("Initializing System Modules...", BLUE, 300),
    typed("Loading kernel.sys", CYAN, 600),
    typed("Loading drivers.dll", CYAN, 900),
    typed("Loading network.stack", CYAN, 1200),
    typed("Loading security.module", CYAN, 1500),
    typed("System Modules: [OK]", GREEN, 1800),
    blank(200),
    typed("Checking Hardware...", BLUE, 300),
    typed("HDD0: CyberDrive SSD 2TB [OK]", GREEN, 600),
    typed("GPU: NeonGraphics RTX 9090 [OK]", GREEN, 900),
    typed("NET: CyberLink 10GbE [OK]", GREEN, 1200),
    blank(300),
    typed("System Check Complete", GREEN, 400),
    typed("All systems operational", CYAN, 700),
    blank(500),
    typed("Starting interactive terminal...", GREEN, 800),
    blank(1000),
];

/// Greeting printed once the session becomes interactive.
pub const WELCOME_MESSAGE: &str = "Welcome to the Interactive Terminal!";

/// Hint printed under the greeting and after unknown commands.
pub const HELP_HINT: &str = "Type \"help\" for available commands.";

// =============================================================================
// Device Profile
// =============================================================================

const MOBILE_UA_PATTERN: &str = r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini";

/// Pacing chosen for the visitor's device.
///
/// Constructed once from the user agent and handed to whatever needs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceProfile {
    pub mobile: bool,
}

impl DeviceProfile {
    pub const DESKTOP: Self = Self { mobile: false };
    pub const MOBILE: Self = Self { mobile: true };

    /// Classify a user agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let mobile = match Regex::new(MOBILE_UA_PATTERN) {
            Ok(re) => re.is_match(user_agent),
            Err(e) => {
                log::warn!("mobile user agent pattern failed to compile: {}", e);
                false
            }
        };
        Self { mobile }
    }

    pub fn char_delay(&self) -> u32 {
        if self.mobile {
            typewriter::MOBILE_CHAR_DELAY
        } else {
            typewriter::DESKTOP_CHAR_DELAY
        }
    }

    pub fn line_delay(&self) -> u32 {
        if self.mobile {
            typewriter::MOBILE_LINE_DELAY
        } else {
            typewriter::DESKTOP_LINE_DELAY
        }
    }

    pub fn boot_type_delay(&self) -> u32 {
        if self.mobile {
            boot_delays::MOBILE_TYPE
        } else {
            boot_delays::DESKTOP_TYPE
        }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::DESKTOP
    }
}
