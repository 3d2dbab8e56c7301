//! Easter eggs.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::{Command, CommandContext, CommandResult, EXIT_SUCCESS, Handler};
use crate::config::{COFFEE_ART, screen};
use crate::core::effects::LocalFuture;
use crate::core::error::TimerError;
use crate::core::shell::CommandHistory;
use crate::models::Category;
use crate::utils::ansi::{
    BRIGHT_CYAN, BRIGHT_GREEN, BRIGHT_MAGENTA, BRIGHT_WHITE, BRIGHT_YELLOW, CURSOR_HOME, CYAN, DIM,
    GRAY, ITALIC, RESET, boxed, paint,
};

pub(super) fn commands() -> Vec<Command> {
    vec![
        Command {
            name: "achievements",
            description: "View your progress and achievements",
            usage: Some("achievements"),
            category: Category::System,
            handler: Handler::Sync(achievements),
        },
        Command {
            name: "fortune",
            description: "Display a random inspirational quote",
            usage: Some("fortune"),
            category: Category::System,
            handler: Handler::Sync(fortune),
        },
        Command {
            name: "matrix",
            description: "Enter the Matrix",
            usage: Some("matrix"),
            category: Category::System,
            handler: Handler::Async(matrix),
        },
        Command {
            name: "hack",
            description: "Hack the mainframe",
            usage: Some("hack"),
            category: Category::System,
            handler: Handler::Async(hack),
        },
        Command {
            name: "coffee",
            description: "Grab a cup of coffee",
            usage: Some("coffee"),
            category: Category::System,
            handler: Handler::Sync(coffee),
        },
    ]
}

// =============================================================================
// achievements
// =============================================================================

struct Achievement {
    name: &'static str,
    description: &'static str,
    earned: bool,
}

/// Distinct first arguments of every `command ...` line in history.
fn distinct_args<'a>(history: &'a CommandHistory, command: &str) -> HashSet<&'a str> {
    history
        .iter()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            (words.next() == Some(command)).then(|| words.next()).flatten()
        })
        .collect()
}

fn used(history: &CommandHistory, command: &str) -> bool {
    history
        .iter()
        .any(|line| line.split_whitespace().next() == Some(command))
}

/// Progress as recorded in the session's history.
fn progress(history: &CommandHistory) -> Vec<Achievement> {
    vec![
        Achievement {
            name: "First Command",
            description: "Run your first command",
            earned: !history.is_empty(),
        },
        Achievement {
            name: "Explorer",
            description: "Visit 10 different directories",
            earned: distinct_args(history, "cd").len() >= 10,
        },
        Achievement {
            name: "Reader",
            description: "Read 5 different files",
            earned: distinct_args(history, "cat").len() >= 5,
        },
        Achievement {
            name: "Creator",
            description: "Create your first file",
            earned: used(history, "touch") || used(history, "mkdir"),
        },
        Achievement {
            name: "RTFM",
            description: "Read the help documentation",
            earned: used(history, "help"),
        },
        Achievement {
            name: "Power User",
            description: "Run 100 commands",
            earned: history.len() >= 100,
        },
    ]
}

fn achievement_lines(achievements: &[Achievement]) -> Vec<String> {
    let mut lines = Vec::with_capacity(achievements.len() * 3);
    for achievement in achievements {
        let (status, name) = if achievement.earned {
            (paint(BRIGHT_GREEN, "✓"), paint(BRIGHT_CYAN, achievement.name))
        } else {
            (paint(DIM, "○"), paint(DIM, achievement.name))
        };
        lines.push(format!("  {} {}", status, name));
        lines.push(format!("    {}", paint(DIM, achievement.description)));
        lines.push(String::new());
    }
    lines
}

fn achievements(ctx: &CommandContext) -> CommandResult {
    let achievements = match ctx.shell() {
        Some(shell) => progress(shell.borrow().history()),
        None => progress(&CommandHistory::default()),
    };
    for line in boxed(
        &achievement_lines(&achievements),
        Some("Achievements"),
        BRIGHT_MAGENTA,
        1,
    ) {
        ctx.writeln(&line);
    }
    ctx.writeln("");
    Ok(EXIT_SUCCESS)
}

// =============================================================================
// fortune
// =============================================================================

const FORTUNES: &[(&str, &str)] = &[
    ("The best way to predict the future is to invent it.", "Alan Kay"),
    ("Code is like humor. When you have to explain it, it's bad.", "Cory House"),
    ("First, solve the problem. Then, write the code.", "John Johnson"),
    (
        "Any fool can write code that a computer can understand. Good programmers write code that humans can understand.",
        "Martin Fowler",
    ),
    (
        "The only way to learn a new programming language is by writing programs in it.",
        "Dennis Ritchie",
    ),
    (
        "Programs must be written for people to read, and only incidentally for machines to execute.",
        "Harold Abelson",
    ),
    (
        "The most disastrous thing that you can ever learn is your first programming language.",
        "Alan Kay",
    ),
    ("Simplicity is the ultimate sophistication.", "Leonardo da Vinci"),
    ("Make it work, make it right, make it fast.", "Kent Beck"),
    ("The best code is no code at all.", "Jeff Atwood"),
];

const FORTUNE_WIDTH: usize = 56;

/// Greedy word wrap.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn fortune_lines(quote: &str, author: &str) -> Vec<String> {
    let wrapped = wrap(&format!("\"{}\"", quote), FORTUNE_WIDTH);
    let width = wrapped.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let mut lines: Vec<String> = wrapped
        .iter()
        .map(|l| format!("{}{}{}", ITALIC, paint(CYAN, l), RESET))
        .collect();
    let signature = format!("- {}", author);
    let pad = width.saturating_sub(signature.chars().count());
    lines.push(format!("{}{}", " ".repeat(pad), paint(DIM, &signature)));
    lines
}

fn fortune(ctx: &CommandContext) -> CommandResult {
    let Some((quote, author)) = FORTUNES.choose(&mut rand::thread_rng()) else {
        return Ok(EXIT_SUCCESS);
    };
    for line in boxed(&fortune_lines(quote, author), None, BRIGHT_MAGENTA, 2) {
        ctx.writeln(&line);
    }
    ctx.writeln("");
    Ok(EXIT_SUCCESS)
}

// =============================================================================
// matrix
// =============================================================================

const MATRIX_GLYPHS: &str =
    "ｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜﾝ01234567890";
const MATRIX_FRAMES: usize = 12;
const MATRIX_ROWS: usize = 15;
const MATRIX_DENSITY: f64 = 0.15;
const MATRIX_FRAME_MS: u32 = 100;

fn matrix_frame(rng: &mut impl Rng, glyphs: &[char]) -> String {
    let mut frame = String::with_capacity(MATRIX_ROWS * (screen::COLS + 2));
    for _ in 0..MATRIX_ROWS {
        for _ in 0..screen::COLS {
            match glyphs.choose(&mut *rng) {
                Some(&glyph) if rng.gen_bool(MATRIX_DENSITY) => frame.push(glyph),
                _ => frame.push(' '),
            }
        }
        frame.push_str("\r\n");
    }
    frame
}

async fn rain(ctx: &CommandContext) -> Result<(), TimerError> {
    let glyphs: Vec<char> = MATRIX_GLYPHS.chars().collect();
    let mut rng = rand::thread_rng();
    for _ in 0..MATRIX_FRAMES {
        let frame = matrix_frame(&mut rng, &glyphs);
        ctx.terminal.write(CURSOR_HOME);
        ctx.terminal.write(&frame);
        ctx.timers.delay(MATRIX_FRAME_MS).await?;
    }
    Ok(())
}

fn matrix_finale() -> Vec<String> {
    let green = |text: &str| paint(BRIGHT_GREEN, &format!("    {}", text));
    vec![
        String::new(),
        green("╔══════════════════════════════════════╗"),
        green("║                                      ║"),
        green("║        WELCOME TO THE MATRIX         ║"),
        green("║                                      ║"),
        format!(
            "{}    ║      {}Follow the white rabbit...{}      ║{}",
            BRIGHT_GREEN, BRIGHT_WHITE, BRIGHT_GREEN, RESET
        ),
        green("║                                      ║"),
        green("╚══════════════════════════════════════╝"),
        String::new(),
        paint(GRAY, "    \"There is no spoon.\""),
        String::new(),
    ]
}

async fn run_matrix(ctx: CommandContext) -> CommandResult {
    ctx.writeln("");
    ctx.terminal.write(BRIGHT_GREEN);
    let animation = rain(&ctx).await;
    ctx.terminal.write(RESET);
    animation?;

    ctx.terminal.clear();
    for line in matrix_finale() {
        ctx.writeln(&line);
    }
    ctx.on_complete.fire();
    Ok(EXIT_SUCCESS)
}

fn matrix(ctx: CommandContext) -> LocalFuture<'static, CommandResult> {
    Box::pin(run_matrix(ctx))
}

// =============================================================================
// hack
// =============================================================================

const HACK_STEPS: &[(&str, &str, u32)] = &[
    (BRIGHT_GREEN, "[*] Initializing hack sequence...", 500),
    (BRIGHT_YELLOW, "[*] Connecting to mainframe...", 800),
    (BRIGHT_GREEN, "[✓] Connection established: 192.168.1.337", 600),
    (BRIGHT_YELLOW, "[*] Bypassing firewall...", 1000),
    (BRIGHT_GREEN, "[✓] Firewall bypassed", 500),
    (BRIGHT_YELLOW, "[*] Cracking encryption...", 1200),
    (BRIGHT_GREEN, "[✓] Encryption key found: 0xDEADBEEF", 600),
    (BRIGHT_YELLOW, "[*] Accessing database...", 800),
    (BRIGHT_GREEN, "[✓] Database unlocked", 500),
    (BRIGHT_YELLOW, "[*] Downloading files...", 1000),
];

const PROGRESS_CELLS: usize = 30;
const PROGRESS_CELL_MS: u32 = 50;
const PROGRESS_SETTLE_MS: u32 = 300;

async fn run_hack(ctx: CommandContext) -> CommandResult {
    ctx.writeln("");
    for (color, text, delay) in HACK_STEPS {
        ctx.writeln(&paint(color, text));
        ctx.timers.delay(*delay).await?;
    }

    ctx.terminal.write(&format!("{}[", BRIGHT_CYAN));
    for _ in 0..PROGRESS_CELLS {
        ctx.terminal.write("█");
        if let Err(e) = ctx.timers.delay(PROGRESS_CELL_MS).await {
            ctx.terminal.write(RESET);
            return Err(e.into());
        }
    }
    ctx.writeln(&format!("] 100%{}", RESET));
    ctx.timers.delay(PROGRESS_SETTLE_MS).await?;

    ctx.writeln(&paint(BRIGHT_GREEN, "[✓] Download complete!"));
    ctx.writeln("");
    ctx.writeln(&paint(BRIGHT_MAGENTA, "    ▄▄▄▄▄▄▄▄▄▄▄▄▄▄▄▄▄▄▄▄▄▄▄"));
    ctx.writeln(&paint(BRIGHT_MAGENTA, "    █ ACCESS GRANTED █"));
    ctx.writeln(&paint(BRIGHT_MAGENTA, "    ▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀"));
    ctx.writeln("");
    ctx.writeln(&paint(GRAY, "    You're in. 😎"));
    ctx.writeln("");
    ctx.on_complete.fire();
    Ok(EXIT_SUCCESS)
}

fn hack(ctx: CommandContext) -> LocalFuture<'static, CommandResult> {
    Box::pin(run_hack(ctx))
}

// =============================================================================
// coffee
// =============================================================================

const COFFEE_QUOTES: &[&str] = &[
    "Code is best served with coffee.",
    "Debugging powered by caffeine.",
    "Java? I prefer JavaScript with coffee.",
    "Coffee: Turning code into reality since forever.",
    "First coffee, then code.",
    "// TODO: Add more coffee",
];

const STEAM_ROWS: usize = 5;
const BREW: &str = "\x1b[38;5;94m";

/// Steam and rim in yellow, the cup in white with brown coffee, the saucer
/// in gray.
fn coffee_art(art: &str) -> Vec<String> {
    let rows: Vec<&str> = art.lines().collect();
    let last = rows.len().saturating_sub(1);
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            if i < STEAM_ROWS {
                paint(BRIGHT_YELLOW, row)
            } else if i == last {
                paint(GRAY, row)
            } else {
                let cup = row.replace(
                    "▓▓▓▓▓▓▓▓▓▓▓▓▓",
                    &format!("{}▓▓▓▓▓▓▓▓▓▓▓▓▓{}", BREW, BRIGHT_WHITE),
                );
                paint(BRIGHT_WHITE, &cup)
            }
        })
        .collect()
}

fn coffee(ctx: &CommandContext) -> CommandResult {
    ctx.writeln("");
    for line in coffee_art(COFFEE_ART) {
        ctx.writeln(&line);
    }
    ctx.writeln("");
    ctx.writeln(&paint(BRIGHT_CYAN, "    ☕ Fresh brew ready!"));
    ctx.writeln("");
    if let Some(quote) = COFFEE_QUOTES.choose(&mut rand::thread_rng()) {
        ctx.writeln(&paint(GRAY, &format!("    \"{}\"", quote)));
        ctx.writeln("");
    }
    Ok(EXIT_SUCCESS)
}
