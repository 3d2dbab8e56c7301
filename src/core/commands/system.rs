//! Shell and session commands.

use rand::seq::SliceRandom;

use super::{Command, CommandContext, CommandResult, EXIT_FAILURE, EXIT_SUCCESS, Handler};
use crate::config::{self, HELP_FOOTER};
use crate::core::env::is_valid_var_name;
use crate::models::Category;
use crate::utils::ansi::{
    BRIGHT_BLUE, BRIGHT_CYAN, BRIGHT_GREEN, BRIGHT_MAGENTA, BRIGHT_RED, BRIGHT_YELLOW, CYAN, GRAY,
    RESET, banner, paint,
};
use crate::utils::format::{format_date_long, now_millis, truncate_display};

pub(super) fn commands() -> Vec<Command> {
    vec![
        Command {
            name: "help",
            description: "Show all available commands",
            usage: Some("help"),
            category: Category::System,
            handler: Handler::Sync(help),
        },
        Command {
            name: "clear",
            description: "Clear terminal screen",
            usage: Some("clear"),
            category: Category::System,
            handler: Handler::Sync(clear),
        },
        Command {
            name: "echo",
            description: "Echo back arguments",
            usage: Some("echo [text...]"),
            category: Category::System,
            handler: Handler::Sync(echo),
        },
        Command {
            name: "date",
            description: "Show current date and time",
            usage: Some("date"),
            category: Category::System,
            handler: Handler::Sync(date),
        },
        Command {
            name: "whoami",
            description: "Display current user",
            usage: Some("whoami"),
            category: Category::System,
            handler: Handler::Sync(whoami),
        },
        Command {
            name: "history",
            description: "Show command history",
            usage: Some("history"),
            category: Category::System,
            handler: Handler::Sync(history),
        },
        Command {
            name: "alias",
            description: "Define or list aliases",
            usage: Some("alias [name[=value]]"),
            category: Category::System,
            handler: Handler::Sync(alias),
        },
        Command {
            name: "unalias",
            description: "Remove an alias",
            usage: Some("unalias <name>"),
            category: Category::System,
            handler: Handler::Sync(unalias),
        },
        Command {
            name: "export",
            description: "Set or list environment variables",
            usage: Some("export [NAME=value]"),
            category: Category::System,
            handler: Handler::Sync(export),
        },
        Command {
            name: "unset",
            description: "Remove an environment variable",
            usage: Some("unset <NAME>"),
            category: Category::System,
            handler: Handler::Sync(unset),
        },
        Command {
            name: "env",
            description: "Print the environment",
            usage: Some("env"),
            category: Category::System,
            handler: Handler::Sync(env),
        },
    ]
}

// =============================================================================
// help / clear / echo / date
// =============================================================================

const NAME_COLUMN: usize = 12;

fn help(ctx: &CommandContext) -> CommandResult {
    for line in banner("AVAILABLE COMMANDS", BRIGHT_CYAN) {
        ctx.writeln(&line);
    }
    ctx.writeln("");

    for category in Category::ALL {
        let commands = ctx.registry.by_category(category);
        if commands.is_empty() {
            continue;
        }
        ctx.writeln(&paint(BRIGHT_GREEN, &format!("  {}:", category.title())));
        for command in commands {
            ctx.writeln(&format!(
                "    {}{:<width$}{} - {}",
                BRIGHT_YELLOW,
                command.name,
                RESET,
                command.description,
                width = NAME_COLUMN
            ));
        }
        ctx.writeln("");
    }

    let mut footer = HELP_FOOTER.lines();
    if let Some(title) = footer.next() {
        ctx.writeln(&paint(GRAY, &format!("  {}", title)));
    }
    for line in footer {
        ctx.writeln(&format!("  {}", line));
    }
    ctx.writeln("");
    Ok(EXIT_SUCCESS)
}

fn clear(ctx: &CommandContext) -> CommandResult {
    ctx.terminal.clear();
    Ok(EXIT_SUCCESS)
}

fn echo(ctx: &CommandContext) -> CommandResult {
    ctx.writeln(&ctx.args.join(" "));
    Ok(EXIT_SUCCESS)
}

fn date(ctx: &CommandContext) -> CommandResult {
    ctx.writeln(&paint(BRIGHT_CYAN, &format_date_long(now_millis())));
    Ok(EXIT_SUCCESS)
}

// =============================================================================
// whoami
// =============================================================================

struct Persona {
    user: &'static str,
    message: &'static str,
    color: &'static str,
}

const PERSONAS: &[Persona] = &[
    Persona {
        user: "root",
        message: "You're the superuser! Unlimited power! 💪",
        color: BRIGHT_RED,
    },
    Persona {
        user: "neo",
        message: "The One. The Matrix has you...",
        color: BRIGHT_GREEN,
    },
    Persona {
        user: "hacker",
        message: "Elite level: 1337 🔐",
        color: BRIGHT_MAGENTA,
    },
    Persona {
        user: "developer",
        message: "Turning caffeine into code ☕",
        color: BRIGHT_CYAN,
    },
    Persona {
        user: "visitor",
        message: "Welcome to my digital domain! 👋",
        color: BRIGHT_YELLOW,
    },
    Persona {
        user: "codewizard",
        message: "Master of the arcane arts of programming 🧙",
        color: BRIGHT_BLUE,
    },
];

const FLAVOR: &[&str] = &[
    "uid=1337(awesome) gid=1337(awesome) groups=1337(awesome),100(users)",
    "Security clearance: MAXIMUM",
    "Access level: Unlimited",
    "Privileges: All of them",
    "Status: Authenticated and authorized",
];

fn whoami(ctx: &CommandContext) -> CommandResult {
    let mut rng = rand::thread_rng();
    let (Some(persona), Some(flavor)) = (PERSONAS.choose(&mut rng), FLAVOR.choose(&mut rng))
    else {
        return Ok(EXIT_SUCCESS);
    };

    ctx.writeln("");
    ctx.writeln(&paint(persona.color, persona.user));
    ctx.writeln("");
    ctx.writeln(&paint(GRAY, persona.message));
    ctx.writeln("");
    ctx.writeln(&paint(GRAY, flavor));
    ctx.writeln("");
    Ok(EXIT_SUCCESS)
}

// =============================================================================
// history / alias / unalias
// =============================================================================

fn shell_unavailable(ctx: &CommandContext, command: &str) -> CommandResult {
    ctx.writeln(&paint(
        BRIGHT_RED,
        &format!("{}: shell runtime not available", command),
    ));
    Ok(EXIT_FAILURE)
}

fn history(ctx: &CommandContext) -> CommandResult {
    let Some(shell) = ctx.shell() else {
        return shell_unavailable(ctx, "history");
    };
    let shell = shell.borrow();
    let history = shell.history();

    if history.is_empty() {
        ctx.writeln(&paint(GRAY, "No command history"));
        return Ok(EXIT_SUCCESS);
    }

    ctx.writeln("");
    for (i, entry) in history.iter().enumerate() {
        ctx.writeln(&format!("  {}{:>4}{}  {}", GRAY, i + 1, RESET, entry));
    }
    ctx.writeln("");
    Ok(EXIT_SUCCESS)
}

fn alias(ctx: &CommandContext) -> CommandResult {
    let Some(shell) = ctx.shell() else {
        return shell_unavailable(ctx, "alias");
    };

    if ctx.args.is_empty() {
        for (name, value) in shell.borrow().aliases() {
            ctx.writeln(&format!("alias {}='{}'", name, value));
        }
        return Ok(EXIT_SUCCESS);
    }

    let mut code = EXIT_SUCCESS;
    for arg in &ctx.args {
        match arg.split_once('=') {
            Some((name, _)) if name.is_empty() || name.contains(char::is_whitespace) => {
                ctx.writeln(&paint(
                    BRIGHT_RED,
                    &format!("alias: `{}': invalid alias name", name),
                ));
                code = EXIT_FAILURE;
            }
            Some((name, value)) => shell.borrow_mut().set_alias(name, value),
            None => match shell.borrow().alias(arg) {
                Some(value) => ctx.writeln(&format!("alias {}='{}'", arg, value)),
                None => {
                    ctx.writeln(&paint(BRIGHT_RED, &format!("alias: {}: not found", arg)));
                    code = EXIT_FAILURE;
                }
            },
        }
    }
    Ok(code)
}

fn unalias(ctx: &CommandContext) -> CommandResult {
    let Some(shell) = ctx.shell() else {
        return shell_unavailable(ctx, "unalias");
    };
    if ctx.args.is_empty() {
        ctx.writeln(&paint(GRAY, "Usage: unalias <name>"));
        return Ok(EXIT_FAILURE);
    }

    let mut code = EXIT_SUCCESS;
    for name in &ctx.args {
        if !shell.borrow_mut().remove_alias(name) {
            ctx.writeln(&paint(BRIGHT_RED, &format!("unalias: {}: not found", name)));
            code = EXIT_FAILURE;
        }
    }
    Ok(code)
}

// =============================================================================
// export / unset / env
// =============================================================================

fn display_value(value: &str) -> String {
    truncate_display(
        value,
        config::display::MAX_VAR_DISPLAY_LEN,
        config::display::TRUNCATED_PREVIEW_LEN,
    )
}

fn export(ctx: &CommandContext) -> CommandResult {
    let Some(shell) = ctx.shell() else {
        return shell_unavailable(ctx, "export");
    };

    if ctx.args.is_empty() {
        for (name, value) in shell.borrow().env().all() {
            ctx.writeln(&format!(
                "{} {}=\"{}\"",
                paint(GRAY, "declare -x"),
                paint(CYAN, &name),
                display_value(&value)
            ));
        }
        return Ok(EXIT_SUCCESS);
    }

    let mut code = EXIT_SUCCESS;
    for arg in &ctx.args {
        let (name, value) = match arg.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (arg.as_str(), None),
        };
        if !is_valid_var_name(name) {
            ctx.writeln(&paint(
                BRIGHT_RED,
                &format!("export: `{}': not a valid identifier", arg),
            ));
            code = EXIT_FAILURE;
            continue;
        }
        let mut shell = shell.borrow_mut();
        let env = shell.env_mut();
        match value {
            Some(value) => env.set(name, value),
            // `export NAME` on an unset name defines it empty.
            None if !env.has(name) => env.set(name, ""),
            None => {}
        }
    }
    Ok(code)
}

fn unset(ctx: &CommandContext) -> CommandResult {
    let Some(shell) = ctx.shell() else {
        return shell_unavailable(ctx, "unset");
    };
    if ctx.args.is_empty() {
        ctx.writeln(&paint(GRAY, "Usage: unset <NAME>"));
        return Ok(EXIT_FAILURE);
    }

    let mut code = EXIT_SUCCESS;
    for name in &ctx.args {
        if !is_valid_var_name(name) {
            ctx.writeln(&paint(
                BRIGHT_RED,
                &format!("unset: `{}': not a valid identifier", name),
            ));
            code = EXIT_FAILURE;
            continue;
        }
        shell.borrow_mut().env_mut().unset(name);
    }
    Ok(code)
}

fn env(ctx: &CommandContext) -> CommandResult {
    let Some(shell) = ctx.shell() else {
        return shell_unavailable(ctx, "env");
    };
    for (name, value) in shell.borrow().env().all() {
        ctx.writeln(&format!("{}={}", name, display_value(&value)));
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::handler::testing::Harness;

    #[tokio::test]
    async fn test_help_lists_every_command_by_category() {
        let h = Harness::new();
        let (code, out) = h.run("help").await;
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.contains("AVAILABLE COMMANDS"));

        let portfolio = out.find("  Portfolio & Information:").unwrap();
        let system = out.find("  System Commands:").unwrap();
        assert!(portfolio < system);
        assert!(out.contains("    about        - Learn about me"));
        assert!(out.contains("    mkdir        - Create directory"));
        for name in h.handler.registry().names() {
            assert!(out.contains(&format!("    {} ", name)), "help misses {}", name);
        }
        assert!(out.contains("  Navigation Tips:"));
        assert!(out.contains("Use Tab for autocomplete"));
    }

    #[tokio::test]
    async fn test_clear_echo_date() {
        let h = Harness::new();
        h.run("clear").await;
        assert_eq!(h.term.clears(), 1);

        let (_, out) = h.run("echo hello   \"big world\"").await;
        assert_eq!(out, "hello big world\r\n");
        let (_, out) = h.run("echo").await;
        assert_eq!(out, "\r\n");
        let (_, out) = h.run("echo $USER in $HOME").await;
        assert_eq!(out, "guest in /home/guest\r\n");

        let (code, out) = h.run("date").await;
        assert_eq!(code, EXIT_SUCCESS);
        assert!(out.contains("GMT+0000"));
    }

    #[tokio::test]
    async fn test_whoami_picks_known_persona() {
        let h = Harness::new();
        let (code, out) = h.run("whoami").await;
        assert_eq!(code, EXIT_SUCCESS);
        let lines: Vec<&str> = out.split("\r\n").collect();
        assert_eq!(lines[0], "");
        assert!(PERSONAS.iter().any(|p| p.user == lines[1]));
        assert!(PERSONAS.iter().any(|p| p.message == lines[3]));
        assert!(FLAVOR.contains(&lines[5]));
    }

    #[tokio::test]
    async fn test_history_numbers_from_one() {
        let h = Harness::new();
        let (_, out) = h.run("history").await;
        assert_eq!(out, "No command history\r\n");

        h.shell.borrow_mut().add_to_history("ls");
        h.shell.borrow_mut().add_to_history("pwd");
        let (_, out) = h.run("history").await;
        assert_eq!(out, "\r\n     1  ls\r\n     2  pwd\r\n\r\n");
    }

    #[tokio::test]
    async fn test_alias_lifecycle() {
        let h = Harness::new();
        let (_, out) = h.run("alias").await;
        assert!(out.contains("alias ll='ls -la'"));
        assert!(out.contains("alias la='ls -a'"));

        assert_eq!(h.run("alias here='pwd'").await.0, EXIT_SUCCESS);
        assert_eq!(h.run("here").await.1, "/home/guest\r\n");
        assert_eq!(h.run("alias here").await.1, "alias here='pwd'\r\n");

        assert_eq!(h.run("unalias here").await.0, EXIT_SUCCESS);
        let (code, out) = h.run("alias here").await;
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(out, "alias: here: not found\r\n");

        let (code, out) = h.run("unalias here").await;
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(out, "unalias: here: not found\r\n");
    }

    #[tokio::test]
    async fn test_export_unset_env() {
        let h = Harness::new();
        assert_eq!(h.run("export EDITOR=vim").await.0, EXIT_SUCCESS);
        assert_eq!(h.shell.borrow().env().get("EDITOR"), Some("vim"));
        assert_eq!(h.run("echo $EDITOR").await.1, "vim\r\n");

        let (_, out) = h.run("env").await;
        assert!(out.contains("EDITOR=vim\r\n"));
        assert!(out.contains("HOME=/home/guest\r\n"));

        let (_, out) = h.run("export").await;
        assert!(out.contains("declare -x EDITOR=\"vim\""));

        assert_eq!(h.run("unset EDITOR").await.0, EXIT_SUCCESS);
        assert!(!h.shell.borrow().env().has("EDITOR"));

        let (code, out) = h.run("export 1BAD=x").await;
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(out, "export: `1BAD=x': not a valid identifier\r\n");
    }

    #[tokio::test]
    async fn test_env_truncates_long_values() {
        let h = Harness::new();
        let long = "x".repeat(80);
        h.shell.borrow_mut().env_mut().set("LONG", long.as_str());
        let (_, out) = h.run("env").await;
        let expected = format!("LONG={}...\r\n", "x".repeat(57));
        assert!(out.contains(&expected));
    }
}
