//! Portfolio commands. Everything but `skills` is typed out.

use super::{Command, CommandContext, CommandResult, EXIT_SUCCESS, Handler};
use crate::config::{ABOUT_TEXT, EXPERIENCE_TEXT, PERSONAL_LINKS, SKILLS_TEXT};
use crate::core::effects::{LocalFuture, typewriter};
use crate::models::Category;
use crate::utils::ansi::{
    BRIGHT_CYAN, BRIGHT_GREEN, BRIGHT_MAGENTA, BRIGHT_YELLOW, GRAY, RESET, banner, paint,
};

pub(super) fn commands() -> Vec<Command> {
    vec![
        Command {
            name: "about",
            description: "Learn about me",
            usage: Some("about"),
            category: Category::Portfolio,
            handler: Handler::Async(about),
        },
        Command {
            name: "skills",
            description: "View my technical skills",
            usage: Some("skills"),
            category: Category::Portfolio,
            handler: Handler::Sync(skills),
        },
        Command {
            name: "experience",
            description: "See my work history",
            usage: Some("experience"),
            category: Category::Portfolio,
            handler: Handler::Async(experience),
        },
        Command {
            name: "links",
            description: "Show personal and social links",
            usage: Some("links"),
            category: Category::Portfolio,
            handler: Handler::Async(links),
        },
    ]
}

async fn type_out(ctx: CommandContext, lines: Vec<String>) -> CommandResult {
    typewriter(ctx.terminal.as_ref(), &lines, &ctx.timers, ctx.device).await?;
    ctx.on_complete.fire();
    Ok(EXIT_SUCCESS)
}

fn heading(title: &str) -> Vec<String> {
    let mut lines = banner(title, BRIGHT_CYAN);
    lines.push(String::new());
    lines
}

// =============================================================================
// about
// =============================================================================

/// Colour the bio: `Label:` lines of the header block get a green label,
/// paragraphs alternate yellow and magenta, the closing hint is gray.
fn about_lines(text: &str) -> Vec<String> {
    let mut lines = heading("ABOUT ME");
    let mut paragraphs = 0;
    let mut in_paragraph = false;
    let total = text.lines().count();

    for (i, line) in text.lines().enumerate() {
        if line.is_empty() {
            if in_paragraph {
                paragraphs += 1;
                in_paragraph = false;
            }
            lines.push(String::new());
            continue;
        }
        if i + 1 == total {
            lines.push(paint(GRAY, line));
        } else if paragraphs == 0
            && !in_paragraph
            && let Some((label, value)) = line.split_once(':')
            && !label.contains(' ')
        {
            lines.push(format!("{}{}:{}{}", BRIGHT_GREEN, label, RESET, value));
        } else {
            in_paragraph = true;
            let color = if paragraphs % 2 == 0 {
                BRIGHT_YELLOW
            } else {
                BRIGHT_MAGENTA
            };
            lines.push(paint(color, line));
        }
    }
    lines.push(String::new());
    lines
}

async fn run_about(ctx: CommandContext) -> CommandResult {
    type_out(ctx, about_lines(ABOUT_TEXT)).await
}

fn about(ctx: CommandContext) -> LocalFuture<'static, CommandResult> {
    Box::pin(run_about(ctx))
}

// =============================================================================
// experience
// =============================================================================

fn experience_lines(text: &str) -> Vec<String> {
    let mut lines = heading("WORK EXPERIENCE");
    for line in text.lines() {
        if let Some(title) = line.strip_prefix("▸ ") {
            lines.push(paint(BRIGHT_GREEN, &format!("▸ {}", title)));
        } else if let Some((company, years)) = line.trim_start().split_once(" | ") {
            lines.push(format!("  {} | {}", paint(BRIGHT_YELLOW, company), years));
        } else {
            lines.push(line.to_string());
        }
    }
    lines.push(String::new());
    lines.push(paint(BRIGHT_MAGENTA, &"━".repeat(57)));
    lines.push(paint(GRAY, "Total Experience: 8+ years in software development"));
    lines.push(String::new());
    lines
}

async fn run_experience(ctx: CommandContext) -> CommandResult {
    type_out(ctx, experience_lines(EXPERIENCE_TEXT)).await
}

fn experience(ctx: CommandContext) -> LocalFuture<'static, CommandResult> {
    Box::pin(run_experience(ctx))
}

// =============================================================================
// links
// =============================================================================

fn links_lines() -> Vec<String> {
    let mut lines = heading("PERSONAL LINKS");
    lines.push(paint(BRIGHT_YELLOW, "Connect with me on:"));
    lines.push(String::new());
    for link in PERSONAL_LINKS {
        lines.push(format!(
            "{} {}",
            paint(BRIGHT_GREEN, &format!("▸ {}:", link.name)),
            paint(BRIGHT_CYAN, link.url)
        ));
    }
    lines.push(String::new());
    lines.push(paint(GRAY, "Click any link or copy to visit!"));
    lines.push(String::new());
    lines
}

async fn run_links(ctx: CommandContext) -> CommandResult {
    type_out(ctx, links_lines()).await
}

fn links(ctx: CommandContext) -> LocalFuture<'static, CommandResult> {
    Box::pin(run_links(ctx))
}

// =============================================================================
// skills
// =============================================================================

const CATEGORY_WIDTH: usize = 22;
const TECH_WIDTH: usize = 32;

fn rule(left: &str, mid: &str, right: &str) -> String {
    paint(
        BRIGHT_YELLOW,
        &format!(
            "{}{}{}{}{}",
            left,
            "─".repeat(CATEGORY_WIDTH + 2),
            mid,
            "─".repeat(TECH_WIDTH + 2),
            right
        ),
    )
}

/// Render `Category|Technologies` rows as a table. A row with an empty
/// category continues the group above it.
fn skills_lines(text: &str) -> Vec<String> {
    let mut lines = heading("TECHNICAL SKILLS");
    lines.push(rule("┌", "┬", "┐"));
    lines.push(paint(
        BRIGHT_YELLOW,
        &format!(
            "│ {:<cw$} │ {:<tw$} │",
            "Category",
            "Technologies",
            cw = CATEGORY_WIDTH,
            tw = TECH_WIDTH
        ),
    ));

    for row in text.lines().filter(|l| !l.trim().is_empty()) {
        let (category, tech) = row.split_once('|').unwrap_or(("", row));
        if !category.is_empty() {
            lines.push(rule("├", "┼", "┤"));
        }
        let label = format!("│ {:<width$} │", category, width = CATEGORY_WIDTH);
        lines.push(format!(
            "{} {:<width$} {}",
            paint(BRIGHT_GREEN, &label),
            tech,
            paint(BRIGHT_YELLOW, "│"),
            width = TECH_WIDTH
        ));
    }

    lines.push(rule("└", "┴", "┘"));
    lines.push(String::new());
    lines.push(paint(
        BRIGHT_MAGENTA,
        "★ Proficiency Level: Expert ████████░░ (80%)",
    ));
    lines.push(String::new());
    lines
}

fn skills(ctx: &CommandContext) -> CommandResult {
    for line in skills_lines(SKILLS_TEXT) {
        ctx.writeln(&line);
    }
    Ok(EXIT_SUCCESS)
}
