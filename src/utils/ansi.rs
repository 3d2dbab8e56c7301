//! ANSI escape helpers shared by commands, the line editor, and the screen.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const ITALIC: &str = "\x1b[3m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";
pub const BLUE: &str = "\x1b[34m";
pub const GRAY: &str = "\x1b[90m";
pub const BRIGHT_RED: &str = "\x1b[91m";
pub const BRIGHT_GREEN: &str = "\x1b[92m";
pub const BRIGHT_YELLOW: &str = "\x1b[93m";
pub const BRIGHT_BLUE: &str = "\x1b[94m";
pub const BRIGHT_MAGENTA: &str = "\x1b[95m";
pub const BRIGHT_CYAN: &str = "\x1b[96m";
pub const BRIGHT_WHITE: &str = "\x1b[97m";

/// Erase from the cursor to the end of the line.
pub const CLEAR_LINE: &str = "\x1b[K";
/// Move the cursor to the top-left corner.
pub const CURSOR_HOME: &str = "\x1b[H";
/// Erase the whole screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Wrap `text` in a colour and a trailing reset.
pub fn paint(color: &str, text: &str) -> String {
    format!("{}{}{}", color, text, RESET)
}

pub fn cursor_left(n: usize) -> String {
    format!("\x1b[{}D", n)
}

pub fn cursor_right(n: usize) -> String {
    format!("\x1b[{}C", n)
}

/// A piece of terminal output: either one printable character or one
/// complete escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Char(&'a str),
    Escape(&'a str),
}

/// Split output into characters and whole escape sequences.
///
/// Only CSI sequences (`ESC [ params final`) are recognized; a lone `ESC`
/// is returned as an escape of its own.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut iter = text.char_indices().peekable();

    while let Some((start, c)) = iter.next() {
        if c != '\x1b' {
            out.push(Segment::Char(&text[start..start + c.len_utf8()]));
            continue;
        }
        let mut end = start + 1;
        if let Some(&(_, '[')) = iter.peek() {
            iter.next();
            end += 1;
            for (i, ch) in iter.by_ref() {
                end = i + ch.len_utf8();
                if ('@'..='~').contains(&ch) {
                    break;
                }
            }
        }
        out.push(Segment::Escape(&text[start..end]));
    }
    out
}

/// Remove every escape sequence, leaving only visible text.
pub fn strip(text: &str) -> String {
    segments(text)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Char(c) => Some(c),
            Segment::Escape(_) => None,
        })
        .collect()
}

/// Number of visible characters in `text`.
pub fn visible_len(text: &str) -> usize {
    segments(text)
        .iter()
        .filter(|s| matches!(s, Segment::Char(_)))
        .count()
}

/// Draw a rounded box around `lines`, with an optional centered title.
pub fn boxed(lines: &[String], title: Option<&str>, border_color: &str, padding: usize) -> Vec<String> {
    let title_width = title.map(|t| visible_len(t) + 4).unwrap_or(0);
    let content_width = lines
        .iter()
        .map(|l| visible_len(l))
        .max()
        .unwrap_or(0)
        .max(title_width);
    let inner = content_width + padding * 2;

    let top = match title {
        Some(t) => {
            let label = format!(" {} ", t);
            let remaining = inner.saturating_sub(visible_len(&label));
            let left = remaining / 2;
            format!("╭{}{}{}╮", "─".repeat(left), label, "─".repeat(remaining - left))
        }
        None => format!("╭{}╮", "─".repeat(inner)),
    };

    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(paint(border_color, &top));
    for line in lines {
        let fill = content_width - visible_len(line);
        out.push(format!(
            "{}{}{}{}{}",
            paint(border_color, "│"),
            " ".repeat(padding),
            line,
            " ".repeat(fill + padding),
            paint(border_color, "│"),
        ));
    }
    out.push(paint(border_color, &format!("╰{}╯", "─".repeat(inner))));
    out
}

/// Width of the double-line section banners.
pub const BANNER_WIDTH: usize = 59;

/// Three-line double-bordered heading with `title` centered.
pub fn banner(title: &str, color: &str) -> Vec<String> {
    let width = BANNER_WIDTH.max(visible_len(title) + 2);
    let remaining = width - visible_len(title);
    let left = remaining / 2;
    vec![
        paint(color, &format!("╔{}╗", "═".repeat(width))),
        paint(
            color,
            &format!("║{}{}{}║", " ".repeat(left), title, " ".repeat(remaining - left)),
        ),
        paint(color, &format!("╚{}╝", "═".repeat(width))),
    ]
}
