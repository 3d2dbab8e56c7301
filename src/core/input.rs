//! Line editor.
//!
//! [`InputManager`] owns the line being typed, the cursor within it, and a
//! recall history. It echoes every edit to a [`Terminal`] and hands
//! submitted lines back to the caller; it never runs commands itself.

use crate::core::commands::Completer;
use crate::core::parser::{self, ParsedCommand};
use crate::core::shell::CommandHistory;
use crate::core::terminal::Terminal;
use crate::models::KeyInput;
use crate::utils::ansi::{BRIGHT_YELLOW, CLEAR_LINE, cursor_left, cursor_right, paint};

const LEFT: &str = "\x1b[D";
const RIGHT: &str = "\x1b[C";

/// What a keystroke did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The line or the screen changed.
    Handled,
    /// Nothing happened: no-op key, or a command is running.
    Ignored,
    /// A non-empty line was submitted. The editor is now running until
    /// [`InputManager::finish`] is called.
    Submit(ParsedCommand),
}

/// Editing state of the prompt line.
///
/// The buffer only ever holds printable ASCII (typed text, recalled lines,
/// completed command names), so byte offsets and columns coincide.
#[derive(Debug, Default)]
pub struct InputManager {
    line: String,
    cursor: usize,
    history: CommandHistory,
    /// Index into `history` while browsing it with Up/Down.
    history_cursor: Option<usize>,
    running: bool,
    prompt: String,
}

impl InputManager {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Release the running flag after the submitted command completed.
    pub fn finish(&mut self) {
        self.running = false;
    }

    /// Print the prompt on a fresh line state.
    pub fn show_prompt(&self, term: &dyn Terminal) {
        term.write(&self.prompt);
    }

    /// Rewrite the current display line: prompt, buffer, then the cursor.
    pub fn redraw(&self, term: &dyn Terminal) {
        term.write("\r");
        term.write(CLEAR_LINE);
        term.write(&self.prompt);
        term.write(&self.line);
        self.place_cursor(term);
    }

    fn place_cursor(&self, term: &dyn Terminal) {
        let behind = self.line.len() - self.cursor;
        if behind > 0 {
            term.write(&cursor_left(behind));
        }
    }

    fn reset_line(&mut self) {
        self.line.clear();
        self.cursor = 0;
        self.history_cursor = None;
    }

    /// Apply one keystroke.
    pub fn handle_key(
        &mut self,
        key: &KeyInput,
        term: &dyn Terminal,
        completer: &dyn Completer,
    ) -> KeyOutcome {
        if self.running {
            return KeyOutcome::Ignored;
        }
        match key {
            KeyInput::Enter => self.submit(term),
            KeyInput::Backspace => self.backspace(term),
            KeyInput::Up => self.recall_older(term),
            KeyInput::Down => self.recall_newer(term),
            KeyInput::Tab => self.complete(term, completer),
            KeyInput::Left => self.move_left(term),
            KeyInput::Right => self.move_right(term),
            KeyInput::Home => self.move_home(term),
            KeyInput::End => self.move_end(term),
            KeyInput::Interrupt => {
                term.write("^C\r\n");
                self.reset_line();
                self.show_prompt(term);
                KeyOutcome::Handled
            }
            KeyInput::ClearScreen => {
                term.clear();
                term.write(&self.prompt);
                term.write(&self.line);
                self.place_cursor(term);
                KeyOutcome::Handled
            }
            KeyInput::Text(text) => self.insert(term, text),
            KeyInput::Unknown => KeyOutcome::Ignored,
        }
    }

    fn submit(&mut self, term: &dyn Terminal) -> KeyOutcome {
        term.write("\r\n");
        let line = std::mem::take(&mut self.line);
        self.reset_line();
        self.history.add(line.trim());

        let parsed = parser::parse(&line);
        if parsed.is_empty() {
            self.show_prompt(term);
            return KeyOutcome::Handled;
        }
        self.running = true;
        KeyOutcome::Submit(parsed)
    }

    fn insert(&mut self, term: &dyn Terminal, text: &str) -> KeyOutcome {
        let text: String = text.chars().filter(|c| matches!(c, ' '..='~')).collect();
        if text.is_empty() {
            return KeyOutcome::Ignored;
        }
        self.line.insert_str(self.cursor, &text);
        self.cursor += text.len();

        term.write(&text);
        let tail = &self.line[self.cursor..];
        if !tail.is_empty() {
            term.write(tail);
            term.write(&cursor_left(tail.len()));
        }
        KeyOutcome::Handled
    }

    fn backspace(&mut self, term: &dyn Terminal) -> KeyOutcome {
        if self.cursor == 0 {
            return KeyOutcome::Ignored;
        }
        self.cursor -= 1;
        self.line.remove(self.cursor);

        let tail = &self.line[self.cursor..];
        if tail.is_empty() {
            term.write("\x08 \x08");
        } else {
            term.write("\x08");
            term.write(tail);
            term.write(" ");
            term.write(&cursor_left(tail.len() + 1));
        }
        KeyOutcome::Handled
    }

    // =========================================================================
    // History
    // =========================================================================

    fn show_recalled(&mut self, term: &dyn Terminal, index: Option<usize>) -> KeyOutcome {
        self.history_cursor = index;
        self.line = index
            .and_then(|i| self.history.get(i))
            .unwrap_or_default()
            .to_string();
        self.cursor = self.line.len();
        self.redraw(term);
        KeyOutcome::Handled
    }

    fn recall_older(&mut self, term: &dyn Terminal) -> KeyOutcome {
        let target = match self.history_cursor {
            None if self.history.is_empty() => return KeyOutcome::Ignored,
            None => self.history.len() - 1,
            Some(0) => return KeyOutcome::Ignored,
            Some(i) => i - 1,
        };
        self.show_recalled(term, Some(target))
    }

    fn recall_newer(&mut self, term: &dyn Terminal) -> KeyOutcome {
        match self.history_cursor {
            None => KeyOutcome::Ignored,
            Some(i) if i + 1 < self.history.len() => self.show_recalled(term, Some(i + 1)),
            Some(_) => self.show_recalled(term, None),
        }
    }

    // =========================================================================
    // Completion
    // =========================================================================

    fn complete(&mut self, term: &dyn Terminal, completer: &dyn Completer) -> KeyOutcome {
        let partial = self.line.trim();
        // Only the command word is completed.
        if partial.is_empty() || partial.contains(char::is_whitespace) {
            return KeyOutcome::Ignored;
        }

        let matches = completer.complete(partial);
        let word_len = partial.len();
        match matches.as_slice() {
            [] => KeyOutcome::Ignored,
            [only] => {
                let suffix = only.get(word_len..).unwrap_or_default().to_string();
                let kept = self.line.trim_end().len();
                if kept < self.line.len() {
                    // Trailing blanks go; the suffix joins the word.
                    self.line.truncate(kept);
                    self.line.push_str(&suffix);
                    self.cursor = self.line.len();
                    self.redraw(term);
                    return KeyOutcome::Handled;
                }
                self.move_end(term);
                if !suffix.is_empty() {
                    self.line.push_str(&suffix);
                    self.cursor = self.line.len();
                    term.write(&suffix);
                }
                KeyOutcome::Handled
            }
            many => {
                term.write("\r\n");
                for name in many {
                    term.writeln(&format!("  {}", paint(BRIGHT_YELLOW, name)));
                }
                term.write(&self.prompt);
                term.write(&self.line);
                self.place_cursor(term);
                KeyOutcome::Handled
            }
        }
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    fn move_left(&mut self, term: &dyn Terminal) -> KeyOutcome {
        if self.cursor == 0 {
            return KeyOutcome::Ignored;
        }
        self.cursor -= 1;
        term.write(LEFT);
        KeyOutcome::Handled
    }

    fn move_right(&mut self, term: &dyn Terminal) -> KeyOutcome {
        if self.cursor >= self.line.len() {
            return KeyOutcome::Ignored;
        }
        self.cursor += 1;
        term.write(RIGHT);
        KeyOutcome::Handled
    }

    fn move_home(&mut self, term: &dyn Terminal) -> KeyOutcome {
        if self.cursor == 0 {
            return KeyOutcome::Ignored;
        }
        term.write(&cursor_left(self.cursor));
        self.cursor = 0;
        KeyOutcome::Handled
    }

    fn move_end(&mut self, term: &dyn Terminal) -> KeyOutcome {
        let ahead = self.line.len() - self.cursor;
        if ahead == 0 {
            return KeyOutcome::Ignored;
        }
        term.write(&cursor_right(ahead));
        self.cursor = self.line.len();
        KeyOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::CommandRegistry;
    use crate::core::commands::tests::command;
    use crate::core::terminal::{ScreenBuffer, Transcript};
    use crate::models::Category;
    use crate::models::key::decode;

    const PROMPT: &str = "$ ";

    fn test_registry() -> CommandRegistry {
        CommandRegistry::new(vec![
            command("test", Category::System),
            command("tea", Category::System),
            command("echo", Category::System),
            command("help", Category::System),
        ])
    }

    /// Feed raw input, returning the last outcome.
    fn feed(
        input: &mut InputManager,
        term: &dyn Terminal,
        completer: &dyn Completer,
        data: &str,
    ) -> KeyOutcome {
        let mut last = KeyOutcome::Ignored;
        for key in decode(data) {
            last = input.handle_key(&key, term, completer);
        }
        last
    }

    #[test]
    fn test_typing_and_submit() {
        let term = Transcript::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);

        feed(&mut input, &term, &registry, "echo  \"a b\"");
        assert_eq!(input.line(), "echo  \"a b\"");
        assert_eq!(input.cursor(), 11);

        let outcome = feed(&mut input, &term, &registry, "\r");
        let KeyOutcome::Submit(parsed) = outcome else {
            panic!("expected submit, got {outcome:?}");
        };
        assert_eq!(parsed.command, "echo");
        assert_eq!(parsed.args, vec!["a b"]);
        assert!(input.is_running());
        assert_eq!(input.line(), "");
        assert_eq!(input.history().get(0), Some("echo  \"a b\""));
        assert!(term.output().ends_with("\r\n"));
    }

    #[test]
    fn test_running_swallows_keys() {
        let term = Transcript::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);

        feed(&mut input, &term, &registry, "help\r");
        term.take();
        assert_eq!(feed(&mut input, &term, &registry, "abc\r"), KeyOutcome::Ignored);
        assert_eq!(input.line(), "");
        assert_eq!(term.output(), "");

        input.finish();
        feed(&mut input, &term, &registry, "x");
        assert_eq!(input.line(), "x");
    }

    #[test]
    fn test_blank_enter_reprompts() {
        let term = Transcript::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);

        assert_eq!(feed(&mut input, &term, &registry, "   \r"), KeyOutcome::Handled);
        assert!(!input.is_running());
        assert!(input.history().is_empty());
        assert!(term.output().ends_with("\r\n$ "));
    }

    #[test]
    fn test_mid_line_insert_and_backspace() {
        let screen = ScreenBuffer::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);
        input.show_prompt(&screen);

        feed(&mut input, &screen, &registry, "ecoh");
        feed(&mut input, &screen, &registry, "\x1b[D\x1b[D");
        assert_eq!(input.cursor(), 2);
        feed(&mut input, &screen, &registry, "h");
        assert_eq!(input.line(), "echoh");
        assert_eq!(screen.plain_lines()[0], "$ echoh");
        assert_eq!(screen.cursor(), (0, 5));

        feed(&mut input, &screen, &registry, "\x1b[C\x1b[C\x7f");
        assert_eq!(input.line(), "echo");
        assert_eq!(screen.plain_lines()[0], "$ echo");
        assert_eq!(screen.cursor(), (0, 6));

        feed(&mut input, &screen, &registry, "\x1b[H\x7f");
        assert_eq!(input.line(), "echo");
        feed(&mut input, &screen, &registry, "\x1b[C\x7f");
        assert_eq!(input.line(), "cho");
        assert_eq!(screen.plain_lines()[0], "$ cho");
        assert_eq!(screen.cursor(), (0, 2));
    }

    #[test]
    fn test_backspace_at_end_erases_cell() {
        let term = Transcript::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);
        feed(&mut input, &term, &registry, "ab");
        term.take();
        feed(&mut input, &term, &registry, "\x7f");
        assert_eq!(term.output(), "\x08 \x08");
        assert_eq!(input.line(), "a");
    }

    #[test]
    fn test_cursor_bounds() {
        let term = Transcript::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);
        assert_eq!(feed(&mut input, &term, &registry, "\x1b[D"), KeyOutcome::Ignored);
        feed(&mut input, &term, &registry, "ab");
        assert_eq!(feed(&mut input, &term, &registry, "\x1b[C"), KeyOutcome::Ignored);
        assert_eq!(feed(&mut input, &term, &registry, "\x1b[H"), KeyOutcome::Handled);
        assert_eq!(input.cursor(), 0);
        assert_eq!(feed(&mut input, &term, &registry, "\x1b[F"), KeyOutcome::Handled);
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_history_navigation() {
        let term = Transcript::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);
        for line in ["echo 1\r", "echo 2\r"] {
            feed(&mut input, &term, &registry, line);
            input.finish();
        }

        feed(&mut input, &term, &registry, "\x1b[A");
        assert_eq!(input.line(), "echo 2");
        feed(&mut input, &term, &registry, "\x1b[A");
        assert_eq!(input.line(), "echo 1");
        // Bounded at the oldest entry.
        assert_eq!(feed(&mut input, &term, &registry, "\x1b[A"), KeyOutcome::Ignored);
        assert_eq!(input.line(), "echo 1");

        feed(&mut input, &term, &registry, "\x1b[B");
        assert_eq!(input.line(), "echo 2");
        feed(&mut input, &term, &registry, "\x1b[B");
        assert_eq!(input.line(), "");
        assert_eq!(feed(&mut input, &term, &registry, "\x1b[B"), KeyOutcome::Ignored);
    }

    #[test]
    fn test_recall_rewrites_line_in_place() {
        let screen = ScreenBuffer::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);
        input.show_prompt(&screen);
        feed(&mut input, &screen, &registry, "echo long line\r");
        input.finish();
        input.show_prompt(&screen);

        feed(&mut input, &screen, &registry, "xyz\x1b[A");
        assert_eq!(screen.plain_lines()[1], "$ echo long line");
        feed(&mut input, &screen, &registry, "\x1b[B");
        assert_eq!(screen.plain_lines()[1], "$");
    }

    #[test]
    fn test_tab_single_match_appends_suffix_once() {
        let term = Transcript::new();
        let registry = CommandRegistry::new(vec![command("test", Category::System)]);
        let mut input = InputManager::new(PROMPT);

        feed(&mut input, &term, &registry, "te");
        term.take();
        assert_eq!(feed(&mut input, &term, &registry, "\t"), KeyOutcome::Handled);
        assert_eq!(input.line(), "test");
        assert_eq!(term.output(), "st");

        term.take();
        feed(&mut input, &term, &registry, "\t");
        assert_eq!(input.line(), "test");
        assert_eq!(term.output(), "");
    }

    #[test]
    fn test_tab_completes_word_with_trailing_space() {
        let term = Transcript::new();
        let registry = CommandRegistry::new(vec![command("test", Category::System)]);
        let mut input = InputManager::new(PROMPT);

        feed(&mut input, &term, &registry, "te ");
        term.take();
        assert_eq!(feed(&mut input, &term, &registry, "\t"), KeyOutcome::Handled);
        assert_eq!(input.line(), "test");
        assert!(term.plain().ends_with("$ test"));
    }

    #[test]
    fn test_tab_multiple_matches_lists_them() {
        let term = Transcript::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);

        feed(&mut input, &term, &registry, "te");
        term.take();
        feed(&mut input, &term, &registry, "\t");
        assert_eq!(input.line(), "te");
        assert_eq!(term.plain(), "\r\n  test\r\n  tea\r\n$ te");
    }

    #[test]
    fn test_tab_ignores_arguments_and_misses() {
        let term = Transcript::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);

        assert_eq!(feed(&mut input, &term, &registry, "\t"), KeyOutcome::Ignored);
        feed(&mut input, &term, &registry, "zz");
        assert_eq!(feed(&mut input, &term, &registry, "\t"), KeyOutcome::Ignored);
        feed(&mut input, &term, &registry, "\x7f\x7fecho te");
        assert_eq!(feed(&mut input, &term, &registry, "\t"), KeyOutcome::Ignored);
        assert_eq!(input.line(), "echo te");
    }

    #[test]
    fn test_interrupt_and_clear_screen() {
        let term = Transcript::new();
        let registry = test_registry();
        let mut input = InputManager::new(PROMPT);

        feed(&mut input, &term, &registry, "half typed");
        term.take();
        feed(&mut input, &term, &registry, "\x03");
        assert_eq!(term.take(), "^C\r\n$ ");
        assert_eq!(input.line(), "");
        assert!(input.history().is_empty());

        feed(&mut input, &term, &registry, "ls");
        term.take();
        feed(&mut input, &term, &registry, "\x0c");
        assert_eq!(term.clears(), 1);
        assert_eq!(term.take(), "$ ls");
    }
}
