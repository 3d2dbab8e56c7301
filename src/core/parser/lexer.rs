//! Word splitter for command lines.
//!
//! Handles:
//! - Whitespace separation
//! - Single and double quotes (each literal inside the other)
//! - Backslash escapes, inside or outside quotes

// =============================================================================
// Quote State
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

// =============================================================================
// Lexer
// =============================================================================

/// Splits a command line into words.
///
/// Quote characters and escaping backslashes never appear in the output.
/// An unterminated quote or a trailing backslash does not fail: the word
/// collected so far is still emitted. Words that end up empty (such as
/// `""`) are dropped.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenize the entire input into a vector
    pub fn tokenize(self) -> Vec<String> {
        self.collect()
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char() {
            if !c.is_whitespace() {
                break;
            }
            self.advance(c);
        }
    }

    /// Read one word; `None` at end of input.
    fn read_word(&mut self) -> Option<String> {
        let mut word = String::new();
        let mut quote = Quote::None;
        let mut escaped = false;

        while let Some(c) = self.current_char() {
            self.advance(c);

            if escaped {
                word.push(c);
                escaped = false;
                continue;
            }

            match (c, quote) {
                ('\\', _) => escaped = true,
                ('\'', Quote::None) => quote = Quote::Single,
                ('\'', Quote::Single) => quote = Quote::None,
                ('"', Quote::None) => quote = Quote::Double,
                ('"', Quote::Double) => quote = Quote::None,
                (c, Quote::None) if c.is_whitespace() => break,
                (c, _) => word.push(c),
            }
        }

        Some(word)
    }
}

impl Iterator for Lexer<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.skip_whitespace();
            self.current_char()?;
            let word = self.read_word()?;
            if !word.is_empty() {
                return Some(word);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<String> {
        Lexer::new(input).tokenize()
    }

    #[test]
    fn test_simple_words() {
        assert_eq!(words("ls -la /tmp"), vec!["ls", "-la", "/tmp"]);
        assert_eq!(words("  spaced   out  "), vec!["spaced", "out"]);
    }

    #[test]
    fn test_double_quotes_group() {
        assert_eq!(words(r#"a "b c" d"#), vec!["a", "b c", "d"]);
    }

    #[test]
    fn test_quote_of_other_kind_is_literal() {
        assert_eq!(words(r#"echo "it's""#), vec!["echo", "it's"]);
        assert_eq!(words(r#"echo 'say "hi"'"#), vec!["echo", r#"say "hi""#]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(words(r"a 'it\'s' b"), vec!["a", "it's", "b"]);
        assert_eq!(words(r"one\ word"), vec!["one word"]);
        assert_eq!(words(r"back\\slash"), vec![r"back\slash"]);
        assert_eq!(words(r#"\"quoted\""#), vec![r#""quoted""#]);
    }

    #[test]
    fn test_adjacent_quotes_join() {
        assert_eq!(words(r#"pre"mid"'post'"#), vec!["premidpost"]);
    }

    #[test]
    fn test_unterminated_input_still_emits() {
        assert_eq!(words(r#"echo "open quote"#), vec!["echo", "open quote"]);
        assert_eq!(words(r"echo tail\"), vec!["echo", "tail"]);
        assert_eq!(words("echo 'x y"), vec!["echo", "x y"]);
    }

    #[test]
    fn test_empty_quotes_dropped() {
        assert_eq!(words(r#"echo "" ''"#), vec!["echo"]);
        assert!(words("").is_empty());
        assert!(words("   ").is_empty());
    }
}
