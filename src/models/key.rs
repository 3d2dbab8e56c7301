//! Keystroke decoding.
//!
//! The line editor consumes raw terminal input (the byte strings an xterm
//! would emit). Browser key events are first mapped to that form by
//! [`data_for_key`], then split into [`KeyInput`]s by [`decode`].

/// One logical keystroke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Enter,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    /// Ctrl+C
    Interrupt,
    /// Ctrl+L
    ClearScreen,
    /// A run of printable ASCII characters (typed or pasted).
    Text(String),
    /// Any other control code or escape sequence.
    Unknown,
}

/// Split raw terminal input into keystrokes.
pub fn decode(data: &str) -> Vec<KeyInput> {
    let mut keys = Vec::new();
    let mut chars = data.chars().peekable();

    while let Some(c) = chars.next() {
        let key = match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                KeyInput::Enter
            }
            '\n' => KeyInput::Enter,
            '\x7f' | '\x08' => KeyInput::Backspace,
            '\t' => KeyInput::Tab,
            '\x03' => KeyInput::Interrupt,
            '\x0c' => KeyInput::ClearScreen,
            '\x1b' => decode_escape(&mut chars),
            ' '..='~' => {
                if let Some(KeyInput::Text(run)) = keys.last_mut() {
                    run.push(c);
                    continue;
                }
                KeyInput::Text(c.to_string())
            }
            _ => KeyInput::Unknown,
        };
        keys.push(key);
    }
    keys
}

fn decode_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> KeyInput {
    match chars.peek() {
        Some('[') => {
            chars.next();
            let mut params = String::new();
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    return csi_key(&params, c);
                }
                params.push(c);
            }
            KeyInput::Unknown
        }
        Some('O') => {
            chars.next();
            match chars.next() {
                Some(c) => csi_key("", c),
                None => KeyInput::Unknown,
            }
        }
        _ => KeyInput::Unknown,
    }
}

fn csi_key(params: &str, final_byte: char) -> KeyInput {
    match (params, final_byte) {
        (_, 'A') => KeyInput::Up,
        (_, 'B') => KeyInput::Down,
        (_, 'C') => KeyInput::Right,
        (_, 'D') => KeyInput::Left,
        (_, 'H') | ("1" | "7", '~') => KeyInput::Home,
        (_, 'F') | ("4" | "8", '~') => KeyInput::End,
        _ => KeyInput::Unknown,
    }
}

/// Terminal input for a browser `KeyboardEvent`, following xterm conventions.
///
/// Returns `None` for keys that produce no input (modifiers, function keys).
pub fn data_for_key(key: &str, ctrl: bool) -> Option<String> {
    if ctrl {
        return match key {
            "c" | "C" => Some("\x03".to_string()),
            "l" | "L" => Some("\x0c".to_string()),
            _ => None,
        };
    }
    let data = match key {
        "Enter" => "\r",
        "Backspace" => "\x7f",
        "Tab" => "\t",
        "ArrowUp" => "\x1b[A",
        "ArrowDown" => "\x1b[B",
        "ArrowRight" => "\x1b[C",
        "ArrowLeft" => "\x1b[D",
        "Home" => "\x1b[H",
        "End" => "\x1b[F",
        other if other.chars().count() == 1 => other,
        _ => return None,
    };
    Some(data.to_string())
}
