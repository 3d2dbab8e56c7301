/// Foreground colour of a screen cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Color {
    #[default]
    Default,
    /// One of the 16 standard colours (0-7 normal, 8-15 bright).
    Ansi(u8),
    /// xterm 256-colour palette index.
    Indexed(u8),
}

const ANSI_PALETTE: [&str; 16] = [
    "#1a1a1a", "#ff5555", "#33ff66", "#f1fa8c", "#6272ff", "#ff79c6", "#8be9fd", "#d0d0d0",
    "#6b6b6b", "#ff6e6e", "#69ff94", "#ffffa5", "#8a9bff", "#ff92df", "#a4ffff", "#ffffff",
];

impl Color {
    /// CSS colour, `None` for the theme default.
    pub fn css(self) -> Option<String> {
        match self {
            Self::Default => None,
            Self::Ansi(n) => ANSI_PALETTE.get(n as usize).map(|c| c.to_string()),
            Self::Indexed(n) if n < 16 => Self::Ansi(n).css(),
            Self::Indexed(n) if n >= 232 => {
                let level = 8 + (n - 232) as u32 * 10;
                Some(format!("#{0:02x}{0:02x}{0:02x}", level))
            }
            Self::Indexed(n) => {
                let n = (n - 16) as u32;
                let scale = |v: u32| if v == 0 { 0 } else { 55 + v * 40 };
                Some(format!(
                    "#{:02x}{:02x}{:02x}",
                    scale(n / 36),
                    scale((n / 6) % 6),
                    scale(n % 6)
                ))
            }
        }
    }
}

/// Rendition attributes set by SGR sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
}

impl Style {
    /// Inline CSS for a span with this style.
    pub fn css(&self) -> String {
        let mut css = String::new();
        if let Some(color) = self.fg.css() {
            css.push_str(&format!("color:{};", color));
        }
        if self.bold {
            css.push_str("font-weight:bold;");
        }
        if self.dim {
            css.push_str("opacity:0.6;");
        }
        if self.italic {
            css.push_str("font-style:italic;");
        }
        css
    }
}

/// One character cell of the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        style: Style {
            fg: Color::Default,
            bold: false,
            dim: false,
            italic: false,
        },
    };
}

/// A contiguous run of equally styled cells, ready to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}
