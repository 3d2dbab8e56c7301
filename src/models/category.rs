use std::fmt;

/// Closed set of command groups, used to organize `help`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Portfolio,
    System,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Portfolio, Category::System];

    /// Heading used by `help`.
    pub fn title(self) -> &'static str {
        match self {
            Self::Portfolio => "Portfolio & Information",
            Self::System => "System Commands",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Portfolio => write!(f, "portfolio"),
            Self::System => write!(f, "system"),
        }
    }
}
