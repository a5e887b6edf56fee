use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Colours of the picker. Any key left out keeps its default.
///
/// ```toml
/// [theme]
/// accent = "blue"
/// warning = "#ffaf00"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ThemeConfig {
    /// Search prompt and selection marker (default: "magenta").
    pub accent: ThemeColor,
    /// Issue rows (default: "cyan").
    pub secondary: ThemeColor,
    /// Clean worktrees and the main checkout (default: "green").
    pub success: ThemeColor,
    /// Dirty worktrees (default: "yellow").
    pub warning: ThemeColor,
    /// Failure notices (default: "red").
    pub error: ThemeColor,
    /// Branches without a worktree and row metadata (default: "gray").
    pub muted: ThemeColor,
    pub border: ThemeColor,
    /// Key names in the hint bar (default: "blue").
    pub hint: ThemeColor,
    /// Text of the highlighted row (default: "white").
    pub highlight_fg: ThemeColor,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        use NamedColor::{Blue, Cyan, Gray, Green, Magenta, Red, White, Yellow};
        Self {
            accent: ThemeColor::Named(Magenta),
            secondary: ThemeColor::Named(Cyan),
            success: ThemeColor::Named(Green),
            warning: ThemeColor::Named(Yellow),
            error: ThemeColor::Named(Red),
            muted: ThemeColor::Named(Gray),
            border: ThemeColor::Named(Gray),
            hint: ThemeColor::Named(Blue),
            highlight_fg: ThemeColor::Named(White),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ThemeColor {
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

const NAMED_COLORS: [(&str, NamedColor); 9] = [
    ("black", NamedColor::Black),
    ("blue", NamedColor::Blue),
    ("cyan", NamedColor::Cyan),
    ("gray", NamedColor::Gray),
    ("green", NamedColor::Green),
    ("magenta", NamedColor::Magenta),
    ("red", NamedColor::Red),
    ("white", NamedColor::White),
    ("yellow", NamedColor::Yellow),
];

impl NamedColor {
    pub fn as_str(self) -> &'static str {
        NAMED_COLORS
            .iter()
            .find(|(_, color)| *color == self)
            .map_or("white", |(name, _)| name)
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => f.write_str(named.as_str()),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl FromStr for ThemeColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            format!(
                "invalid color '{s}': expected a named color (black, red, green, yellow, blue, magenta, cyan, white, gray/grey) or hex (#rrggbb)"
            )
        };
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
            return Ok(Self::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }
        let name = s.to_lowercase();
        let name = if name == "grey" { "gray" } else { name.as_str() };
        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, color)| Self::Named(*color))
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for ThemeColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("RED".parse(), Ok(ThemeColor::Named(NamedColor::Red)));
        assert_eq!("grey".parse(), Ok(ThemeColor::Named(NamedColor::Gray)));
    }

    #[test]
    fn parses_hex() {
        assert_eq!("#ff00aa".parse(), Ok(ThemeColor::Rgb(255, 0, 170)));
        assert!("#fff".parse::<ThemeColor>().is_err());
        assert!("#zzzzzz".parse::<ThemeColor>().is_err());
        assert!("#ééé".parse::<ThemeColor>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for color in [ThemeColor::Named(NamedColor::Cyan), ThemeColor::Rgb(1, 2, 3)] {
            assert_eq!(color.to_string().parse(), Ok(color));
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "notacolor".parse::<ThemeColor>().unwrap_err();
        assert!(err.contains("invalid color"), "{err}");
    }
}
