use hive_core::{
    config::theme::{NamedColor, ThemeColor, ThemeConfig},
    picker::{ItemStyle, NoticeLevel},
};
use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub accent: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
    pub border: Color,
    pub hint: Color,
    pub highlight_fg: Color,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            accent: to_ratatui_color(config.accent),
            secondary: to_ratatui_color(config.secondary),
            success: to_ratatui_color(config.success),
            warning: to_ratatui_color(config.warning),
            error: to_ratatui_color(config.error),
            muted: to_ratatui_color(config.muted),
            border: to_ratatui_color(config.border),
            hint: to_ratatui_color(config.hint),
            highlight_fg: to_ratatui_color(config.highlight_fg),
        }
    }

    /// Style of a row's text
    pub fn item_style(&self, style: ItemStyle) -> Style {
        match style {
            ItemStyle::Plain => Style::default(),
            ItemStyle::Main => Style::default().fg(self.success).add_modifier(Modifier::BOLD),
            ItemStyle::Clean => Style::default().fg(self.success),
            ItemStyle::Dirty => Style::default().fg(self.warning),
            ItemStyle::Branch => Style::default().fg(self.muted),
            ItemStyle::Issue => Style::default().fg(self.secondary),
        }
    }

    pub fn notice_color(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.secondary,
            NoticeLevel::Success => self.success,
            NoticeLevel::Warning => self.warning,
            NoticeLevel::Error => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn to_ratatui_color(color: ThemeColor) -> Color {
    match color {
        ThemeColor::Rgb(r, g, b) => Color::Rgb(r, g, b),
        ThemeColor::Named(named) => match named {
            NamedColor::Black => Color::Black,
            NamedColor::Red => Color::Red,
            NamedColor::Green => Color::Green,
            NamedColor::Yellow => Color::Yellow,
            NamedColor::Blue => Color::Blue,
            NamedColor::Magenta => Color::Magenta,
            NamedColor::Cyan => Color::Cyan,
            NamedColor::White => Color::White,
            NamedColor::Gray => Color::DarkGray,
        },
    }
}
