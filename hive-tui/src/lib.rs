pub mod app;
pub mod components;
pub mod keymap;
pub mod prompt;
pub mod terminal;
pub mod theme;

pub use app::run;
pub use terminal::TerminalInteraction;
pub use theme::Theme;
