use crate::{
    app::{self, PickerTerminal},
    components::{self, dialog::Dialog},
    keymap,
    prompt::PromptState,
    theme::Theme,
};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::{Color, ResetColor, SetForegroundColor},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use hive_core::{
    orchestrator::{Interaction, PromptReply},
    picker::{Notice, NoticeLevel, PickerOutcome, PickerRequest},
};
use log::warn;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::io::{self, Write};

/// Raw mode plus the alternate screen on stderr, restored on drop
struct Screen {
    terminal: PickerTerminal,
}

impl Screen {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stderr = io::stderr();
        if let Err(e) = execute!(stderr, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stderr))?;
        Ok(Self { terminal })
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("failed to disable raw mode: {e}");
        }
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn read_key() -> Result<Option<KeyEvent>> {
    if event::poll(std::time::Duration::from_millis(250))?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(Some(key));
    }
    Ok(None)
}

/// [`Interaction`] on a real terminal. Every picker, prompt and dialog takes
/// over the screen only while it is open.
pub struct TerminalInteraction {
    theme: Theme,
}

impl TerminalInteraction {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

impl Interaction for TerminalInteraction {
    fn pick(&mut self, request: PickerRequest) -> Result<Option<PickerOutcome>> {
        let mut screen = Screen::enter()?;
        app::run(&mut screen.terminal, request, &self.theme)
    }

    fn prompt_branch(&mut self) -> Result<PromptReply> {
        self.run_prompt(PromptState::branch())
    }

    fn prompt_issue_branch(&mut self, number: u64, title: &str) -> Result<PromptReply> {
        self.run_prompt(PromptState::issue(number, title))
    }

    fn confirm(&mut self, message: &str, warning: Option<&str>) -> Result<bool> {
        let mut screen = Screen::enter()?;
        let theme = &self.theme;
        loop {
            screen.terminal.draw(|f| {
                Dialog::new(components::dialog::confirm_lines(message, warning, theme))
                    .title("Confirm")
                    .border_color(theme.warning)
                    .render(f, f.area());
            })?;
            let Some(key) = read_key()? else { continue };
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(false);
                }
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => return Ok(true),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => return Ok(false),
                _ => {}
            }
        }
    }

    fn notify(&mut self, notice: &Notice) {
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        let mut stderr = io::stderr();
        let _ = execute!(stderr, SetForegroundColor(color));
        let _ = write!(stderr, "{}", notice.message);
        let _ = execute!(stderr, ResetColor);
        let _ = writeln!(stderr);
    }
}

impl TerminalInteraction {
    fn run_prompt(&mut self, mut prompt: PromptState) -> Result<PromptReply> {
        let mut screen = Screen::enter()?;
        let theme = &self.theme;
        loop {
            screen.terminal.draw(|f| {
                let [context, rest] =
                    Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(f.area());
                if let Some(title) = &prompt.context {
                    let line = Line::from(Span::styled(
                        title.as_str(),
                        Style::default()
                            .fg(theme.secondary)
                            .add_modifier(Modifier::BOLD),
                    ));
                    f.render_widget(Paragraph::new(line), context);
                }
                components::prompt::draw(f, rest, &prompt.title, prompt.input(), prompt.hint(), theme);
            })?;
            let Some(key) = read_key()? else { continue };
            if let Some(action) = keymap::resolve_action(key, false)
                && let Some(reply) = prompt.handle(action)
            {
                return Ok(reply);
            }
        }
    }
}
