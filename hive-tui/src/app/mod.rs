pub(crate) mod actions;
mod spawn;

use crate::{components, keymap, keymap::Action, theme::Theme};
use actions::apply_edit;
use crossterm::event::{self, Event, KeyEventKind};
use hive_core::{
    event::PickerEvent,
    picker::{Countdown, Notice, PickerModel, PickerOutcome, PickerRequest},
    timer::{AutoSelect, AutoSelectTimer, ResolveGuard},
};
use log::debug;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
};
use spawn::PendingRefreshers;
use std::{io, sync::mpsc, time::Duration};

/// The picker draws on stderr so stdout stays free for the chosen path
pub type PickerTerminal = Terminal<CrosstermBackend<io::Stderr>>;

const POLL_INTERVAL: Duration = Duration::from_millis(80);
const SEARCH_PLACEHOLDER: &str = "Type to filter...";

/// How one picker invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Resolved(PickerOutcome),
    Cancelled,
}

impl Exit {
    pub fn into_outcome(self) -> Option<PickerOutcome> {
        match self {
            Self::Resolved(outcome) => Some(outcome),
            Self::Cancelled => None,
        }
    }
}

/// Foreground state of one picker: the model plus what the keys resolve to
pub struct PickerApp {
    pub model: PickerModel,
    hint: String,
    notice: Option<Notice>,
    on_escape: Option<PickerOutcome>,
    item_actions: bool,
    guard: ResolveGuard,
    timer: Option<AutoSelectTimer>,
}

impl PickerApp {
    /// Build the foreground state, handing back the parts that run in the background
    pub fn new(request: PickerRequest) -> (Self, PendingWork) {
        let PickerRequest {
            items,
            header,
            hint,
            initial_selection,
            on_escape,
            item_actions,
            refreshers,
            auto_select,
            notice,
        } = request;

        let mut model = PickerModel::new(items, header);
        if let Some(value) = initial_selection {
            model.select_value(&value);
        }
        let app = Self {
            model,
            hint,
            notice,
            on_escape,
            item_actions,
            guard: ResolveGuard::new(),
            timer: None,
        };
        let work = PendingWork {
            refreshers: PendingRefreshers::spawn(refreshers),
            auto_select,
        };
        (app, work)
    }

    fn start_timer(&mut self, auto: AutoSelect, tx: &mpsc::Sender<PickerEvent>) {
        debug!("auto-select {} in {:?}", auto.target, auto.timeout);
        self.timer = Some(AutoSelectTimer::start(auto, self.guard.clone(), tx.clone()));
    }

    fn cancel_auto_select(&mut self) {
        if let Some(timer) = &self.timer
            && timer.cancel()
        {
            debug!("auto-select cancelled by input");
        }
        self.model.header.countdown = None;
    }

    fn timer_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(AutoSelectTimer::is_pending)
    }

    /// Claim the resolution; loses when the timer already fired
    fn resolve(&self, outcome: PickerOutcome) -> Option<Exit> {
        self.guard.claim().then_some(Exit::Resolved(outcome))
    }

    /// Handle events from background threads
    pub fn process_event(&mut self, event: PickerEvent) -> Option<Exit> {
        match event {
            PickerEvent::Refreshed(snapshot) => self.model.merge(snapshot),
            PickerEvent::Status(change) => self.model.apply_status(change),
            PickerEvent::Countdown { target, seconds } => {
                if self.timer_pending() {
                    self.model.header.countdown = Some(Countdown { target, seconds });
                }
            }
            PickerEvent::AutoSelected(value) => {
                return Some(Exit::Resolved(PickerOutcome::from_value(&value)));
            }
        }
        None
    }

    /// Handle one key action. Any key stops a pending auto-select.
    pub fn process_action(&mut self, action: Action) -> Option<Exit> {
        self.cancel_auto_select();

        match action {
            Action::Cancel => self.guard.claim().then_some(Exit::Cancelled),
            Action::Escape => match self.on_escape.clone() {
                Some(outcome) => self.resolve(outcome),
                None => self.guard.claim().then_some(Exit::Cancelled),
            },
            // nothing highlighted (no matches): Enter does nothing
            Action::Select => {
                let value = self.model.selected_value()?;
                self.resolve(PickerOutcome::from_value(value))
            }
            Action::MoveSelection(delta) => {
                self.model.move_selection(delta);
                None
            }
            Action::Delete => {
                let value = self.selected_branch()?;
                self.resolve(PickerOutcome::Delete(value))
            }
            Action::OpenEditor => {
                let value = self.selected_branch()?;
                self.resolve(PickerOutcome::OpenEditor(value))
            }
            Action::ChangeAgent => self.resolve(PickerOutcome::ChangeAgent),
            Action::ToggleSkipPermissions => self.resolve(PickerOutcome::ToggleSkipPermissions),
            edit => {
                self.model.edit_query(|input| {
                    apply_edit(input, edit);
                });
                None
            }
        }
    }

    /// Row actions apply to branch rows only
    fn selected_branch(&self) -> Option<String> {
        self.model
            .selected_value()
            .filter(|value| PickerOutcome::is_branch_value(value))
            .map(str::to_string)
    }

    pub fn draw(&mut self, f: &mut Frame, theme: &Theme) {
        let notice_rows = u16::from(self.notice.is_some());
        let [header, search, list, notice, hint] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(notice_rows),
            Constraint::Length(1),
        ])
        .areas(f.area());

        components::header::draw(f, header, &self.model.header, theme);
        components::search_bar::draw(f, search, self.model.input(), SEARCH_PLACEHOLDER, theme);
        components::item_list::draw(f, list, &mut self.model, theme);
        if let Some(n) = &self.notice {
            components::notice_bar::draw(f, notice, n, theme);
        }
        components::hint_bar::draw(f, hint, &self.hint, theme);
    }
}

impl Drop for PickerApp {
    fn drop(&mut self) {
        if let Some(timer) = &self.timer {
            timer.cancel();
        }
    }
}

/// Background parts of a request, started by [`run`]
pub struct PendingWork {
    refreshers: PendingRefreshers,
    auto_select: Option<AutoSelect>,
}

/// Run one picker until it resolves. `None` means the user cancelled.
pub fn run(
    terminal: &mut PickerTerminal,
    request: PickerRequest,
    theme: &Theme,
) -> anyhow::Result<Option<PickerOutcome>> {
    let (tx, rx) = mpsc::channel::<PickerEvent>();
    let (mut app, mut work) = PickerApp::new(request);
    if let Some(auto) = work.auto_select.take() {
        app.start_timer(auto, &tx);
    }

    loop {
        terminal.draw(|f| app.draw(f, theme))?;
        // the first frame is up, so refreshers may start reporting
        work.refreshers.publish(&tx);

        // Check background channel (non-blocking)
        if let Ok(picker_event) = rx.try_recv() {
            if let Some(exit) = app.process_event(picker_event) {
                return Ok(exit.into_outcome());
            }
            continue;
        }

        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(action) = keymap::resolve_action(key, app.item_actions)
                && let Some(exit) = app.process_action(action)
            {
                return Ok(exit.into_outcome());
            }
        }
    }
}
