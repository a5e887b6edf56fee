use crate::{
    agent::AgentFinder,
    catalog::BranchCatalog,
    config::PostCreateHook,
    constants::{DEFAULT_BRANCH_SENTINEL, MAIN_BRANCH_LABEL, PROTECTED_BRANCHES, is_main_alias},
    editor::Editor,
    handoff::write_agent_context,
    hooks::run_post_create,
    issues::note::write_task_note,
    picker::{Header, ItemStyle, Notice, NoticeLevel, PickerItem, PickerOutcome, PickerRequest},
    rows::RowBuilder,
    store::WorktreeStore,
    timer::AutoSelect,
};
use anyhow::{Result, bail};
use chrono::Local;
use log::{debug, info, warn};
use std::{path::PathBuf, time::Duration};

/// Reply from a free-text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    Value(String),
    /// Go back to the picker
    Back,
    /// Abandon the whole flow
    Cancelled,
}

/// The user-facing side of an ensure flow. Errors are terminal failures, not
/// user choices; cancelling is expressed in the return values.
pub trait Interaction {
    /// Show a picker; `None` when the user cancelled it.
    fn pick(&mut self, request: PickerRequest) -> Result<Option<PickerOutcome>>;
    fn prompt_branch(&mut self) -> Result<PromptReply>;
    /// Prompt pre-filled with the issue's branch prefix
    fn prompt_issue_branch(&mut self, number: u64, title: &str) -> Result<PromptReply>;
    fn confirm(&mut self, message: &str, warning: Option<&str>) -> Result<bool>;
    fn notify(&mut self, notice: &Notice);
}

/// Agent choice carried through the flow and handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub agent_number: u32,
    pub agent: String,
    pub skip_permissions: bool,
}

impl Session {
    /// Session for the first installed agent (or `HIVE_AGENT`), failing with
    /// the configured order when none is installed.
    pub fn detect(agent_number: u32, finder: &AgentFinder, skip_permissions: bool) -> Result<Self> {
        let Some(agent) = finder.detect_from_env() else {
            bail!(
                "Can't find installed agent that matches configuration: {}",
                finder.order().join(", ")
            );
        };
        Ok(Self {
            agent_number,
            agent: agent.name,
            skip_permissions,
        })
    }

    pub fn title(&self) -> String {
        let skip = if self.skip_permissions {
            " [skip-perms]"
        } else {
            ""
        };
        format!(
            "Agent {} [{}]{skip} - Select worktree or branch",
            self.agent_number, self.agent
        )
    }

    pub fn hint(&self) -> String {
        let skip = if self.skip_permissions { "ON" } else { "OFF" };
        format!("↑↓ nav  Enter open  ^O editor  ^D del  ^A agent  ^S skip-perms:{skip}  Esc new  ^C quit")
    }
}

/// Where the ensure flow landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsureResult {
    pub path: PathBuf,
    pub branch: String,
    pub agent: String,
    pub skip_permissions: bool,
}

enum Step {
    Done(PathBuf, String),
    Back,
    Cancelled,
}

/// Drives one "put me in a worktree" request from picker to path.
pub struct Orchestrator {
    store: WorktreeStore,
    catalog: BranchCatalog,
    session: Session,
    hooks: Vec<PostCreateHook>,
    auto_select: Option<(String, Duration)>,
    current_branch: Option<String>,
    preselect: Option<String>,
    agents: Vec<String>,
    editors: Vec<Editor>,
    pending_notice: Option<Notice>,
}

impl Orchestrator {
    pub fn new(store: WorktreeStore, catalog: BranchCatalog, session: Session) -> Self {
        Self {
            store,
            catalog,
            session,
            hooks: Vec::new(),
            auto_select: None,
            current_branch: None,
            preselect: None,
            agents: Vec::new(),
            editors: Vec::new(),
            pending_notice: None,
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: Vec<PostCreateHook>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Pick `branch` (`-` for the default branch) after `timeout` on the first picker
    #[must_use]
    pub fn with_auto_select(mut self, branch: impl Into<String>, timeout: Duration) -> Self {
        self.auto_select = Some((branch.into(), timeout));
        self
    }

    /// Branch of the worktree the command runs in
    #[must_use]
    pub fn with_current_branch(mut self, branch: Option<String>) -> Self {
        self.current_branch = branch;
        self
    }

    #[must_use]
    pub fn with_preselect(mut self, branch: Option<String>) -> Self {
        self.preselect = branch;
        self
    }

    /// Agents offered by change-agent
    #[must_use]
    pub fn with_agents(mut self, agents: Vec<String>) -> Self {
        self.agents = agents;
        self
    }

    /// Installed editors offered by open-in-editor
    #[must_use]
    pub fn with_editors(mut self, editors: Vec<Editor>) -> Self {
        self.editors = editors;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the picker loop until a worktree is chosen. `None` means cancelled.
    pub fn ensure(&mut self, ui: &mut dyn Interaction) -> Result<Option<EnsureResult>> {
        let mut auto = self.resolve_auto_select();
        let mut queued = auto
            .take_if(|auto| auto.is_immediate())
            .map(|auto| PickerOutcome::Select(auto.target));

        loop {
            let outcome = match queued.take() {
                Some(outcome) => outcome,
                None => {
                    let request = self.picker_request(auto.take());
                    match ui.pick(request)? {
                        Some(outcome) => outcome,
                        None => return Ok(None),
                    }
                }
            };
            debug!("picker outcome: {outcome:?}");

            let step = match outcome {
                PickerOutcome::Select(branch) => self.open_branch(&branch, ui),
                PickerOutcome::CreateBranch => self.new_branch_flow(ui)?,
                PickerOutcome::Issue { number, title } => self.issue_flow(number, &title, ui)?,
                PickerOutcome::Delete(branch) => {
                    self.delete_flow(&branch, ui)?;
                    Step::Back
                }
                PickerOutcome::OpenEditor(branch) => self.editor_flow(&branch, ui)?,
                PickerOutcome::ChangeAgent => self.change_agent(ui)?,
                PickerOutcome::ToggleSkipPermissions => {
                    self.session.skip_permissions = !self.session.skip_permissions;
                    Step::Back
                }
            };

            match step {
                Step::Done(path, branch) => {
                    return Ok(Some(EnsureResult {
                        path,
                        branch,
                        agent: self.session.agent.clone(),
                        skip_permissions: self.session.skip_permissions,
                    }));
                }
                Step::Back => {}
                Step::Cancelled => return Ok(None),
            }
        }
    }

    fn resolve_auto_select(&self) -> Option<AutoSelect> {
        let (branch, timeout) = self.auto_select.as_ref()?;
        let mut target = if branch == DEFAULT_BRANCH_SENTINEL {
            self.store.default_branch()
        } else {
            branch.clone()
        };
        if self.store.main_branch().as_deref() == Some(target.as_str()) {
            target = MAIN_BRANCH_LABEL.to_string();
        }
        Some(AutoSelect::new(target, *timeout))
    }

    fn picker_request(&mut self, auto_select: Option<AutoSelect>) -> PickerRequest {
        let rows = RowBuilder::new(
            self.store.clone(),
            self.catalog.clone(),
            self.current_branch.clone(),
        );
        let mut refreshers = vec![rows.branch_refresher()];
        if self.catalog.issues_enabled() {
            refreshers.push(rows.issue_refresher());
        }
        PickerRequest {
            items: rows.fast_rows(),
            header: Header::new(self.session.title()).fetching(true),
            hint: self.session.hint(),
            initial_selection: rows.initial_selection(self.preselect.as_deref()),
            on_escape: Some(PickerOutcome::CreateBranch),
            item_actions: true,
            refreshers,
            auto_select,
            notice: self.pending_notice.take(),
        }
    }

    fn notify(&mut self, ui: &mut dyn Interaction, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice::new(level, message);
        ui.notify(&notice);
        self.pending_notice = Some(notice);
    }

    fn main_result(&self) -> Step {
        Step::Done(self.store.main_repo().to_path_buf(), MAIN_BRANCH_LABEL.to_string())
    }

    fn open_branch(&mut self, branch: &str, ui: &mut dyn Interaction) -> Step {
        if is_main_alias(branch) {
            return self.main_result();
        }
        if let Some(path) = self.store.find(branch) {
            if self.store.is_dirty(&path) {
                self.notify(ui, NoticeLevel::Warning, format!("⚠ Uncommitted changes in '{branch}'"));
            }
            return Step::Done(path, branch.to_string());
        }
        match self.create_worktree(branch, ui) {
            Some(path) => Step::Done(path, branch.to_string()),
            None => Step::Back,
        }
    }

    /// Create, then run the hooks. Failures become notices and `None`.
    fn create_worktree(&mut self, branch: &str, ui: &mut dyn Interaction) -> Option<PathBuf> {
        self.notify(ui, NoticeLevel::Info, format!("Creating worktree for: {branch}"));
        let path = match self.store.create(branch) {
            Ok(path) => path,
            Err(e) => {
                self.notify(ui, NoticeLevel::Error, format!("Failed to create worktree: {e}"));
                return None;
            }
        };
        self.notify(
            ui,
            NoticeLevel::Success,
            format!("Created worktree at {}", path.display()),
        );

        if !self.hooks.is_empty() {
            self.notify(ui, NoticeLevel::Info, "Running post-create hooks...");
            let report = run_post_create(&self.hooks, &path);
            if report.all_succeeded() {
                self.notify(ui, NoticeLevel::Success, "Post-create hooks finished");
            } else {
                self.notify(
                    ui,
                    NoticeLevel::Warning,
                    format!("Some post-create hooks failed: {}", report.failed.join(", ")),
                );
            }
        }

        // agent 0 is a plain `cd`, nobody to brief
        if self.session.agent_number > 0
            && let Err(e) = write_agent_context(
                self.store.main_repo(),
                &path,
                self.session.agent_number,
                branch,
                Local::now(),
            )
        {
            warn!("could not write agent context in {}: {e}", path.display());
        }
        Some(path)
    }

    /// Shared checks for a typed branch name; `None` after warning the user
    fn validate_new_branch(&mut self, name: &str, ui: &mut dyn Interaction) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if PROTECTED_BRANCHES.contains(&name) || is_main_alias(name) {
            self.notify(ui, NoticeLevel::Warning, "Cannot create worktree for default branch");
            return None;
        }
        if self.store.exists(name) {
            self.notify(
                ui,
                NoticeLevel::Warning,
                format!("Worktree for '{name}' already exists"),
            );
            return None;
        }
        Some(name.to_string())
    }

    fn new_branch_flow(&mut self, ui: &mut dyn Interaction) -> Result<Step> {
        let name = match ui.prompt_branch()? {
            PromptReply::Value(name) => name,
            PromptReply::Back => return Ok(Step::Back),
            PromptReply::Cancelled => return Ok(Step::Cancelled),
        };
        let Some(branch) = self.validate_new_branch(&name, ui) else {
            return Ok(Step::Back);
        };
        Ok(match self.create_worktree(&branch, ui) {
            Some(path) => Step::Done(path, branch),
            None => Step::Back,
        })
    }

    fn issue_flow(&mut self, number: u64, title: &str, ui: &mut dyn Interaction) -> Result<Step> {
        let name = match ui.prompt_issue_branch(number, title)? {
            PromptReply::Value(name) => name,
            PromptReply::Back => return Ok(Step::Back),
            PromptReply::Cancelled => return Ok(Step::Cancelled),
        };
        let Some(branch) = self.validate_new_branch(&name, ui) else {
            return Ok(Step::Back);
        };
        let Some(path) = self.create_worktree(&branch, ui) else {
            return Ok(Step::Back);
        };

        match self.catalog.issue_details(number) {
            Some(details) => match write_task_note(&path, &details) {
                Ok(_) => self.notify(
                    ui,
                    NoticeLevel::Info,
                    "Created .claude/task.local.md with issue details",
                ),
                Err(e) => self.notify(
                    ui,
                    NoticeLevel::Warning,
                    format!("Could not write task note: {e}"),
                ),
            },
            None => debug!("no details for issue #{number}, skipping task note"),
        }
        Ok(Step::Done(path, branch))
    }

    fn delete_flow(&mut self, branch: &str, ui: &mut dyn Interaction) -> Result<()> {
        if PROTECTED_BRANCHES.contains(&branch) || is_main_alias(branch) {
            self.notify(ui, NoticeLevel::Warning, "Cannot delete main repository");
            return Ok(());
        }
        let Some(path) = self.store.find(branch) else {
            self.notify(
                ui,
                NoticeLevel::Warning,
                format!("No worktree exists for '{branch}'"),
            );
            return Ok(());
        };

        let warning = self
            .store
            .is_dirty(&path)
            .then_some("⚠ Uncommitted changes will be lost!");
        if !ui.confirm(&format!("Delete worktree '{branch}'?"), warning)? {
            return Ok(());
        }
        match self.store.delete(&path, true) {
            Ok(()) => {
                info!("deleted worktree for {branch}");
                self.notify(ui, NoticeLevel::Success, "Worktree deleted");
            }
            Err(e) => self.notify(ui, NoticeLevel::Error, format!("Failed to delete: {e}")),
        }
        Ok(())
    }

    fn editor_flow(&mut self, branch: &str, ui: &mut dyn Interaction) -> Result<Step> {
        let (path, branch) = if is_main_alias(branch) {
            (self.store.main_repo().to_path_buf(), MAIN_BRANCH_LABEL.to_string())
        } else if let Some(path) = self.store.find(branch) {
            (path, branch.to_string())
        } else {
            match self.create_worktree(branch, ui) {
                Some(path) => (path, branch.to_string()),
                None => return Ok(Step::Back),
            }
        };

        let editor = match self.editors.as_slice() {
            [] => {
                self.notify(
                    ui,
                    NoticeLevel::Error,
                    "No supported editors found (code, pycharm, cursor)",
                );
                return Ok(Step::Back);
            }
            [only] => *only,
            editors => {
                let items = editors
                    .iter()
                    .map(|e| PickerItem::new(e.name, e.name))
                    .collect();
                let chosen = match ui.pick(PickerRequest::simple("Select editor", items))? {
                    Some(PickerOutcome::Select(name)) => editors.iter().find(|e| e.name == name),
                    _ => None,
                };
                match chosen {
                    Some(editor) => *editor,
                    None => return Ok(Step::Back),
                }
            }
        };

        self.notify(ui, NoticeLevel::Info, format!("Opening in {}...", editor.name));
        Ok(match editor.open(&path) {
            Ok(()) => Step::Done(path, branch),
            Err(e) => {
                self.notify(ui, NoticeLevel::Error, format!("{e:#}"));
                Step::Back
            }
        })
    }

    fn change_agent(&mut self, ui: &mut dyn Interaction) -> Result<Step> {
        if self.agents.is_empty() {
            self.notify(ui, NoticeLevel::Error, "No supported agents found in PATH");
            return Ok(Step::Back);
        }
        let items = self
            .agents
            .iter()
            .map(|agent| {
                let item = PickerItem::plain(agent.clone());
                if *agent == self.session.agent {
                    item.with_meta("← current").with_style(ItemStyle::Clean)
                } else {
                    item
                }
            })
            .collect();
        let mut request = PickerRequest::simple("Select agent", items);
        request.initial_selection = Some(self.session.agent.clone());

        if let Some(PickerOutcome::Select(agent)) = ui.pick(request)? {
            info!("switching agent to {agent}");
            self.session.agent = agent;
        }
        Ok(Step::Back)
    }
}
