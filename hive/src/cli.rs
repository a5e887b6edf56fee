use hive_core::{
    BranchCatalog, Context, EnsureResult, Orchestrator, RepoLocation, Session, WorktreeError,
    WorktreeLayout, WorktreeRecord, WorktreeStore,
    agent::AgentFinder,
    config::Config,
    constants::{ENV_SKIP_PERMISSIONS, MAIN_BRANCH_LABEL},
    editor::available_editors,
    git::GitProvider,
    hooks::run_post_create,
    issues::{GhIssueTracker, IssueCache},
    paths,
};
use hive_tui::{TerminalInteraction, Theme};
use serde::Serialize;
use std::{
    fmt::Write,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    sync::Arc,
};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
    code: i32,
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 2,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<WorktreeError> for CliError {
    fn from(value: WorktreeError) -> Self {
        Self::user(value.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(value: anyhow::Error) -> Self {
        match value.downcast_ref::<WorktreeError>() {
            Some(worktree_error) => Self::user(worktree_error.to_string()),
            None => Self::system(format!("{value:#}")),
        }
    }
}

/// The repository the command runs against, with its config already checked.
pub struct Repository {
    pub location: RepoLocation,
    pub store: WorktreeStore,
    pub config: Config,
}

/// Load the config, refuse when worktrees are disabled and find the
/// repository containing `cwd`.
pub fn open_repo(ctx: &mut Context, git: &Arc<dyn GitProvider>, cwd: &Path) -> CliResult<Repository> {
    let config = ctx.config().map_err(CliError::from)?.clone();
    if !config.worktrees.enabled {
        return Err(WorktreeError::WorktreesDisabled.into());
    }
    let location = RepoLocation::discover(git.as_ref(), cwd).ok_or_else(|| WorktreeError::NotARepository {
        path: cwd.to_path_buf(),
    })?;
    let store = WorktreeStore::new(
        git.clone(),
        location.main_repo.clone(),
        WorktreeLayout::new(config.worktrees.parent_dir.clone()),
    );
    Ok(Repository {
        location,
        store,
        config,
    })
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string(value).map_err(|e| CliError::system(e.to_string()))?
    );
    Ok(())
}

pub fn print_error(error: &CliError, json: bool) {
    if json {
        match serde_json::to_string(&ErrorPayload {
            error: error.message(),
        }) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!("{}", error.message()),
        }
    } else {
        eprintln!("{}", error.message());
    }
}

/// `branch:path` per line, main first.
pub fn format_worktree_list(records: &[WorktreeRecord]) -> String {
    let mut out = String::new();
    for record in records {
        let _ = writeln!(out, "{}:{}", record.branch, record.path.display());
    }
    out
}

pub fn cmd_list(ctx: &mut Context, git: &Arc<dyn GitProvider>, cwd: &Path, json: bool) -> CliResult<()> {
    let repo = open_repo(ctx, git, cwd)?;
    let records = repo.store.list();
    if json {
        print_json(&records)?;
    } else {
        print!("{}", format_worktree_list(&records));
    }
    Ok(())
}

pub fn cmd_path(ctx: &mut Context, git: &Arc<dyn GitProvider>, cwd: &Path, branch: &str) -> CliResult<()> {
    let repo = open_repo(ctx, git, cwd)?;
    println!("{}", repo.store.path_for(branch).display());
    Ok(())
}

pub fn cmd_parent(ctx: &mut Context, git: &Arc<dyn GitProvider>, cwd: &Path) -> CliResult<()> {
    let repo = open_repo(ctx, git, cwd)?;
    println!("{}", repo.store.main_repo().display());
    Ok(())
}

pub fn cmd_base(ctx: &mut Context, git: &Arc<dyn GitProvider>, cwd: &Path) -> CliResult<()> {
    let repo = open_repo(ctx, git, cwd)?;
    println!("{}", repo.store.base_dir().display());
    Ok(())
}

/// Create the worktree and run the post-create hooks; returns its path.
pub fn create_worktree(repo: &Repository, branch: &str, run_hooks: bool) -> CliResult<PathBuf> {
    let path = repo.store.create(branch)?;
    if run_hooks {
        let report = run_post_create(&repo.config.worktrees.post_create, &path);
        for command in &report.failed {
            eprintln!("Warning: post-create hook failed: {command}");
        }
    }
    Ok(path)
}

pub fn cmd_create(
    ctx: &mut Context,
    git: &Arc<dyn GitProvider>,
    cwd: &Path,
    branch: &str,
    no_hooks: bool,
) -> CliResult<()> {
    let repo = open_repo(ctx, git, cwd)?;
    let path = create_worktree(&repo, branch, !no_hooks)?;
    println!("{}", path.display());
    Ok(())
}

pub fn cmd_delete(
    ctx: &mut Context,
    git: &Arc<dyn GitProvider>,
    cwd: &Path,
    branch: &str,
    force: bool,
) -> CliResult<()> {
    let repo = open_repo(ctx, git, cwd)?;
    let path = repo.store.delete_branch(branch, force)?;
    eprintln!("Deleted worktree {}", path.display());
    Ok(())
}

pub fn cmd_exists(ctx: &mut Context, git: &Arc<dyn GitProvider>, cwd: &Path, branch: &str) -> CliResult<bool> {
    let repo = open_repo(ctx, git, cwd)?;
    Ok(repo.store.exists(branch))
}

pub fn cmd_cd(
    ctx: &mut Context,
    git: &Arc<dyn GitProvider>,
    cwd: &Path,
    branch: Option<&str>,
) -> CliResult<()> {
    let repo = open_repo(ctx, git, cwd)?;
    let path = match branch {
        Some(branch) => repo.store.find(branch).ok_or_else(|| WorktreeError::NotFound {
            branch: branch.to_string(),
        })?,
        None => run_interactive(&repo, git, 0)?.path,
    };
    println!("{}", path.display());
    Ok(())
}

/// What `ensure --json` prints: the chosen checkout plus the agent settings
/// the caller should export before launching the agent.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EnsureOutput {
    pub path: PathBuf,
    pub branch: String,
    pub agent: Option<String>,
    pub skip_permissions: bool,
}

impl From<EnsureResult> for EnsureOutput {
    fn from(result: EnsureResult) -> Self {
        Self {
            path: result.path,
            branch: result.branch,
            agent: Some(result.agent),
            skip_permissions: result.skip_permissions,
        }
    }
}

/// Agent 1 skips the picker and always works in the main checkout.
fn main_checkout_output(repo: &Repository) -> EnsureOutput {
    let finder = AgentFinder::new(repo.config.agents.order.clone());
    EnsureOutput {
        path: repo.store.main_repo().to_path_buf(),
        branch: MAIN_BRANCH_LABEL.to_string(),
        agent: finder.detect_from_env().map(|agent| agent.name),
        skip_permissions: skip_permissions_from_env(),
    }
}

pub fn cmd_ensure(
    ctx: &mut Context,
    git: &Arc<dyn GitProvider>,
    cwd: &Path,
    agent: u32,
    json: bool,
) -> CliResult<()> {
    let repo = open_repo(ctx, git, cwd)?;
    let output = if agent == 1 {
        main_checkout_output(&repo)
    } else {
        run_interactive(&repo, git, agent)?.into()
    };
    if json {
        print_json(&output)?;
    } else {
        println!("{}", output.path.display());
    }
    Ok(())
}

fn skip_permissions_from_env() -> bool {
    std::env::var(ENV_SKIP_PERMISSIONS).is_ok_and(|value| value == "1")
}

fn build_catalog(repo: &Repository, git: &Arc<dyn GitProvider>) -> BranchCatalog {
    let main_repo = repo.store.main_repo();
    let catalog = BranchCatalog::new(git.clone(), main_repo);
    let github = &repo.config.github;
    if !github.fetch_issues {
        return catalog;
    }
    let cache = IssueCache::for_remote(&paths::cache_dir(), git.remote_url(main_repo).as_deref());
    catalog.with_issues(Arc::new(GhIssueTracker::default()), cache, github.issue_limit)
}

fn build_orchestrator(repo: &Repository, git: &Arc<dyn GitProvider>, agent: u32) -> CliResult<Orchestrator> {
    let finder = AgentFinder::new(repo.config.agents.order.clone());
    let session = Session::detect(agent, &finder, skip_permissions_from_env())?;
    let worktrees = &repo.config.worktrees;

    let current_branch = if repo.location.in_linked_worktree() {
        git.current_branch(&repo.location.checkout_root)
    } else {
        None
    };

    let mut orchestrator = Orchestrator::new(repo.store.clone(), build_catalog(repo, git), session)
        .with_hooks(worktrees.post_create.clone())
        .with_current_branch(current_branch)
        .with_agents(finder.available())
        .with_editors(available_editors(None));
    if worktrees.auto_select.enabled {
        orchestrator =
            orchestrator.with_auto_select(worktrees.auto_select.branch.clone(), worktrees.auto_select.timeout());
    }
    Ok(orchestrator)
}

fn run_interactive(repo: &Repository, git: &Arc<dyn GitProvider>, agent: u32) -> CliResult<EnsureResult> {
    if !io::stdin().is_terminal() {
        return Err(CliError::user("Interactive selection needs a terminal on stdin"));
    }
    let mut orchestrator = build_orchestrator(repo, git, agent)?;
    let mut ui = TerminalInteraction::new(Theme::from_config(&repo.config.theme));
    let result = orchestrator.ensure(&mut ui)?;
    result.ok_or_else(|| CliError::user("Cancelled"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::{config::load_config_from_str, git::mock::MockGitProvider};

    fn mock_git(main: &str) -> Arc<dyn GitProvider> {
        Arc::new(MockGitProvider {
            toplevel: Some(PathBuf::from(main)),
            common_dir: Some(PathBuf::from(main).join(".git")),
            ..MockGitProvider::default()
        })
    }

    fn context(toml: &str) -> Context {
        Context::with_config(load_config_from_str(toml).unwrap())
    }

    #[test]
    fn open_repo_refuses_when_worktrees_disabled() {
        let mut ctx = context("[worktrees]\nenabled = false\n");
        let git = mock_git("/repo");
        let err = open_repo(&mut ctx, &git, Path::new("/repo")).err().unwrap();
        assert_eq!(err.code(), 1);
        assert_eq!(err.message(), WorktreeError::WorktreesDisabled.to_string());
    }

    #[test]
    fn open_repo_outside_repository_is_user_error() {
        let mut ctx = context("");
        let git: Arc<dyn GitProvider> = Arc::new(MockGitProvider::default());
        let err = open_repo(&mut ctx, &git, Path::new("/nowhere")).err().unwrap();
        assert_eq!(err.code(), 1);
        assert!(err.message().contains("/nowhere"), "{}", err.message());
    }

    #[test]
    fn open_repo_uses_configured_parent_dir() {
        let mut ctx = context("[worktrees]\nparent_dir = \"trees\"\n");
        let git = mock_git("/repo");
        let repo = open_repo(&mut ctx, &git, Path::new("/repo")).unwrap();
        assert_eq!(repo.store.main_repo(), Path::new("/repo"));
        assert_eq!(repo.store.base_dir(), PathBuf::from("/repo/trees"));
        assert!(!repo.location.in_linked_worktree());
    }

    #[test]
    fn worktree_list_puts_main_first() {
        let git = MockGitProvider::default().with_worktree("feat", "/repo/.worktrees/feat");
        let records = git.list_worktrees(Path::new("/repo"));
        assert_eq!(
            format_worktree_list(&records),
            "main:/repo\nfeat:/repo/.worktrees/feat\n"
        );
    }

    #[test]
    fn worktree_errors_are_user_errors() {
        let err = CliError::from(anyhow::Error::new(WorktreeError::NotFound {
            branch: "feat".to_string(),
        }));
        assert_eq!(err.code(), 1);
        assert!(err.message().contains("feat"));
    }

    #[test]
    fn other_errors_are_system_errors() {
        let err = CliError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.code(), 2);
        assert_eq!(err.message(), "disk on fire");
    }

    #[test]
    fn create_refuses_reserved_names() {
        let mut ctx = context("");
        let git = mock_git("/repo");
        let repo = open_repo(&mut ctx, &git, Path::new("/repo")).unwrap();
        let err = create_worktree(&repo, "main", false).unwrap_err();
        assert_eq!(err.code(), 1);
    }

    #[test]
    fn ensure_output_keeps_agent_choice() {
        let output = EnsureOutput::from(EnsureResult {
            path: PathBuf::from("/repo/.worktrees/feat"),
            branch: "feat".into(),
            agent: "codex".into(),
            skip_permissions: true,
        });
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            serde_json::json!({
                "path": "/repo/.worktrees/feat",
                "branch": "feat",
                "agent": "codex",
                "skip_permissions": true,
            })
        );
    }

    #[test]
    fn exists_reports_registered_worktrees() {
        let mut ctx = context("");
        let git: Arc<dyn GitProvider> = Arc::new(
            MockGitProvider {
                toplevel: Some(PathBuf::from("/repo")),
                common_dir: Some(PathBuf::from("/repo/.git")),
                ..MockGitProvider::default()
            }
            .with_worktree("feat", "/repo/.worktrees/feat"),
        );
        assert!(cmd_exists(&mut ctx, &git, Path::new("/repo"), "feat").unwrap());
        assert!(!cmd_exists(&mut ctx, &git, Path::new("/repo"), "other").unwrap());
        assert!(cmd_exists(&mut ctx, &git, Path::new("/repo"), "main").unwrap());
    }
}
