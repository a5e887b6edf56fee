mod cli;
mod logging;

use clap::{Parser, Subcommand};
use hive_core::{
    Context,
    git::{CliGitProvider, GitProvider},
};
use log::LevelFilter;
use std::{path::PathBuf, process::ExitCode, str::FromStr, sync::Arc};

#[derive(Parser)]
#[command(version, about = "Git worktree manager for running coding agents side by side")]
struct Cli {
    /// Override path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level for the log file (defaults to $HIVE_LOG, then warn)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick or create the worktree for an agent and print its path
    Ensure {
        agent: u32,
        /// Print path, branch, agent and skip-permissions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a worktree path, picking one interactively without a branch
    Cd { branch: Option<String> },
    /// List worktrees as branch:path, main first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print where a branch's worktree lives or would be created
    Path { branch: String },
    /// Print the main repository path
    Parent,
    /// Print the directory that holds the worktrees
    Base,
    /// Create a worktree and print its path
    Create {
        branch: String,
        /// Skip the configured post-create hooks
        #[arg(long)]
        no_hooks: bool,
    },
    /// Delete a worktree
    Delete {
        branch: String,
        /// Delete even with uncommitted changes
        #[arg(long)]
        force: bool,
    },
    /// Exit 0 when a worktree exists for the branch, 1 otherwise
    Exists { branch: String },
}

fn command_wants_json(command: &Commands) -> bool {
    matches!(
        command,
        Commands::List { json: true } | Commands::Ensure { json: true, .. }
    )
}

fn log_level(cli_value: Option<&str>) -> LevelFilter {
    let raw = cli_value
        .map(str::to_string)
        .or_else(|| std::env::var(logging::LOG_LEVEL_ENV).ok())
        .unwrap_or_else(|| logging::DEFAULT_LOG_LEVEL.to_string());
    LevelFilter::from_str(&raw).unwrap_or(LevelFilter::Warn)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_errors = command_wants_json(&cli.command);

    if let Err(e) = logging::setup_logging(log_level(cli.log_level.as_deref())) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            cli::print_error(&cli::CliError::system(e.to_string()), json_errors);
            return ExitCode::from(2);
        }
    };
    let mut ctx = Context::new(cli.config);
    let git: Arc<dyn GitProvider> = Arc::new(CliGitProvider);

    let result = match cli.command {
        Commands::Ensure { agent, json } => cli::cmd_ensure(&mut ctx, &git, &cwd, agent, json),
        Commands::Cd { branch } => cli::cmd_cd(&mut ctx, &git, &cwd, branch.as_deref()),
        Commands::List { json } => cli::cmd_list(&mut ctx, &git, &cwd, json),
        Commands::Path { branch } => cli::cmd_path(&mut ctx, &git, &cwd, &branch),
        Commands::Parent => cli::cmd_parent(&mut ctx, &git, &cwd),
        Commands::Base => cli::cmd_base(&mut ctx, &git, &cwd),
        Commands::Create { branch, no_hooks } => {
            cli::cmd_create(&mut ctx, &git, &cwd, &branch, no_hooks)
        }
        Commands::Delete { branch, force } => {
            cli::cmd_delete(&mut ctx, &git, &cwd, &branch, force)
        }
        Commands::Exists { branch } => match cli::cmd_exists(&mut ctx, &git, &cwd, &branch) {
            Ok(true) => return ExitCode::SUCCESS,
            Ok(false) => return ExitCode::from(1),
            Err(error) => Err(error),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            cli::print_error(&error, json_errors);
            let code: u8 = match error.code() {
                1 => 1,
                _ => 2,
            };
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["hive", "list", "--json", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(command_wants_json(&cli.command));
    }

    #[test]
    fn ensure_takes_agent_number() {
        let cli = Cli::try_parse_from(["hive", "ensure", "3"]).unwrap();
        assert!(matches!(cli.command, Commands::Ensure { agent: 3, json: false }));
        let cli = Cli::try_parse_from(["hive", "ensure", "2", "--json"]).unwrap();
        assert!(command_wants_json(&cli.command));
        assert!(Cli::try_parse_from(["hive", "ensure", "x"]).is_err());
    }

    #[test]
    fn explicit_log_level_wins() {
        assert_eq!(log_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(log_level(Some("nonsense")), LevelFilter::Warn);
    }
}
