use crate::config::PostCreateHook;
use log::{debug, warn};
use std::{path::Path, process::Command};

/// What happened when the post-create hooks ran
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookReport {
    pub ran: usize,
    pub skipped: usize,
    /// Commands that failed to start or exited non-zero
    pub failed: Vec<String>,
}

impl HookReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run `hooks` in order inside `worktree`. Failures are collected, never raised.
pub fn run_post_create(hooks: &[PostCreateHook], worktree: &Path) -> HookReport {
    let mut report = HookReport::default();
    for hook in hooks {
        if let Some(guard) = &hook.if_exists
            && !worktree.join(guard).exists()
        {
            debug!("skipping hook '{}': {guard} not found", hook.command);
            report.skipped += 1;
            continue;
        }

        report.ran += 1;
        match Command::new("sh")
            .arg("-c")
            .arg(&hook.command)
            .current_dir(worktree)
            .output()
        {
            Ok(output) if output.status.success() => debug!("hook '{}' succeeded", hook.command),
            Ok(output) => {
                warn!(
                    "hook '{}' failed ({}): {}",
                    hook.command,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                report.failed.push(hook.command.clone());
            }
            Err(e) => {
                warn!("hook '{}' could not start: {e}", hook.command);
                report.failed.push(hook.command.clone());
            }
        }
    }
    report
}
