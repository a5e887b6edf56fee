use crate::paths::find_program;
use anyhow::{Context, Result, bail};
use log::info;
use std::{
    ffi::OsStr,
    path::Path,
    process::{Command, Stdio},
};

/// An editor that can open a worktree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Editor {
    pub name: &'static str,
    /// Program plus any fixed arguments, shell-quoted
    pub command_line: &'static str,
}

pub const EDITORS: [Editor; 3] = [
    Editor {
        name: "VS Code",
        command_line: "code",
    },
    Editor {
        name: "PyCharm",
        command_line: "pycharm",
    },
    Editor {
        name: "Cursor",
        command_line: "cursor --new-window",
    },
];

impl Editor {
    fn argv(&self) -> Vec<String> {
        shlex::split(self.command_line).unwrap_or_default()
    }

    pub fn program(&self) -> String {
        self.argv().into_iter().next().unwrap_or_default()
    }

    /// Launch the editor on `path` in its own process group with output
    /// discarded, without waiting for it.
    pub fn open(&self, path: &Path) -> Result<()> {
        let mut argv = self.argv().into_iter();
        let Some(program) = argv.next() else {
            bail!("Editor {} has no command", self.name);
        };
        let mut cmd = Command::new(&program);
        cmd.args(argv)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd.spawn()
            .with_context(|| format!("Failed to launch {}", self.name))?;
        info!("opened {} in {}", path.display(), self.name);
        Ok(())
    }
}

/// Editors from [`EDITORS`] whose program is installed
pub fn available_editors(search_path: Option<&OsStr>) -> Vec<Editor> {
    EDITORS
        .iter()
        .filter(|editor| find_program(&editor.program(), search_path).is_some())
        .copied()
        .collect()
}
