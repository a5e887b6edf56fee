use crate::constants::APP_NAME;
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

/// Per-user cache directory: `$XDG_CACHE_HOME/hive`, else `~/.cache/hive`.
pub fn cache_dir() -> PathBuf {
    #[cfg(unix)]
    {
        if let Ok(xdg_cache_home) = std::env::var("XDG_CACHE_HOME")
            && !xdg_cache_home.is_empty()
        {
            return PathBuf::from(xdg_cache_home).join(APP_NAME);
        }
        dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".cache")
            .join(APP_NAME)
    }
    #[cfg(windows)]
    {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_NAME)
    }
}

/// Expand `~` and `$VAR`/`${VAR}` in `raw`, then anchor relative results at `base`.
///
/// Unknown variables are left untouched. `home` stands in for the user's home
/// directory when expanding `~`; with `None` a leading `~` is kept literally.
pub fn expand_path(raw: &str, base: &Path, home: Option<&Path>) -> PathBuf {
    let expanded = shellexpand::full_with_context_no_errors(
        raw,
        || home.and_then(Path::to_str),
        |var| std::env::var(var).ok(),
    );
    let path = PathBuf::from(expanded.as_ref());
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Flatten a directory into a name, relative to `home` when it lives under it.
///
/// `~/Projects/dotfiles` becomes `Projects--dotfiles`; paths outside the home
/// directory drop the leading `/` instead.
pub fn path_to_name(path: &Path, home: Option<&Path>) -> String {
    let relative = home
        .and_then(|home| path.strip_prefix(home).ok())
        .filter(|rel| !rel.as_os_str().is_empty());
    let text = match relative {
        Some(rel) => rel.to_string_lossy().into_owned(),
        None => path.to_string_lossy().trim_start_matches('/').to_string(),
    };
    text.replace('/', "--")
}

/// Locate an executable on `search_path`, or on `PATH` when `None`.
pub fn find_program(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    match search_path {
        Some(paths) => which::which_in(name, Some(paths), Path::new(".")).ok(),
        None => which::which(name).ok(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Drop an executable shell script called `name` into `dir`
    #[cfg(unix)]
    pub(crate) fn fake_program(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn find_program_on_search_path() {
        let dir = tempfile::tempdir().unwrap();
        fake_program(dir.path(), "hive-fake-tool");
        std::fs::write(dir.path().join("not-executable"), "").unwrap();

        let search = dir.path().as_os_str();
        let found = find_program("hive-fake-tool", Some(search)).unwrap();
        assert!(found.ends_with("hive-fake-tool"), "{}", found.display());
        assert_eq!(find_program("not-executable", Some(search)), None);
        assert_eq!(find_program("missing", Some(search)), None);
    }

    #[test]
    fn absolute_path_unchanged() {
        assert_eq!(
            expand_path("/absolute/path", Path::new("/repo"), None),
            PathBuf::from("/absolute/path")
        );
    }

    #[test]
    fn relative_path_anchored_at_base() {
        assert_eq!(
            expand_path(".worktrees", Path::new("/repo"), None),
            PathBuf::from("/repo/.worktrees")
        );
    }

    #[test]
    fn tilde_expands_to_given_home() {
        assert_eq!(
            expand_path("~/wt", Path::new("/repo"), Some(Path::new("/home/me"))),
            PathBuf::from("/home/me/wt")
        );
    }

    #[test]
    fn tilde_in_middle_not_expanded() {
        assert_eq!(
            expand_path("/some/~/path", Path::new("/repo"), Some(Path::new("/home/me"))),
            PathBuf::from("/some/~/path")
        );
    }

    #[test]
    fn env_vars_expand() {
        unsafe { std::env::set_var("HIVE_TEST_WT_ROOT", "/srv/trees") };
        assert_eq!(
            expand_path("$HIVE_TEST_WT_ROOT/x", Path::new("/repo"), None),
            PathBuf::from("/srv/trees/x")
        );
        unsafe { std::env::remove_var("HIVE_TEST_WT_ROOT") };
    }

    #[test]
    fn unknown_vars_left_alone() {
        assert_eq!(
            expand_path("/tmp/$HIVE_TEST_SURELY_UNSET/x", Path::new("/repo"), None),
            PathBuf::from("/tmp/$HIVE_TEST_SURELY_UNSET/x")
        );
    }

    #[test]
    fn cache_dir_respects_xdg_override() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("custom-cache");

        unsafe { std::env::set_var("XDG_CACHE_HOME", &custom) };
        let result = cache_dir();
        unsafe { std::env::remove_var("XDG_CACHE_HOME") };

        assert_eq!(result, custom.join(APP_NAME));
    }

    #[test]
    fn name_relative_to_home() {
        assert_eq!(
            path_to_name(
                Path::new("/home/me/Projects/dotfiles"),
                Some(Path::new("/home/me"))
            ),
            "Projects--dotfiles"
        );
    }

    #[test]
    fn name_outside_home_uses_full_path() {
        assert_eq!(
            path_to_name(Path::new("/srv/code/app"), Some(Path::new("/home/me"))),
            "srv--code--app"
        );
        assert_eq!(path_to_name(Path::new("/srv/app"), None), "srv--app");
    }
}
