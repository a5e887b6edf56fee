use hive_core::paths::cache_dir;
use std::path::PathBuf;

const LOG_FILE_NAME: &str = "hive.log";

pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const LOG_LEVEL_ENV: &str = "HIVE_LOG";

pub fn default_log_file() -> PathBuf {
    cache_dir().join(LOG_FILE_NAME)
}

pub fn setup_logging(level: log::LevelFilter) -> anyhow::Result<()> {
    let log_file = default_log_file();
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    simple_log::file(log_file.to_string_lossy().into_owned(), level, 10, 10)
        .map_err(|e| anyhow::anyhow!(e))?;
    log::info!("hive logging initialised (level={level})");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_lives_in_hive_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("custom-cache");

        unsafe { std::env::set_var("XDG_CACHE_HOME", &custom) };
        let path = default_log_file();
        unsafe { std::env::remove_var("XDG_CACHE_HOME") };

        assert_eq!(path, custom.join("hive").join(LOG_FILE_NAME));
    }
}
