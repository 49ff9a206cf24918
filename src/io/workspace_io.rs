use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::PersistenceError;
use super::config_io::{self, ConfigError};
use super::notes_io;
use crate::ops::task_ops::TaskStore;
use crate::ops::topic_ops::TopicStore;
use crate::workspace::Workspace;

pub const CONFIG_FILE: &str = "config.toml";
pub const TASKS_FILE: &str = "tasks.json";
pub const TOPICS_FILE: &str = "topics.json";
pub const NOTES_FILE: &str = "notes.md";
pub const LOG_FILE: &str = "info.log";

/// Error type for opening a data directory
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("data directory not found: {0}")]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyInitialized { path: PathBuf },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load config, tasks, topics and notes from a data directory. Missing data
/// files are created empty; a missing config is an error.
pub fn load_workspace(dir: &Path, today: NaiveDate) -> Result<Workspace, WorkspaceError> {
    if !dir.is_dir() {
        return Err(WorkspaceError::NotADirectory(dir.to_path_buf()));
    }
    let config = config_io::read_config(&dir.join(CONFIG_FILE))?;
    let tasks = TaskStore::load(&dir.join(TASKS_FILE), &config, today)?;
    let topics = TopicStore::load(&dir.join(TOPICS_FILE))?;
    let notes_path = dir.join(NOTES_FILE);
    let notes = notes_io::read_notes(&notes_path)?;
    tracing::info!(
        "workspace loaded from {}: {} tasks, {} topics",
        dir.display(),
        tasks.total_len(),
        topics.len()
    );
    Ok(Workspace {
        dir: dir.to_path_buf(),
        config,
        tasks,
        topics,
        notes_path,
        notes,
    })
}

/// Create a data directory with the default config and empty data files.
/// Existing data files are left alone; an existing config is only replaced
/// with `force`.
pub fn init_workspace(dir: &Path, force: bool) -> Result<(), WorkspaceError> {
    fs::create_dir_all(dir)?;
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(WorkspaceError::AlreadyInitialized { path: config_path });
    }
    super::atomic_write(&config_path, config_io::DEFAULT_CONFIG.as_bytes())?;

    for (name, initial) in [(TASKS_FILE, "{}\n"), (TOPICS_FILE, "[]\n"), (NOTES_FILE, "")] {
        let path = dir.join(name);
        if !path.exists() {
            super::atomic_write(&path, initial.as_bytes())?;
        }
    }
    tracing::info!("initialized data directory {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn init_then_load() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        init_workspace(&dir, false).unwrap();
        let ws = load_workspace(&dir, today()).unwrap();
        assert_eq!(ws.config.column_names(), vec!["inbox", "doing", "done"]);
        assert_eq!(ws.tasks.total_len(), 0);
        assert!(ws.topics.is_empty());
        assert!(ws.notes.is_empty());
    }

    #[test]
    fn init_refuses_to_clobber_config() {
        let tmp = TempDir::new().unwrap();
        init_workspace(tmp.path(), false).unwrap();
        fs::write(tmp.path().join(TOPICS_FILE), r#"[{"id": 1}]"#).unwrap();
        assert!(matches!(
            init_workspace(tmp.path(), false),
            Err(WorkspaceError::AlreadyInitialized { .. })
        ));
        init_workspace(tmp.path(), true).unwrap();
        // data files survive a forced re-init
        let ws = load_workspace(tmp.path(), today()).unwrap();
        assert_eq!(ws.topics.len(), 1);
    }

    #[test]
    fn load_creates_missing_data_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), config_io::DEFAULT_CONFIG).unwrap();
        load_workspace(tmp.path(), today()).unwrap();
        for name in [TASKS_FILE, TOPICS_FILE, NOTES_FILE] {
            assert!(tmp.path().join(name).exists(), "{} not created", name);
        }
    }

    #[test]
    fn load_without_config_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_workspace(tmp.path(), today()),
            Err(WorkspaceError::Config(ConfigError::Missing { .. }))
        ));
        assert!(matches!(
            load_workspace(&tmp.path().join("nope"), today()),
            Err(WorkspaceError::NotADirectory(_))
        ));
    }
}
