pub mod config_io;
pub mod logging;
pub mod notes_io;
pub mod task_io;
pub mod topic_io;
pub mod workspace_io;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

/// Error type for reading and writing the data files
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write a file atomically: write to a temp file in the same directory, then
/// rename it over the target.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a file, creating it with `initial` content when it does not exist yet.
pub(crate) fn read_or_create(path: &Path, initial: &str) -> Result<String, PersistenceError> {
    if !path.exists() {
        tracing::info!("creating {}", path.display());
        atomic_write(path, initial.as_bytes()).map_err(|e| PersistenceError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        return Ok(initial.to_string());
    }
    fs::read_to_string(path).map_err(|e| PersistenceError::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parse JSON text read from `path`. Blank files read as `empty`.
pub(crate) fn parse_json<T: DeserializeOwned>(
    path: &Path,
    text: &str,
    empty: T,
) -> Result<T, PersistenceError> {
    if text.trim().is_empty() {
        return Ok(empty);
    }
    serde_json::from_str(text).map_err(|e| PersistenceError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Serialize `value` as JSON with four-space indentation and a trailing
/// newline, then write it atomically.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    atomic_write(path, &buf).map_err(|e| PersistenceError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_or_create_writes_initial_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        assert_eq!(read_or_create(&path, "{}").unwrap(), "{}");
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        fs::write(&path, "[1]").unwrap();
        assert_eq!(read_or_create(&path, "{}").unwrap(), "[1]");
    }

    #[test]
    fn write_json_uses_four_space_indent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        write_json(&path, &serde_json::json!({"a": [1]})).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n    \"a\": [\n        1\n    ]\n}\n"
        );
    }

    #[test]
    fn parse_errors_name_the_file() {
        let path = Path::new("broken.json");
        let err = parse_json::<Vec<u8>>(path, "{nope", Vec::new()).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        assert!(parse_json::<Vec<u8>>(path, "  \n", Vec::new()).unwrap().is_empty());
    }
}
