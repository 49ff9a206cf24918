use std::path::Path;

use super::{PersistenceError, atomic_write, read_or_create};
use crate::model::notes::Notes;

/// Read notes.md, creating an empty document when missing.
pub fn read_notes(path: &Path) -> Result<Notes, PersistenceError> {
    read_or_create(path, "").map(Notes::new)
}

/// Overwrite notes.md with the full text.
pub fn write_notes(path: &Path, text: &str) -> Result<(), PersistenceError> {
    atomic_write(path, text.as_bytes()).map_err(|e| PersistenceError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_then_round_trips_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        assert!(read_notes(&path).unwrap().is_empty());
        write_notes(&path, "# Ideas\n\n- one\n").unwrap();
        assert_eq!(read_notes(&path).unwrap().text, "# Ideas\n\n- one\n");
    }
}
