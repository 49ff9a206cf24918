use std::path::Path;

use indexmap::IndexMap;

use super::{PersistenceError, parse_json, read_or_create, write_json};
use crate::model::task::RawTask;

/// Persisted board: column name to the column's tasks, in file order.
pub type RawBoard = IndexMap<String, Vec<RawTask>>;

/// Read tasks.json. A missing file is created empty and reads as a board
/// with no columns; malformed content is an error.
pub fn read_tasks(path: &Path) -> Result<RawBoard, PersistenceError> {
    let text = read_or_create(path, "{}\n")?;
    parse_json(path, &text, RawBoard::new())
}

/// Overwrite tasks.json with the given board.
pub fn write_tasks(path: &Path, board: &RawBoard) -> Result<(), PersistenceError> {
    write_json(path, board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_and_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let board = read_tasks(&path).unwrap();
        assert!(board.is_empty());
        assert!(path.exists());
    }

    #[test]
    fn keeps_column_order_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"{"done": [], "inbox": [{"description": "x", "priority": 2, "start_date": "", "end_date": ""}]}"#,
        )
        .unwrap();
        let board = read_tasks(&path).unwrap();
        let columns: Vec<&str> = board.keys().map(|k| k.as_str()).collect();
        assert_eq!(columns, vec!["done", "inbox"]);
        assert_eq!(board["inbox"][0].priority, Priority::Medium);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, r#"{"inbox": [{"priority": 1}]}"#).unwrap();
        assert!(matches!(
            read_tasks(&path),
            Err(PersistenceError::Parse { .. })
        ));
    }

    #[test]
    fn written_board_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let mut board = RawBoard::new();
        board.insert(
            "inbox".into(),
            vec![RawTask {
                description: "plan".into(),
                priority: Priority::High,
                start_date: "2024-01-01".into(),
                end_date: String::new(),
            }],
        );
        write_tasks(&path, &board).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"inbox\": [\n"));
        assert!(text.contains("\"priority\": 1"));
        assert_eq!(read_tasks(&path).unwrap(), board);
    }
}
