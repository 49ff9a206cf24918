use std::path::Path;

use super::{PersistenceError, parse_json, read_or_create, write_json};
use crate::model::topic::Topic;

/// Read topics.json, in file order. A missing file is created as `[]`.
pub fn read_topics(path: &Path) -> Result<Vec<Topic>, PersistenceError> {
    let text = read_or_create(path, "[]\n")?;
    let topics: Vec<Topic> = parse_json(path, &text, Vec::new())?;
    tracing::info!("loaded {} topics from {}", topics.len(), path.display());
    Ok(topics)
}

/// Overwrite topics.json with the given sequence.
pub fn write_topics(path: &Path, topics: &[Topic]) -> Result<(), PersistenceError> {
    write_json(path, &topics)?;
    tracing::info!("saved {} topics to {}", topics.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config_io::parse_config;
    use crate::ops::topic_ops::TopicStore;
    use chrono::NaiveDate;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_as_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topics.json");
        assert!(read_topics(&path).unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn preserves_source_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topics.json");
        fs::write(&path, r#"[{"id": 3, "title": "c"}, {"id": 1, "title": "a"}]"#).unwrap();
        let ids: Vec<u64> = read_topics(&path).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn record_without_id_fails_the_whole_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topics.json");
        fs::write(&path, r#"[{"id": 1}, {"title": "orphan"}]"#).unwrap();
        assert!(matches!(
            read_topics(&path),
            Err(PersistenceError::Parse { .. })
        ));
    }

    #[test]
    fn saving_leaves_untouched_records_as_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topics.json");
        let first = "[\n    {\n        \"id\": 1,\n        \"title\": \"old\",\n        \"effort\": 12,\n        \"done\": false\n    }";
        fs::write(&path, format!("{}\n]\n", first)).unwrap();

        let config = parse_config(
            r#"
[[form.rows]]
fields = [{ name = "title", caption = "Title", type = "string" }]

[[task_columns]]
name = "inbox"
caption = "Inbox"
"#,
        )
        .unwrap();
        let mut store = TopicStore::load(&path).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(store.create(&config, IndexMap::new(), today).unwrap(), 2);
        store.save().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(&format!("{},\n", first)), "{}", text);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json[0]["effort"], serde_json::json!(12));
        assert_eq!(json[0]["done"], serde_json::json!(false));
        assert_eq!(json[1]["title"], "");
    }
}
