use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::{Config, FieldType};

/// Error type for loading config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path} (run `tuido init` to create one)")]
    Missing { path: PathBuf },
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
    #[error("field name `id` is reserved")]
    ReservedField,
    #[error("task column `{0}` is declared more than once")]
    DuplicateColumn(String),
    #[error("no task columns declared")]
    NoColumns,
}

/// Config written by `tuido init`.
pub const DEFAULT_CONFIG: &str = r#"# --- Topic form ---
# Each [[form.rows]] entry is one row of the edit form. Field keys:
#   name, caption, type (string | number | select | date)
#   lines (default 1; >1 or 0 for a text area), options (select only)
#   show_in_table (default true), column_width, input_width
#   read_only (default false), computed ("created" | "updated")

[[form.rows]]
fields = [
  { name = "title", caption = "Title", type = "string", column_width = 40 },
  { name = "status", caption = "Status", type = "select", options = ["open", "active", "closed"] },
]

[[form.rows]]
fields = [
  { name = "due", caption = "Due", type = "date" },
  { name = "effort", caption = "Effort (h)", type = "number" },
  { name = "updated", caption = "Updated", type = "date", read_only = true, computed = "updated" },
]

[[form.rows]]
fields = [
  { name = "details", caption = "Details", type = "string", lines = 6, show_in_table = false },
]

# --- Task board ---
# Columns in left-to-right order. Tasks move between neighbouring columns.

[[task_columns]]
name = "inbox"
caption = "Inbox"

[[task_columns]]
name = "doing"
caption = "Doing"

[[task_columns]]
name = "done"
caption = "Done"
"#;

/// Read and validate config.toml.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&text)
}

/// Parse and validate config text.
pub fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for field in config.fields() {
        if field.name == "id" {
            return Err(ConfigError::ReservedField);
        }
        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::DuplicateField(field.name.clone()));
        }
        if field.field_type == FieldType::Select && field.options.is_empty() {
            tracing::warn!("select field `{}` has no options", field.name);
        }
    }

    if config.task_columns.is_empty() {
        return Err(ConfigError::NoColumns);
    }
    let mut seen = HashSet::new();
    for column in &config.task_columns {
        if !seen.insert(column.name.as_str()) {
            return Err(ConfigError::DuplicateColumn(column.name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.column_names(), vec!["inbox", "doing", "done"]);
        assert_eq!(config.fields().count(), 6);
        assert!(config.field("updated").unwrap().read_only);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn rejects_duplicates_and_reserved_names() {
        let dup_field = r#"
[[form.rows]]
fields = [{ name = "a", caption = "A", type = "string" }]
[[form.rows]]
fields = [{ name = "a", caption = "A2", type = "date" }]
[[task_columns]]
name = "inbox"
caption = "Inbox"
"#;
        assert!(matches!(
            parse_config(dup_field),
            Err(ConfigError::DuplicateField(name)) if name == "a"
        ));

        let reserved = r#"
[[form.rows]]
fields = [{ name = "id", caption = "ID", type = "number" }]
[[task_columns]]
name = "inbox"
caption = "Inbox"
"#;
        assert!(matches!(parse_config(reserved), Err(ConfigError::ReservedField)));

        let dup_column = r#"
[[task_columns]]
name = "inbox"
caption = "Inbox"
[[task_columns]]
name = "inbox"
caption = "Again"
"#;
        assert!(matches!(
            parse_config(dup_column),
            Err(ConfigError::DuplicateColumn(_))
        ));

        assert!(matches!(parse_config(""), Err(ConfigError::NoColumns)));
    }
}
