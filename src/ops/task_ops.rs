use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::io::PersistenceError;
use crate::io::task_io::{self, RawBoard};
use crate::model::config::Config;
use crate::model::task::{Priority, Task, TaskInput};
use crate::ops::ordering::sort_tasks;

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("unknown task column: {0}")]
    UnknownColumn(String),
    #[error("task description must not be empty")]
    EmptyDescription,
    #[error("no task at position {index} in column {column}")]
    NotFound { column: String, index: usize },
}

/// The task board: every column's tasks, each column kept in sort order.
///
/// All mutations happen in memory; `save` mirrors the board to tasks.json.
/// Callers persist after each mutating operation.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
    /// Configured column names, in declared order
    configured: Vec<String>,
    board: IndexMap<String, Vec<Task>>,
    today: NaiveDate,
}

impl TaskStore {
    /// Load tasks.json (created empty when missing), derive day offsets and
    /// sort every column.
    pub fn load(path: &Path, config: &Config, today: NaiveDate) -> Result<Self, PersistenceError> {
        let raw = task_io::read_tasks(path)?;
        Ok(Self::from_raw(path, config, raw, today))
    }

    /// Build a store from an already-read board.
    pub fn from_raw(path: &Path, config: &Config, raw: RawBoard, today: NaiveDate) -> Self {
        let mut board = IndexMap::with_capacity(raw.len());
        for (column, records) in raw {
            if !config.has_column(&column) {
                tracing::warn!(
                    "tasks.json column `{}` is not configured; its {} task(s) are kept as-is",
                    column,
                    records.len()
                );
            }
            let mut tasks: Vec<Task> = records
                .into_iter()
                .map(|r| Task::from_raw(&column, r, today))
                .collect();
            sort_tasks(&mut tasks);
            board.insert(column, tasks);
        }
        TaskStore {
            path: path.to_path_buf(),
            configured: config.column_names().into_iter().map(String::from).collect(),
            board,
            today,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Re-derive every task's day offsets against a new "today".
    pub fn refresh_dates(&mut self, today: NaiveDate) {
        self.today = today;
        for task in self.board.values_mut().flatten() {
            task.derive_days(today);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Column names for display: configured columns in declared order, then
    /// any columns only present in the file.
    pub fn columns(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.configured.iter().map(|s| s.as_str()).collect();
        out.extend(
            self.board
                .keys()
                .filter(|k| !self.configured.contains(k))
                .map(|k| k.as_str()),
        );
        out
    }

    /// Tasks of a column in sort order; empty for an absent column.
    pub fn tasks(&self, column: &str) -> &[Task] {
        self.board.get(column).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn task(&self, column: &str, index: usize) -> Option<&Task> {
        self.board.get(column)?.get(index)
    }

    pub fn total_len(&self) -> usize {
        self.board.values().map(|v| v.len()).sum()
    }

    pub fn is_configured(&self, column: &str) -> bool {
        self.configured.iter().any(|c| c == column)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Add a task to a configured column and re-sort it. Returns the task as
    /// placed on the board.
    pub fn add(&mut self, column: &str, input: &TaskInput) -> Result<Task, TaskError> {
        if !self.is_configured(column) {
            return Err(TaskError::UnknownColumn(column.to_string()));
        }
        let task = self.build(column, input)?;
        let tasks = self.board.entry(column.to_string()).or_default();
        tasks.push(task.clone());
        sort_tasks(tasks);
        tracing::info!("task added to {}: {}", column, task.description);
        Ok(task)
    }

    /// Replace the fields of the task at `index`. The column is re-sorted and
    /// the task's new index is returned so the caller can reselect it.
    pub fn edit(&mut self, column: &str, index: usize, input: &TaskInput) -> Result<usize, TaskError> {
        let task = self.build(column, input)?;
        let tasks = self
            .board
            .get_mut(column)
            .filter(|tasks| index < tasks.len())
            .ok_or_else(|| TaskError::NotFound {
                column: column.to_string(),
                index,
            })?;
        tasks[index] = task.clone();
        sort_tasks(tasks);
        tracing::info!("task edited in {}: {}", column, task.description);
        Ok(position_of(tasks, &task))
    }

    /// Remove the task at `index`. An absent column or an out-of-range index
    /// is a no-op: the selection may lag behind the board.
    pub fn delete(&mut self, column: &str, index: usize) -> Option<Task> {
        let tasks = self.board.get_mut(column)?;
        if index >= tasks.len() {
            tracing::warn!("delete ignored: no task {} in {}", index, column);
            return None;
        }
        let removed = tasks.remove(index);
        sort_tasks(tasks);
        tracing::info!("task deleted from {}: {}", column, removed.description);
        Some(removed)
    }

    /// Move the task at `index` from `column` to `target`, re-sorting both.
    ///
    /// Returns the task's index in `target`, or `None` when nothing moved
    /// (same column, empty source or index out of range). Picking a
    /// neighbouring target is the caller's business.
    pub fn move_task(
        &mut self,
        column: &str,
        index: usize,
        target: &str,
    ) -> Result<Option<usize>, TaskError> {
        if column == target {
            return Ok(None);
        }
        if !self.is_configured(target) {
            return Err(TaskError::UnknownColumn(target.to_string()));
        }
        let Some(source) = self.board.get_mut(column) else {
            return Ok(None);
        };
        if index >= source.len() {
            return Ok(None);
        }
        let mut task = source.remove(index);
        sort_tasks(source);

        task.column_name = target.to_string();
        let dest = self.board.entry(target.to_string()).or_default();
        dest.push(task.clone());
        sort_tasks(dest);
        tracing::info!("task moved {} -> {}: {}", column, target, task.description);
        Ok(Some(position_of(dest, &task)))
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// The persisted shape: derived fields stripped, configured columns first.
    pub fn to_raw(&self) -> RawBoard {
        let mut raw = RawBoard::with_capacity(self.board.len());
        for column in self.columns() {
            if let Some(tasks) = self.board.get(column) {
                raw.insert(column.to_string(), tasks.iter().map(Task::to_raw).collect());
            }
        }
        raw
    }

    /// Write the board to tasks.json.
    pub fn save(&self) -> Result<(), PersistenceError> {
        task_io::write_tasks(&self.path, &self.to_raw())
    }

    fn build(&self, column: &str, input: &TaskInput) -> Result<Task, TaskError> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        Ok(Task::new(
            column,
            description,
            Priority::parse_lenient(&input.priority),
            input.start_date.trim(),
            input.end_date.trim(),
            self.today,
        ))
    }
}

fn position_of(tasks: &[Task], task: &Task) -> usize {
    tasks.iter().position(|t| t == task).unwrap_or(0)
}
