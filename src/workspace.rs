use std::path::PathBuf;

use crate::io::{PersistenceError, notes_io};
use crate::model::config::Config;
use crate::model::notes::Notes;
use crate::ops::task_ops::TaskStore;
use crate::ops::topic_ops::TopicStore;

/// Everything loaded from one data directory. Built once by
/// `io::workspace_io::load_workspace` and passed by reference to whatever
/// needs it.
#[derive(Debug)]
pub struct Workspace {
    /// The data directory
    pub dir: PathBuf,
    pub config: Config,
    pub tasks: TaskStore,
    pub topics: TopicStore,
    pub notes_path: PathBuf,
    pub notes: Notes,
}

impl Workspace {
    /// Replace the notes text and write notes.md.
    pub fn save_notes(&mut self, text: &str) -> Result<(), PersistenceError> {
        self.notes.text = text.to_string();
        notes_io::write_notes(&self.notes_path, text)
    }
}
