use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::io::PersistenceError;
use crate::io::topic_io;
use crate::model::config::{Computed, Config};
use crate::model::topic::Topic;
use crate::util::dates::format_date;

/// Error type for topic operations
#[derive(Debug, thiserror::Error)]
pub enum TopicError {
    #[error("topic not found: {0}")]
    NotFound(u64),
    #[error("unknown topic field: {0}")]
    UnknownField(String),
    #[error("field `{0}` is read-only")]
    ReadOnlyField(String),
    #[error("`{value}` is not an option of field `{field}`")]
    InvalidOption { field: String, value: String },
}

/// The topic collection: records in source order plus an id index.
///
/// A new topic gets max(id) + 1; ids below the current maximum are never
/// reissued.
#[derive(Debug, Clone)]
pub struct TopicStore {
    path: PathBuf,
    topics: Vec<Topic>,
    by_id: HashMap<u64, usize>,
}

impl TopicStore {
    /// Load topics.json (created as `[]` when missing).
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        let topics = topic_io::read_topics(path)?;
        Ok(Self::from_topics(path, topics))
    }

    pub fn from_topics(path: &Path, topics: Vec<Topic>) -> Self {
        let mut store = TopicStore {
            path: path.to_path_buf(),
            topics,
            by_id: HashMap::new(),
        };
        store.reindex();
        store
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        for (i, topic) in self.topics.iter().enumerate() {
            if self.by_id.insert(topic.id, i).is_some() {
                tracing::warn!("duplicate topic id {} in {}", topic.id, self.path.display());
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Topics in source order.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Topics in table order: newest (highest id) first.
    pub fn table_order(&self) -> Vec<&Topic> {
        let mut out: Vec<&Topic> = self.topics.iter().collect();
        out.sort_by(|a, b| b.id.cmp(&a.id));
        out
    }

    pub fn get(&self, id: u64) -> Option<&Topic> {
        self.by_id.get(&id).map(|&i| &self.topics[i])
    }

    pub fn contains(&self, id: u64) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// The id the next `create` will assign.
    pub fn next_id(&self) -> u64 {
        self.topics.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a topic. Every declared field starts empty unless `fields`
    /// overrides it; computed fields are filled in. Returns the new id.
    pub fn create(
        &mut self,
        config: &Config,
        fields: IndexMap<String, String>,
        today: NaiveDate,
    ) -> Result<u64, TopicError> {
        check_fields(config, &fields, None)?;
        let id = self.next_id();
        let mut topic = Topic::new(id);
        for field in config.fields() {
            let value = match field.computed {
                Some(Computed::Created) | Some(Computed::Updated) => format_date(today),
                None => fields.get(&field.name).cloned().unwrap_or_default(),
            };
            topic.fields.insert(field.name.clone(), value);
        }
        self.by_id.insert(id, self.topics.len());
        self.topics.push(topic);
        tracing::info!("topic {} created", id);
        Ok(id)
    }

    /// Replace the stored values of the supplied fields. Fields not in
    /// `fields` keep their values; `updated` computed fields are refreshed.
    pub fn update(
        &mut self,
        config: &Config,
        id: u64,
        fields: IndexMap<String, String>,
        today: NaiveDate,
    ) -> Result<(), TopicError> {
        let Some(&index) = self.by_id.get(&id) else {
            tracing::warn!("update of unknown topic {}", id);
            return Err(TopicError::NotFound(id));
        };
        check_fields(config, &fields, Some(&self.topics[index]))?;
        let topic = &mut self.topics[index];
        for (name, value) in fields {
            topic.fields.insert(name, value);
        }
        for field in config.fields() {
            if field.computed == Some(Computed::Updated) {
                topic.fields.insert(field.name.clone(), format_date(today));
            }
        }
        tracing::info!("topic {} updated", id);
        Ok(())
    }

    /// Remove a topic from the collection.
    pub fn delete(&mut self, id: u64) -> Result<Topic, TopicError> {
        let Some(index) = self.by_id.remove(&id) else {
            tracing::warn!("delete of unknown topic {}", id);
            return Err(TopicError::NotFound(id));
        };
        let removed = self.topics.remove(index);
        self.reindex();
        tracing::info!("topic {} deleted", id);
        Ok(removed)
    }

    /// Write the collection to topics.json in source order.
    pub fn save(&self) -> Result<(), PersistenceError> {
        topic_io::write_topics(&self.path, &self.topics)
    }
}

/// Every field must be declared, and a select value must be one of its
/// options. A value equal to what `stored` already holds is let through.
fn check_fields(
    config: &Config,
    fields: &IndexMap<String, String>,
    stored: Option<&Topic>,
) -> Result<(), TopicError> {
    for (name, value) in fields {
        let definition = config
            .field(name)
            .ok_or_else(|| TopicError::UnknownField(name.clone()))?;
        if stored.is_some_and(|t| t.value(name) == value) {
            continue;
        }
        if !definition.accepts(value) {
            return Err(TopicError::InvalidOption {
                field: name.clone(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}
