use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::model::config::Config;
use crate::model::topic::FieldValue;
use crate::ops::reconcile::{ChangeOutcome, EditTracker};
use crate::ops::topic_ops::{TopicError, TopicStore};

/// Error type for form operations
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("unsaved changes in {}; save or discard first", .dirty.join(", "))]
    SelectionLocked { dirty: Vec<String> },
    #[error("no topic selected")]
    NoSelection,
    #[error(transparent)]
    Topic(#[from] TopicError),
}

/// The edit form for one selected topic.
///
/// Holds the live value of every declared field and routes each write
/// through an [`EditTracker`], so the form knows which fields differ from
/// the stored topic and whether the selection may change.
#[derive(Debug, Clone)]
pub struct TopicForm {
    selected: Option<u64>,
    values: IndexMap<String, FieldValue>,
    tracker: EditTracker,
}

impl TopicForm {
    /// An empty form with no selection.
    pub fn new(config: &Config) -> Self {
        let values = config
            .fields()
            .map(|f| (f.name.clone(), FieldValue::for_field(f, "")))
            .collect();
        TopicForm {
            selected: None,
            values,
            tracker: EditTracker::new(),
        }
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_locked(&self) -> bool {
        self.tracker.is_locked()
    }

    pub fn dirty_fields(&self) -> Vec<&str> {
        self.tracker.dirty_fields()
    }

    fn ensure_unlocked(&self) -> Result<(), EditError> {
        if self.tracker.is_locked() {
            return Err(EditError::SelectionLocked {
                dirty: self.dirty_fields().into_iter().map(String::from).collect(),
            });
        }
        Ok(())
    }

    /// Select a topic and repopulate every field from the store. Refused
    /// while the form holds unsaved changes.
    pub fn select(&mut self, config: &Config, store: &TopicStore, id: u64) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        if !store.contains(id) {
            return Err(TopicError::NotFound(id).into());
        }
        self.selected = Some(id);
        self.repopulate(config, store);
        Ok(())
    }

    /// Drop the selection (e.g. after the topic was deleted) and blank the
    /// fields. Refused while the form holds unsaved changes.
    pub fn deselect(&mut self, config: &Config, store: &TopicStore) -> Result<(), EditError> {
        self.ensure_unlocked()?;
        self.selected = None;
        self.repopulate(config, store);
        Ok(())
    }

    /// A user edit of one field. Returns whether the field is now dirty.
    pub fn set_value(
        &mut self,
        config: &Config,
        store: &TopicStore,
        field: &str,
        value: FieldValue,
    ) -> Result<ChangeOutcome, EditError> {
        let id = self.selected.ok_or(EditError::NoSelection)?;
        let definition = config
            .field(field)
            .ok_or_else(|| TopicError::UnknownField(field.to_string()))?;
        if definition.read_only {
            return Err(TopicError::ReadOnlyField(field.to_string()).into());
        }
        let stored = store.get(id).map(|t| t.value(field)).unwrap_or("");
        if value.as_text() != stored && !definition.accepts(value.as_text()) {
            return Err(TopicError::InvalidOption {
                field: field.to_string(),
                value: value.as_text().to_string(),
            }
            .into());
        }
        let outcome = self.tracker.on_change(field, value.as_text(), stored);
        self.values.insert(field.to_string(), value);
        Ok(outcome)
    }

    /// User edit given as plain text; a select receives the blank selection
    /// for "".
    pub fn set_text(
        &mut self,
        config: &Config,
        store: &TopicStore,
        field: &str,
        text: &str,
    ) -> Result<ChangeOutcome, EditError> {
        let definition = config
            .field(field)
            .ok_or_else(|| TopicError::UnknownField(field.to_string()))?;
        let value = FieldValue::for_field(definition, text);
        self.set_value(config, store, field, value)
    }

    /// Commit every editable field to the store, then reload the form from
    /// the saved record. Returns the saved topic's id.
    pub fn save(
        &mut self,
        config: &Config,
        store: &mut TopicStore,
        today: NaiveDate,
    ) -> Result<u64, EditError> {
        let id = self.selected.ok_or(EditError::NoSelection)?;
        let fields: IndexMap<String, String> = config
            .fields()
            .filter(|f| !f.read_only && f.computed.is_none())
            .filter_map(|f| {
                self.values
                    .get(&f.name)
                    .map(|v| (f.name.clone(), v.as_text().to_string()))
            })
            .collect();
        store.update(config, id, fields, today)?;
        self.tracker.clear();
        self.repopulate(config, store);
        Ok(id)
    }

    /// Throw away unsaved edits and reload the stored values.
    pub fn discard(&mut self, config: &Config, store: &TopicStore) -> Result<(), EditError> {
        self.selected.ok_or(EditError::NoSelection)?;
        self.tracker.clear();
        self.repopulate(config, store);
        Ok(())
    }

    /// Programmatic write of every field from the selected topic (or blanks).
    ///
    /// A write that leaves a value unchanged produces no change notification,
    /// so only changed fields are announced to the tracker; otherwise a
    /// stale marker would swallow the user's next edit.
    fn repopulate(&mut self, config: &Config, store: &TopicStore) {
        let topic = self.selected.and_then(|id| store.get(id));
        for field in config.fields() {
            let stored = topic.map(|t| t.value(&field.name)).unwrap_or("");
            let value = FieldValue::for_field(field, stored);
            if self.values.get(&field.name) == Some(&value) {
                continue;
            }
            self.tracker.expect_programmatic(&field.name);
            self.values.insert(field.name.clone(), value.clone());
            self.tracker.on_change(&field.name, value.as_text(), stored);
        }
    }
}
