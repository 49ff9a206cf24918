//! Dirty-state tracking for the topic edit form.
//!
//! Every change notification for a form field passes through
//! [`EditTracker::on_change`]. Writes the system makes itself (repopulating
//! the form when the selection changes) are announced beforehand with
//! [`EditTracker::expect_programmatic`], and the next notification for that
//! field is swallowed exactly once. Everything else is a user edit and is
//! compared against the stored value.

use std::collections::BTreeSet;

/// Suppress-set and dirty-set for the currently selected topic.
#[derive(Debug, Clone, Default)]
pub struct EditTracker {
    programmatic: BTreeSet<String>,
    dirty: BTreeSet<String>,
}

/// What a change notification did to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Consumed a programmatic write marker; nothing compared
    Suppressed,
    /// Value equals the stored one; field is clean
    Clean,
    /// Value differs from the stored one; field is dirty
    Dirty,
}

impl EditTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce that the system is about to write `field`. The next change
    /// notification for it will not count as a user edit.
    pub fn expect_programmatic(&mut self, field: &str) {
        self.programmatic.insert(field.to_string());
    }

    /// Handle a change notification for `field` carrying `value`, where
    /// `stored` is the last-saved value (missing fields and the blank
    /// selection are passed as "").
    pub fn on_change(&mut self, field: &str, value: &str, stored: &str) -> ChangeOutcome {
        if self.programmatic.remove(field) {
            return ChangeOutcome::Suppressed;
        }
        if value == stored {
            self.dirty.remove(field);
            ChangeOutcome::Clean
        } else {
            self.dirty.insert(field.to_string());
            ChangeOutcome::Dirty
        }
    }

    /// While any field is dirty the selection may not change.
    pub fn is_locked(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    /// Dirty field names, sorted.
    pub fn dirty_fields(&self) -> Vec<&str> {
        self.dirty.iter().map(|s| s.as_str()).collect()
    }

    /// Whether a programmatic write marker for `field` is still pending.
    pub fn is_pending(&self, field: &str) -> bool {
        self.programmatic.contains(field)
    }

    /// Back to clean after a save or discard.
    pub fn clear(&mut self) {
        self.dirty.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programmatic_writes_leave_tracker_clean() {
        let mut tracker = EditTracker::new();
        for field in ["title", "status", "due"] {
            tracker.expect_programmatic(field);
        }
        // the repopulated values differ from nothing in particular; all suppressed
        assert_eq!(tracker.on_change("title", "A", "B"), ChangeOutcome::Suppressed);
        assert_eq!(tracker.on_change("status", "x", ""), ChangeOutcome::Suppressed);
        assert_eq!(tracker.on_change("due", "", "2024-01-01"), ChangeOutcome::Suppressed);
        assert!(!tracker.is_locked());
        assert!(!tracker.is_pending("title"));
    }

    #[test]
    fn suppression_is_consumed_once() {
        let mut tracker = EditTracker::new();
        tracker.expect_programmatic("title");
        tracker.on_change("title", "stored", "stored");
        assert_eq!(tracker.on_change("title", "typed", "stored"), ChangeOutcome::Dirty);
        assert_eq!(tracker.dirty_fields(), vec!["title"]);
    }

    #[test]
    fn user_edit_and_revert() {
        let mut tracker = EditTracker::new();
        assert_eq!(tracker.on_change("title", "new", "old"), ChangeOutcome::Dirty);
        assert_eq!(tracker.on_change("status", "open", "open"), ChangeOutcome::Clean);
        assert!(tracker.is_locked());
        assert_eq!(tracker.dirty_fields(), vec!["title"]);

        assert_eq!(tracker.on_change("title", "old", "old"), ChangeOutcome::Clean);
        assert!(!tracker.is_locked());
        assert!(!tracker.is_dirty("title"));
    }

    #[test]
    fn clear_resets_dirty_set() {
        let mut tracker = EditTracker::new();
        tracker.on_change("a", "1", "");
        tracker.on_change("b", "2", "");
        assert_eq!(tracker.dirty_fields(), vec!["a", "b"]);
        tracker.clear();
        assert!(!tracker.is_locked());
    }
}
