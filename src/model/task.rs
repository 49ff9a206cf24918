use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::util::dates::days_between;

/// Task priority. The numeric value is both the persisted form and the
/// primary sort key (HIGH sorts first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Lenient conversion from the stored number: anything but 1 or 2 is LOW.
    pub fn from_number(n: i64) -> Priority {
        match n {
            1 => Priority::High,
            2 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    /// Lenient conversion from user input: a name (`High`, `medium`, ...)
    /// or a number. Unrecognized input is LOW.
    pub fn parse_lenient(s: &str) -> Priority {
        let s = s.trim();
        if let Ok(n) = s.parse::<i64>() {
            return Priority::from_number(n);
        }
        match s.to_ascii_lowercase().as_str() {
            "high" | "h" => Priority::High,
            "medium" | "med" | "m" => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Number(n) => n.as_i64().map_or(Priority::Low, Priority::from_number),
            serde_json::Value::String(s) => Priority::parse_lenient(&s),
            _ => Priority::Low,
        })
    }
}

/// A task as it sits on the board, with its day offsets derived
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Board column the task currently occupies
    pub column_name: String,
    pub description: String,
    pub priority: Priority,
    /// `YYYY-MM-DD`, or empty when unset
    pub start_date: String,
    /// `YYYY-MM-DD`, or empty when unset
    pub end_date: String,

    // --- Derived, never persisted ---
    pub days_to_start: Option<i64>,
    pub days_to_end: Option<i64>,
}

impl Task {
    /// Build a task and derive its day offsets relative to `today`.
    pub fn new(
        column_name: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        today: chrono::NaiveDate,
    ) -> Self {
        let mut task = Task {
            column_name: column_name.into(),
            description: description.into(),
            priority,
            start_date: start_date.into(),
            end_date: end_date.into(),
            days_to_start: None,
            days_to_end: None,
        };
        task.derive_days(today);
        task
    }

    /// Materialize a persisted record into the given column.
    pub fn from_raw(column_name: &str, raw: RawTask, today: chrono::NaiveDate) -> Self {
        Task::new(
            column_name,
            raw.description,
            raw.priority,
            raw.start_date,
            raw.end_date,
            today,
        )
    }

    /// Strip derived fields for persistence.
    pub fn to_raw(&self) -> RawTask {
        RawTask {
            description: self.description.clone(),
            priority: self.priority,
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
        }
    }

    /// Recompute `days_to_start` / `days_to_end` from the date fields.
    pub fn derive_days(&mut self, today: chrono::NaiveDate) {
        self.days_to_start = days_between(&self.start_date, today);
        self.days_to_end = days_between(&self.end_date, today);
    }
}

/// Persisted shape of a task in tasks.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTask {
    pub description: String,
    pub priority: Priority,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub start_date: String,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub end_date: String,
}

fn empty_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Field values supplied by a caller creating or editing a task.
/// Priority arrives as text (a name or a number) and is converted leniently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub description: String,
    pub priority: String,
    pub start_date: String,
    pub end_date: String,
}

impl TaskInput {
    pub fn new(description: impl Into<String>, priority: impl Into<String>) -> Self {
        TaskInput {
            description: description.into(),
            priority: priority.into(),
            ..Default::default()
        }
    }

    pub fn with_dates(mut self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date = start_date.into();
        self.end_date = end_date.into();
        self
    }

    /// The current values of an existing task, as an editor would show them.
    pub fn from_task(task: &Task) -> Self {
        TaskInput {
            description: task.description.clone(),
            priority: task.priority.label().to_string(),
            start_date: task.start_date.clone(),
            end_date: task.end_date.clone(),
        }
    }
}
