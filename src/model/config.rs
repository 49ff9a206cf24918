use serde::{Deserialize, Serialize};

/// Configuration from config.toml: the topic form schema and the task board
/// columns. Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub task_columns: Vec<TaskColumn>,
}

/// Layout of the topic edit form, row by row
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub rows: Vec<FormRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormRow {
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// The kind of value a topic field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    String,
    Number,
    Select,
    Date,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Date => "date",
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "string" => Ok(FieldType::String),
            "number" => Ok(FieldType::Number),
            "select" => Ok(FieldType::Select),
            "date" => Ok(FieldType::Date),
            _ => Err(format!("unknown field type: {}", value)),
        }
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

/// Value assigned by the store instead of the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Computed {
    /// Today's date, set once when the topic is created
    Created,
    /// Today's date, refreshed on every save
    Updated,
}

/// Descriptor for one topic field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub caption: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// 1 = single-line input; more (or 0, "fill the space") = text area
    #[serde(default = "default_lines")]
    pub lines: u16,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default = "default_true")]
    pub show_in_table: bool,
    #[serde(default)]
    pub column_width: Option<u16>,
    #[serde(default)]
    pub input_width: Option<u16>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub computed: Option<Computed>,
}

/// Default: single-line input
fn default_lines() -> u16 {
    1
}

fn default_true() -> bool {
    true
}

impl FieldDefinition {
    pub fn is_multiline(&self) -> bool {
        self.lines != 1
    }

    /// A select takes one of its options or the blank selection; every
    /// other field type takes any text.
    pub fn accepts(&self, value: &str) -> bool {
        self.field_type != FieldType::Select
            || value.is_empty()
            || self.options.iter().any(|o| o == value)
    }
}

/// A kanban column on the task board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskColumn {
    pub name: String,
    pub caption: String,
}

/// Direction of a task move between neighbouring columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

impl Config {
    /// All field definitions in form order (row-major)
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.form.rows.iter().flat_map(|row| row.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().find(|f| f.name == name)
    }

    /// Fields shown as columns of the topics table
    pub fn table_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields().filter(|f| f.show_in_table)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.task_columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.task_columns.iter().any(|c| c.name == name)
    }

    pub fn column_caption(&self, name: &str) -> Option<&str> {
        self.task_columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.caption.as_str())
    }

    /// The neighbouring column in declared order, if any.
    pub fn adjacent_column(&self, name: &str, direction: MoveDirection) -> Option<&str> {
        let pos = self.task_columns.iter().position(|c| c.name == name)?;
        let target = match direction {
            MoveDirection::Left => pos.checked_sub(1)?,
            MoveDirection::Right => pos + 1,
        };
        self.task_columns.get(target).map(|c| c.name.as_str())
    }
}
