use serde::Serialize;

use crate::model::config::Config;
use crate::model::task::Task;
use crate::model::topic::Topic;
use crate::util::dates::{DateStatus, end_status, start_status, weekday_name};
use crate::util::unicode::{first_line, pad_to_width};

/// Table column width for fields without a configured `column_width`.
const DEFAULT_COLUMN_WIDTH: usize = 16;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub column: String,
    /// 1-based position within the column
    pub position: usize,
    pub description: String,
    pub priority: &'static str,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_to_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_status: Option<&'static str>,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub name: String,
    pub caption: String,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct ColumnInfoJson {
    pub name: String,
    pub caption: String,
    pub count: usize,
}

/// Result of `task mv`; `task` is present only when something moved.
#[derive(Serialize)]
pub struct MoveJson {
    pub moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskJson>,
}

impl MoveJson {
    pub fn skipped(reason: impl Into<String>) -> Self {
        MoveJson {
            moved: false,
            reason: Some(reason.into()),
            task: None,
        }
    }
}

#[derive(Serialize)]
pub struct TopicSavedJson {
    pub id: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changed: Vec<String>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

fn status_str(status: DateStatus) -> &'static str {
    match status {
        DateStatus::Upcoming => "upcoming",
        DateStatus::Current => "current",
        DateStatus::Overdue => "overdue",
    }
}

pub fn task_to_json(task: &Task, index: usize) -> TaskJson {
    TaskJson {
        column: task.column_name.clone(),
        position: index + 1,
        description: task.description.clone(),
        priority: task.priority.label(),
        start_date: task.start_date.clone(),
        end_date: task.end_date.clone(),
        days_to_start: task.days_to_start,
        days_to_end: task.days_to_end,
        start_status: start_status(task.days_to_start, task.days_to_end).map(status_str),
        end_status: end_status(task.days_to_end).map(status_str),
    }
}

pub fn column_to_json(name: &str, caption: &str, tasks: &[Task]) -> ColumnJson {
    ColumnJson {
        name: name.to_string(),
        caption: caption.to_string(),
        tasks: tasks
            .iter()
            .enumerate()
            .map(|(i, t)| task_to_json(t, i))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `2024-01-05 (3 d)`, with `!` appended when overdue; `---` when unset.
fn format_date(date: &str, days: Option<i64>, status: Option<DateStatus>) -> String {
    if date.is_empty() {
        return "---".to_string();
    }
    let Some(days) = days else {
        return format!("{} (?)", date);
    };
    let marker = if status == Some(DateStatus::Overdue) { "!" } else { "" };
    format!("{} ({} d){}", date, days, marker)
}

/// One line per task: position, priority, start, end, description.
pub fn format_task_line(task: &Task, index: usize) -> String {
    let start = format_date(
        &task.start_date,
        task.days_to_start,
        start_status(task.days_to_start, task.days_to_end),
    );
    let end = format_date(&task.end_date, task.days_to_end, end_status(task.days_to_end));
    format!(
        "{:>3}. {} {} {} {}",
        index + 1,
        pad_to_width(task.priority.label(), 6),
        pad_to_width(&start, 20),
        pad_to_width(&end, 20),
        task.description
    )
}

pub fn format_column_header(name: &str, caption: &str, count: usize) -> String {
    format!("{} [{}] ({})", caption, name, count)
}

/// Multi-line detail of one task, as shown after add/edit.
pub fn format_task_detail(task: &Task, index: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "{} #{}: {}",
        task.column_name,
        index + 1,
        task.description
    )];
    lines.push(format!("  priority: {}", task.priority));
    for (label, date, days) in [
        ("start", &task.start_date, task.days_to_start),
        ("end", &task.end_date, task.days_to_end),
    ] {
        if date.is_empty() {
            continue;
        }
        let weekday = weekday_name(date).map(|w| format!(", {}", w)).unwrap_or_default();
        match days {
            Some(d) => lines.push(format!("  {}: {} ({} d{})", label, date, d, weekday)),
            None => lines.push(format!("  {}: {} (invalid date)", label, date)),
        }
    }
    lines
}

/// Header row plus one row per topic, newest first.
pub fn format_topic_table(config: &Config, topics: &[&Topic]) -> Vec<String> {
    let widths: Vec<usize> = config
        .table_fields()
        .map(|f| f.column_width.map_or(DEFAULT_COLUMN_WIDTH, usize::from))
        .collect();

    let mut header = format!("{:>4}", "ID");
    for (field, width) in config.table_fields().zip(&widths) {
        header.push_str("  ");
        header.push_str(&pad_to_width(&field.caption, *width));
    }
    let mut lines = vec![header.trim_end().to_string()];

    for topic in topics {
        let mut row = format!("{:>4}", topic.id);
        for (field, width) in config.table_fields().zip(&widths) {
            row.push_str("  ");
            row.push_str(&pad_to_width(&first_line(topic.value(&field.name)), *width));
        }
        lines.push(row.trim_end().to_string());
    }
    lines
}

/// Every declared field of a topic, then any extra stored fields.
pub fn format_topic_detail(config: &Config, topic: &Topic) -> Vec<String> {
    let mut lines = vec![format!("id: {}", topic.id)];
    let mut push = |label: &str, value: &str| {
        let mut value_lines = value.lines();
        match value_lines.next() {
            Some(first) => lines.push(format!("{}: {}", label, first)),
            None => lines.push(format!("{}:", label)),
        }
        for rest in value_lines {
            lines.push(format!("    {}", rest));
        }
    };
    for field in config.fields() {
        push(&field.caption, topic.value(&field.name));
    }
    for (name, value) in &topic.fields {
        if config.field(name).is_none() {
            push(name, value);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config_io::parse_config;
    use crate::model::task::Priority;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn task(start: &str, end: &str) -> Task {
        Task::new(
            "inbox",
            "write spec",
            Priority::High,
            start,
            end,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
    }

    #[test]
    fn task_line_shows_offsets_and_overdue_marker() {
        let line = format_task_line(&task("2024-01-01", "2024-01-02"), 0);
        assert!(line.starts_with("  1. High  "));
        assert!(line.contains("2024-01-01 (-2 d)!"));
        assert!(line.contains("2024-01-02 (-1 d)!"));
        assert!(line.ends_with("write spec"));

        let line = format_task_line(&task("", "2024-01-09"), 4);
        assert!(line.starts_with("  5. "));
        assert!(line.contains("---"));
        assert!(line.contains("2024-01-09 (6 d)"));
        assert!(!line.contains('!'));
    }

    #[test]
    fn task_json_positions_are_one_based() {
        let json = serde_json::to_value(task_to_json(&task("2024-01-03", ""), 2)).unwrap();
        assert_eq!(json["position"], 3);
        assert_eq!(json["priority"], "High");
        assert_eq!(json["days_to_start"], 0);
        assert_eq!(json["start_status"], "current");
        assert!(json.get("days_to_end").is_none());
    }

    #[test]
    fn detail_includes_weekday() {
        let lines = format_task_detail(&task("2024-01-01", "bad"), 0);
        assert_eq!(lines[0], "inbox #1: write spec");
        assert_eq!(lines[1], "  priority: High");
        assert_eq!(lines[2], "  start: 2024-01-01 (-2 d, Monday)");
        assert_eq!(lines[3], "  end: bad (invalid date)");
    }

    #[test]
    fn topic_table_and_detail() {
        let config = parse_config(
            r#"
[[form.rows]]
fields = [
  { name = "title", caption = "Title", type = "string", column_width = 8 },
  { name = "body", caption = "Body", type = "string", lines = 3, show_in_table = false },
]
[[task_columns]]
name = "inbox"
caption = "Inbox"
"#,
        )
        .unwrap();
        let mut topic = Topic::new(12);
        topic.fields.insert("title".into(), "A long title".into());
        topic.fields.insert("body".into(), "line one\nline two".into());
        topic.fields.insert("legacy".into(), "kept".into());

        let table = format_topic_table(&config, &[&topic]);
        assert_eq!(table, vec!["  ID  Title", "  12  A long …"]);

        let detail = format_topic_detail(&config, &topic);
        assert_eq!(
            detail,
            vec![
                "id: 12",
                "Title: A long title",
                "Body: line one",
                "    line two",
                "legacy: kept",
            ]
        );
    }
}
