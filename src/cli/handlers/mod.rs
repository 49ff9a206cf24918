mod init;
pub use init::cmd_init;

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;

use indexmap::IndexMap;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::PersistenceError;
use crate::io::logging;
use crate::io::workspace_io::{self, WorkspaceError};
use crate::model::config::MoveDirection;
use crate::model::task::TaskInput;
use crate::ops::autosave::Autosave;
use crate::ops::topic_form::TopicForm;
use crate::ops::topic_ops::TopicError;
use crate::util::dates::{adjust_date, is_valid_date, today};
use crate::workspace::Workspace;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let dir = PathBuf::from(&cli.data_dir);
    let _log_guard = logging::init(&dir, cli.verbose);

    match cli.command {
        Commands::Init(args) => cmd_init(&dir, args),
        Commands::Columns => cmd_columns(&dir, json),
        Commands::Task(cmd) => match cmd.action {
            TaskAction::List(args) => cmd_task_list(&dir, args, json),
            TaskAction::Add(args) => cmd_task_add(&dir, args, json),
            TaskAction::Edit(args) => cmd_task_edit(&dir, args, json),
            TaskAction::Mv(args) => cmd_task_mv(&dir, args, json),
            TaskAction::Rm(args) => cmd_task_rm(&dir, args),
        },
        Commands::Topic(cmd) => match cmd.action {
            TopicAction::List => cmd_topic_list(&dir, json),
            TopicAction::Show(args) => cmd_topic_show(&dir, args, json),
            TopicAction::New(args) => cmd_topic_new(&dir, args, json),
            TopicAction::Set(args) => cmd_topic_set(&dir, args, json),
            TopicAction::Rm(args) => cmd_topic_rm(&dir, args),
        },
        Commands::Notes(cmd) => match cmd.action {
            NotesAction::Show => cmd_notes_show(&dir),
            NotesAction::Set(args) => cmd_notes_set(&dir, args),
            NotesAction::Write => cmd_notes_write(&dir),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load(dir: &Path) -> Result<Workspace, WorkspaceError> {
    workspace_io::load_workspace(dir, today())
}

/// Persistence failures are logged, then reported to the user. The
/// in-memory change has already happened either way.
fn persisted(what: &str, result: Result<(), PersistenceError>) -> CmdResult {
    if let Err(e) = result {
        tracing::error!("could not save {}: {}", what, e);
        return Err(e.into());
    }
    Ok(())
}

/// Turn a 1-based position from the command line into an index.
fn position_index(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| "positions start at 1".to_string())
}

fn check_date(label: &str, date: &str) -> Result<(), String> {
    if date.is_empty() || is_valid_date(date) {
        Ok(())
    } else {
        Err(format!("invalid {} date '{}': expected YYYY-MM-DD", label, date))
    }
}

fn check_column(ws: &Workspace, column: &str) -> Result<(), String> {
    if ws.tasks.columns().contains(&column) {
        Ok(())
    } else {
        Err(format!(
            "unknown column '{}' (columns: {})",
            column,
            ws.config.column_names().join(", ")
        ))
    }
}

/// Ask a yes/no question on stderr; anything but `y` declines.
fn confirm(prompt: &str) -> std::io::Result<bool> {
    eprint!("{} [y/n] ", prompt);
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Parse `FIELD=VALUE` arguments, in order.
fn parse_assignments(values: &[String]) -> Result<IndexMap<String, String>, String> {
    let mut out = IndexMap::new();
    for value in values {
        let (field, text) = value
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", value))?;
        out.insert(field.trim().to_string(), text.to_string());
    }
    Ok(out)
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Columns and tasks
// ---------------------------------------------------------------------------

fn cmd_columns(dir: &Path, json: bool) -> CmdResult {
    let ws = load(dir)?;
    let columns: Vec<ColumnInfoJson> = ws
        .config
        .task_columns
        .iter()
        .map(|c| ColumnInfoJson {
            name: c.name.clone(),
            caption: c.caption.clone(),
            count: ws.tasks.tasks(&c.name).len(),
        })
        .collect();
    if json {
        return print_json(&columns);
    }
    for c in &columns {
        println!("{}", format_column_header(&c.name, &c.caption, c.count));
    }
    Ok(())
}

fn cmd_task_list(dir: &Path, args: TaskListArgs, json: bool) -> CmdResult {
    let ws = load(dir)?;
    let columns: Vec<&str> = match &args.column {
        Some(column) => {
            check_column(&ws, column)?;
            vec![column.as_str()]
        }
        None => ws.tasks.columns(),
    };

    if json {
        let out: Vec<ColumnJson> = columns
            .iter()
            .map(|&c| {
                column_to_json(c, ws.config.column_caption(c).unwrap_or(c), ws.tasks.tasks(c))
            })
            .collect();
        return print_json(&out);
    }

    for (i, column) in columns.iter().copied().enumerate() {
        if i > 0 {
            println!();
        }
        let tasks = ws.tasks.tasks(column);
        let caption = ws.config.column_caption(column).unwrap_or(column);
        println!("{}", format_column_header(column, caption, tasks.len()));
        for (index, task) in tasks.iter().enumerate() {
            println!("{}", format_task_line(task, index));
        }
    }
    Ok(())
}

fn cmd_task_add(dir: &Path, args: TaskAddArgs, json: bool) -> CmdResult {
    let mut ws = load(dir)?;
    let start = args.start.unwrap_or_default();
    let end = args.end.unwrap_or_default();
    check_date("start", &start)?;
    check_date("end", &end)?;

    let input = TaskInput::new(args.description, args.priority).with_dates(start, end);
    let task = ws.tasks.add(&args.column, &input)?;
    persisted("tasks", ws.tasks.save())?;

    let index = ws
        .tasks
        .tasks(&args.column)
        .iter()
        .position(|t| *t == task)
        .unwrap_or(0);
    if json {
        return print_json(&task_to_json(&task, index));
    }
    for line in format_task_detail(&task, index) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_task_edit(dir: &Path, args: TaskEditArgs, json: bool) -> CmdResult {
    let mut ws = load(dir)?;
    check_column(&ws, &args.column)?;
    let index = position_index(args.position)?;
    let current = ws.tasks.task(&args.column, index).ok_or_else(|| {
        format!("no task at position {} in {}", args.position, args.column)
    })?;

    let mut input = TaskInput::from_task(current);
    if let Some(description) = args.description {
        input.description = description;
    }
    if let Some(priority) = args.priority {
        input.priority = priority;
    }
    if let Some(start) = args.start {
        input.start_date = start;
    }
    if let Some(end) = args.end {
        input.end_date = end;
    }
    let today = ws.tasks.today();
    if let Some(days) = args.shift_start {
        input.start_date = adjust_date(&input.start_date, days, today)
            .ok_or_else(|| format!("cannot shift invalid start date '{}'", input.start_date))?;
    }
    if let Some(days) = args.shift_end {
        input.end_date = adjust_date(&input.end_date, days, today)
            .ok_or_else(|| format!("cannot shift invalid end date '{}'", input.end_date))?;
    }
    check_date("start", &input.start_date)?;
    check_date("end", &input.end_date)?;

    let new_index = ws.tasks.edit(&args.column, index, &input)?;
    persisted("tasks", ws.tasks.save())?;

    let task = ws
        .tasks
        .task(&args.column, new_index)
        .ok_or("edited task vanished")?;
    if json {
        return print_json(&task_to_json(task, new_index));
    }
    for line in format_task_detail(task, new_index) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_task_mv(dir: &Path, args: TaskMvArgs, json: bool) -> CmdResult {
    let mut ws = load(dir)?;
    check_column(&ws, &args.column)?;
    let index = position_index(args.position)?;
    if ws.tasks.task(&args.column, index).is_none() {
        return Err(format!("no task at position {} in {}", args.position, args.column).into());
    }

    let direction = match args.target.to_ascii_lowercase().as_str() {
        "left" => Some(MoveDirection::Left),
        "right" => Some(MoveDirection::Right),
        _ => None,
    };
    let target = match direction {
        Some(direction) => match ws.config.adjacent_column(&args.column, direction) {
            Some(target) => target.to_string(),
            None => {
                let reason = format!("{} has no neighbour to the {}", args.column, args.target);
                if json {
                    return print_json(&MoveJson::skipped(reason));
                }
                println!("{}", reason);
                return Ok(());
            }
        },
        None => args.target.clone(),
    };

    let Some(new_index) = ws.tasks.move_task(&args.column, index, &target)? else {
        if json {
            return print_json(&MoveJson::skipped("nothing to move"));
        }
        println!("nothing to move");
        return Ok(());
    };
    persisted("tasks", ws.tasks.save())?;

    let task = ws
        .tasks
        .task(&target, new_index)
        .ok_or("moved task vanished")?;
    if json {
        return print_json(&MoveJson {
            moved: true,
            reason: None,
            task: Some(task_to_json(task, new_index)),
        });
    }
    println!("{} #{} -> {} #{}", args.column, args.position, target, new_index + 1);
    Ok(())
}

fn cmd_task_rm(dir: &Path, args: TaskRmArgs) -> CmdResult {
    let mut ws = load(dir)?;
    check_column(&ws, &args.column)?;
    let index = position_index(args.position)?;
    let Some(task) = ws.tasks.task(&args.column, index) else {
        return Err(format!("no task at position {} in {}", args.position, args.column).into());
    };

    if !args.yes && !confirm(&format!("Really delete '{}'?", task.description))? {
        println!("cancelled");
        return Ok(());
    }
    if let Some(removed) = ws.tasks.delete(&args.column, index) {
        persisted("tasks", ws.tasks.save())?;
        println!("deleted: {}", removed.description);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

fn cmd_topic_list(dir: &Path, json: bool) -> CmdResult {
    let ws = load(dir)?;
    let topics = ws.topics.table_order();
    if json {
        return print_json(&topics);
    }
    for line in format_topic_table(&ws.config, &topics) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_topic_show(dir: &Path, args: TopicIdArg, json: bool) -> CmdResult {
    let ws = load(dir)?;
    let topic = ws.topics.get(args.id).ok_or(TopicError::NotFound(args.id))?;
    if json {
        return print_json(topic);
    }
    for line in format_topic_detail(&ws.config, topic) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_topic_new(dir: &Path, args: TopicNewArgs, json: bool) -> CmdResult {
    let mut ws = load(dir)?;
    let values = parse_assignments(&args.values)?;
    for name in values.keys() {
        if ws.config.field(name).is_some_and(|f| f.read_only) {
            return Err(TopicError::ReadOnlyField(name.clone()).into());
        }
    }
    let id = ws.topics.create(&ws.config, values, today())?;
    persisted("topics", ws.topics.save())?;
    if json {
        return print_json(&TopicSavedJson {
            id,
            changed: Vec::new(),
        });
    }
    println!("created topic {}", id);
    Ok(())
}

/// Edit through the form: select the topic, apply each value as a user
/// edit, and save only when something actually differs.
fn cmd_topic_set(dir: &Path, args: TopicSetArgs, json: bool) -> CmdResult {
    let mut ws = load(dir)?;
    let values = parse_assignments(&args.values)?;

    let mut form = TopicForm::new(&ws.config);
    form.select(&ws.config, &ws.topics, args.id)?;
    for (field, text) in &values {
        form.set_text(&ws.config, &ws.topics, field, text)?;
    }

    let changed: Vec<String> = form.dirty_fields().into_iter().map(String::from).collect();
    if changed.is_empty() {
        if json {
            return print_json(&TopicSavedJson {
                id: args.id,
                changed,
            });
        }
        println!("topic {}: nothing changed", args.id);
        return Ok(());
    }

    form.save(&ws.config, &mut ws.topics, today())?;
    persisted("topics", ws.topics.save())?;
    if json {
        return print_json(&TopicSavedJson {
            id: args.id,
            changed,
        });
    }
    println!("topic {} updated: {}", args.id, changed.join(", "));
    Ok(())
}

fn cmd_topic_rm(dir: &Path, args: TopicRmArgs) -> CmdResult {
    let mut ws = load(dir)?;
    if !ws.topics.contains(args.id) {
        return Err(TopicError::NotFound(args.id).into());
    }
    if !args.yes && !confirm(&format!("Really delete topic {}?", args.id))? {
        println!("cancelled");
        return Ok(());
    }
    ws.topics.delete(args.id)?;
    persisted("topics", ws.topics.save())?;
    println!("deleted topic {}", args.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

fn cmd_notes_show(dir: &Path) -> CmdResult {
    let ws = load(dir)?;
    print!("{}", ws.notes.text);
    if !ws.notes.text.is_empty() && !ws.notes.text.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn cmd_notes_set(dir: &Path, args: NotesSetArgs) -> CmdResult {
    let mut ws = load(dir)?;
    persisted("notes", ws.save_notes(&args.text))?;
    Ok(())
}

/// Stream stdin into the notes, letting the autosave decide when to write.
fn cmd_notes_write(dir: &Path) -> CmdResult {
    let mut ws = load(dir)?;
    let mut autosave = Autosave::default().with_saved(ws.notes.text.clone());
    let mut text = String::new();

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        text.push_str(&line);
        text.push('\n');
        let now = Instant::now();
        if let Some(snapshot) = autosave.poll(now) {
            persisted("notes", ws.save_notes(&snapshot))?;
        }
        if let Some(snapshot) = autosave.on_change(&text, now) {
            persisted("notes", ws.save_notes(&snapshot))?;
        }
    }
    if autosave.has_pending() {
        tracing::debug!("notes input closed with unsaved changes");
    }
    if let Some(snapshot) = autosave.flush() {
        persisted("notes", ws.save_notes(&snapshot))?;
    }
    Ok(())
}
