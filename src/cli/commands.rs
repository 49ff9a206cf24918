use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tuido", about = concat!("tuido v", env!("CARGO_PKG_VERSION"), " - topics, tasks and notes in plain files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory holding config.toml, tasks.json, topics.json and notes.md
    #[arg(short = 'd', long = "data-dir", global = true, default_value = "data")]
    pub data_dir: String,

    /// More log output in <data-dir>/info.log (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a data directory with a default config
    Init(InitArgs),
    /// List task board columns in order
    Columns,
    /// Task board commands
    Task(TaskCmd),
    /// Topic commands
    Topic(TopicCmd),
    /// Notes commands
    Notes(NotesCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml (data files are kept)
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks (all columns, or one)
    List(TaskListArgs),
    /// Add a task to a column
    Add(TaskAddArgs),
    /// Edit a task's fields
    Edit(TaskEditArgs),
    /// Move a task to a neighbouring (or named) column
    Mv(TaskMvArgs),
    /// Delete a task
    Rm(TaskRmArgs),
}

#[derive(Args)]
pub struct TaskListArgs {
    /// Column to list (default: all columns)
    pub column: Option<String>,
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Column to add the task to
    pub column: String,
    /// Task description
    pub description: String,
    /// Priority: high, medium, low (or 1, 2, 3)
    #[arg(short, long, default_value = "low")]
    pub priority: String,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Args)]
pub struct TaskEditArgs {
    /// Column of the task
    pub column: String,
    /// Position of the task in the column (1-based, as listed)
    pub position: usize,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
    /// New priority
    #[arg(short, long)]
    pub priority: Option<String>,
    /// New start date (YYYY-MM-DD, or "" to unset)
    #[arg(long)]
    pub start: Option<String>,
    /// New end date (YYYY-MM-DD, or "" to unset)
    #[arg(long)]
    pub end: Option<String>,
    /// Shift the start date by N days (an unset date starts from today)
    #[arg(long, allow_hyphen_values = true)]
    pub shift_start: Option<i64>,
    /// Shift the end date by N days (an unset date starts from today)
    #[arg(long, allow_hyphen_values = true)]
    pub shift_end: Option<i64>,
}

#[derive(Args)]
pub struct TaskMvArgs {
    /// Column of the task
    pub column: String,
    /// Position of the task in the column (1-based, as listed)
    pub position: usize,
    /// "left", "right", or a column name
    pub target: String,
}

#[derive(Args)]
pub struct TaskRmArgs {
    /// Column of the task
    pub column: String,
    /// Position of the task in the column (1-based, as listed)
    pub position: usize,
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TopicCmd {
    #[command(subcommand)]
    pub action: TopicAction,
}

#[derive(Subcommand)]
pub enum TopicAction {
    /// List topics, newest first
    List,
    /// Show every field of a topic
    Show(TopicIdArg),
    /// Create a topic
    New(TopicNewArgs),
    /// Edit fields of a topic
    Set(TopicSetArgs),
    /// Delete a topic
    Rm(TopicRmArgs),
}

#[derive(Args)]
pub struct TopicIdArg {
    /// Topic ID
    pub id: u64,
}

#[derive(Args)]
pub struct TopicNewArgs {
    /// Initial values as FIELD=VALUE
    pub values: Vec<String>,
}

#[derive(Args)]
pub struct TopicSetArgs {
    /// Topic ID
    pub id: u64,
    /// New values as FIELD=VALUE (an empty VALUE clears the field)
    #[arg(required = true)]
    pub values: Vec<String>,
}

#[derive(Args)]
pub struct TopicRmArgs {
    /// Topic ID
    pub id: u64,
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NotesCmd {
    #[command(subcommand)]
    pub action: NotesAction,
}

#[derive(Subcommand)]
pub enum NotesAction {
    /// Print the notes
    Show,
    /// Replace the notes with TEXT
    Set(NotesSetArgs),
    /// Replace the notes with stdin, saving periodically while reading
    Write,
}

#[derive(Args)]
pub struct NotesSetArgs {
    /// New notes text
    pub text: String,
}
