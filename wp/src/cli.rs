//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{Category, Day, Period, Priority};
use crate::planner::StatusFilter;

/// Weekplan - weekly task planner
#[derive(Parser)]
#[command(
    name = "wp",
    about = "Weekly task planner with natural-language task entry",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/weekplan/logs/weekplan.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add tasks from a sentence, e.g. "gym tomorrow evening high priority"
    Add {
        /// Free-form description
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Show what would be added without saving
        #[arg(long)]
        dry_run: bool,

        /// Treat this day as today when resolving "today" and "tomorrow"
        #[arg(long, value_name = "DAY")]
        today: Option<Day>,
    },

    /// Add one task with explicit fields
    New {
        /// Task title
        title: String,

        /// Day of the week
        #[arg(short, long)]
        day: Day,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        period: Option<Period>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Import tasks from a JSON batch file ("-" reads stdin)
    Import {
        #[arg(value_name = "FILE")]
        source: String,
    },

    /// Print a JSON batch template for `import`
    Template,

    /// List tasks
    List {
        /// Only this day
        #[arg(short, long)]
        day: Option<Day>,

        /// Status filter (all, active, completed, high)
        #[arg(short, long, default_value = "all")]
        filter: StatusFilter,

        /// Search title and description
        #[arg(short, long)]
        search: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Toggle a task's completion
    Done {
        /// Task ID, ID prefix or title fragment
        reference: String,
    },

    /// Change fields of a task
    Edit {
        reference: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        period: Option<Period>,

        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Move a task to another day or position
    Move {
        reference: String,

        /// Target day
        to: Day,

        /// 0-based position within the target day (default: end)
        #[arg(long)]
        position: Option<usize>,
    },

    /// Delete a task
    Rm { reference: String },

    /// Remove tasks from a day, or the whole week
    Clear {
        /// Day to clear
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        day: Option<Day>,

        /// Only the first N tasks of the day
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Clear every day
        #[arg(long)]
        all: bool,
    },

    /// Restore the tasks removed by the last clear
    Undo,

    /// Keep the week's tasks but reset their progress
    FreshWeek,

    /// Show statistics for the current week
    Stats {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage weekly reports
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },

    /// Export the week as JSON (stdout when no file is given)
    Export { file: Option<PathBuf> },

    /// Replace the week with a previously exported JSON document
    Restore { file: PathBuf },
}

/// Report subcommands
#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Save a report for the current week
    Save,

    /// List saved reports
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one report
    Show {
        /// Report ID, ID prefix or week start date
        reference: String,
    },

    /// Delete one report
    Delete { reference: String },

    /// Write one report as JSON (stdout when no file is given)
    Export { reference: String, file: Option<PathBuf> },
}

/// Output format for list/stats commands
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weekplan")
        .join("logs")
        .join("weekplan.log");
    debug!(?path, "get_log_path: returning path");
    path
}
