//! Weekplan - weekly task planner
//!
//! CLI entry point for adding, importing and reviewing the week's tasks.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use keystore::FileStore;
use weekplan::cli::{Cli, Command, OutputFormat, ReportCommand, get_log_path};
use weekplan::config::Config;
use weekplan::domain::{Day, Priority, Task, TaskDraft, Week};
use weekplan::import::IMPORT_TEMPLATE;
use weekplan::parser::parse_prompt;
use weekplan::planner::{NewTask, Planner, PlannerError, TaskEdit, TaskFilter};
use weekplan::reports::{WeeklyReport, week_start};
use weekplan::stats::WeekStats;

type WeekPlanner = Planner<FileStore>;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let store_path = config.store_path();
    let store = FileStore::open(&store_path)
        .context(format!("Failed to open store at {}", store_path.display()))?;
    let planner = Planner::new(store, config.planner_options()?);

    let today = Local::now().date_naive();
    if config.planner.auto_rollover
        && let Some(report) = planner.rollover(today, Utc::now())?
    {
        println!(
            "{} saved report for week of {} ({}% complete); starting a new week",
            "New week:".cyan().bold(),
            report.week_start,
            report.stats.completion_rate
        );
    }

    debug!(?command, "main: dispatching command");
    match command {
        Command::Add { text, dry_run, today: day } => {
            let day = day.unwrap_or_else(|| Day::from(today.weekday()));
            cmd_add(&planner, &text.join(" "), day, dry_run)
        }
        Command::New {
            title,
            day,
            priority,
            category,
            period,
            due,
            description,
            notes,
        } => {
            let new = NewTask {
                title,
                priority: priority.unwrap_or(config.planner.default_priority),
                category: category.unwrap_or(config.planner.default_category),
                period: period.unwrap_or(config.planner.default_period),
                due_date: due,
                description: description.unwrap_or_default(),
                notes: notes.unwrap_or_default(),
            };
            let task = planner.add_task(day, new, Utc::now())?;
            println!("{} {}", "Added".green(), day.label());
            print_task(&task);
            Ok(())
        }
        Command::Import { source } => cmd_import(&planner, &source),
        Command::Template => {
            println!("{}", IMPORT_TEMPLATE);
            Ok(())
        }
        Command::List {
            day,
            filter,
            search,
            format,
        } => {
            let tasks = planner.filter(&TaskFilter {
                day,
                status: filter,
                search,
            })?;
            cmd_list(&tasks, format)
        }
        Command::Done { reference } => {
            let (day, task) = planner.toggle(&reference)?;
            let state = if task.completed { "Completed".green() } else { "Reopened".yellow() };
            println!("{} {} ({})", state, task.title, day.label());
            Ok(())
        }
        Command::Edit {
            reference,
            title,
            priority,
            category,
            period,
            due,
            clear_due,
            description,
            notes,
        } => {
            let edit = TaskEdit {
                title,
                priority,
                category,
                period,
                due_date: due,
                clear_due_date: clear_due,
                description,
                notes,
            };
            let (day, task) = planner.edit(&reference, edit)?;
            println!("{} {}", "Updated".green(), day.label());
            print_task(&task);
            Ok(())
        }
        Command::Move {
            reference,
            to,
            position,
        } => {
            let (from, task) = planner.move_task(&reference, to, position)?;
            println!("{} {}: {} -> {}", "Moved".green(), task.title, from.label(), to.label());
            Ok(())
        }
        Command::Rm { reference } => {
            let (day, task) = planner.delete(&reference)?;
            println!("{} {} ({})", "Deleted".red(), task.title, day.label());
            Ok(())
        }
        Command::Clear { day, count, all } => cmd_clear(&planner, day, count, all),
        Command::Undo => {
            let restored = planner.undo(Utc::now())?;
            println!("{} restored {} task(s)", "Undo:".green(), restored);
            Ok(())
        }
        Command::FreshWeek => {
            let count = planner.fresh_week(Utc::now())?;
            println!("{} {} task(s) reset for the new week", "Fresh week:".green(), count);
            Ok(())
        }
        Command::Stats { format } => cmd_stats(&planner, today, format),
        Command::Report { command } => cmd_report(&planner, today, command),
        Command::Export { file } => {
            let week = planner.export_week()?;
            write_json(&week, file.as_deref())
        }
        Command::Restore { file } => {
            let content = fs::read_to_string(&file).context(format!("Failed to read {}", file.display()))?;
            let week: Week = serde_json::from_str(&content).context("Invalid week document")?;
            let total = week.total();
            planner.restore_week(week)?;
            println!("{} {} task(s) from {}", "Restored".green(), total, file.display());
            Ok(())
        }
    }
}

/// Parse free text and add the resulting drafts
fn cmd_add(planner: &WeekPlanner, text: &str, today: Day, dry_run: bool) -> Result<()> {
    let drafts = parse_prompt(text, today);
    if drafts.is_empty() {
        return Err(eyre::eyre!(
            "Could not find a day in \"{}\". Try something like \"gym tomorrow evening\" or \"meeting on monday\"",
            text
        ));
    }

    if dry_run {
        println!("{}", "Would add:".yellow());
        for draft in &drafts {
            print_draft(draft);
        }
        return Ok(());
    }

    let added = planner.add_drafts(drafts, Utc::now())?;
    println!("{} {} task(s)", "Added".green(), added.len());
    for (day, task) in &added {
        print!("  {:<9} ", day.label());
        print_task(task);
    }
    Ok(())
}

/// Import a JSON batch from a file or stdin
fn cmd_import(planner: &WeekPlanner, source: &str) -> Result<()> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(source).context(format!("Failed to read {}", source))?
    };

    let summary = match planner.import_json(&text, Utc::now()) {
        Ok(summary) => summary,
        Err(PlannerError::Import(e)) if e.is_format_error() => {
            return Err(
                eyre::Report::new(e).wrap_err("Input is not a task batch; run `wp template` for the expected format")
            );
        }
        Err(e) => return Err(e.into()),
    };
    println!("{} {} task(s)", "Imported".green(), summary.added.len());
    if !summary.errors.is_empty() {
        println!("{} {} item(s) skipped:", "Warning:".yellow(), summary.errors.len());
        for error in &summary.errors {
            println!("  {}", error);
        }
    }
    Ok(())
}

fn cmd_list(tasks: &[(Day, Task)], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let items: Vec<serde_json::Value> = tasks
                .iter()
                .map(|(day, task)| {
                    let mut value = serde_json::to_value(task)?;
                    value["day"] = serde_json::Value::String(day.to_string());
                    Ok(value)
                })
                .collect::<Result<_, serde_json::Error>>()?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Text => {
            if tasks.is_empty() {
                println!("No tasks");
                return Ok(());
            }
            let mut current = None;
            for (day, task) in tasks {
                if current != Some(*day) {
                    println!("{}", day.label().bold());
                    current = Some(*day);
                }
                print!("  ");
                print_task(task);
            }
        }
    }
    Ok(())
}

fn cmd_clear(planner: &WeekPlanner, day: Option<Day>, count: Option<usize>, all: bool) -> Result<()> {
    let removed = match day {
        Some(day) if !all => planner.clear_day(day, count, Utc::now())?,
        _ => planner.clear_all(Utc::now())?,
    };

    if removed == 0 {
        println!("Nothing to clear");
    } else {
        println!("{} {} task(s); run `wp undo` to restore", "Cleared".red(), removed);
    }
    Ok(())
}

fn cmd_stats(planner: &WeekPlanner, today: NaiveDate, format: OutputFormat) -> Result<()> {
    let stats = planner.stats()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            let start = planner
                .repository()
                .week_start()?
                .unwrap_or_else(|| week_start(today));
            println!("{} {}", "Week of".bold(), start);
            print_stats(&stats);
        }
    }
    Ok(())
}

fn cmd_report(planner: &WeekPlanner, today: NaiveDate, command: ReportCommand) -> Result<()> {
    match command {
        ReportCommand::Save => {
            let report = planner.save_report(today, Utc::now())?;
            println!("{} report {} for week of {}", "Saved".green(), report.id, report.week_start);
        }
        ReportCommand::List { format } => {
            let reports = planner.reports()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
                OutputFormat::Text if reports.is_empty() => println!("No saved reports"),
                OutputFormat::Text => {
                    for report in &reports {
                        let grade = report.stats.grade();
                        println!(
                            "{}  {} to {}  {:>3}%  {}",
                            report.id.dimmed(),
                            report.week_start,
                            report.week_end,
                            report.stats.completion_rate,
                            grade.grade.bold()
                        );
                    }
                }
            }
        }
        ReportCommand::Show { reference } => print_report(&planner.find_report(&reference)?),
        ReportCommand::Delete { reference } => {
            let report = planner.delete_report(&reference)?;
            println!("{} report for week of {}", "Deleted".red(), report.week_start);
        }
        ReportCommand::Export { reference, file } => {
            let report = planner.find_report(&reference)?;
            write_json(&report, file.as_deref())?;
        }
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(value: &T, file: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match file {
        Some(path) => {
            fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
            println!("{} {}", "Wrote".green(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_task(task: &Task) {
    let check = if task.completed { "[x]".green() } else { "[ ]".normal() };
    let title = if task.completed {
        task.title.dimmed()
    } else {
        task.title.normal()
    };
    let priority = match task.priority {
        Priority::High => task.priority.as_str().red(),
        Priority::Medium => task.priority.as_str().yellow(),
        Priority::Low => task.priority.as_str().blue(),
    };

    let mut line = format!(
        "{} {}  {}  {} {} {}",
        check,
        title,
        task.id.dimmed(),
        priority,
        task.category,
        task.period
    );
    if !task.subtasks.is_empty() {
        line.push_str(&format!("  [{}/{}]", task.subtasks_done(), task.subtasks.len()));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", due));
    }
    println!("{}", line);
}

fn print_draft(draft: &TaskDraft) {
    println!(
        "  {:<9} {}  {} {} {}",
        draft.day.label(),
        draft.title,
        draft.priority,
        draft.category,
        draft.period
    );
    for subtask in &draft.subtasks {
        println!("            - {}", subtask.text);
    }
}

fn print_stats(stats: &WeekStats) {
    let grade = stats.grade();
    println!(
        "Total: {}  Completed: {}  Active: {}",
        stats.total_tasks, stats.completed_tasks, stats.active_tasks
    );
    println!(
        "Completion: {}%  Grade: {} ({})",
        stats.completion_rate,
        grade.grade.bold(),
        grade.message
    );

    println!("{}", "By day".bold());
    for (day, day_stats) in &stats.by_day {
        println!(
            "  {:<9} {}/{}  {:>3}%",
            day.label(),
            day_stats.completed,
            day_stats.total,
            day_stats.rate
        );
    }

    if !stats.by_category.is_empty() {
        println!("{}", "By category".bold());
        for (category, count) in &stats.by_category {
            println!("  {:<9} {}", category, count);
        }
    }

    println!("{}", "By priority".bold());
    for (priority, count) in &stats.by_priority {
        println!("  {:<9} {}", priority, count);
    }
}

fn print_report(report: &WeeklyReport) {
    println!(
        "{} {} to {}  (saved {})",
        "Week".bold(),
        report.week_start,
        report.week_end,
        report.saved_at.format("%Y-%m-%d %H:%M")
    );
    print_stats(&report.stats);
}
