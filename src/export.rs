use crate::domain::{flatten, task_stats, CalendarDate, Task, TaskState, TaskTree, Timeline};
use crate::persistence::{atomic_write, ensure_dir};
use anyhow::{Context, Result};
use chrono::Local;
use clap::ValueEnum;
use serde_json::{json, Map, Value};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Markdown => "Markdown",
            Self::Json => "JSON",
            Self::Text => "Plain text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportScope {
    #[default]
    Day,
    Month,
    All,
}

impl ExportScope {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Selected day",
            Self::Month => "Selected month",
            Self::All => "All dates",
        }
    }
}

/// What to export, relative to which date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub scope: ExportScope,
    pub anchor: CalendarDate,
}

impl ExportRequest {
    /// File name such as `tasklog-2024-06.md`
    pub fn file_name(&self) -> String {
        let suffix = match self.scope {
            ExportScope::Day => self.anchor.key(),
            ExportScope::Month => format!("{}-{:02}", self.anchor.year(), self.anchor.month()),
            ExportScope::All => "all".to_string(),
        };
        format!("tasklog-{}.{}", suffix, self.format.extension())
    }

    fn heading(&self) -> String {
        match self.scope {
            ExportScope::Day => self.anchor.long_label(),
            ExportScope::Month => format!("{} {}", self.anchor.month_name(), self.anchor.year()),
            ExportScope::All => "All dates".to_string(),
        }
    }
}

/// Date keys covered by the request, in calendar order
fn dates_in_scope(tasks: &TaskTree, request: &ExportRequest) -> Vec<String> {
    match request.scope {
        ExportScope::Day => vec![request.anchor.key()],
        ExportScope::Month => {
            let prefix = format!("{}-{:02}-", request.anchor.year(), request.anchor.month());
            tasks
                .dates()
                .filter(|date| date.starts_with(&prefix))
                .cloned()
                .collect()
        }
        ExportScope::All => tasks.dates().cloned().collect(),
    }
}

fn date_heading(date: &str) -> String {
    date.parse::<CalendarDate>()
        .map(|d| d.long_label())
        .unwrap_or_else(|_| date.to_string())
}

fn state_suffix(task: &Task) -> &'static str {
    match task.state {
        TaskState::Delegated => " _(delegated)_",
        TaskState::Delayed => " _(delayed)_",
        _ => "",
    }
}

pub fn render(tasks: &TaskTree, timeline: &Timeline, request: &ExportRequest) -> Result<String> {
    let dates = dates_in_scope(tasks, request);
    match request.format {
        ExportFormat::Markdown => Ok(render_markdown(tasks, &dates, request)),
        ExportFormat::Text => Ok(render_text(tasks, &dates, request)),
        ExportFormat::Json => render_json(tasks, timeline, &dates, request),
    }
}

fn render_markdown(tasks: &TaskTree, dates: &[String], request: &ExportRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Tasks: {}\n", request.heading());

    if dates.iter().all(|date| tasks.tasks_for_date(date).is_empty()) {
        out.push_str("_No tasks_\n");
        return out;
    }

    for date in dates {
        let day_tasks = tasks.tasks_for_date(date);
        if day_tasks.is_empty() {
            continue;
        }
        let stats = task_stats(day_tasks);
        let _ = writeln!(out, "## {}\n", date_heading(date));
        let _ = writeln!(
            out,
            "Progress: {}/{} ({}%)\n",
            stats.completed,
            stats.total,
            stats.percent()
        );
        for (task, depth) in flatten(day_tasks, false) {
            let check = if task.state == TaskState::Completed { "x" } else { " " };
            let badge = if task.priority.badge().is_empty() {
                String::new()
            } else {
                format!(" `{}`", task.priority.badge())
            };
            let _ = writeln!(
                out,
                "{}- [{}] {}{}{}",
                "  ".repeat(depth),
                check,
                task.title,
                badge,
                state_suffix(task)
            );
        }
        out.push('\n');
    }
    out
}

fn render_text(tasks: &TaskTree, dates: &[String], request: &ExportRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", request.heading());
    let _ = writeln!(out, "{}\n", "=".repeat(request.heading().chars().count()));

    for date in dates {
        let day_tasks = tasks.tasks_for_date(date);
        if day_tasks.is_empty() && request.scope != ExportScope::Day {
            continue;
        }
        let _ = writeln!(out, "{}", date_heading(date));
        if day_tasks.is_empty() {
            out.push_str("  (no tasks)\n");
        }
        for (task, depth) in flatten(day_tasks, false) {
            let badge = if task.priority.badge().is_empty() {
                String::new()
            } else {
                format!(" [{}]", task.priority.badge())
            };
            let _ = writeln!(
                out,
                "{}{} {}{}",
                "  ".repeat(depth + 1),
                task.state.glyph(),
                task.title,
                badge
            );
        }
        out.push('\n');
    }
    out
}

fn render_json(
    tasks: &TaskTree,
    timeline: &Timeline,
    dates: &[String],
    request: &ExportRequest,
) -> Result<String> {
    let mut task_map = Map::new();
    let mut event_map = Map::new();
    for date in dates {
        let day_tasks = tasks.tasks_for_date(date);
        if !day_tasks.is_empty() {
            task_map.insert(date.clone(), serde_json::to_value(day_tasks)?);
        }
        let events = timeline.events_for_date(date);
        if !events.is_empty() {
            event_map.insert(date.clone(), serde_json::to_value(events)?);
        }
    }

    let document = json!({
        "exportedAt": Local::now().to_rfc3339(),
        "scope": request.heading(),
        "tasks": Value::Object(task_map),
        "timeline": Value::Object(event_map),
    });
    serde_json::to_string_pretty(&document).context("Failed to serialize export")
}

/// Render and write into `dir`, returning the written path
pub fn export_to_dir(
    tasks: &TaskTree,
    timeline: &Timeline,
    request: &ExportRequest,
    dir: &Path,
) -> Result<PathBuf> {
    let path = ensure_dir(dir)?.join(request.file_name());
    export_to_file(tasks, timeline, request, &path)?;
    Ok(path)
}

pub fn export_to_file(
    tasks: &TaskTree,
    timeline: &Timeline,
    request: &ExportRequest,
    path: &Path,
) -> Result<()> {
    let content = render(tasks, timeline, request)?;
    atomic_write(path, &content)
        .with_context(|| format!("Failed to write export: {}", path.display()))
}
