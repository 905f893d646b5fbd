//! Output formatting for the `report` command.

use crate::types::{TaskStats, User};
use crate::views::TaskView;
use anyhow::Result;
use serde::Serialize;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Markdown,
}

/// One user's tasks, already filtered and ordered.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub user: &'a User,
    pub stats: TaskStats,
    pub tasks: &'a [TaskView],
}

pub fn format_report(report: &Report<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_report_json(report),
        OutputFormat::Markdown => Ok(format_report_markdown(report)),
    }
}

pub fn format_report_json(report: &Report<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn format_report_markdown(report: &Report<'_>) -> String {
    let mut md = String::new();
    let stats = &report.stats;

    md.push_str(&format!(
        "# Tasks for {} <{}>\n\n",
        report.user.name, report.user.email
    ));
    md.push_str(&format!(
        "- **total**: {}\n- **completed**: {}\n- **pending**: {}\n- **urgent**: {}\n- **overdue**: {}\n\n",
        stats.total, stats.completed, stats.pending, stats.urgent, stats.overdue
    ));

    if report.tasks.is_empty() {
        md.push_str("_No matching tasks._\n");
        return md;
    }

    md.push_str(&format!("## Matching ({})\n\n", report.tasks.len()));
    md.push_str("| Done | Title | Category | Priority | Due |\n");
    md.push_str("|------|-------|----------|----------|-----|\n");
    for view in report.tasks {
        md.push_str(&format_task_row(view));
    }

    md
}

fn format_task_row(view: &TaskView) -> String {
    let task = &view.task;
    format!(
        "| {} | {} | {} | {} | {} |\n",
        if task.completed { "x" } else { " " },
        escape_cell(&task.title),
        task.category,
        task.priority,
        view.due_label.as_deref().unwrap_or("-"),
    )
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
