//! `report` subcommand: a user's tasks straight from the database.

use crate::config::Config;
use crate::db::Database;
use crate::format::{OutputFormat, Report, format_report};
use crate::views::{Clock, DueDateClassifier, FilterCriteria, task_stats, task_views};
use anyhow::{Result, bail};
use clap::Args;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Email of the user to report on
    #[arg(long)]
    pub email: String,

    /// Only this category (or "all")
    #[arg(long)]
    pub category: Option<String>,

    /// Only this priority (or "all")
    #[arg(long)]
    pub priority: Option<String>,

    /// "pending", "completed" or "all"
    #[arg(long)]
    pub status: Option<String>,

    /// Case-insensitive text to look for in title or description
    #[arg(long)]
    pub search: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

/// Render the report. Stats cover all of the user's tasks; the list is
/// filtered and ordered.
pub fn run_report(
    db: &Database,
    config: &Config,
    clock: &dyn Clock,
    args: &ReportArgs,
) -> Result<String> {
    let email = args.email.trim().to_lowercase();
    let Some(user) = db.get_user_by_email(&email)? else {
        bail!("no user with email {}", email);
    };

    let tasks = db.list_tasks(&user.id)?;
    let now = clock.now();
    let criteria = FilterCriteria::from_params(
        args.category.as_deref(),
        args.priority.as_deref(),
        args.status.as_deref(),
        args.search.as_deref(),
    );
    let classifier = DueDateClassifier::new(config.tasks.due_soon_days);
    let views = task_views(&tasks, &criteria, &classifier, now);

    let report = Report {
        user: &user,
        stats: task_stats(&tasks, now),
        tasks: &views,
    };
    format_report(&report, args.format)
}
