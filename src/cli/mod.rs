//! CLI command definitions for taskpad.
//!
//! The main entry point is the `Cli` struct; with no subcommand the HTTP
//! server starts.

pub mod report;

use clap::{Parser, Subcommand};
use report::ReportArgs;
use std::net::IpAddr;
use std::path::PathBuf;

/// Personal task manager server and tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Address to listen on (overrides config)
    #[arg(long, global = true)]
    pub bind: Option<IpAddr>,

    /// Port to listen on (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default if no subcommand given)
    Serve,

    /// Print a user's task statistics and filtered task list
    Report(ReportArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["taskpad", "--port", "8080"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.log, "2");
    }

    #[test]
    fn report_takes_filters_and_format() {
        let cli = Cli::try_parse_from([
            "taskpad",
            "report",
            "--email",
            "ada@example.com",
            "--priority",
            "urgent",
            "--format",
            "json",
            "-d",
            "/tmp/t.db",
        ])
        .unwrap();
        let Some(Command::Report(args)) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.email, "ada@example.com");
        assert_eq!(args.priority.as_deref(), Some("urgent"));
        assert_eq!(args.format, crate::format::OutputFormat::Json);
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/t.db")));
    }

    #[test]
    fn report_requires_email() {
        assert!(Cli::try_parse_from(["taskpad", "report"]).is_err());
    }
}
