use crate::export::ExportFormat;
use clap::{ArgGroup, Parser, Subcommand};

/// Command-line interface definition for worklogger
#[derive(Parser)]
#[command(
    name = "worklogger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track task sessions with pause/resume and correlate git commits with them",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Start a new task session
    Start {
        /// What you are working on
        description: String,

        #[arg(long = "tag", short = 't', help = "Tag the session (repeatable)")]
        tags: Vec<String>,

        #[arg(long = "kpi", short = 'k', help = "Attach a KPI to the session (repeatable)")]
        kpis: Vec<String>,
    },

    /// Pause the running session
    Pause,

    /// Resume the paused session
    Resume,

    /// Stop the open session (or the one given by --id)
    Stop {
        #[arg(long = "id", help = "Stop this session instead of the open one")]
        id: Option<i64>,
    },

    /// Show the open session
    Status,

    /// Import new commits from the git history
    #[command(group(
        ArgGroup::new("mode")
            .args(["session", "new", "unassociated"])
            .multiple(false)
    ))]
    Sync {
        #[arg(long = "repo", help = "Repository to read (default: configured repository)")]
        repo: Option<String>,

        #[arg(long = "session", help = "Attach new commits to this existing session")]
        session: Option<i64>,

        #[arg(long = "new", value_name = "DESCRIPTION", help = "Create a new session for the commits")]
        new: Option<String>,

        #[arg(long = "unassociated", help = "Store the commits without a session")]
        unassociated: bool,
    },

    /// Store a single commit (called by the post-commit hook)
    RecordCommit {
        #[arg(long)]
        hash: String,

        #[arg(long)]
        message: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        date: String,
    },

    /// Install a git post-commit hook that records every commit
    SetupHook {
        #[arg(long = "repo", help = "Repository root (default: current directory)")]
        repo: Option<String>,
    },

    /// Show today's and this week's figures, with optional breakdowns
    Summary {
        #[arg(long = "breakdown", short = 'b', help = "Add daily, weekly and monthly breakdowns")]
        breakdown: bool,
    },

    /// Print the session history or the internal log table
    Log {
        #[arg(long = "audit", help = "Print rows from the internal log table")]
        audit: bool,
    },

    /// List sessions with their status
    List {
        #[arg(long = "json", help = "Print the rows as JSON")]
        json: bool,
    },

    /// Export summary, breakdowns and sessions
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
