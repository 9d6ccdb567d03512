//! CLI entry point for taskdeck.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use config::AppConfig;
use taskdeck_app::SeedOutcome;
use taskdeck_store::FileStore;

mod commands;
mod config;

/// Local-first task tracking from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: track, filter and visualize your tasks locally"
)]
struct Cli {
    /// Directory holding the task store (defaults to the platform data dir).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task.
    Add {
        /// Task title.
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Due date in YYYY-MM-DD form.
        #[arg(long)]
        due: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
    },

    /// Edit an existing task; unset flags keep the current value.
    Edit {
        /// Id of the task to edit.
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Replace the tag list (repeatable).
        #[arg(short = 't', long = "tag")]
        tags: Option<Vec<String>>,
    },

    /// Mark a task as done.
    Done {
        /// Id of the task to complete.
        id: String,
    },

    /// Delete a task.
    Rm {
        /// Id of the task to delete.
        id: String,
    },

    /// List tasks with optional filtering and sorting.
    Ls {
        /// Case-insensitive search over titles.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Sort key: due | priority.
        #[arg(long, default_value = "due")]
        sort: String,
        /// Output format: table | json.
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show aggregate counters and breakdowns.
    Stats,

    /// Show completions per day over a trailing window.
    Trend {
        /// Window size in days.
        #[arg(long, default_value_t = 30)]
        days: u16,
    },

    /// Replace the collection with the contents of a JSON file.
    Import {
        /// File holding a JSON array of tasks.
        file: PathBuf,
    },

    /// Write the collection to a JSON file.
    Export {
        /// Output path (default: tasks.json).
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let Cli { data_dir, cmd } = Cli::parse();
    install_tracing();

    let config = AppConfig::load()?;
    let data_dir = data_dir.unwrap_or_else(|| config.data_dir());
    let store = FileStore::open(&data_dir)?;
    let seed = config.seed_source();
    let (mut repository, outcome) = taskdeck_app::initialize(store, seed.as_ref());
    if let SeedOutcome::Seeded(count) = outcome {
        tracing::info!(count, "loaded sample tasks into an empty store");
    }

    commands::run(cmd, &mut repository)
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
