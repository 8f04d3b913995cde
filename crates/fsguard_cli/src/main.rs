//! fsguard CLI - Command-line interface for lock-coordinated file edits.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod workspace;

#[derive(Parser)]
#[command(name = "fsguard")]
#[command(about = "Safe, lock-coordinated file edits for agent workspaces", long_about = None)]
#[command(version)]
struct Cli {
    /// Workspace directory (sandbox root and config location)
    #[arg(short, long, global = true, default_value = ".")]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default fsguard.toml and create the memory directory
    Init,
    /// Replace one exact occurrence of text in a file
    Edit {
        /// File to edit
        path: PathBuf,
        /// Exact text to replace (must occur exactly once)
        #[arg(long)]
        old: String,
        /// Replacement text
        #[arg(long)]
        new: String,
    },
    /// Append content to a file, creating it if needed
    Append {
        /// File to append to
        path: PathBuf,
        /// Content to append (no newline is added)
        content: String,
    },
    /// Add an entry to today's daily note
    Note {
        /// The note text
        text: String,
    },
    /// Show long-term memory and recent daily notes
    Memory {
        /// Number of days of notes to include (defaults to config)
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Hammer one file with concurrent appends and verify nothing was lost
    Stress {
        /// Target file
        path: PathBuf,
        /// Number of writer threads
        #[arg(long, default_value = "8")]
        writers: usize,
        /// Appends per writer
        #[arg(long, default_value = "100")]
        appends: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let workspace = cli.workspace.as_path();

    match cli.command {
        Commands::Init => commands::init::run(workspace),
        Commands::Edit { path, old, new } => commands::file::edit(workspace, &path, &old, &new),
        Commands::Append { path, content } => commands::file::append(workspace, &path, &content),
        Commands::Note { text } => commands::memory::note(workspace, &text),
        Commands::Memory { days } => commands::memory::show(workspace, days),
        Commands::Stress {
            path,
            writers,
            appends,
        } => commands::stress::run(workspace, &path, writers, appends),
    }
}
