//! CLI argument parsing.
//!
//! The CLI stays thin: each subcommand loads state, calls one module
//! operation, and prints the outcome.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mj",
    version,
    about = "Wellness journal: entries, moods, sessions, and AI-assisted polishing",
    after_help = "Examples:\n  mj journal add --title \"Lake day\" --content \"We swam.\" --mood happy\n  mj journal enhance entry-1718000000000\n  mj enhance --title Untitled --file draft.txt --json\n  mj session log --minutes 15 --mood calm\n  mj stats --goal 5\n  mj auth enroll --pin 2468",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Polish a title and content without saving them
    Enhance(EnhanceArgs),
    /// Manage journal entries
    #[command(subcommand)]
    Journal(JournalCommand),
    /// Manage files attached to entries
    #[command(subcommand)]
    Attach(AttachCommand),
    /// Record wellness sessions
    #[command(subcommand)]
    Session(SessionCommand),
    /// List moods with their scores and colors
    Moods,
    /// Show session and journal statistics
    Stats(StatsArgs),
    /// Print a greeting for the time of day
    Greet(GreetArgs),
    /// Configure and test the journal lock
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Show recent enhancement runs
    Log(LogArgs),
    /// Show the resolved configuration
    Config,
}

/// Entry text given inline or read from a file.
#[derive(Args, Debug)]
pub struct ContentArgs {
    /// Entry content
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,

    /// Read the entry content from a file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EnhanceArgs {
    #[arg(long, default_value = "")]
    pub title: String,

    #[command(flatten)]
    pub body: ContentArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    /// Add a new entry
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[command(flatten)]
        body: ContentArgs,
        #[arg(long)]
        mood: Option<String>,
    },
    /// List entries, newest first
    List {
        #[command(flatten)]
        unlock: UnlockArgs,
        #[arg(long)]
        json: bool,
    },
    /// Show one entry
    Show {
        id: String,
        #[command(flatten)]
        unlock: UnlockArgs,
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry and its attachments
    Delete {
        id: String,
        #[command(flatten)]
        unlock: UnlockArgs,
    },
    /// Enhance a stored entry and save the result
    Enhance {
        id: String,
        #[command(flatten)]
        unlock: UnlockArgs,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct UnlockArgs {
    /// PIN for a locked journal
    #[arg(long)]
    pub pin: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AttachCommand {
    /// Upload a file and link it to an entry
    Upload {
        entry: String,
        file: PathBuf,
        #[command(flatten)]
        unlock: UnlockArgs,
    },
    /// Print the URL of a stored object
    Url {
        path: String,
        #[command(flatten)]
        unlock: UnlockArgs,
    },
    /// Copy a stored object to a local file
    Download {
        path: String,
        #[arg(long, value_name = "PATH")]
        out: PathBuf,
        #[command(flatten)]
        unlock: UnlockArgs,
    },
    /// Remove an attachment from an entry and storage
    Delete {
        entry: String,
        path: String,
        #[command(flatten)]
        unlock: UnlockArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Record a completed session
    Log {
        #[arg(long)]
        minutes: u32,
        #[arg(long)]
        mood: Option<String>,
        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Weekly session goal
    #[arg(long, default_value_t = 5)]
    pub goal: u32,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GreetArgs {
    /// Language code (en, es, fr, de, pt)
    #[arg(long)]
    pub lang: Option<String>,

    /// Hour of day (0-23), defaults to now
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    pub hour: Option<u32>,

    /// Remember --lang as the preferred language
    #[arg(long, requires = "lang")]
    pub save: bool,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Enroll or replace the PIN
    Enroll {
        #[arg(long)]
        pin: String,
    },
    /// Check a PIN against the journal lock
    Unlock {
        #[arg(long)]
        pin: String,
    },
    /// Choose how the journal is unlocked (pin, biometric, none)
    Method { method: String },
    /// Show the lock configuration
    Status,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Number of most recent runs to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    #[arg(long)]
    pub json: bool,
}
