//! Command-line interface for taskdeck
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in the `task` submodule.

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::service::TaskService;
use crate::session::Session;
use crate::store::TaskStore;
use crate::ui;

mod task;

/// taskdeck - a shared task board
///
/// Tasks live in workflow areas (idea, in_progress, decided, done) and
/// each task carries its own chat thread. State is one JSON file.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the board document (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKDECK_DATA_FILE")]
    pub data_file: Option<std::path::PathBuf>,

    /// Path to a taskdeck.toml config file
    #[arg(long, global = true, env = "TASKDECK_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    /// Acting user name for created tasks and chat messages
    #[arg(long, global = true, env = "TASKDECK_USER")]
    pub user: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a task
    New {
        /// Task name
        name: String,

        /// Initial area: idea, in_progress, decided, done
        #[arg(long, default_value = "idea")]
        area: String,
    },

    /// List tasks on the board
    List {
        /// Only show one area
        #[arg(long)]
        area: Option<String>,
    },

    /// Show one task with its chat thread
    Show {
        /// Task id
        id: String,
    },

    /// Move a task to another area
    Move {
        /// Task id
        id: String,

        /// Target area: idea, in_progress, decided, done
        area: String,
    },

    /// Rename a task
    Rename {
        /// Task id
        id: String,

        /// New task name
        name: String,
    },

    /// Append a chat message to a task
    Chat {
        /// Task id
        id: String,

        /// Message body
        message: String,
    },

    /// Open the interactive board
    Board,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let data_file = config.resolve_data_file(self.data_file.clone())?;
        let user = config.resolve_user(self.user.as_deref());
        let service = TaskService::new(TaskStore::new(data_file));

        let output = crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::New { name, area } => task::run_new(task::NewOptions {
                name,
                area,
                user,
                service,
                output,
            }),
            Commands::List { area } => task::run_list(task::ListOptions {
                area,
                service,
                output,
            }),
            Commands::Show { id } => task::run_show(task::ShowOptions {
                id,
                service,
                output,
            }),
            Commands::Move { id, area } => task::run_move(task::MoveOptions {
                id,
                area,
                service,
                output,
            }),
            Commands::Rename { id, name } => task::run_rename(task::RenameOptions {
                id,
                name,
                service,
                output,
            }),
            Commands::Chat { id, message } => task::run_chat(task::ChatOptions {
                id,
                message,
                user,
                service,
                output,
            }),
            Commands::Board => {
                let session = Session::with_user(user.as_deref());
                ui::board::run(service, session)
            }
        }
    }
}
