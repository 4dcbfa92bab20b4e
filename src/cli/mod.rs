//! CLI 模块

pub mod menu;
pub mod render;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::model::{Priority, TaskFilter, TaskId};

#[derive(Parser)]
#[command(name = "sprig")]
#[command(version)]
#[command(about = "Todo list manager: tasks in a linked list, undo on a stack")]
pub struct Cli {
    /// Data file (overrides `storage.data_file` in config.toml)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Project to use (defaults to the last used project)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Don't write changes back to the data file
    #[arg(long, global = true)]
    pub no_save: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu (default)
    Menu,
    /// Add a task
    Add {
        /// Task description
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
        /// high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List tasks
    #[command(alias = "ls")]
    List {
        /// all, pending, done or high
        #[arg(short, long, default_value = "all")]
        filter: TaskFilter,
        /// Case-insensitive search in descriptions
        #[arg(short, long, conflicts_with = "filter")]
        search: Option<String>,
    },
    /// Mark a task completed
    Done {
        /// Task id
        id: TaskId,
    },
    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// Task id
        id: TaskId,
    },
    /// Show task statistics
    Stats,
    /// Show the kanban board
    Kanban,
    /// List projects
    Projects,
    /// Show or initialize the config file
    Config {
        /// Write a default config.toml if none exists
        #[arg(long)]
        init: bool,
    },
}
