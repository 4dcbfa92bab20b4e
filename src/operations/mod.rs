//! Task operations - shared business logic layer
//!
//! This module contains the core business logic for task operations,
//! shared between the interactive menu and the one-shot subcommands.

pub mod stats;
pub mod tasks;
