//! taskdeck - Shared Task Board Library
//!
//! This library provides the core functionality for the taskdeck CLI
//! and TUI: a task board persisted as one JSON document, with per-task
//! chat threads.
//!
//! # Core Concepts
//!
//! - **Board**: the full task collection, one JSON object on disk
//! - **Areas**: workflow stages (idea, in_progress, decided, done)
//! - **Chat**: an append-only message thread on every task
//! - **Session**: ephemeral view state (user, page, selection, draft)
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskdeck.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes for the board document
//! - `output`: Human and JSON output envelopes
//! - `service`: Task mutations (create, update, chat)
//! - `session`: Ephemeral view state for the presentation layer
//! - `store`: Whole-document load/save with seeding and recovery
//! - `task`: Data model (Task, Area, Message, Board)
//! - `ui`: Interactive board (ratatui)

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod service;
pub mod session;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
