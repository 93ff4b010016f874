//! Durable storage for the task board.
//!
//! The whole board lives in one JSON document. Every read loads the
//! full document and every write rewrites it atomically; the expected
//! board size is small and human-curated, so whole-document I/O keeps
//! the format trivially inspectable.
//!
//! A file that does not exist yet is seeded with example tasks. A file
//! that exists but does not parse is treated as an empty board (logged,
//! not raised) so a hand-edited file never bricks the app.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::Board;

/// Storage manager for the task board document.
#[derive(Debug, Clone)]
pub struct TaskStore {
    /// Path to the JSON document.
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path to the board document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path to the advisory lock file guarding mutations.
    pub fn lock_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.lock", self.path.display()))
    }

    /// Load the full board.
    ///
    /// A missing file is seeded (directory created, seed board written)
    /// and the seed returned. Invalid JSON degrades to an empty board.
    /// Any other I/O failure propagates.
    pub fn load(&self) -> Result<Board> {
        if !self.path.exists() {
            let board = Board::seed();
            self.save(&board)?;
            return Ok(board);
        }

        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(board) => Ok(board),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "task file is not valid JSON; treating the board as empty"
                );
                Ok(Board::default())
            }
        }
    }

    /// Save the full board, overwriting the previous contents.
    ///
    /// Pretty-printed for diffability; written atomically so a reader
    /// never sees a partial document.
    pub fn save(&self, board: &Board) -> Result<()> {
        let json = serde_json::to_string_pretty(board)?;
        lock::write_atomic_str(&self.path, &json)
    }

    /// Run one load-mutate-save cycle under the advisory lock.
    ///
    /// The lock spans the whole window, so two cooperating processes
    /// cannot silently clobber each other's writes. An error from the
    /// mutator aborts before save, leaving the file untouched.
    pub fn update<T, F>(&self, mutator: F) -> Result<T>
    where
        F: FnOnce(&mut Board) -> Result<T>,
    {
        let _lock = FileLock::acquire(self.lock_path(), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut board = self.load()?;
        let result = mutator(&mut board)?;
        self.save(&board)?;
        Ok(result)
    }
}
