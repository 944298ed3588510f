//! Where the todo collection lives between requests.
//!
//! The collection is loaded fresh for every request and written back whole
//! after every mutation. Nothing is cached in between.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StorageError;
use crate::todo::Todo;

/// Load/save pair over the whole collection.
pub trait TodoStore: Send + Sync + 'static {
    fn load(&self) -> Result<Vec<Todo>, StorageError>;
    fn save(&self, todos: &[Todo]) -> Result<(), StorageError>;
}

// ── FileStore ─────────────────────────────────────────────────────────────────

/// A pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, op: &'static str) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
        move |source| StorageError::Io { op, path: self.path.clone(), source }
    }
}

impl TodoStore for FileStore {
    /// Missing or blank file reads as an empty collection.
    fn load(&self) -> Result<Vec<Todo>, StorageError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err("read")(e)),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&raw)
            .map_err(|source| StorageError::Corrupt { path: self.path.clone(), source })
    }

    /// Writes a temp file beside the target and renames it into place.
    fn save(&self, todos: &[Todo]) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(self.io_err("create directory for"))?;

        let mut body = serde_json::to_vec_pretty(todos).map_err(StorageError::Encode)?;
        body.push(b'\n');

        let mut tmp = NamedTempFile::new_in(dir).map_err(self.io_err("create temp file for"))?;
        tmp.write_all(&body).map_err(self.io_err("write"))?;
        tmp.as_file().sync_all().map_err(self.io_err("sync"))?;
        tmp.persist(&self.path).map_err(|e| self.io_err("replace")(e.error))?;

        debug!(path = %self.path.display(), count = todos.len(), "todos saved");
        Ok(())
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// Keeps the collection in process memory. No filesystem side effects.
#[derive(Debug, Default)]
pub struct MemoryStore {
    todos: Mutex<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self { todos: Mutex::new(todos) }
    }
}

impl TodoStore for MemoryStore {
    fn load(&self) -> Result<Vec<Todo>, StorageError> {
        // A poisoned lock still holds the last fully saved collection.
        Ok(self.todos.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, todos: &[Todo]) -> Result<(), StorageError> {
        *self.todos.lock().unwrap_or_else(|e| e.into_inner()) = todos.to_vec();
        Ok(())
    }
}
