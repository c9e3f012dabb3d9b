//! Active-script tracking for `execute_script`.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{DbError, Result};

/// Canonical paths of the scripts currently executing
#[derive(Debug, Clone, Default)]
pub struct ScriptHistory {
    active: Rc<RefCell<HashSet<PathBuf>>>,
}

impl ScriptHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as running until the returned guard is dropped.
    ///
    /// Fails if the same file (after canonicalization) is already running.
    pub fn enter(&self, path: &Path) -> Result<ScriptGuard> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            DbError::Script(format!("Cannot resolve script '{}': {}", path.display(), e))
        })?;

        if !self.active.borrow_mut().insert(canonical.clone()) {
            return Err(DbError::Script(format!(
                "Recursive script call: '{}' is already running.",
                canonical.display()
            )));
        }

        Ok(ScriptGuard {
            active: Rc::clone(&self.active),
            path: canonical,
        })
    }

    pub fn is_active(&self, path: &Path) -> bool {
        match fs::canonicalize(path) {
            Ok(canonical) => self.active.borrow().contains(&canonical),
            Err(_) => false,
        }
    }

    /// Number of scripts on the stack
    pub fn depth(&self) -> usize {
        self.active.borrow().len()
    }
}

/// Releases its script on drop, whichever way the scope is left
#[derive(Debug)]
pub struct ScriptGuard {
    active: Rc<RefCell<HashSet<PathBuf>>>,
    path: PathBuf,
}

impl ScriptGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScriptGuard {
    fn drop(&mut self) {
        self.active.borrow_mut().remove(&self.path);
    }
}
