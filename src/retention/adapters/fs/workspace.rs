//! Workspace storage rooted in a capability-scoped directory.
//!
//! Workspaces live directly under one root directory, one subdirectory
//! per task named by the task id. The `cap-std` directory handle keeps
//! every operation inside that root regardless of what the rest of the
//! process can reach.

use async_trait::async_trait;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;
use std::sync::Arc;

use crate::retention::ports::{WorkspaceStore, WorkspaceStoreResult};
use crate::task::domain::TaskId;

/// Workspace store over a capability-scoped root directory.
#[derive(Clone)]
pub struct DirWorkspaceStore {
    root: Arc<Dir>,
}

impl DirWorkspaceStore {
    /// Creates a store over an already-opened root directory.
    #[must_use]
    pub fn new(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// Opens the workspace root at `path` with ambient authority.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the root cannot be opened.
    pub fn open(path: &str) -> std::io::Result<Self> {
        let root = Dir::open_ambient_dir(path, cap_std::ambient_authority())?;
        Ok(Self::new(root))
    }
}

#[async_trait]
impl WorkspaceStore for DirWorkspaceStore {
    async fn remove_workspace(&self, task_id: TaskId) -> WorkspaceStoreResult<bool> {
        match self.root.remove_dir_all(task_id.to_string()) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
