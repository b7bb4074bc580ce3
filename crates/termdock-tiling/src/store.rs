//! Layout persistence: one tree per project.
//!
//! `set_layout` is fire-and-forget. Failures are logged and never surface
//! to the caller, since losing a layout write only costs the user their
//! split arrangement on next launch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use termdock_common::ProjectId;
use tracing::{debug, warn};

use crate::tree::LayoutNode;

pub trait LayoutStore {
    fn get_layout(&self, project: &ProjectId) -> Option<LayoutNode>;
    fn set_layout(&self, project: &ProjectId, tree: &LayoutNode);
}

/// In-memory store, used in tests and for throwaway projects.
#[derive(Default)]
pub struct MemoryLayoutStore {
    layouts: Mutex<HashMap<ProjectId, LayoutNode>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of projects with a stored layout.
    pub fn len(&self) -> usize {
        self.layouts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.lock().is_empty()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn get_layout(&self, project: &ProjectId) -> Option<LayoutNode> {
        self.layouts.lock().get(project).cloned()
    }

    fn set_layout(&self, project: &ProjectId, tree: &LayoutNode) {
        self.layouts.lock().insert(project.clone(), tree.clone());
    }
}

/// JSON file per project under a directory.
pub struct FileLayoutStore {
    dir: PathBuf,
}

impl FileLayoutStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, project: &ProjectId) -> PathBuf {
        let name: String = project
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }

    fn write(&self, project: &ProjectId, tree: &LayoutNode) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(tree)?;
        std::fs::write(self.path_for(project), json)
    }
}

impl LayoutStore for FileLayoutStore {
    fn get_layout(&self, project: &ProjectId) -> Option<LayoutNode> {
        let path = self.path_for(project);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(tree) => Some(tree),
            Err(e) => {
                warn!(project = %project, path = %path.display(), "ignoring unreadable layout: {e}");
                None
            }
        }
    }

    fn set_layout(&self, project: &ProjectId, tree: &LayoutNode) {
        match self.write(project, tree) {
            Ok(()) => debug!(project = %project, leaves = tree.leaf_count(), "layout saved"),
            Err(e) => warn!(project = %project, "failed to save layout: {e}"),
        }
    }
}
