//! In-memory virtual filesystem.
//!
//! # Path Convention
//!
//! Paths are handled as segment lists: `/home/guest` is `["home", "guest"]`
//! and the root is the empty list. Segments are never empty and never `.` or
//! `..` once resolved.

mod persist;
mod seed;

pub use persist::{LocalStorageStore, MemoryStore, VfsStore};

use crate::models::{VirtualDirectory, VirtualFile, VirtualNode};
use crate::utils::format::now_millis;

/// The filesystem tree plus the session's working directory.
#[derive(Clone, Debug)]
pub struct VirtualFileSystem {
    /// Always a directory.
    root: VirtualNode,
    current: Vec<String>,
}

impl Default for VirtualFileSystem {
    fn default() -> Self {
        Self::seeded()
    }
}

impl VirtualFileSystem {
    /// The demo tree, starting in `/home/guest`.
    pub fn seeded() -> Self {
        Self {
            root: seed::seed_root().into(),
            current: vec!["home".to_string(), "guest".to_string()],
        }
    }

    /// A filesystem containing only `root`, starting at `/`.
    pub fn with_root(root: VirtualDirectory) -> Self {
        Self {
            root: root.into(),
            current: Vec::new(),
        }
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub fn current_path(&self) -> &[String] {
        &self.current
    }

    /// Working directory as an absolute path string.
    pub fn current_path_string(&self) -> String {
        format_path(&self.current)
    }

    /// Resolve user input to an absolute segment list.
    ///
    /// Absolute input starts at the root, anything else at the working
    /// directory. `.` is skipped and `..` pops one segment, never above root.
    /// Resolution is purely syntactic and never touches the tree.
    pub fn resolve_path(&self, input: &str) -> Vec<String> {
        let mut segments = if input.starts_with('/') {
            Vec::new()
        } else {
            self.current.clone()
        };
        for part in input.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name.to_string()),
            }
        }
        segments
    }

    /// Change the working directory. Fails without side effects unless the
    /// target is an existing directory.
    pub fn set_current_path(&mut self, segments: &[String]) -> bool {
        if self.traverse(segments).is_some() {
            self.current = segments.to_vec();
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Walk to a directory; `None` if any segment is missing or a file.
    pub fn traverse(&self, segments: &[String]) -> Option<&VirtualDirectory> {
        let mut dir = self.root.as_dir()?;
        for segment in segments {
            dir = dir.children.get(segment)?.as_dir()?;
        }
        Some(dir)
    }

    fn traverse_mut(&mut self, segments: &[String]) -> Option<&mut VirtualDirectory> {
        let mut dir = self.root.as_dir_mut()?;
        for segment in segments {
            dir = dir.children.get_mut(segment)?.as_dir_mut()?;
        }
        Some(dir)
    }

    /// Look up any node; the last segment may name a file.
    pub fn get_node(&self, segments: &[String]) -> Option<&VirtualNode> {
        match segments.split_last() {
            None => Some(&self.root),
            Some((name, parent)) => self.traverse(parent)?.children.get(name),
        }
    }

    /// Children of a directory (the working directory when `None`), sorted
    /// directories first and then by name.
    pub fn list_directory(&self, segments: Option<&[String]>) -> Option<Vec<&VirtualNode>> {
        let dir = self.traverse(segments.unwrap_or(&self.current))?;
        let mut entries: Vec<&VirtualNode> = dir.children.values().collect();
        entries.sort_by(|a, b| b.is_dir().cmp(&a.is_dir()).then_with(|| a.name().cmp(b.name())));
        Some(entries)
    }

    /// File content, `None` unless the path names a file.
    pub fn read_file(&self, segments: &[String]) -> Option<&str> {
        self.get_node(segments)?
            .as_file()
            .map(|f| f.content.as_str())
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Create a file. Fails if the parent is not a directory or the name is
    /// already taken by a file or directory.
    pub fn create_file_at_path(&mut self, segments: &[String], content: &str) -> bool {
        self.create_node(segments, |name| VirtualFile::new(name, content).into())
    }

    /// Create an empty directory, with the same rules as files.
    pub fn create_directory_at_path(&mut self, segments: &[String]) -> bool {
        self.create_node(segments, |name| VirtualDirectory::new(name).into())
    }

    fn create_node(&mut self, segments: &[String], make: impl FnOnce(&str) -> VirtualNode) -> bool {
        let Some((name, parent)) = segments.split_last() else {
            return false;
        };
        let Some(dir) = self.traverse_mut(parent) else {
            return false;
        };
        if dir.children.contains_key(name) {
            return false;
        }
        dir.children.insert(name.clone(), make(name));
        dir.modified = now_millis();
        true
    }

    /// Replace the content of an existing file.
    pub fn write_file(&mut self, segments: &[String], content: &str) -> bool {
        let Some((name, parent)) = segments.split_last() else {
            return false;
        };
        match self
            .traverse_mut(parent)
            .and_then(|dir| dir.children.get_mut(name))
        {
            Some(VirtualNode::File(file)) => {
                file.content = content.to_string();
                file.modified = now_millis();
                true
            }
            _ => false,
        }
    }

    /// Update a node's modification time, as `touch` does for existing files.
    pub fn touch(&mut self, segments: &[String]) -> bool {
        let Some((name, parent)) = segments.split_last() else {
            return false;
        };
        match self
            .traverse_mut(parent)
            .and_then(|dir| dir.children.get_mut(name))
        {
            Some(VirtualNode::File(f)) => {
                f.modified = now_millis();
                true
            }
            Some(VirtualNode::Directory(d)) => {
                d.modified = now_millis();
                true
            }
            None => false,
        }
    }

    pub(crate) fn root(&self) -> &VirtualNode {
        &self.root
    }
}

/// Render segments as an absolute path.
pub fn format_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}
