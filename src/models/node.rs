use std::collections::BTreeMap;

use crate::utils::format::now_millis;

/// Permission string given to new files.
pub const DEFAULT_FILE_PERMISSIONS: &str = "rw-r--r--";

/// Permission string given to new directories.
pub const DEFAULT_DIR_PERMISSIONS: &str = "rwxr-xr-x";

/// A regular file in the virtual filesystem.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualFile {
    pub name: String,
    pub content: String,
    /// Milliseconds since the epoch.
    pub modified: u64,
    /// Nine-character symbolic mode, cosmetic only.
    pub permissions: String,
}

impl VirtualFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            modified: now_millis(),
            permissions: DEFAULT_FILE_PERMISSIONS.to_string(),
        }
    }

    pub fn with_permissions(mut self, permissions: &str) -> Self {
        self.permissions = permissions.to_string();
        self
    }

    /// Size in bytes, always derived from the content.
    #[inline]
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// A directory; children are keyed (and therefore unique) by name.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualDirectory {
    pub name: String,
    pub children: BTreeMap<String, VirtualNode>,
    pub modified: u64,
    pub permissions: String,
}

impl VirtualDirectory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: BTreeMap::new(),
            modified: now_millis(),
            permissions: DEFAULT_DIR_PERMISSIONS.to_string(),
        }
    }

    /// Insert a child, replacing any existing child of the same name.
    pub fn insert(&mut self, node: VirtualNode) {
        self.children.insert(node.name().to_string(), node);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, node: impl Into<VirtualNode>) -> Self {
        self.insert(node.into());
        self
    }
}

/// A node of the virtual filesystem tree.
#[derive(Clone, Debug, PartialEq)]
pub enum VirtualNode {
    File(VirtualFile),
    Directory(VirtualDirectory),
}

impl VirtualNode {
    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => &f.name,
            Self::Directory(d) => &d.name,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    pub fn modified(&self) -> u64 {
        match self {
            Self::File(f) => f.modified,
            Self::Directory(d) => d.modified,
        }
    }

    pub fn permissions(&self) -> &str {
        match self {
            Self::File(f) => &f.permissions,
            Self::Directory(d) => &d.permissions,
        }
    }

    /// Size shown by `ls -l`; directories report a block.
    pub fn size(&self) -> usize {
        match self {
            Self::File(f) => f.size(),
            Self::Directory(_) => 4096,
        }
    }

    /// Mode string prefixed with the type flag, e.g. `drwxr-xr-x`.
    pub fn mode_string(&self) -> String {
        let flag = if self.is_dir() { 'd' } else { '-' };
        format!("{}{}", flag, self.permissions())
    }

    /// True for files whose owner bit is executable.
    pub fn is_executable(&self) -> bool {
        matches!(self, Self::File(f) if f.permissions.as_bytes().get(2) == Some(&b'x'))
    }

    pub fn as_dir(&self) -> Option<&VirtualDirectory> {
        match self {
            Self::Directory(d) => Some(d),
            Self::File(_) => None,
        }
    }

    pub fn as_dir_mut(&mut self) -> Option<&mut VirtualDirectory> {
        match self {
            Self::Directory(d) => Some(d),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&VirtualFile> {
        match self {
            Self::File(f) => Some(f),
            Self::Directory(_) => None,
        }
    }
}

impl From<VirtualFile> for VirtualNode {
    fn from(file: VirtualFile) -> Self {
        Self::File(file)
    }
}

impl From<VirtualDirectory> for VirtualNode {
    fn from(dir: VirtualDirectory) -> Self {
        Self::Directory(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_size_tracks_content() {
        let mut file = VirtualFile::new("notes.txt", "hello");
        assert_eq!(file.size(), 5);
        file.content.push_str(", world");
        assert_eq!(file.size(), 12);
    }

    #[test]
    fn test_mode_string() {
        let dir: VirtualNode = VirtualDirectory::new("src").into();
        let exe: VirtualNode = VirtualFile::new("run", "").with_permissions("rwxr-xr-x").into();
        let secret: VirtualNode = VirtualFile::new(".secret", "").with_permissions("rw-------").into();

        assert_eq!(dir.mode_string(), "drwxr-xr-x");
        assert_eq!(exe.mode_string(), "-rwxr-xr-x");
        assert!(exe.is_executable());
        assert!(!secret.is_executable());
        assert!(!dir.is_executable());
    }

    #[test]
    fn test_directory_children_unique_by_name() {
        let dir = VirtualDirectory::new("d")
            .with(VirtualFile::new("a", "1"))
            .with(VirtualFile::new("a", "2"));
        assert_eq!(dir.children.len(), 1);
        let node = dir.children.get("a").and_then(VirtualNode::as_file);
        assert_eq!(node.map(|f| f.content.as_str()), Some("2"));
    }
}
