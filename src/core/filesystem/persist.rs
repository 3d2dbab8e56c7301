//! Snapshot format and storage backends.
//!
//! A snapshot is `{"root": <node>, "currentPath": [..]}` where each node is
//! tagged by `type` (`file` | `directory`) and carries `name`, `modified`
//! (ISO-8601) and `permissions`, plus `content`/`size` or `children`.
//!
//! Loading is forgiving: the storage layer may hand back partially written
//! data, so missing or unreadable fields fall back to defaults instead of
//! failing the whole snapshot.

use std::cell::RefCell;

use serde::Serialize;
use serde_json::Value;

use super::VirtualFileSystem;
use crate::config::VFS_STORAGE_KEY;
use crate::core::error::PersistError;
use crate::models::{
    DEFAULT_DIR_PERMISSIONS, DEFAULT_FILE_PERMISSIONS, VirtualDirectory, VirtualFile, VirtualNode,
};
use crate::utils::dom;
use crate::utils::format::{format_iso, now_millis, parse_iso};

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    root: NodeDoc,
    current_path: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum NodeDoc {
    File {
        name: String,
        content: String,
        size: usize,
        modified: String,
        permissions: String,
    },
    Directory {
        name: String,
        children: Vec<NodeDoc>,
        modified: String,
        permissions: String,
    },
}

impl NodeDoc {
    fn from_node(node: &VirtualNode) -> Self {
        match node {
            VirtualNode::File(f) => NodeDoc::File {
                name: f.name.clone(),
                content: f.content.clone(),
                size: f.size(),
                modified: format_iso(f.modified),
                permissions: f.permissions.clone(),
            },
            VirtualNode::Directory(d) => NodeDoc::Directory {
                name: d.name.clone(),
                children: d.children.values().map(NodeDoc::from_node).collect(),
                modified: format_iso(d.modified),
                permissions: d.permissions.clone(),
            },
        }
    }
}

// =============================================================================
// Lenient Decoding
// =============================================================================

/// Read a `modified` field: ISO string or epoch millis, else now.
fn timestamp_or_now(value: Option<&Value>, name: &str) -> u64 {
    let parsed = match value {
        Some(Value::String(s)) => parse_iso(s),
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        log::warn!("snapshot: invalid or missing timestamp on '{}', using now", name);
        now_millis()
    })
}

fn string_or_empty(value: Option<&Value>) -> String {
    value.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn permissions_or(value: Option<&Value>, default: &str) -> String {
    match value.and_then(Value::as_str) {
        Some(p) if p.len() == 9 => p.to_string(),
        _ => default.to_string(),
    }
}

/// Decode one node. Anything not tagged `"file"` is a directory, and any
/// field of the wrong shape takes its default.
fn node_from_value(value: &Value) -> VirtualNode {
    let name = string_or_empty(value.get("name"));
    let modified = timestamp_or_now(value.get("modified"), &name);

    if value.get("type").and_then(Value::as_str) == Some("file") {
        return VirtualFile {
            content: string_or_empty(value.get("content")),
            permissions: permissions_or(value.get("permissions"), DEFAULT_FILE_PERMISSIONS),
            modified,
            name,
        }
        .into();
    }

    let mut dir = VirtualDirectory {
        permissions: permissions_or(value.get("permissions"), DEFAULT_DIR_PERMISSIONS),
        children: Default::default(),
        modified,
        name,
    };
    let Some(children) = value.get("children").and_then(Value::as_array) else {
        log::warn!("snapshot: directory '{}' has no children array", dir.name);
        return dir.into();
    };
    for child in children {
        let child = node_from_value(child);
        if child.name().is_empty() || child.name().contains('/') {
            log::warn!("snapshot: skipping child with invalid name {:?}", child.name());
            continue;
        }
        dir.insert(child);
    }
    dir.into()
}

/// Read `currentPath`, keeping only string segments.
fn current_path_from_value(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|segments| {
            segments
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty() && *s != "/")
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Encode / Decode
// =============================================================================

impl VirtualFileSystem {
    /// Encode the whole tree and the working directory.
    pub fn serialize(&self) -> Result<String, PersistError> {
        let snapshot = Snapshot {
            root: NodeDoc::from_node(self.root()),
            current_path: self.current_path().to_vec(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Decode a snapshot produced by [`serialize`](Self::serialize).
    pub fn from_snapshot(data: &str) -> Result<Self, PersistError> {
        let snapshot: Value = serde_json::from_str(data)?;
        let Some(root) = snapshot.get("root").filter(|r| r.is_object()) else {
            return Err(PersistError::MissingRoot);
        };
        let VirtualNode::Directory(mut root) = node_from_value(root) else {
            return Err(PersistError::RootNotDirectory);
        };
        root.name = "/".to_string();

        let mut fs = VirtualFileSystem::with_root(root);
        let current = current_path_from_value(snapshot.get("currentPath"));
        if !fs.set_current_path(&current) {
            log::warn!("snapshot: working directory {:?} no longer exists, using /", current);
        }
        Ok(fs)
    }

    /// Replace this filesystem with a decoded snapshot. On error the
    /// existing tree is left untouched.
    pub fn deserialize(&mut self, data: &str) -> Result<(), PersistError> {
        *self = Self::from_snapshot(data)?;
        Ok(())
    }
}

// =============================================================================
// Storage Backends
// =============================================================================

/// Where snapshots are kept between page loads.
pub trait VfsStore {
    fn load(&self) -> Option<String>;
    fn save(&self, snapshot: &str) -> Result<(), PersistError>;
}

/// Browser localStorage under a fixed key.
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new(VFS_STORAGE_KEY)
    }
}

impl VfsStore for LocalStorageStore {
    fn load(&self) -> Option<String> {
        dom::storage_get(&self.key)
    }

    fn save(&self, snapshot: &str) -> Result<(), PersistError> {
        if dom::local_storage().is_none() {
            return Err(PersistError::StorageUnavailable);
        }
        if dom::storage_set(&self.key, snapshot) {
            Ok(())
        } else {
            Err(PersistError::WriteFailed)
        }
    }
}

/// Keeps the snapshot in memory; used where no browser storage exists.
#[derive(Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(snapshot.into())),
        }
    }
}

impl VfsStore for MemoryStore {
    fn load(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn save(&self, snapshot: &str) -> Result<(), PersistError> {
        *self.slot.borrow_mut() = Some(snapshot.to_string());
        Ok(())
    }
}
