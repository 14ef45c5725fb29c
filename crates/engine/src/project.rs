// Codepad - Terminal Code Editor
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Project directory access.
//!
//! Opening a project walks the whole tree once and materializes it as a flat
//! list of [`FileNode`]s linked by parent id. Very large trees are slow to
//! open; there is no lazy loading.
//!
//! # Node ids
//!
//! The root is `root`. A child's id is its parent's id, a `/`, and the
//! child's name with every character outside `[A-Za-z0-9]` replaced by `-`
//! (`src/main.rs` becomes `root/src/main-rs`). When several siblings share
//! that sanitized form, each of them gets a `~` suffix holding a hash of its
//! exact name. Neither `/` nor `~` survives sanitizing, so ids are unique
//! across the whole forest, not only among siblings: `a/b` and `a.b` are
//! `root/a/b` and `root/a-b`. Ids depend only on the path and the sibling
//! names, so a node created and then re-read by [`Project::refresh`] keeps
//! its id.
//!
//! # Failure policy
//!
//! A subdirectory that cannot be listed is logged and left empty; everything
//! gathered so far is kept. Writes go through a temporary file in the same
//! directory and are renamed into place, so a failed write never leaves a
//! truncated file behind.

use codepad_common::{FileNode, NodeKind};
use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Id of the root node.
pub const ROOT_ID: &str = "root";

/// Errors from project file operations.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// An I/O call failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// No node has this id
    #[error("no file or folder with id '{0}'")]
    UnknownNode(String),

    /// A folder was required
    #[error("'{0}' is not a folder")]
    NotAFolder(String),

    /// A file was required
    #[error("'{0}' is not a file")]
    NotAFile(String),

    /// Creation would overwrite an existing entry
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    /// The name is empty, `.`/`..`, or contains a path separator
    #[error("invalid name '{0}'")]
    InvalidName(String),
}

impl ProjectError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Sanitized id of `name` under `parent_id`, before collision handling.
pub fn derive_id(parent_id: &str, name: &str) -> String {
    let sanitized: String =
        name.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '-' }).collect();
    format!("{parent_id}/{sanitized}")
}

/// 32-bit FNV-1a, stable across platforms and releases.
fn name_hash(name: &str) -> u32 {
    name.bytes().fold(0x811c_9dc5_u32, |hash, b| (hash ^ u32::from(b)).wrapping_mul(0x0100_0193))
}

/// Assign ids to a set of sibling names.
///
/// Returned in the same order as `names`.
fn sibling_ids(parent_id: &str, names: &[String]) -> Vec<String> {
    let bases: Vec<String> = names.iter().map(|n| derive_id(parent_id, n)).collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for base in &bases {
        *counts.entry(base.as_str()).or_default() += 1;
    }

    bases
        .iter()
        .zip(names)
        .map(|(base, name)| {
            if counts.get(base.as_str()).copied().unwrap_or(0) > 1 {
                format!("{base}~{:08x}", name_hash(name))
            } else {
                base.clone()
            }
        })
        .collect()
}

fn validate_name(name: &str) -> Result<(), ProjectError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(ProjectError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// An opened project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    nodes: Vec<FileNode>,
}

impl Project {
    /// Walk `root` and build the forest.
    ///
    /// Fails only when `root` itself cannot be listed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref();
        let root = root.canonicalize().map_err(|e| ProjectError::io(root, e))?;
        if !root.is_dir() {
            return Err(ProjectError::NotAFolder(root.display().to_string()));
        }

        let nodes = walk(&root)?;
        info!(root = %root.display(), nodes = nodes.len(), "Opened project");
        Ok(Self { root, nodes })
    }

    /// Re-read the tree from disk.
    pub fn refresh(&mut self) -> Result<(), ProjectError> {
        self.nodes = walk(&self.root)?;
        debug!(nodes = self.nodes.len(), "Refreshed project");
        Ok(())
    }

    /// Root directory on disk.
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// The root node.
    pub fn root(&self) -> &FileNode {
        // walk() always emits the root first
        &self.nodes[0]
    }

    /// Every node, depth-first, each folder before its children.
    pub fn nodes(&self) -> &[FileNode] {
        &self.nodes
    }

    /// Node with `id`.
    pub fn find(&self, id: &str) -> Option<&FileNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Child of `parent_id` called `name`.
    pub fn find_child(&self, parent_id: &str, name: &str) -> Option<&FileNode> {
        self.nodes.iter().find(|n| n.parent_id.as_deref() == Some(parent_id) && n.name == name)
    }

    /// Node whose path is `path`.
    pub fn find_by_path(&self, path: &Path) -> Option<&FileNode> {
        self.nodes.iter().find(|n| n.path == path)
    }

    /// Direct children of `parent_id`, in name order.
    pub fn children<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a FileNode> + 'a {
        self.nodes.iter().filter(move |n| n.parent_id.as_deref() == Some(parent_id))
    }

    /// Read a file's text.
    pub fn read_file(&self, id: &str) -> Result<String, ProjectError> {
        let node = self.file_node(id)?;
        fs::read_to_string(&node.path).map_err(|e| ProjectError::io(&node.path, e))
    }

    /// Replace a file's content.
    ///
    /// The new content is written to a temporary file next to the target and
    /// renamed over it.
    pub fn write_file(&self, id: &str, content: &str) -> Result<(), ProjectError> {
        let node = self.file_node(id)?;
        let dir = node.path.parent().unwrap_or(&self.root);

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ProjectError::io(dir, e))?;
        tmp.write_all(content.as_bytes()).map_err(|e| ProjectError::io(tmp.path(), e))?;
        tmp.as_file().sync_all().map_err(|e| ProjectError::io(tmp.path(), e))?;
        tmp.persist(&node.path).map_err(|e| ProjectError::io(&node.path, e.error))?;

        debug!(id, bytes = content.len(), "Wrote file");
        Ok(())
    }

    /// Create a new file under `parent_id`.
    ///
    /// Never overwrites: an existing entry with the same name is an
    /// [`ProjectError::AlreadyExists`] error.
    pub fn create_file(
        &mut self,
        parent_id: &str,
        name: &str,
        content: &str,
    ) -> Result<FileNode, ProjectError> {
        validate_name(name)?;
        let dir = self.folder_node(parent_id)?.path.clone();
        let path = dir.join(name);
        if path.exists() {
            return Err(ProjectError::AlreadyExists(path));
        }

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| ProjectError::io(&dir, e))?;
        tmp.write_all(content.as_bytes()).map_err(|e| ProjectError::io(tmp.path(), e))?;
        tmp.persist_noclobber(&path).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                ProjectError::AlreadyExists(path.clone())
            } else {
                ProjectError::io(&path, e.error)
            }
        })?;

        info!(path = %path.display(), "Created file");
        self.locate_after_create(parent_id, name)
    }

    /// Create a folder under `parent_id`. An existing folder is returned as is.
    pub fn create_folder(&mut self, parent_id: &str, name: &str) -> Result<FileNode, ProjectError> {
        validate_name(name)?;
        let path = self.folder_node(parent_id)?.path.join(name);

        if path.is_dir() {
            if let Some(existing) = self.find_child(parent_id, name) {
                return Ok(existing.clone());
            }
        } else if path.exists() {
            return Err(ProjectError::AlreadyExists(path));
        } else {
            fs::create_dir(&path).map_err(|e| ProjectError::io(&path, e))?;
            info!(path = %path.display(), "Created folder");
        }

        self.locate_after_create(parent_id, name)
    }

    fn locate_after_create(&mut self, parent_id: &str, name: &str) -> Result<FileNode, ProjectError> {
        self.refresh()?;
        self.find_child(parent_id, name)
            .cloned()
            .ok_or_else(|| ProjectError::UnknownNode(derive_id(parent_id, name)))
    }

    fn file_node(&self, id: &str) -> Result<&FileNode, ProjectError> {
        let node = self.find(id).ok_or_else(|| ProjectError::UnknownNode(id.to_string()))?;
        if node.kind != NodeKind::File {
            return Err(ProjectError::NotAFile(id.to_string()));
        }
        Ok(node)
    }

    fn folder_node(&self, id: &str) -> Result<&FileNode, ProjectError> {
        let node = self.find(id).ok_or_else(|| ProjectError::UnknownNode(id.to_string()))?;
        if node.kind != NodeKind::Folder {
            return Err(ProjectError::NotAFolder(id.to_string()));
        }
        Ok(node)
    }
}

fn walk(root: &Path) -> Result<Vec<FileNode>, ProjectError> {
    walk_with(root, &list_dir)
}

/// Sorted (name, path, kind) entries of one directory.
type Entries = Vec<(String, PathBuf, NodeKind)>;

fn walk_with(
    root: &Path,
    list: &dyn Fn(&Path) -> Result<Entries, ProjectError>,
) -> Result<Vec<FileNode>, ProjectError> {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut nodes = vec![FileNode {
        id: ROOT_ID.to_string(),
        name,
        kind: NodeKind::Folder,
        parent_id: None,
        path: root.to_path_buf(),
        content: None,
    }];

    let entries = list(root)?;
    push_entries(entries, ROOT_ID, list, &mut nodes);
    Ok(nodes)
}

fn list_dir(dir: &Path) -> Result<Entries, ProjectError> {
    let read = fs::read_dir(dir).map_err(|e| ProjectError::io(dir, e))?;
    let mut entries = Vec::new();

    for entry in read {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        let kind = if file_type.is_dir() {
            NodeKind::Folder
        } else if file_type.is_file() {
            NodeKind::File
        } else if file_type.is_symlink() && path.is_file() {
            // Links to files are shown, links to folders are not followed
            NodeKind::File
        } else {
            continue;
        };

        entries.push((entry.file_name().to_string_lossy().into_owned(), path, kind));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

fn push_entries(
    entries: Entries,
    parent_id: &str,
    list: &dyn Fn(&Path) -> Result<Entries, ProjectError>,
    nodes: &mut Vec<FileNode>,
) {
    let names: Vec<String> = entries.iter().map(|(name, ..)| name.clone()).collect();
    let ids = sibling_ids(parent_id, &names);

    for ((name, path, kind), id) in entries.into_iter().zip(ids) {
        let is_folder = kind == NodeKind::Folder;
        let child_path = path.clone();
        nodes.push(FileNode {
            id: id.clone(),
            name,
            kind,
            parent_id: Some(parent_id.to_string()),
            path,
            content: None,
        });

        if is_folder {
            match list(&child_path) {
                Ok(children) => push_entries(children, &id, list, nodes),
                Err(e) => warn!(error = %e, "Could not list folder, keeping partial tree"),
            }
        }
    }
}
