//! Path Tree Module
//!
//! Hierarchical cursor for the filesystem browser. Nodes live in a flat
//! arena addressed by [`NodeId`]; a directory's children are listed lazily
//! the first time the cursor descends into it. The cursor is a path of
//! sibling indices, one per depth below the root.
//!
//! Invariant: every index in the cursor path is valid for the children of
//! the node selected by the indices before it.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use super::cursor::{step_down, step_up};

/// One entry reported by a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: String,
    pub is_directory: bool,
}

impl ListedEntry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }
}

/// Source of directory listings
pub trait DirectoryLister {
    fn list(&self, path: &Path) -> io::Result<Vec<ListedEntry>>;
}

/// Listing options for the real filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsLister {
    pub show_hidden: bool,
    pub directories_first: bool,
}

impl Default for FsLister {
    fn default() -> Self {
        Self {
            show_hidden: true,
            directories_first: false,
        }
    }
}

impl DirectoryLister for FsLister {
    fn list(&self, path: &Path) -> io::Result<Vec<ListedEntry>> {
        let mut entries = Vec::new();

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }

            // Follow symlinks so a link to a directory can be expanded
            let is_directory = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata.is_dir(),
                Err(_) => entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
            };
            entries.push(ListedEntry { name, is_directory });
        }

        entries.sort_by(|a, b| {
            if self.directories_first {
                match (a.is_directory, b.is_directory) {
                    (true, false) => return std::cmp::Ordering::Less,
                    (false, true) => return std::cmp::Ordering::Greater,
                    _ => {}
                }
            }
            a.name.to_lowercase().cmp(&b.name.to_lowercase())
        });

        Ok(entries)
    }
}

impl<L: DirectoryLister + ?Sized> DirectoryLister for &L {
    fn list(&self, path: &Path) -> io::Result<Vec<ListedEntry>> {
        (**self).list(path)
    }
}

/// Index of a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    name: String,
    /// `None`: leaf. `Some(empty)`: directory not yet expanded.
    children: Option<Vec<NodeId>>,
}

/// How a navigation step changed the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Only the cursor moved
    Moved,
    /// The set of visible rows changed
    Resized,
    /// Nothing changed
    Unchanged,
}

/// A row of the flattened visible tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub name: String,
    pub is_directory: bool,
    pub expanded: bool,
    pub selected: bool,
}

/// Lazily expanded directory tree with a cursor path
pub struct PathTree<L: DirectoryLister> {
    lister: L,
    nodes: Vec<Node>,
    free: Vec<usize>,
    root: NodeId,
    root_path: PathBuf,
    cursor: Vec<usize>,
}

impl<L: DirectoryLister> PathTree<L> {
    /// Build a tree rooted at `root`, listing the root immediately
    ///
    /// A relative root is resolved against the working directory so that
    /// values are full paths and `left` can climb above it.
    pub fn new(root: impl Into<PathBuf>, lister: L) -> io::Result<Self> {
        let root_path = resolve(&root.into())?;
        let listed = lister.list(&root_path)?;

        let mut tree = Self {
            lister,
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
            root_path: PathBuf::new(),
            cursor: Vec::new(),
        };
        tree.replace_root(root_path, listed);
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn cursor_path(&self) -> &[usize] {
        &self.cursor
    }

    pub fn depth(&self) -> usize {
        self.cursor.len()
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Children of a node: `None` for a leaf, empty if not yet expanded
    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.nodes[id.0].children.as_deref()
    }

    pub fn is_directory(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_some()
    }

    /// Number of live nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Root plus every node selected by the cursor path
    fn selected_chain(&self) -> Vec<NodeId> {
        let mut chain = vec![self.root];
        let mut node = self.root;
        for &index in &self.cursor {
            match self.children(node).and_then(|c| c.get(index)) {
                Some(&child) => {
                    chain.push(child);
                    node = child;
                }
                None => break,
            }
        }
        chain
    }

    /// The node under the cursor (the root when the path is empty)
    pub fn current_node(&self) -> NodeId {
        self.selected_chain().last().copied().unwrap_or(self.root)
    }

    /// Sibling list containing the current node; empty at the root
    pub fn current_siblings(&self) -> &[NodeId] {
        let chain = self.selected_chain();
        if chain.len() < 2 {
            return &[];
        }
        self.children(chain[chain.len() - 2]).unwrap_or(&[])
    }

    /// Index of the current node among its siblings
    pub fn current_index(&self) -> usize {
        self.cursor.last().copied().unwrap_or(0)
    }

    /// Full path of the node under the cursor
    pub fn current_value(&self) -> PathBuf {
        let chain = self.selected_chain();
        let mut path = self.root_path.clone();
        for id in chain.iter().skip(1) {
            path.push(self.name(*id));
        }
        path
    }

    /// Select the previous sibling, wrapping
    pub fn up(&mut self) -> Movement {
        let len = self.current_siblings().len();
        match self.cursor.last_mut() {
            Some(index) => {
                *index = step_up(*index, len);
                Movement::Moved
            }
            None => Movement::Unchanged,
        }
    }

    /// Select the next sibling, wrapping
    pub fn down(&mut self) -> Movement {
        let len = self.current_siblings().len();
        match self.cursor.last_mut() {
            Some(index) => {
                *index = step_down(*index, len);
                Movement::Moved
            }
            None => Movement::Unchanged,
        }
    }

    /// Descend into the current directory, listing it if not yet expanded
    ///
    /// Leaves do nothing. An empty directory is marked expanded but the
    /// cursor stays put, since there is nothing to select inside it.
    pub fn right(&mut self) -> io::Result<Movement> {
        let node = self.current_node();
        let needs_listing = match self.children(node) {
            None => return Ok(Movement::Unchanged),
            Some(children) => children.is_empty(),
        };

        if needs_listing {
            let path = self.current_value();
            let listed = self.lister.list(&path).map_err(|e| {
                warn!(path = %path.display(), "directory listing failed: {}", e);
                e
            })?;
            let children = listed
                .into_iter()
                .map(|entry| self.alloc(entry.name, entry.is_directory))
                .collect::<Vec<_>>();
            debug!(path = %path.display(), count = children.len(), "directory expanded");
            self.nodes[node.0].children = Some(children);
        }

        if self.children(node).map_or(true, <[NodeId]>::is_empty) {
            return Ok(Movement::Unchanged);
        }

        self.cursor.push(0);
        Ok(Movement::Resized)
    }

    /// Ascend one level, collapsing the directory being left
    ///
    /// At the root, the tree is re-rooted at the parent directory instead,
    /// which lets the browser walk above where it started.
    pub fn left(&mut self) -> io::Result<Movement> {
        if self.cursor.is_empty() {
            return self.reroot_to_parent();
        }

        self.cursor.pop();
        if self.cursor.is_empty() {
            return Ok(Movement::Moved);
        }

        let node = self.current_node();
        let populated = self.children(node).map_or(false, |c| !c.is_empty());
        if populated {
            self.collapse(node);
            return Ok(Movement::Resized);
        }
        Ok(Movement::Moved)
    }

    /// Flattened rows of every expanded node, in display order
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let selected = self.current_node();
        let mut rows = Vec::new();
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let children = self.children(id);
            rows.push(TreeRow {
                depth,
                name: self.name(id).to_string(),
                is_directory: children.is_some(),
                expanded: children.map_or(false, |c| !c.is_empty()),
                selected: id == selected,
            });
            if let Some(children) = children {
                for &child in children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }

        rows
    }

    fn reroot_to_parent(&mut self) -> io::Result<Movement> {
        let Some(parent) = self.root_path.parent().map(Path::to_path_buf) else {
            return Ok(Movement::Unchanged);
        };
        let listed = self.lister.list(&parent)?;
        debug!(root = %parent.display(), "tree re-rooted at parent directory");
        self.replace_root(parent, listed);
        Ok(Movement::Resized)
    }

    fn replace_root(&mut self, root_path: PathBuf, listed: Vec<ListedEntry>) {
        self.nodes.clear();
        self.free.clear();
        self.cursor.clear();

        let root = self.alloc(root_path.to_string_lossy().to_string(), true);
        let children = listed
            .into_iter()
            .map(|entry| self.alloc(entry.name, entry.is_directory))
            .collect();
        self.nodes[root.0].children = Some(children);
        self.root = root;
        self.root_path = root_path;
    }

    fn alloc(&mut self, name: String, is_directory: bool) -> NodeId {
        let node = Node {
            name,
            children: is_directory.then(Vec::new),
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                NodeId(slot)
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    /// Return a directory to the unexpanded state, freeing its descendants
    fn collapse(&mut self, id: NodeId) {
        let mut pending = match self.nodes[id.0].children.as_mut() {
            Some(children) => std::mem::take(children),
            None => return,
        };
        while let Some(child) = pending.pop() {
            if let Some(grandchildren) = self.nodes[child.0].children.take() {
                pending.extend(grandchildren);
            }
            self.nodes[child.0].name.clear();
            self.free.push(child.0);
        }
    }
}

/// Absolute, lexically normalized form of `path` (symlinks are kept)
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    Ok(resolved)
}
