use std::{
    collections::{BTreeMap, VecDeque},
    ops::Range,
};

use crate::{
    ui::{
        inflect::{Inflector, Inspect},
        widgets::Widgets,
    },
    util::typedefs::SsoString,
};

/// Index of a node in a [`VirtualFileTree`]. The root is always 0.
pub type FileHandle = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub name: SsoString,
    pub is_folder: bool,
    /// Handles of the direct children. Empty for files.
    pub children: Range<FileHandle>,
}

/// A read-only hierarchical path namespace.
///
/// Nodes are stored breadth first, so the children of every folder occupy one
/// contiguous range of handles, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFileTree {
    nodes: Vec<FileNode>,
}

#[derive(Default)]
struct PendingNode {
    is_folder: bool,
    children: BTreeMap<SsoString, PendingNode>,
}

impl VirtualFileTree {
    /// Builds the tree from slash separated paths.
    ///
    /// Every component but the last one is a folder. A path ending in a slash
    /// is a folder too. Empty components are ignored.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = PendingNode {
            is_folder: true,
            children: BTreeMap::new(),
        };

        for path in paths {
            let path = path.as_ref();
            let mut components = path.split('/').filter(|c| !c.is_empty()).peekable();
            let mut node = &mut root;
            while let Some(component) = components.next() {
                let is_folder = components.peek().is_some() || path.ends_with('/');
                node = node.children.entry(SsoString::from(component)).or_default();
                node.is_folder |= is_folder;
            }
        }

        let mut nodes = vec![FileNode {
            name: SsoString::from("/"),
            is_folder: true,
            children: 0..0,
        }];
        let mut queue = VecDeque::from([(0usize, &root)]);
        while let Some((handle, pending)) = queue.pop_front() {
            let start = nodes.len() as FileHandle;
            for (name, child) in &pending.children {
                queue.push_back((nodes.len(), child));
                nodes.push(FileNode {
                    name: name.clone(),
                    is_folder: child.is_folder,
                    children: 0..0,
                });
            }
            nodes[handle].children = start..nodes.len() as FileHandle;
        }

        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn node(&self, handle: FileHandle) -> Option<&FileNode> {
        self.nodes.get(handle as usize)
    }

    /// Resolves a slash separated path to its node.
    pub fn find(&self, path: &str) -> Option<FileHandle> {
        path.split('/').filter(|c| !c.is_empty()).try_fold(0, |handle, component| {
            let children = self.nodes[handle as usize].children.clone();
            children.into_iter().find(|&child| self.nodes[child as usize].name.as_str() == component)
        })
    }

    fn render(&self, widgets: &mut dyn Widgets, handle: FileHandle, expanded: bool) {
        let node = &self.nodes[handle as usize];
        if !widgets.begin_tree_node(&node.name, !node.is_folder, expanded, handle as u64) {
            return;
        }
        for child in node.children.clone() {
            self.render(widgets, child, false);
        }
        widgets.end_tree_node();
    }
}

impl Default for VirtualFileTree {
    fn default() -> Self {
        Self::from_paths(std::iter::empty::<&str>())
    }
}

/// Folders open lazily: children are only visited while their folder is expanded.
impl Inspect for VirtualFileTree {
    fn inflect(&self, name: &str, inflector: &mut Inflector<'_>) {
        inflector.aggregate(name, |inflector| self.render(inflector.widgets(), 0, true));
    }

    fn inflect_mut(&mut self, name: &str, inflector: &mut Inflector<'_>) {
        self.inflect(name, inflector);
    }
}
