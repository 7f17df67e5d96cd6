use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::NamespaceError;
use super::keys::Keys;
use super::node::{Node, NodeId};
use super::path::{KeyPath, SEPARATOR};
use super::tree::Tree;
use super::value::Value;

/// What a key resolved to: a stored value, or a live view of a context
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Value(Value),
    Context(Context),
}

impl Entry {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Context(_) => None,
        }
    }

    pub fn into_context(self) -> Option<Context> {
        match self {
            Entry::Context(context) => Some(context),
            Entry::Value(_) => None,
        }
    }

    pub fn is_context(&self) -> bool {
        matches!(self, Entry::Context(_))
    }
}

/// A cursor bound to one node of a namespace.
///
/// Keys given to a context are resolved relative to its node, unless they
/// start with `/`, in which case they are resolved from the root. Contexts
/// share storage: a value written through one is visible through every
/// other context of the same namespace. Two contexts are equal when they
/// are bound to the same node.
///
/// While a context is alive its node is never pruned. Dropping the last
/// context bound to an empty node prunes it along with any ancestors left
/// empty. Do not drop a context while holding another lock on the same
/// namespace. Removing an enclosing
/// subtree with [`remove_context`](Context::remove_context) detaches it
/// anyway; a detached context reads as empty and refuses writes.
pub struct Context {
    tree: Arc<RwLock<Tree>>,
    node: NodeId,
}

impl Context {
    // caller holds a lock on `tree`, so the retain cannot race a prune
    fn bind_locked(&self, tree: &Tree, node: NodeId) -> Context {
        if let Some(bound) = tree.node(node) {
            bound.retain();
        }
        Context {
            tree: Arc::clone(&self.tree),
            node,
        }
    }

    /// Resolve a key.
    ///
    /// A context key (trailing `/`, or empty) yields a view of that context
    /// if it exists. A value key yields the stored value. Anything missing,
    /// including a climb above the root, yields `None`. Nothing is created.
    pub fn get(&self, key: &str) -> Option<Entry> {
        let path = KeyPath::parse(key);
        let tree = self.tree.read();
        let id = tree.resolve(self.node, &path)?;
        let node = tree.node(id)?;
        if path.is_container() {
            if !node.is_container() {
                return None;
            }
            Some(Entry::Context(self.bind_locked(&tree, id)))
        } else {
            node.value().cloned().map(Entry::Value)
        }
    }

    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key).and_then(Entry::into_value)
    }

    pub fn get_context(&self, key: &str) -> Option<Context> {
        self.get(key).and_then(Entry::into_context)
    }

    /// Store a value, creating intermediate contexts as needed. Returns the
    /// value it replaced.
    pub fn put(&self, key: &str, value: impl Into<Value>) -> Result<Option<Value>, NamespaceError> {
        let path = KeyPath::parse(key);
        if path.is_container() {
            return Err(NamespaceError::ContainerPath(key.to_string()));
        }
        let value = value.into();

        let mut tree = self.tree.write();
        let id = tree.resolve_or_create(self.node, &path)?;
        let previous = tree.set_value(id, value)?;
        tracing::trace!(key = %path, replaced = previous.is_some(), "put");
        Ok(previous)
    }

    /// Clear the value at a key and prune whatever that leaves empty.
    /// Removing a value that is not there is a no-op.
    pub fn remove(&self, key: &str) -> Result<Option<Value>, NamespaceError> {
        let path = KeyPath::parse(key);
        if path.is_container() {
            return Err(NamespaceError::ContainerPath(key.to_string()));
        }

        let mut tree = self.tree.write();
        let Some(id) = tree.resolve(self.node, &path) else {
            return Ok(None);
        };
        let removed = tree.take_value(id);
        if removed.is_some() {
            tree.prune_from(id);
            tracing::trace!(key = %path, "removed");
        }
        Ok(removed)
    }

    /// Create (or open) the context named by a context key. Contexts made
    /// this way survive pruning even while empty.
    pub fn create_context(&self, key: &str) -> Result<Context, NamespaceError> {
        let path = KeyPath::parse(key);
        if !path.is_container() {
            return Err(NamespaceError::ValuePath(key.to_string()));
        }

        let mut tree = self.tree.write();
        let id = tree.resolve_or_create(self.node, &path)?;
        tree.mark_explicit(id)?;
        tracing::debug!(key = %path, "created context");
        Ok(self.bind_locked(&tree, id))
    }

    /// Detach an entire context and everything below it. Returns the number
    /// of values dropped; a missing context is a no-op.
    pub fn remove_context(&self, key: &str) -> Result<usize, NamespaceError> {
        let path = KeyPath::parse(key);
        if !path.is_container() {
            return Err(NamespaceError::ValuePath(key.to_string()));
        }

        let mut tree = self.tree.write();
        let Some(target) = tree.resolve(self.node, &path) else {
            return Ok(0);
        };
        if tree.is_ancestor_or_self(target, self.node) {
            return Err(NamespaceError::RemoveSelf(key.to_string()));
        }
        let Some(node) = tree.node(target).filter(|node| node.is_container()) else {
            return Ok(0);
        };
        let Some(parent) = node.parent() else {
            return Err(NamespaceError::RemoveSelf(key.to_string()));
        };
        let name = node.name().to_string();

        let dropped = tree.detach_child(parent, &name);
        tree.prune_from(parent);
        Ok(dropped)
    }

    /// Lazily enumerate every key holding a value below this context.
    ///
    /// Keys enumerated from the root are absolute (`/Foo/Bar`), keys
    /// enumerated from any other context are relative to it (`Bar`). Either
    /// form resolves back to the same value through this context.
    pub fn all_keys(&self) -> Keys {
        Keys::new(Arc::clone(&self.tree), self.node)
    }

    /// Keys below this context whose final segment is exactly `terminal`.
    ///
    /// A multi-segment terminal such as `Bar/Baz` matches keys ending in
    /// those segments. The matches are collected from the suffix index when
    /// this is called.
    pub fn keys_ending_with(&self, terminal: &str) -> std::vec::IntoIter<String> {
        let final_name = terminal.rsplit(SEPARATOR).next().unwrap_or_default();
        if final_name.is_empty() {
            return Vec::new().into_iter();
        }
        let compound = terminal.contains(SEPARATOR);
        let tail = format!("{}{}", SEPARATOR, terminal);

        let tree = self.tree.read();
        let Some(view_key) = tree.key_of(self.node) else {
            return Vec::new().into_iter();
        };
        let base = if self.node == tree.root() { "/" } else { "" };

        let matches: Vec<String> = tree
            .suffixes()
            .get(final_name)
            .map(|keys| {
                keys.iter()
                    .filter_map(|full| relative_key(&view_key, full))
                    .map(|relative| format!("{}{}", base, relative))
                    .filter(|key| !compound || key == terminal || key.ends_with(&tail))
                    .collect()
            })
            .unwrap_or_default();
        matches.into_iter()
    }

    /// The deepest existing context on the way to `key`.
    ///
    /// `key` is read as a context key whatever its trailing separator. The
    /// walk stops at the first segment that does not name an existing
    /// context; if the very first one is missing, this context is returned.
    pub fn deepest_existing_subtree(&self, key: &str) -> Context {
        let path = KeyPath::parse(key).into_container();
        let tree = self.tree.read();
        let id = tree.deepest(self.node, &path);
        self.bind_locked(&tree, id)
    }

    /// The enclosing context, `None` at the root
    pub fn parent(&self) -> Option<Context> {
        let tree = self.tree.read();
        let parent = tree.node(self.node)?.parent()?;
        Some(self.bind_locked(&tree, parent))
    }

    pub fn root(&self) -> Context {
        let tree = self.tree.read();
        self.bind_locked(&tree, tree.root())
    }

    pub fn is_root(&self) -> bool {
        self.tree.read().root() == self.node
    }

    pub fn is_detached(&self) -> bool {
        !self.tree.read().contains(self.node)
    }

    /// Absolute context key of this context: `/` for the root,
    /// `/Foo/Bar/` below it. `None` once detached.
    pub fn path(&self) -> Option<String> {
        let key = self.tree.read().key_of(self.node)?;
        if key.is_empty() {
            Some(SEPARATOR.to_string())
        } else {
            Some(format!("{}{}{}", SEPARATOR, key, SEPARATOR))
        }
    }

    /// Names of the child contexts, sorted
    pub fn children(&self) -> Vec<String> {
        self.child_names(Node::is_container)
    }

    /// Names of the child value slots, sorted
    pub fn contents(&self) -> Vec<String> {
        self.child_names(|node| node.value().is_some())
    }

    fn child_names(&self, include: impl Fn(&Node) -> bool) -> Vec<String> {
        let tree = self.tree.read();
        let Some(node) = tree.node(self.node) else {
            return Vec::new();
        };
        let mut names: Vec<String> = node
            .children()
            .iter()
            .filter(|(_, child)| tree.node(**child).is_some_and(&include))
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Attach a named attribute to this context
    pub fn put_attribute(
        &self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, NamespaceError> {
        let value = value.into();
        self.tree.write().set_attribute(self.node, name, value)
    }

    /// Read an attribute; with `inherit`, fall back to the nearest enclosing
    /// context that defines it.
    pub fn get_attribute(&self, name: &str, inherit: bool) -> Option<Value> {
        self.tree
            .read()
            .attribute(self.node, name, inherit)
            .cloned()
    }

    /// Number of values stored below this context
    pub fn len(&self) -> usize {
        self.tree.read().count_values(self.node)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn relative_key<'a>(view_key: &str, full: &'a str) -> Option<&'a str> {
    if view_key.is_empty() {
        return Some(full);
    }
    full.strip_prefix(view_key)?.strip_prefix(SEPARATOR)
}

impl Clone for Context {
    fn clone(&self) -> Self {
        let tree = self.tree.read();
        self.bind_locked(&tree, self.node)
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        let idle = match self.tree.read().node(self.node) {
            Some(node) => {
                node.release();
                node.is_prunable()
            }
            None => false,
        };
        // prune_from re-checks under the write lock, a bind in between wins
        if idle {
            self.tree.write().prune_from(self.node);
        }
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree) && self.node == other.node
    }
}

impl Eq for Context {}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("path", &self.path())
            .finish()
    }
}

/// A namespace store: the root [`Context`] of a fresh tree.
///
/// Cloning a `Namespace` clones the handle, not the tree. The tree sits
/// behind a read/write lock; every `put` and `remove` applies the node
/// change and the suffix index update under one write lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespace(Context);

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    pub fn new() -> Self {
        let tree = Tree::new();
        let root = tree.root();
        if let Some(node) = tree.node(root) {
            node.retain();
        }
        Namespace(Context {
            tree: Arc::new(RwLock::new(tree)),
            node: root,
        })
    }

    /// Number of live nodes in the tree, root included
    pub fn node_count(&self) -> usize {
        self.0.tree.read().node_count()
    }
}

impl Deref for Namespace {
    type Target = Context;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
