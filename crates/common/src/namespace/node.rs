use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::value::Value;

/// Handle to a node slot in the [`Tree`](super::tree::Tree) arena.
///
/// The generation is bumped every time a slot is freed, so an id held past
/// the life of its node never aliases whatever is allocated there next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/**
 * Nodes
 * =====
 * A node is one vertex of the namespace tree. It owns its children (by
 *  arena id, the arena frees them transitively when a subtree is
 *  detached) and points back at its parent. The parent pointer is only
 *  used to climb for `..` and to rebuild full keys; it never keeps the
 *  parent alive.
 * A node may hold a value, have children, or both.
 */
#[derive(Debug)]
pub struct Node {
    // name of this node under its parent (empty for the root)
    name: String,
    parent: Option<NodeId>,
    children: HashMap<String, NodeId>,
    value: Option<Value>,
    // per-node metadata, looked up with optional inheritance
    attributes: HashMap<String, Value>,
    // set once the node has been used as a directory
    container: bool,
    // created explicitly as a context, exempt from pruning
    explicit: bool,
    // live Context handles bound to this node
    views: AtomicUsize,
}

impl Node {
    pub fn new(name: String, parent: Option<NodeId>) -> Self {
        Node {
            name,
            parent,
            children: HashMap::new(),
            value: None,
            attributes: HashMap::new(),
            container: false,
            explicit: false,
            views: AtomicUsize::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    pub fn children(&self) -> &HashMap<String, NodeId> {
        &self.children
    }

    pub(crate) fn attach(&mut self, name: String, child: NodeId) {
        self.container = true;
        self.children.insert(name, child);
    }

    pub(crate) fn detach(&mut self, name: &str) -> Option<NodeId> {
        self.children.remove(name)
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub(crate) fn set_value(&mut self, value: Value) -> Option<Value> {
        self.value.replace(value)
    }

    pub(crate) fn take_value(&mut self) -> Option<Value> {
        self.value.take()
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub(crate) fn set_attribute(&mut self, name: String, value: Value) -> Option<Value> {
        self.attributes.insert(name, value)
    }

    pub fn is_container(&self) -> bool {
        self.container
    }

    pub(crate) fn mark_explicit(&mut self) {
        self.container = true;
        self.explicit = true;
    }

    pub(crate) fn retain(&self) {
        self.views.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn release(&self) {
        // saturating, a release racing a detach must not wrap
        let _ = self
            .views
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    pub fn views(&self) -> usize {
        self.views.load(Ordering::Acquire)
    }

    /// Nothing stored here and nothing referring to it from outside
    pub fn is_prunable(&self) -> bool {
        self.parent.is_some()
            && !self.explicit
            && self.value.is_none()
            && self.children.is_empty()
            && self.attributes.is_empty()
            && self.views() == 0
    }
}
