//! Node arena
//!
//! Every node of a namespace lives in one slot of a `Tree`. Children are
//! referenced by [`NodeId`], parents by a plain (non-owning) id, so the
//! parent/child reference cycle never turns into an ownership cycle.
//! Freed slots are recycled behind a generation counter.

use super::error::NamespaceError;
use super::node::{Node, NodeId};
use super::path::{KeyPath, Segment, SEPARATOR};
use super::suffix_index::SuffixIndex;
use super::value::Value;

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    suffixes: SuffixIndex,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Join a root-relative key and a child name
pub(crate) fn join_key(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", base, SEPARATOR, name)
    }
}

impl Tree {
    pub fn new() -> Self {
        let mut root = Node::new(String::new(), None);
        root.mark_explicit();
        Tree {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            suffixes: SuffixIndex::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn suffixes(&self) -> &SuffixIndex {
        &self.suffixes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn release_slot(&mut self, id: NodeId) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    pub fn child_if_exists(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.node(id)?.child(name)
    }

    /// Return the named child of `id`, creating and linking an empty one if
    /// needed. `None` only if `id` itself is gone.
    pub fn child_or_create(&mut self, id: NodeId, name: &str) -> Option<NodeId> {
        if let Some(child) = self.node(id)?.child(name) {
            return Some(child);
        }
        let child = self.alloc(Node::new(name.to_string(), Some(id)));
        self.node_mut(id)?.attach(name.to_string(), child);
        tracing::trace!(name, "created node");
        Some(child)
    }

    /// Unlink the named child of `id` and free its whole subtree, dropping
    /// every value in it from the suffix index. Returns the number of values
    /// dropped.
    pub fn detach_child(&mut self, id: NodeId, name: &str) -> usize {
        let Some(base) = self.key_of(id) else {
            return 0;
        };
        let Some(child) = self.node_mut(id).and_then(|node| node.detach(name)) else {
            return 0;
        };

        let mut dropped = 0;
        let mut freed = 0;
        let mut stack = vec![(child, join_key(&base, name))];
        while let Some((next, key)) = stack.pop() {
            let Some(node) = self.release_slot(next) else {
                continue;
            };
            freed += 1;
            for (child_name, grandchild) in node.children() {
                stack.push((*grandchild, join_key(&key, child_name)));
            }
            if node.value().is_some() {
                self.suffixes.remove(node.name(), &key);
                dropped += 1;
            }
        }

        tracing::debug!(
            key = %join_key(&base, name),
            nodes = freed,
            values = dropped,
            "detached subtree"
        );
        dropped
    }

    /// Root-relative canonical key of a node, without leading or trailing
    /// separators. The root's key is empty.
    pub fn key_of(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent() {
            names.push(current.name());
            current = self.node(parent)?;
        }
        names.reverse();
        Some(names.join("/"))
    }

    /// True if `ancestor` is `id` or lies on its parent chain
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(next) = current {
            if next == ancestor {
                return true;
            }
            current = self.node(next).and_then(Node::parent);
        }
        false
    }

    fn start(&self, from: NodeId, path: &KeyPath) -> NodeId {
        if path.is_absolute() {
            self.root
        } else {
            from
        }
    }

    /// Follow `path` from `from` without creating anything.
    pub fn resolve(&self, from: NodeId, path: &KeyPath) -> Option<NodeId> {
        let mut current = self.start(from, path);
        self.node(current)?;
        for segment in path.segments() {
            let node = self.node(current)?;
            current = match segment {
                Segment::Parent => node.parent()?,
                Segment::Name(name) => node.child(name)?,
            };
        }
        tracing::trace!(key = %path, "resolved");
        Some(current)
    }

    /// Follow `path` from `from`, creating missing nodes on the way down.
    pub fn resolve_or_create(
        &mut self,
        from: NodeId,
        path: &KeyPath,
    ) -> Result<NodeId, NamespaceError> {
        let mut current = self.start(from, path);
        if !self.contains(current) {
            return Err(NamespaceError::Detached);
        }
        for segment in path.segments() {
            current = match segment {
                Segment::Parent => self
                    .node(current)
                    .and_then(Node::parent)
                    .ok_or_else(|| NamespaceError::NoSuchParent(path.to_string()))?,
                Segment::Name(name) => self
                    .child_or_create(current, name)
                    .ok_or(NamespaceError::Detached)?,
            };
        }
        Ok(current)
    }

    /// Walk `path` only as far as existing contexts go and return the last
    /// node reached. Value-only leaves are not descended into.
    pub fn deepest(&self, from: NodeId, path: &KeyPath) -> NodeId {
        let mut current = self.start(from, path);
        for segment in path.segments() {
            let next = match segment {
                Segment::Parent => self.node(current).and_then(Node::parent),
                Segment::Name(name) => self
                    .child_if_exists(current, name)
                    .filter(|child| self.node(*child).is_some_and(Node::is_container)),
            };
            match next {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Store a value, indexing its key if the slot was empty. Returns the
    /// replaced value.
    pub fn set_value(&mut self, id: NodeId, value: Value) -> Result<Option<Value>, NamespaceError> {
        let key = self.key_of(id).ok_or(NamespaceError::Detached)?;
        let node = self.node_mut(id).ok_or(NamespaceError::Detached)?;
        let previous = node.set_value(value);
        if previous.is_none() {
            let terminal = node.name().to_string();
            self.suffixes.insert(&terminal, key);
        }
        Ok(previous)
    }

    /// Clear a value and its index entry.
    pub fn take_value(&mut self, id: NodeId) -> Option<Value> {
        let key = self.key_of(id)?;
        let node = self.node_mut(id)?;
        let value = node.take_value()?;
        let terminal = node.name().to_string();
        self.suffixes.remove(&terminal, &key);
        Some(value)
    }

    pub fn mark_explicit(&mut self, id: NodeId) -> Result<(), NamespaceError> {
        self.node_mut(id)
            .map(Node::mark_explicit)
            .ok_or(NamespaceError::Detached)
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: Value,
    ) -> Result<Option<Value>, NamespaceError> {
        self.node_mut(id)
            .map(|node| node.set_attribute(name.to_string(), value))
            .ok_or(NamespaceError::Detached)
    }

    /// Look up an attribute, optionally falling back to the nearest ancestor
    /// that defines it.
    pub fn attribute(&self, id: NodeId, name: &str, inherit: bool) -> Option<&Value> {
        let mut current = self.node(id)?;
        loop {
            if let Some(value) = current.attribute(name) {
                return Some(value);
            }
            if !inherit {
                return None;
            }
            current = self.node(current.parent()?)?;
        }
    }

    /// Free `id` and then each ancestor in turn while they hold nothing.
    pub fn prune_from(&mut self, id: NodeId) {
        let mut current = id;
        loop {
            let Some(node) = self.node(current) else {
                break;
            };
            if !node.is_prunable() {
                break;
            }
            let Some(parent) = node.parent() else {
                break;
            };
            let name = node.name().to_string();
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.detach(&name);
            }
            self.release_slot(current);
            tracing::debug!(name = %name, "pruned empty node");
            current = parent;
        }
    }

    /// Number of values stored strictly below `id`
    pub fn count_values(&self, id: NodeId) -> usize {
        let Some(node) = self.node(id) else {
            return 0;
        };
        let mut count = 0;
        let mut stack: Vec<NodeId> = node.children().values().copied().collect();
        while let Some(next) = stack.pop() {
            if let Some(node) = self.node(next) {
                if node.value().is_some() {
                    count += 1;
                }
                stack.extend(node.children().values().copied());
            }
        }
        count
    }
}
