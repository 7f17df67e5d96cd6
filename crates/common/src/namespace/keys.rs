use std::sync::Arc;

use parking_lot::RwLock;

use super::node::NodeId;
use super::path::SEPARATOR;
use super::tree::Tree;

/// Depth-first walk over every key holding a value below a context.
///
/// The walk is lazy and live: each call to `next` takes the read lock just
/// long enough to expand one branch. Nodes removed while the walk is in
/// progress are skipped, values written into branches that were already
/// expanded are not seen. Every key that exists for the whole walk is
/// yielded exactly once. No ordering is guaranteed.
pub struct Keys {
    tree: Arc<RwLock<Tree>>,
    stack: Vec<(NodeId, String)>,
}

impl Keys {
    pub(crate) fn new(tree: Arc<RwLock<Tree>>, from: NodeId) -> Self {
        let stack = {
            let guard = tree.read();
            // keys seen from the root are absolute
            let base = if from == guard.root() { "/" } else { "" };
            guard
                .node(from)
                .map(|node| {
                    node.children()
                        .iter()
                        .map(|(name, child)| (*child, format!("{}{}", base, name)))
                        .collect()
                })
                .unwrap_or_default()
        };
        Keys { tree, stack }
    }
}

impl Iterator for Keys {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree.read();
        while let Some((id, key)) = self.stack.pop() {
            let Some(node) = tree.node(id) else {
                continue;
            };
            for (name, child) in node.children() {
                self.stack
                    .push((*child, format!("{}{}{}", key, SEPARATOR, name)));
            }
            if node.value().is_some() {
                return Some(key);
            }
        }
        None
    }
}

impl std::fmt::Debug for Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keys")
            .field("pending", &self.stack.len())
            .finish()
    }
}
