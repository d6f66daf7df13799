//! Threshold tree over the slot array
//!
//! Static complete binary tree built once by midpoint bisection.
//! Every node owns a window of the array and a density ceiling
//! interpolated linearly from `tau_0` (root) to `tau_d` (leaves).
//!
//! Nodes live in an arena and refer to each other by `NodeId`:
//! children are owned, the parent link is navigation only.

mod descent;
mod node;

pub use descent::{Descent, Direction};
pub use node::{BalanceNode, NodeId};

use std::ops::Index;

use crate::slots::SlotArray;
use crate::LlaError;

/// Arena-backed threshold tree
#[derive(Debug, Clone)]
pub struct BalancingTree {
    /// Nodes in construction (pre-)order; the root is index 0
    nodes: Vec<BalanceNode>,

    /// Depth of every leaf
    max_depth: usize,
}

impl BalancingTree {
    /// Build the tree over `[0, capacity - 1]`
    ///
    /// Ceiling at depth d: tau_0 + (tau_d - tau_0) · d / max_depth
    pub fn build(capacity: usize, max_depth: usize, tau_0: f64, tau_d: f64) -> Result<Self, LlaError> {
        if capacity == 0 || max_depth >= usize::BITS as usize || capacity >> max_depth == 0 {
            return Err(LlaError::InvalidConfig(format!(
                "{capacity} slots cannot be split into 2^{max_depth} leaves"
            )));
        }

        // 2^(max_depth + 1) - 1 nodes in a complete tree
        let node_count = 1usize
            .checked_shl(max_depth as u32 + 1)
            .map(|n| n - 1)
            .ok_or(LlaError::Allocation {
                what: "tree arena",
                requested: usize::MAX,
            })?;

        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(node_count)
            .map_err(|_| LlaError::Allocation {
                what: "tree arena",
                requested: node_count,
            })?;
        nodes.push(BalanceNode::new(None, 0, capacity - 1, 0));

        let mut tree = Self { nodes, max_depth };
        tree.grow(NodeId(0), tau_0, tau_d);
        debug_assert_eq!(tree.nodes.len(), node_count);

        Ok(tree)
    }

    fn grow(&mut self, id: NodeId, tau_0: f64, tau_d: f64) {
        let depth = self.nodes[id.0].depth;

        if depth == self.max_depth {
            self.nodes[id.0].tau_k = tau_d;
            return;
        }

        self.nodes[id.0].tau_k = tau_0 + (tau_d - tau_0) * (depth as f64 / self.max_depth as f64);

        let (left_window, right_window) = self.nodes[id.0].split();
        let left = self.push(BalanceNode::new(
            Some(id),
            *left_window.start(),
            *left_window.end(),
            depth + 1,
        ));
        let right = self.push(BalanceNode::new(
            Some(id),
            *right_window.start(),
            *right_window.end(),
            depth + 1,
        ));
        self.nodes[id.0].children = Some((left, right));

        self.grow(left, tau_0, tau_d);
        self.grow(right, tau_0, tau_d);
    }

    fn push(&mut self, node: BalanceNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Root id (always index 0)
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Depth of the leaves
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Total number of nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has been torn down
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id
    #[inline]
    pub fn node(&self, id: NodeId) -> &BalanceNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut BalanceNode {
        &mut self.nodes[id.0]
    }

    /// Parent id, if any
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Pre-order walk from the root: node before its children
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: if self.nodes.is_empty() {
                Vec::new()
            } else {
                vec![self.root()]
            },
        }
    }

    /// Post-order ids of the subtree under `from`: children before parent
    pub fn post_order(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![(from, false)];

        while let Some((id, expanded)) = stack.pop() {
            match self.nodes[id.0].children {
                Some((left, right)) if !expanded => {
                    stack.push((id, true));
                    stack.push((right, false));
                    stack.push((left, false));
                }
                _ => order.push(id),
            }
        }

        order
    }

    /// Recompute routing bounds of every node under `from` from the array
    ///
    /// Leaves scan their own slots; internal nodes combine their children.
    pub fn refresh_bounds(&mut self, from: NodeId, slots: &SlotArray) {
        for id in self.post_order(from) {
            let bounds = match self.nodes[id.0].children {
                None => slots.bounds(self.nodes[id.0].window()),
                Some((left, right)) => {
                    let (left, right) = (&self.nodes[left.0], &self.nodes[right.0]);
                    let low = left.low.or(right.low);
                    let high = right.high.or(left.high);
                    low.zip(high)
                }
            };
            self.nodes[id.0].set_bounds(bounds);
        }
    }

    /// Fold `x` into the bounds of every strict ancestor of `from`
    pub fn absorb_upward(&mut self, from: NodeId, x: i64) {
        let mut current = self.nodes[from.0].parent;
        while let Some(id) = current {
            self.nodes[id.0].absorb(x);
            current = self.nodes[id.0].parent;
        }
    }

    /// Release every node, children before parents
    ///
    /// Returns how many nodes were released. A second call releases nothing.
    pub fn teardown(&mut self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        let order = self.post_order(self.root());
        for id in &order {
            // Unlink from the parent before the slot goes away.
            if let Some(parent) = self.nodes[id.0].parent.take() {
                self.nodes[parent.0].children = None;
            }
        }
        self.nodes.clear();
        self.nodes.shrink_to_fit();

        order.len()
    }
}

impl Index<NodeId> for BalancingTree {
    type Output = BalanceNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

/// Pre-order iterator over `(NodeId, &BalanceNode)`
#[derive(Debug)]
pub struct PreOrder<'a> {
    tree: &'a BalancingTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, &'a BalanceNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];
        if let Some((left, right)) = node.children {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_tree_shape() {
        // 8 slots, max depth 2
        let tree = BalancingTree::build(8, 2, 0.5, 0.75).unwrap();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.leaf_count(), 4);

        let leaves: Vec<_> = tree
            .pre_order()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| (node.window_start, node.window_end))
            .collect();
        assert_eq!(leaves, vec![(0, 1), (2, 3), (4, 5), (6, 7)]);
    }

    #[test]
    fn test_thresholds_interpolate_by_depth() {
        let tree = BalancingTree::build(128, 5, 0.5, 0.75).unwrap();

        for (_, node) in tree.pre_order() {
            let expected = 0.5 + 0.25 * (node.depth as f64 / 5.0);
            assert!((node.tau_k - expected).abs() < 1e-12, "depth {}", node.depth);
            assert_eq!(node.is_leaf(), node.depth == 5);
        }
    }

    #[test]
    fn test_children_tile_parent() {
        let tree = BalancingTree::build(100, 4, 0.3, 0.9).unwrap();

        for (id, node) in tree.pre_order() {
            if let Some((left, right)) = node.children() {
                assert_eq!(tree[left].window_start, node.window_start);
                assert_eq!(tree[left].window_end + 1, tree[right].window_start);
                assert_eq!(tree[right].window_end, node.window_end);
                assert_eq!(tree.parent(left), Some(id));
                assert_eq!(tree.parent(right), Some(id));
            }
        }
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_root_only_tree() {
        let tree = BalancingTree::build(4, 0, 0.4, 0.6).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree[tree.root()].is_leaf());
        assert_eq!(tree[tree.root()].tau_k, 0.6);
    }

    #[test]
    fn test_too_deep_is_rejected() {
        assert!(BalancingTree::build(4, 3, 0.5, 0.75).is_err());
        assert!(BalancingTree::build(0, 0, 0.5, 0.75).is_err());
    }

    #[test]
    fn test_post_order_children_first() {
        let tree = BalancingTree::build(8, 2, 0.5, 0.75).unwrap();
        let order = tree.post_order(tree.root());

        assert_eq!(order.len(), 7);
        assert_eq!(*order.last().unwrap(), tree.root());
        for (position, id) in order.iter().enumerate() {
            if let Some((left, right)) = tree[*id].children() {
                let left_at = order.iter().position(|n| *n == left).unwrap();
                let right_at = order.iter().position(|n| *n == right).unwrap();
                assert!(left_at < position && right_at < position);
            }
        }
    }

    #[test]
    fn test_refresh_and_absorb_bounds() {
        let mut tree = BalancingTree::build(8, 2, 0.5, 0.75).unwrap();
        let mut slots = SlotArray::new(8).unwrap();
        crate::slots::insert_and_spread(&mut slots, 4, 7, 6).unwrap();
        crate::slots::insert_and_spread(&mut slots, 4, 7, 3).unwrap();

        let root = tree.root();
        let (_, right) = tree[root].children().unwrap();
        tree.refresh_bounds(right, &slots);
        tree.absorb_upward(right, 3);
        tree.absorb_upward(right, 6);

        assert_eq!((tree[right].low, tree[right].high), (Some(3), Some(6)));
        assert_eq!((tree[root].low, tree[root].high), (Some(3), Some(6)));

        let (right_left, right_right) = tree[right].children().unwrap();
        assert_eq!(tree[right_left].low, Some(3));
        assert_eq!(tree[right_right].low, Some(6));
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut tree = BalancingTree::build(16, 3, 0.5, 0.75).unwrap();
        assert_eq!(tree.teardown(), 15);
        assert!(tree.is_empty());
        assert_eq!(tree.teardown(), 0);
        assert_eq!(tree.pre_order().count(), 0);
    }
}
