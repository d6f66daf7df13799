//! Read-only diagnostics
//!
//! Snapshots of tree nodes for printers and tests. Nothing here
//! feeds back into insertion.

mod render;

use crate::tree::{BalanceNode, PreOrder};

/// Diagnostic copy of one tree node
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct NodeView {
    /// Distance from the root
    pub depth: usize,
    /// Whether the node is a leaf
    pub is_leaf: bool,
    /// Insertions accepted by the window
    pub size: usize,
    /// Current density counter
    pub tau: f64,
    /// Density ceiling
    pub tau_k: f64,
    /// First slot index (inclusive)
    pub window_start: usize,
    /// Last slot index (inclusive)
    pub window_end: usize,
}

impl NodeView {
    /// Window length in slots
    pub fn length(&self) -> usize {
        self.window_end - self.window_start + 1
    }

    /// Whether the node respects its ceiling
    pub fn within_ceiling(&self) -> bool {
        self.size == 0 || self.tau <= self.tau_k
    }
}

impl From<&BalanceNode> for NodeView {
    fn from(node: &BalanceNode) -> Self {
        Self {
            depth: node.depth,
            is_leaf: node.is_leaf(),
            size: node.size,
            tau: node.tau,
            tau_k: node.tau_k,
            window_start: node.window_start,
            window_end: node.window_end,
        }
    }
}

/// Pre-order iterator of node views
#[derive(Debug)]
pub struct Nodes<'a> {
    inner: PreOrder<'a>,
}

impl<'a> Nodes<'a> {
    pub(crate) fn new(inner: PreOrder<'a>) -> Self {
        Self { inner }
    }
}

impl Iterator for Nodes<'_> {
    type Item = NodeView;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, node)| NodeView::from(node))
    }
}
