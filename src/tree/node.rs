//! Threshold tree node
//!
//! Node = window [window_start, window_end] of slot indices
//! Children via midpoint: m = ⌊(start + end) / 2⌋
//!   Left child: [start, m]
//!   Right child: [m+1, end]

use std::fmt;
use std::ops::RangeInclusive;

/// Index of a node in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One window of the slot array with its admission counters
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceNode {
    /// First slot index (inclusive)
    pub window_start: usize,

    /// Last slot index (inclusive)
    pub window_end: usize,

    /// Distance from the root
    pub depth: usize,

    /// Insertions accepted by this window since construction
    pub size: usize,

    /// `size / length`, refreshed on each accepted insertion
    pub tau: f64,

    /// Density ceiling fixed at construction
    pub tau_k: f64,

    /// Owned children (left, right); `None` for leaves
    pub(crate) children: Option<(NodeId, NodeId)>,

    /// Back-reference for upward traversal only
    pub(crate) parent: Option<NodeId>,

    /// Smallest occupant currently stored in the window
    pub(crate) low: Option<i64>,

    /// Largest occupant currently stored in the window
    pub(crate) high: Option<i64>,
}

impl BalanceNode {
    pub(crate) fn new(parent: Option<NodeId>, window_start: usize, window_end: usize, depth: usize) -> Self {
        Self {
            window_start,
            window_end,
            depth,
            size: 0,
            tau: 0.0,
            tau_k: 0.0,
            children: None,
            parent,
            low: None,
            high: None,
        }
    }

    /// Leaves tile the array and have no children
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Window length in slots
    #[inline]
    pub fn length(&self) -> usize {
        self.window_end - self.window_start + 1
    }

    /// Window as an index range
    #[inline]
    pub fn window(&self) -> RangeInclusive<usize> {
        self.window_start..=self.window_end
    }

    /// Split point shared by both children
    #[inline]
    pub fn midpoint(&self) -> usize {
        (self.window_start + self.window_end) / 2
    }

    /// Child windows: ([start, mid], [mid+1, end])
    pub fn split(&self) -> (RangeInclusive<usize>, RangeInclusive<usize>) {
        let mid = self.midpoint();
        (self.window_start..=mid, mid + 1..=self.window_end)
    }

    /// Parent id, if not the root
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids, if not a leaf
    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    /// Density this window would reach with one more insertion
    #[inline]
    pub fn density_after_insert(&self) -> (usize, f64) {
        let new_size = self.size + 1;
        (new_size, new_size as f64 / self.length() as f64)
    }

    /// Commit one accepted insertion
    pub(crate) fn accept(&mut self, new_size: usize, new_tau: f64) {
        self.size = new_size;
        self.tau = new_tau;
    }

    /// Fold a value that now lives in this window into its bounds
    pub(crate) fn absorb(&mut self, x: i64) {
        self.low = Some(self.low.map_or(x, |low| low.min(x)));
        self.high = Some(self.high.map_or(x, |high| high.max(x)));
    }

    pub(crate) fn set_bounds(&mut self, bounds: Option<(i64, i64)>) {
        self.low = bounds.map(|(low, _)| low);
        self.high = bounds.map(|(_, high)| high);
    }
}

impl fmt::Display for BalanceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "is_leaf: {}, size: {}, depth: {}, tau: {:.4}, tau_k: {:.4}, win_start: {}, win_end: {}",
            self.is_leaf(),
            self.size,
            self.depth,
            self.tau,
            self.tau_k,
            self.window_start,
            self.window_end
        )
    }
}
