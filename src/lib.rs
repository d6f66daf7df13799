//! # Density-balanced sparse sorted array
//!
//! A fixed-capacity array that keeps its elements in global sorted
//! order with deliberate gaps between them, so an insertion only
//! rewrites a bounded window instead of shifting the whole array
//! (a packed-memory array).
//!
//! ## Core Algorithm
//!
//! 1. **Threshold tree**: complete binary tree over fixed windows of the
//!    array, ceilings interpolated from `tau_0` (root) to `tau_d` (leaves)
//! 2. **Descent**: charge the insertion to each window on the path until
//!    one would exceed its ceiling
//! 3. **Redistribution**: merge the value into the chosen window and
//!    re-space its occupants evenly
//!
//! ## Usage Example
//!
//! ```
//! use lla::{Lla, LlaConfig};
//!
//! let mut lla = Lla::new(LlaConfig::new(16, 8, 0.5, 0.75))?;
//! for x in [10, 1, 5, 2, 20] {
//!     lla.insert(x)?;
//! }
//! assert_eq!(lla.values().collect::<Vec<_>>(), vec![1, 2, 5, 10, 20]);
//! # Ok::<(), lla::LlaError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules
pub mod inspect; // Diagnostics views and rendering
pub mod slots; // Gapped backing array + redistribution
pub mod tree; // Threshold tree + descent

// Re-exports for convenience
pub use inspect::{NodeView, Nodes};
pub use slots::{Slot, SlotArray};
pub use tree::{BalanceNode, BalancingTree, Descent, Direction, NodeId};

use thiserror::Error;

/// Construction parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct LlaConfig {
    /// Base size `N`
    pub n: usize,

    /// Capacity multiplier `C` (total slots = N·C)
    pub c: usize,

    /// Root density ceiling
    pub tau_0: f64,

    /// Leaf density ceiling
    pub tau_d: f64,
}

impl LlaConfig {
    /// Create configuration (not yet validated)
    pub fn new(n: usize, c: usize, tau_0: f64, tau_d: f64) -> Self {
        Self { n, c, tau_0, tau_d }
    }

    /// Parameters of the reference demo run: N=16, C=8, 0.5 → 0.75
    pub fn demo() -> Self {
        Self::new(16, 8, 0.5, 0.75)
    }

    /// Check the parameters keep the tree well-defined
    pub fn validate(&self) -> Result<(), LlaError> {
        if self.c == 0 || self.c >= self.n {
            return Err(LlaError::InvalidConfig(format!(
                "need 0 < C < N, got N={} C={}",
                self.n, self.c
            )));
        }
        if self.n.checked_mul(self.c).is_none() {
            return Err(LlaError::InvalidConfig(format!(
                "capacity N·C overflows (N={} C={})",
                self.n, self.c
            )));
        }
        for (name, tau) in [("tau_0", self.tau_0), ("tau_d", self.tau_d)] {
            if !tau.is_finite() || !(0.0..=1.0).contains(&tau) {
                return Err(LlaError::InvalidConfig(format!(
                    "{name} must lie in [0, 1], got {tau}"
                )));
            }
        }
        if self.tau_0 > self.tau_d {
            return Err(LlaError::InvalidConfig(format!(
                "need tau_0 <= tau_d, got {} > {}",
                self.tau_0, self.tau_d
            )));
        }
        Ok(())
    }

    /// Total slots: N·C
    pub fn capacity(&self) -> usize {
        self.n * self.c
    }

    /// Nominal leaf width: ⌊log₂ N⌋
    pub fn window_size(&self) -> usize {
        self.n.max(1).ilog2() as usize
    }

    /// ⌊N·C / window_size⌋
    pub fn num_leaves(&self) -> usize {
        self.capacity() / self.window_size().max(1)
    }

    /// Tree depth: ⌊log₂ num_leaves⌋
    pub fn max_depth(&self) -> usize {
        self.num_leaves().max(1).ilog2() as usize
    }

    /// Most elements the root admits before reporting capacity exceeded
    pub fn headroom(&self) -> usize {
        (self.tau_0 * self.capacity() as f64).floor() as usize
    }
}

/// Errors that can occur while building or filling the array
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlaError {
    /// Construction parameters rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A reservation could not be satisfied
    #[error("Allocation failed for {what} ({requested} entries)")]
    Allocation {
        /// Which buffer was being reserved
        what: &'static str,
        /// Entries requested
        requested: usize,
    },

    /// Root density at its ceiling; construct with a larger N
    #[error("Capacity exceeded: {len} of {capacity} slots used, root ceiling {ceiling}")]
    CapacityExceeded {
        /// Elements currently stored
        len: usize,
        /// Total slots
        capacity: usize,
        /// Root density ceiling
        ceiling: f64,
    },

    /// Tree and array disagree (a bug, not a runtime condition)
    #[error("Structural inconsistency: {0}")]
    Inconsistent(String),
}

/// The sparse sorted array and its threshold tree
///
/// Owns both exclusively; they are built and released together.
#[derive(Debug, Clone)]
pub struct Lla {
    config: LlaConfig,
    window_size: usize,
    max_depth: usize,
    slots: SlotArray,
    tree: BalancingTree,
    len: usize,
}

impl Lla {
    /// Validate `config`, allocate the array and build the tree
    pub fn new(config: LlaConfig) -> Result<Self, LlaError> {
        config.validate()?;

        let capacity = config.capacity();
        let window_size = config.window_size();
        let max_depth = config.max_depth();

        let slots = SlotArray::new(capacity)?;
        let tree = BalancingTree::build(capacity, max_depth, config.tau_0, config.tau_d)?;

        tracing::debug!(
            n = config.n,
            c = config.c,
            capacity,
            window_size,
            max_depth,
            nodes = tree.len(),
            "structure built"
        );

        Ok(Self {
            config,
            window_size,
            max_depth,
            slots,
            tree,
            len: 0,
        })
    }

    /// Shorthand for `Lla::new(LlaConfig::new(n, c, tau_0, tau_d))`
    pub fn with_params(n: usize, c: usize, tau_0: f64, tau_d: f64) -> Result<Self, LlaError> {
        Self::new(LlaConfig::new(n, c, tau_0, tau_d))
    }

    /// Insert `x`, keeping the array sorted
    ///
    /// This is the main entry point that orchestrates:
    /// 1. Root capacity check
    /// 2. Density-gated descent
    /// 3. Window resolution (widened while the window is full)
    /// 4. Redistribution and routing-bound refresh
    pub fn insert(&mut self, x: i64) -> Result<(), LlaError> {
        let root = self.tree.root();
        if self.tree[root].tau >= self.config.tau_0 {
            return Err(LlaError::CapacityExceeded {
                len: self.len,
                capacity: self.slots.capacity(),
                ceiling: self.config.tau_0,
            });
        }

        let outcome = self.tree.descend(x)?;
        let mut target = match outcome {
            // A leaf outcome spreads over the leaf's parent window.
            Descent::Leaf(leaf) => self.tree.parent(leaf).ok_or_else(|| {
                LlaError::Inconsistent(format!("leaf {} has no parent", leaf.index()))
            })?,
            Descent::Backoff { rejected, fallback } => {
                tracing::debug!(
                    x,
                    rejected_depth = self.tree[rejected].depth,
                    fallback_depth = self.tree[fallback].depth,
                    "descent backed off"
                );
                fallback
            }
        };

        // Counters lag behind occupancy moved in by wider redistributions.
        while self.slots.occupied(self.tree[target].window()) >= self.tree[target].length() {
            target = self.tree.parent(target).ok_or_else(|| {
                LlaError::Inconsistent("root window is full below its ceiling".to_string())
            })?;
        }

        let node = &self.tree[target];
        let (start, end) = (node.window_start, node.window_end);
        let count = slots::insert_and_spread(&mut self.slots, start, end, x)?;
        tracing::debug!(x, start, end, count, "redistributed window");

        self.tree.refresh_bounds(target, &self.slots);
        self.tree.absorb_upward(target, x);
        self.len += 1;

        Ok(())
    }

    /// Release tree and array; `None` is left behind
    ///
    /// Safe on an already-destroyed (`None`) handle.
    pub fn destroy(handle: &mut Option<Lla>) {
        if let Some(mut lla) = handle.take() {
            let nodes = lla.tree.teardown();
            let slots = lla.slots.capacity();
            drop(lla);
            tracing::debug!(nodes, slots, "structure released");
        }
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slots
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Construction parameters
    pub fn config(&self) -> &LlaConfig {
        &self.config
    }

    /// ⌊log₂ N⌋
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Depth of the leaves
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Root density counter
    pub fn density(&self) -> f64 {
        self.tree[self.tree.root()].tau
    }

    /// Read-only view of the whole array
    pub fn slots(&self) -> &[Slot] {
        self.slots.as_slice()
    }

    /// Stored values, left to right
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.slots.values()
    }

    /// Threshold tree (read-only)
    pub fn tree(&self) -> &BalancingTree {
        &self.tree
    }

    /// Root node snapshot
    pub fn root(&self) -> NodeView {
        NodeView::from(&self.tree[self.tree.root()])
    }

    /// Every node, pre-order
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(self.tree.pre_order())
    }
}
