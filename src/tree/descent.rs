//! Density-gated descent
//!
//! Walk from the root toward a leaf, charging the insertion to every
//! window that stays within its ceiling. The first window that would
//! overflow stops the walk and hands the insertion back to its parent,
//! which has already accepted it.

use super::{BalancingTree, NodeId};
use crate::LlaError;

/// Which child the descent continues into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Left half of the window
    Left,

    /// Right half of the window
    Right,
}

/// Where a descent stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descent {
    /// Every window on the path accepted, down to this leaf
    Leaf(NodeId),

    /// `rejected` would have overflowed its ceiling; `fallback` is its
    /// parent and already counts the insertion
    Backoff {
        /// First node whose ceiling would have been breached
        rejected: NodeId,
        /// Parent of `rejected`
        fallback: NodeId,
    },
}

impl Descent {
    /// Node the descent reported
    pub fn node(&self) -> NodeId {
        match *self {
            Descent::Leaf(id) => id,
            Descent::Backoff { fallback, .. } => fallback,
        }
    }
}

impl BalancingTree {
    /// Child of `id` whose window brackets the sorted position of `x`
    ///
    /// Right iff `x` exceeds everything the left half holds. With an
    /// empty left half, right only when the right half holds something
    /// smaller than `x`. Returns `None` at a leaf.
    pub fn route(&self, id: NodeId, x: i64) -> Option<(Direction, NodeId)> {
        let (left, right) = self.nodes[id.0].children?;

        let go_right = match self.nodes[left.0].high {
            Some(high) => x > high,
            None => self.nodes[right.0].low.map_or(false, |low| low < x),
        };

        Some(if go_right {
            (Direction::Right, right)
        } else {
            (Direction::Left, left)
        })
    }

    /// Charge an insertion of `x` along its root-to-leaf path
    ///
    /// Counters of accepting nodes are committed as the walk goes; a
    /// rejecting node is left untouched. A rejection at the root means
    /// the structure cannot take another element.
    pub fn descend(&mut self, x: i64) -> Result<Descent, LlaError> {
        let mut id = self.root();

        loop {
            let node = &self.nodes[id.0];
            let (new_size, new_tau) = node.density_after_insert();

            if new_tau > node.tau_k {
                tracing::trace!(
                    depth = node.depth,
                    start = node.window_start,
                    end = node.window_end,
                    new_tau,
                    tau_k = node.tau_k,
                    "window rejected insertion"
                );
                return match node.parent {
                    Some(fallback) => Ok(Descent::Backoff {
                        rejected: id,
                        fallback,
                    }),
                    None => Err(LlaError::CapacityExceeded {
                        len: node.size,
                        capacity: node.length(),
                        ceiling: node.tau_k,
                    }),
                };
            }

            self.nodes[id.0].accept(new_size, new_tau);

            match self.route(id, x) {
                Some((_, child)) => id = child,
                None => return Ok(Descent::Leaf(id)),
            }
        }
    }
}
