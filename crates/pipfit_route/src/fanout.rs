//! Per-design wire fanout counts.

use pipfit_common::WireNode;
use std::collections::HashMap;

/// How many route walks passed through each wire node of one design.
///
/// Every pin-to-source walk bumps each node it visits once, so a node shared
/// by the paths to `k` sinks ends up with count `k`.
#[derive(Debug, Clone, Default)]
pub struct FanoutTable {
    counts: HashMap<WireNode, u32>,
}

impl FanoutTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one walk through `node`.
    pub fn visit(&mut self, node: WireNode) {
        *self.counts.entry(node).or_insert(0) += 1;
    }

    /// The recorded count, if the node was ever visited.
    pub fn get(&self, node: WireNode) -> Option<u32> {
        self.counts.get(&node).copied()
    }

    /// The recorded count, or 1 for a node no walk touched.
    pub fn fanout_of(&self, node: WireNode) -> u32 {
        self.get(node).unwrap_or(1)
    }

    /// Number of distinct nodes visited.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no node has been visited.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
