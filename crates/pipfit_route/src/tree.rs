//! Sink-to-source route trees rebuilt from unordered pip lists.
//!
//! A [`RouteTree`] records, for every wire node reached by a net, the node
//! that drives it. Walking parents from a sink pin back to the next pin gives
//! the physical path of one arc.

use crate::fanout::FanoutTable;
use crate::source::NetRouting;
use pipfit_common::{Interner, NameError, PinRef, WireNode};
use std::collections::HashMap;

/// A directed programmable interconnect point.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Pip {
    /// The driving wire.
    pub src: WireNode,
    /// The driven wire.
    pub dst: WireNode,
}

impl Pip {
    /// Creates a pip from its endpoints.
    pub fn new(src: WireNode, dst: WireNode) -> Self {
        Self { src, dst }
    }
}

/// A wire that more than one pip of the same net drives.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DriverConflict {
    /// The multiply-driven wire.
    pub node: WireNode,
    /// The driver that was replaced.
    pub replaced: WireNode,
    /// The driver now recorded.
    pub kept: WireNode,
}

/// The routing forest of one net, as a driven-node to driver-node map.
///
/// Inserting a second pip into an already-driven node replaces the earlier
/// driver. Multi-driver nets are not supported; every such replacement is
/// kept in [`conflicts`](Self::conflicts) so callers can report it.
#[derive(Debug, Clone, Default)]
pub struct RouteTree {
    parent: HashMap<WireNode, WireNode>,
    pins: Vec<(WireNode, PinRef)>,
    pin_at: HashMap<WireNode, usize>,
    conflicts: Vec<DriverConflict>,
}

impl RouteTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the tree of one net, decomposing wire names along the way. Pin
    /// cell and pin names are kept exactly as the routing source spells them.
    pub fn from_net(net: &NetRouting, interner: &Interner) -> Result<Self, NameError> {
        let mut tree = Self::new();
        for (src, dst) in &net.pips {
            let src = WireNode::parse(src, interner)?;
            let dst = WireNode::parse(dst, interner)?;
            tree.insert_pip(Pip::new(src, dst));
        }
        for pin in &net.pins {
            let node = WireNode::parse(&pin.node, interner)?;
            tree.bind_pin(node, PinRef::new(pin.cell.clone(), pin.pin.clone()));
        }
        Ok(tree)
    }

    /// Records `pip.src` as the driver of `pip.dst`.
    pub fn insert_pip(&mut self, pip: Pip) {
        if let Some(old) = self.parent.insert(pip.dst, pip.src) {
            if old != pip.src {
                self.conflicts.push(DriverConflict {
                    node: pip.dst,
                    replaced: old,
                    kept: pip.src,
                });
            }
        }
    }

    /// Binds a pin to a node. A later pin on the same node wins lookups, but
    /// every bound pin still starts its own walk.
    pub fn bind_pin(&mut self, node: WireNode, pin: PinRef) {
        self.pin_at.insert(node, self.pins.len());
        self.pins.push((node, pin));
    }

    /// The driver of `node`, if any pip drives it.
    pub fn parent(&self, node: WireNode) -> Option<WireNode> {
        self.parent.get(&node).copied()
    }

    /// The pin bound to `node`, if any.
    pub fn pin_at(&self, node: WireNode) -> Option<&PinRef> {
        self.pin_at.get(&node).map(|&i| &self.pins[i].1)
    }

    /// Every bound pin in binding order.
    pub fn pins(&self) -> &[(WireNode, PinRef)] {
        &self.pins
    }

    /// Driver replacements seen while inserting pips.
    pub fn conflicts(&self) -> &[DriverConflict] {
        &self.conflicts
    }

    /// Number of driven nodes.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Returns `true` if no pip was inserted.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Walks from `start` towards the net source.
    ///
    /// Every visited node, `start` included, is counted once in `fanout`.
    /// The walk ends at the first node other than `start` that has a pin
    /// bound, returning that pin and the source-to-sink path. It yields
    /// nothing if `start` has no driver, if it runs off a root without
    /// meeting a pin, or if it loops.
    pub fn walk_from(
        &self,
        start: WireNode,
        fanout: &mut FanoutTable,
    ) -> Option<(&PinRef, Vec<Pip>)> {
        if !self.parent.contains_key(&start) {
            return None;
        }
        let mut path = Vec::new();
        let mut cursor = start;
        loop {
            fanout.visit(cursor);
            if cursor != start {
                if let Some(pin) = self.pin_at(cursor) {
                    path.reverse();
                    return Some((pin, path));
                }
            }
            let driver = self.parent(cursor)?;
            path.push(Pip::new(driver, cursor));
            // A simple path in the forest never uses more edges than exist.
            if path.len() > self.parent.len() {
                return None;
            }
            cursor = driver;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawPin;

    fn node(interner: &Interner, raw: &str) -> WireNode {
        WireNode::parse(raw, interner).unwrap()
    }

    fn net(pips: &[(&str, &str)], pins: &[(&str, &str, &str)]) -> NetRouting {
        NetRouting {
            pips: pips
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            pins: pins
                .iter()
                .map(|(n, c, p)| RawPin {
                    node: n.to_string(),
                    cell: c.to_string(),
                    pin: p.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn chain_walk() {
        let interner = Interner::new();
        let tree = RouteTree::from_net(
            &net(
                &[("R1C1_A", "R1C1_B"), ("R1C1_B", "R1C2_C")],
                &[("R1C1_A", "u0", "Q"), ("R1C2_C", "u1", "D")],
            ),
            &interner,
        )
        .unwrap();
        let mut fanout = FanoutTable::new();
        let c = node(&interner, "R1C2_C");
        let (src, path) = tree.walk_from(c, &mut fanout).unwrap();
        assert_eq!(*src, PinRef::new("u0", "Q"));
        let a = node(&interner, "R1C1_A");
        let b = node(&interner, "R1C1_B");
        assert_eq!(path, vec![Pip::new(a, b), Pip::new(b, c)]);
        assert_eq!(fanout.get(a), Some(1));
        assert_eq!(fanout.get(b), Some(1));
        assert_eq!(fanout.get(c), Some(1));
    }

    #[test]
    fn source_pin_starts_no_walk() {
        let interner = Interner::new();
        let tree = RouteTree::from_net(
            &net(&[("R1C1_A", "R1C1_B")], &[("R1C1_A", "u0", "Q")]),
            &interner,
        )
        .unwrap();
        let mut fanout = FanoutTable::new();
        assert!(tree
            .walk_from(node(&interner, "R1C1_A"), &mut fanout)
            .is_none());
        assert!(fanout.is_empty());
    }

    #[test]
    fn walk_off_root_without_pin_is_discarded() {
        let interner = Interner::new();
        let tree = RouteTree::from_net(
            &net(&[("R1C1_A", "R1C1_B")], &[("R1C1_B", "u1", "D")]),
            &interner,
        )
        .unwrap();
        let mut fanout = FanoutTable::new();
        let b = node(&interner, "R1C1_B");
        assert!(tree.walk_from(b, &mut fanout).is_none());
        // Nodes on the way are still counted.
        assert_eq!(fanout.get(b), Some(1));
        assert_eq!(fanout.get(node(&interner, "R1C1_A")), Some(1));
    }

    #[test]
    fn walk_stops_at_intermediate_pin() {
        let interner = Interner::new();
        let tree = RouteTree::from_net(
            &net(
                &[("R1C1_A", "R1C1_B"), ("R1C1_B", "R1C1_C")],
                &[
                    ("R1C1_A", "u0", "Q"),
                    ("R1C1_B", "u1", "D"),
                    ("R1C1_C", "u2", "D"),
                ],
            ),
            &interner,
        )
        .unwrap();
        let mut fanout = FanoutTable::new();
        let (src, path) = tree
            .walk_from(node(&interner, "R1C1_C"), &mut fanout)
            .unwrap();
        assert_eq!(*src, PinRef::new("u1", "D"));
        assert_eq!(path.len(), 1);
        assert_eq!(fanout.get(node(&interner, "R1C1_A")), None);
    }

    #[test]
    fn later_pip_overwrites_and_is_reported() {
        let interner = Interner::new();
        let tree = RouteTree::from_net(
            &net(&[("R1C1_A", "R1C1_C"), ("R1C1_B", "R1C1_C")], &[]),
            &interner,
        )
        .unwrap();
        let c = node(&interner, "R1C1_C");
        assert_eq!(tree.parent(c), Some(node(&interner, "R1C1_B")));
        assert_eq!(tree.conflicts().len(), 1);
        assert_eq!(tree.conflicts()[0].replaced, node(&interner, "R1C1_A"));
    }

    #[test]
    fn duplicate_pip_is_not_a_conflict() {
        let interner = Interner::new();
        let tree = RouteTree::from_net(
            &net(&[("R1C1_A", "R1C1_B"), ("R1C1_A", "R1C1_B")], &[]),
            &interner,
        )
        .unwrap();
        assert!(tree.conflicts().is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn cycle_terminates() {
        let interner = Interner::new();
        let tree = RouteTree::from_net(
            &net(
                &[("R1C1_A", "R1C1_B"), ("R1C1_B", "R1C1_A")],
                &[("R1C1_A", "u0", "D")],
            ),
            &interner,
        )
        .unwrap();
        let mut fanout = FanoutTable::new();
        assert!(tree
            .walk_from(node(&interner, "R1C1_A"), &mut fanout)
            .is_none());
    }

    #[test]
    fn pin_names_kept_raw() {
        let interner = Interner::new();
        let tree = RouteTree::from_net(
            &net(&[], &[("R1C1_A", r"u\[0\]", "Q"), ("R1C1_B", "\"weird", "D")]),
            &interner,
        )
        .unwrap();
        assert_eq!(
            tree.pin_at(node(&interner, "R1C1_A")),
            Some(&PinRef::new(r"u\[0\]", "Q"))
        );
        assert_eq!(
            tree.pin_at(node(&interner, "R1C1_B")),
            Some(&PinRef::new("\"weird", "D"))
        );
    }

    #[test]
    fn bad_wire_name_fails() {
        let interner = Interner::new();
        let err = RouteTree::from_net(&net(&[("R1C1_A", "R1Cx_B")], &[]), &interner).unwrap_err();
        assert!(matches!(err, NameError::BadCoordinate { .. }));
    }

    #[test]
    fn every_walk_in_a_forest_terminates_without_repeating_edges() {
        // Two trees: A -> {B -> {C, D}, E} and F -> G.
        let interner = Interner::new();
        let pips = [
            ("R1C1_A", "R1C1_B"),
            ("R1C1_B", "R1C1_C"),
            ("R1C1_B", "R1C1_D"),
            ("R1C1_A", "R1C1_E"),
            ("R2C2_F", "R2C2_G"),
        ];
        let pins = [
            ("R1C1_A", "src", "Q"),
            ("R1C1_C", "s0", "D"),
            ("R1C1_D", "s1", "D"),
            ("R1C1_E", "s2", "D"),
            ("R2C2_G", "s3", "D"),
            ("R1C1_B", "mid", "X"),
        ];
        let tree = RouteTree::from_net(&net(&pips, &pins), &interner).unwrap();
        let mut fanout = FanoutTable::new();
        for (node, _) in tree.pins() {
            if let Some((_, path)) = tree.walk_from(*node, &mut fanout) {
                let mut seen = std::collections::HashSet::new();
                for pip in &path {
                    assert!(seen.insert(*pip));
                }
                assert!(path.len() <= pips.len());
            }
        }
    }
}
