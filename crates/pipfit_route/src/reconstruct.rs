//! Per-design arc recovery.

use crate::error::RouteError;
use crate::fanout::FanoutTable;
use crate::source::RoutingSource;
use crate::tree::{DriverConflict, Pip, RouteTree};
use pipfit_common::{Interner, PinRef};
use std::collections::BTreeMap;

/// Reconstructed source-to-sink pip paths keyed by `(source pin, sink pin)`.
///
/// If two walks produce the same key the later one wins.
pub type ArcTable = BTreeMap<(PinRef, PinRef), Vec<Pip>>;

/// A multiply-driven wire found in one net.
#[derive(Debug, Clone)]
pub struct MultiDriver {
    /// The net the conflict was found in.
    pub net: String,
    /// The conflicting pip insertion.
    pub conflict: DriverConflict,
}

/// Everything the model needs from one routed design.
#[derive(Debug, Clone, Default)]
pub struct RoutedDesign {
    /// Design name from the routing source.
    pub name: String,
    /// Number of nets that had routing.
    pub routed_nets: usize,
    /// Recovered arcs.
    pub arcs: ArcTable,
    /// Wire fanout accumulated over every walk in the design.
    pub fanout: FanoutTable,
    /// Driver replacements seen while building the trees.
    pub multi_driven: Vec<MultiDriver>,
}

/// Rebuilds the route tree of every net and walks it from each pin.
///
/// Nets are visited in name order; nets without routing are skipped. The
/// fanout table is shared by all nets of the design.
pub fn reconstruct_design(
    source: &dyn RoutingSource,
    interner: &Interner,
) -> Result<RoutedDesign, RouteError> {
    let mut nets = source.list_nets();
    nets.sort();
    let routing = source.routing(&nets)?;

    let mut design = RoutedDesign {
        name: source.design_name().to_string(),
        ..RoutedDesign::default()
    };

    for net in &nets {
        let Some(net_routing) = routing.get(net) else {
            continue;
        };
        design.routed_nets += 1;
        let tree = RouteTree::from_net(net_routing, interner).map_err(|err| RouteError::Name {
            net: net.clone(),
            source: err,
        })?;
        design
            .multi_driven
            .extend(tree.conflicts().iter().map(|&conflict| MultiDriver {
                net: net.clone(),
                conflict,
            }));
        for (node, sink) in tree.pins() {
            if let Some((src, path)) = tree.walk_from(*node, &mut design.fanout) {
                design.arcs.insert((src.clone(), sink.clone()), path);
            }
        }
    }
    Ok(design)
}
