//! The routing-query interface.

use crate::error::RouteError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A pin bound to a wire node, with raw (unparsed) names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPin {
    /// Raw wire name the pin sits on, e.g. `R2C3_JA0`.
    pub node: String,
    /// Cell (instance) name.
    pub cell: String,
    /// Pin name on the cell.
    pub pin: String,
}

/// The routing of one net as reported by the design database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetRouting {
    /// Directed pips as raw `(source wire, destination wire)` names.
    #[serde(default)]
    pub pips: Vec<(String, String)>,
    /// Pins bound to wire nodes of this net.
    #[serde(default)]
    pub pins: Vec<RawPin>,
}

/// A routed design database that can be queried net by net.
pub trait RoutingSource {
    /// A human-readable name for the design, used in diagnostics.
    fn design_name(&self) -> &str;

    /// Names of every net in the design.
    fn list_nets(&self) -> Vec<String>;

    /// Returns the routing of the requested nets.
    ///
    /// Nets that have no routing are absent from the result.
    fn routing(&self, nets: &[String]) -> Result<BTreeMap<String, NetRouting>, RouteError>;
}
