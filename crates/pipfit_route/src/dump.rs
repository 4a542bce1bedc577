//! JSON route dumps exported from a place-and-route database.
//!
//! ```json
//! { "design": "blinky",
//!   "nets": {
//!     "n1": { "pips": [["R2C3_A", "R2C3_B"]],
//!             "pins": [{ "node": "R2C3_A", "cell": "u0", "pin": "Q" }] },
//!     "n2": null } }
//! ```
//!
//! A net mapped to `null` is listed in the design but carries no routing.

use crate::error::RouteError;
use crate::source::{NetRouting, RawPin, RoutingSource};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A routed design loaded from a JSON dump.
#[derive(Debug, Clone, Default)]
pub struct RouteDump {
    design: String,
    nets: Vec<String>,
    routing: BTreeMap<String, NetRouting>,
}

#[derive(Deserialize)]
struct RawDump {
    #[serde(default)]
    design: Option<String>,
    #[serde(default)]
    nets: BTreeMap<String, Option<RawNet>>,
}

#[derive(Deserialize)]
struct RawNet {
    #[serde(default)]
    pips: Vec<(String, String)>,
    #[serde(default)]
    pins: Vec<RawPin>,
}

impl RouteDump {
    /// Loads a dump from disk. The design name defaults to the file stem.
    pub fn load(path: &Path) -> Result<Self, RouteError> {
        let json = std::fs::read_to_string(path).map_err(|source| RouteError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let fallback = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_json_str(&json, &fallback)
    }

    /// Parses a dump from JSON text, naming it `fallback_name` when the
    /// dump has no `design` field.
    pub fn from_json_str(json: &str, fallback_name: &str) -> Result<Self, RouteError> {
        let raw: RawDump = serde_json::from_str(json)?;
        let mut dump = RouteDump {
            design: raw.design.unwrap_or_else(|| fallback_name.to_string()),
            nets: Vec::with_capacity(raw.nets.len()),
            routing: BTreeMap::new(),
        };
        for (name, net) in raw.nets {
            dump.nets.push(name.clone());
            if let Some(net) = net {
                dump.routing.insert(
                    name,
                    NetRouting {
                        pips: net.pips,
                        pins: net.pins,
                    },
                );
            }
        }
        Ok(dump)
    }

    /// Total number of pips across all routed nets.
    pub fn pip_count(&self) -> usize {
        self.routing.values().map(|n| n.pips.len()).sum()
    }
}

impl RoutingSource for RouteDump {
    fn design_name(&self) -> &str {
        &self.design
    }

    fn list_nets(&self) -> Vec<String> {
        self.nets.clone()
    }

    fn routing(&self, nets: &[String]) -> Result<BTreeMap<String, NetRouting>, RouteError> {
        Ok(nets
            .iter()
            .filter_map(|n| self.routing.get(n).map(|r| (n.clone(), r.clone())))
            .collect())
    }
}
