//! Matching annotation observations to reconstructed arcs.

use pipfit_common::{split_port, EdgeDelays, NameError, PinRef};
use pipfit_route::{ArcTable, Pip};
use pipfit_sdf::InterconnectMap;

/// An observation with a routed path.
#[derive(Debug, Clone)]
pub struct CorrelatedArc<'a> {
    /// Normalized source pin.
    pub src: PinRef,
    /// Normalized sink pin.
    pub dst: PinRef,
    /// Source-to-sink pips of the arc.
    pub path: &'a [Pip],
    /// Observed delay.
    pub delay: EdgeDelays,
}

/// The outcome of correlating one design.
#[derive(Debug, Clone, Default)]
pub struct Correlation<'a> {
    /// Matched observations, in annotation key order.
    pub matched: Vec<CorrelatedArc<'a>>,
    /// Observations with no routed arc, normalized.
    pub dropped: Vec<(PinRef, PinRef)>,
}

/// Normalizes every observation's ports and looks up the routed arc.
///
/// Observations with no arc are set aside in
/// [`dropped`](Correlation::dropped); a port name that cannot be normalized
/// is an error.
pub fn correlate<'a>(
    arcs: &'a ArcTable,
    observations: &InterconnectMap,
) -> Result<Correlation<'a>, NameError> {
    let mut out = Correlation::default();
    for ((from, to), delay) in observations {
        let key = (split_port(from)?, split_port(to)?);
        match arcs.get(&key) {
            Some(path) => out.matched.push(CorrelatedArc {
                src: key.0,
                dst: key.1,
                path,
                delay: *delay,
            }),
            None => out.dropped.push(key),
        }
    }
    Ok(out)
}
