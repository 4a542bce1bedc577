//! Routed-design input and route-tree reconstruction.
//!
//! A routing source ([`RoutingSource`]) hands out, per net, the raw pip edge
//! list and the pins bound to wire nodes. [`reconstruct_design`] turns that
//! into a sink-to-source [`RouteTree`] per net, walks it from every pin to
//! recover the source-to-sink pip path of each arc, and counts wire fanout
//! along the way.

#![warn(missing_docs)]

pub mod dump;
pub mod error;
pub mod fanout;
pub mod reconstruct;
pub mod source;
pub mod tree;

pub use dump::RouteDump;
pub use error::RouteError;
pub use fanout::FanoutTable;
pub use reconstruct::{reconstruct_design, ArcTable, MultiDriver, RoutedDesign};
pub use source::{NetRouting, RawPin, RoutingSource};
pub use tree::{DriverConflict, Pip, RouteTree};
