//! Switch class labels and classifier inputs.

use pipfit_common::{Interner, WireNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A switch class label. Ordered by its string for stable output.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwitchClass(String);

impl SwitchClass {
    /// Creates a class from its label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The class label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SwitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for SwitchClass {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A decomposed wire as seen by a classifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WireRef<'a> {
    /// Tile column.
    pub column: i32,
    /// Tile row.
    pub row: i32,
    /// Local wire name within the tile.
    pub name: &'a str,
}

impl<'a> WireRef<'a> {
    /// Creates a wire reference.
    pub fn new(column: i32, row: i32, name: &'a str) -> Self {
        Self { column, row, name }
    }

    /// Resolves an interned wire node.
    pub fn resolve(node: WireNode, interner: &'a Interner) -> Self {
        Self::new(node.column, node.row, interner.resolve(node.name))
    }
}

/// Switch classes that are zero-delay by definition.
#[derive(Clone, Debug, Default)]
pub struct ZeroDelaySet {
    classes: BTreeSet<SwitchClass>,
}

impl ZeroDelaySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class.
    pub fn insert(&mut self, class: SwitchClass) {
        self.classes.insert(class);
    }

    /// Returns `true` if `class` is zero-delay.
    pub fn contains(&self, class: &SwitchClass) -> bool {
        self.classes.contains(class)
    }

    /// Number of classes in the set.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ZeroDelaySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().map(SwitchClass::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_order_by_label() {
        let mut v = vec![SwitchClass::new("V06"), SwitchClass::new("H02")];
        v.sort();
        assert_eq!(v[0].as_str(), "H02");
        assert_eq!(v[1].to_string(), "V06");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&SwitchClass::new("H01")).unwrap();
        assert_eq!(json, "\"H01\"");
    }

    #[test]
    fn zero_delay_membership() {
        let set: ZeroDelaySet = ["FIXED", "CIBMUX"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&SwitchClass::new("FIXED")));
        assert!(!set.contains(&SwitchClass::new("H02")));
        assert!(ZeroDelaySet::new().is_empty());
    }

    #[test]
    fn wire_ref_resolves_interned_name() {
        let interner = Interner::new();
        let node = WireNode::parse("R3C9_JQ1", &interner).unwrap();
        let wire = WireRef::resolve(node, &interner);
        assert_eq!(wire, WireRef::new(9, 3, "JQ1"));
    }
}
