//! Standard Delay Format reader for interconnect delay annotations.
//!
//! Only what the delay fit consumes is modeled: the per-cell `INTERCONNECT`
//! entries with their rising/falling `(min:typ:max)` values. Everything else
//! in the file (IOPATH, TIMINGCHECK, header fields other than `DESIGN` and
//! `TIMESCALE`) is skipped structurally.
//!
//! Port names are kept exactly as written, quotes and backslashes included,
//! so that normalization happens in one place on the consumer side.
//!
//! # Usage
//!
//! ```ignore
//! let sdf = pipfit_sdf::SdfFile::parse_file(Path::new("design.sdf"))?;
//! if let Some(delays) = sdf.interconnects("top") {
//!     for ((from, to), edge) in &delays {
//!         println!("{from} -> {to}: {}", edge.collapse().max);
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
mod lexer;
mod parse;

pub use error::SdfError;

use pipfit_common::EdgeDelays;
use std::collections::BTreeMap;
use std::path::Path;

/// Interconnect delays of one cell, keyed by raw `(source, destination)` port.
pub type InterconnectMap = BTreeMap<(String, String), EdgeDelays>;

/// A parsed SDF file.
#[derive(Debug, Clone, Default)]
pub struct SdfFile {
    /// Contents of the `DESIGN` header, if present.
    pub design: Option<String>,
    /// Picoseconds per file time unit.
    pub timescale_ps: f64,
    /// Cells in file order.
    pub cells: Vec<SdfCell>,
}

/// One `CELL` block.
#[derive(Debug, Clone, Default)]
pub struct SdfCell {
    /// The `CELLTYPE`, unquoted.
    pub celltype: String,
    /// The `INSTANCE` path, or `None` for an empty or wildcard instance.
    pub instance: Option<String>,
    /// Interconnect delays, in picoseconds. A repeated port pair keeps the
    /// last entry.
    pub interconnects: InterconnectMap,
}

impl SdfFile {
    /// Parses an SDF file from disk.
    pub fn parse_file(path: &Path) -> Result<Self, SdfError> {
        let content = std::fs::read_to_string(path).map_err(|source| SdfError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_str(&content)
    }

    /// Parses SDF text.
    pub fn parse_str(input: &str) -> Result<Self, SdfError> {
        parse::Parser::new(input).parse()
    }

    /// Collects the interconnect delays of the named scope.
    ///
    /// Cells whose `CELLTYPE` equals `scope` are merged in file order; if
    /// there are none, cells whose `INSTANCE` equals `scope` are used instead.
    /// Returns `None` when no cell matches either way.
    pub fn interconnects(&self, scope: &str) -> Option<InterconnectMap> {
        let by_type: Vec<&SdfCell> = self.cells.iter().filter(|c| c.celltype == scope).collect();
        let matched = if by_type.is_empty() {
            self.cells
                .iter()
                .filter(|c| c.instance.as_deref() == Some(scope))
                .collect()
        } else {
            by_type
        };
        if matched.is_empty() {
            return None;
        }
        let mut merged = InterconnectMap::new();
        for cell in matched {
            merged.extend(
                cell.interconnects
                    .iter()
                    .map(|(k, v)| (k.clone(), *v)),
            );
        }
        Some(merged)
    }

    /// Total number of interconnect entries across all cells.
    pub fn interconnect_count(&self) -> usize {
        self.cells.iter().map(|c| c.interconnects.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CELLS: &str = r#"
(DELAYFILE
  (SDFVERSION "3.0")
  (DESIGN "blinky")
  (TIMESCALE 1ps)
  (CELL (CELLTYPE "top") (INSTANCE)
    (DELAY (ABSOLUTE
      (INTERCONNECT u0/Q u1/A (10:20:30) (11:21:31))
    ))
  )
  (CELL (CELLTYPE "top") (INSTANCE)
    (DELAY (ABSOLUTE
      (INTERCONNECT u1/Z u2/B (5))
    ))
  )
  (CELL (CELLTYPE "SLICE") (INSTANCE u9)
    (DELAY (ABSOLUTE
      (INTERCONNECT a/Q b/A (1))
    ))
  )
)
"#;

    #[test]
    fn scope_by_celltype_merges_cells() {
        let sdf = SdfFile::parse_str(TWO_CELLS).unwrap();
        assert_eq!(sdf.design.as_deref(), Some("blinky"));
        let top = sdf.interconnects("top").unwrap();
        assert_eq!(top.len(), 2);
        let e = top[&("u0/Q".to_string(), "u1/A".to_string())];
        assert_eq!(e.rising.max, 30.0);
        assert_eq!(e.falling.min, 11.0);
    }

    #[test]
    fn scope_falls_back_to_instance() {
        let sdf = SdfFile::parse_str(TWO_CELLS).unwrap();
        let cell = sdf.interconnects("u9").unwrap();
        assert_eq!(cell.len(), 1);
    }

    #[test]
    fn unknown_scope() {
        let sdf = SdfFile::parse_str(TWO_CELLS).unwrap();
        assert!(sdf.interconnects("nope").is_none());
        assert_eq!(sdf.interconnect_count(), 3);
    }

    #[test]
    fn parse_file_missing() {
        let err = SdfFile::parse_file(Path::new("/nonexistent/x.sdf")).unwrap_err();
        assert!(matches!(err, SdfError::Io { .. }));
    }

    #[test]
    fn parse_file_from_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("d.sdf");
        std::fs::write(&path, TWO_CELLS).unwrap();
        let sdf = SdfFile::parse_file(&path).unwrap();
        assert_eq!(sdf.cells.len(), 3);
    }
}
