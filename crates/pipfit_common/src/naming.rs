//! Identifier normalization shared by the annotation and routing sides.
//!
//! Annotation ports arrive as `cell/pin` strings that may be quoted and carry
//! backslash escapes. Routing wires arrive as `R<row>C<col>_<local>` strings.
//! Both are canonicalized here so the two data sources can be joined.

use crate::error::NameError;
use crate::ident::{Ident, Interner};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strips one layer of surrounding double quotes, then drops every backslash.
///
/// Backslashes are escape markers only: the character after one is kept
/// verbatim and the backslash itself is discarded.
///
/// # Errors
///
/// Returns [`NameError::UnterminatedQuote`] if `raw` opens with a quote that
/// is never closed.
pub fn unescape_name(raw: &str) -> Result<String, NameError> {
    let inner = match raw.strip_prefix('"') {
        Some(rest) => rest
            .strip_suffix('"')
            .ok_or_else(|| NameError::UnterminatedQuote(raw.to_string()))?,
        None => raw,
    };
    Ok(inner.chars().filter(|&c| c != '\\').collect())
}

/// A normalized `(cell, pin)` endpoint of an arc.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PinRef {
    /// Cell (instance) name.
    pub cell: String,
    /// Pin name on that cell.
    pub pin: String,
}

impl PinRef {
    /// Creates a pin reference from already-normalized names.
    pub fn new(cell: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            cell: cell.into(),
            pin: pin.into(),
        }
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.cell, self.pin)
    }
}

/// Splits an annotation port on its first `/` and unescapes both halves.
///
/// A port with no `/` yields an empty pin name.
pub fn split_port(raw: &str) -> Result<PinRef, NameError> {
    let (cell, pin) = raw.split_once('/').unwrap_or((raw, ""));
    Ok(PinRef {
        cell: unescape_name(cell)?,
        pin: unescape_name(pin)?,
    })
}

/// Decomposes a wire name into `(column, row, local_name)`.
///
/// The name is split on its first `_` into a coordinate token and a local
/// name; the coordinate token is split on its first `C` into a row part, whose
/// leading marker letter is dropped, and a column part.
pub fn decompose_wire(raw: &str) -> Result<(i32, i32, &str), NameError> {
    let (rc, local) = raw.split_once('_').unwrap_or((raw, ""));
    let (row_part, col_part) = rc
        .split_once('C')
        .ok_or_else(|| NameError::MissingCoordinate(raw.to_string()))?;
    let bad = |token: &str| NameError::BadCoordinate {
        wire: raw.to_string(),
        token: token.to_string(),
    };
    let mut row_chars = row_part.chars();
    row_chars.next().ok_or_else(|| bad(row_part))?;
    let row_digits = row_chars.as_str();
    let row = row_digits.parse::<i32>().map_err(|_| bad(row_digits))?;
    let column = col_part.parse::<i32>().map_err(|_| bad(col_part))?;
    Ok((column, row, local))
}

/// A routing wire node: tile coordinate plus interned local name.
///
/// Used purely as a map key by the route tree and fanout table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct WireNode {
    /// Tile column.
    pub column: i32,
    /// Tile row.
    pub row: i32,
    /// Interned local wire name within the tile.
    pub name: Ident,
}

impl WireNode {
    /// Parses and interns a raw wire name.
    pub fn parse(raw: &str, interner: &Interner) -> Result<Self, NameError> {
        let (column, row, local) = decompose_wire(raw)?;
        Ok(Self {
            column,
            row,
            name: interner.get_or_intern(local),
        })
    }

    /// Formats the node back into `R<row>C<col>_<local>` form.
    pub fn display(&self, interner: &Interner) -> String {
        format!("R{}C{}_{}", self.row, self.column, interner.resolve(self.name))
    }
}
