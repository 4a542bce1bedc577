//! Format errors raised while normalizing names.

/// A structural mismatch between an identifier and the naming scheme.
///
/// These are always fatal for a run: they mean the input data does not follow
/// the conventions the model relies on, so no partial result is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// A name opens with `"` but does not close with one.
    #[error("unterminated quoted name `{0}`")]
    UnterminatedQuote(String),

    /// A wire name has no `C` separating its row and column.
    #[error("wire `{0}` has no row/column coordinate")]
    MissingCoordinate(String),

    /// A row or column token of a wire name is not an integer.
    #[error("wire `{wire}`: bad coordinate `{token}`")]
    BadCoordinate {
        /// The full wire name being decomposed.
        wire: String,
        /// The offending row or column token.
        token: String,
    },
}
