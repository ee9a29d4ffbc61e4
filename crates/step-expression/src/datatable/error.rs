//! Errors raised by table construction and typed row parsing.

use step_expression_patterns::BoxError;
use thiserror::Error;

/// Failures while building a [`DataTable`](super::DataTable) or parsing its
/// rows.
///
/// Row and column numbers are 1-based and count the header row, matching
/// what a reader sees in the feature file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataTableError {
    /// Rows of the raw grid differ in length.
    #[error("data table row {row_number} has {actual} cells but expected {expected}")]
    UnevenRow {
        /// Row whose width differs from the first row.
        row_number: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// A header row is required but the table has no rows.
    #[error("data table requires a header row")]
    MissingHeader,
    /// The header row repeats a column name.
    #[error("data table header contains duplicate column '{column}'")]
    DuplicateHeader {
        /// Repeated column name.
        column: String,
    },
    /// A named column is absent from the header.
    #[error("data table row {row_number} is missing column '{column}'")]
    MissingColumn {
        /// Row being parsed.
        row_number: usize,
        /// Requested column name.
        column: String,
    },
    /// Positional access went past the end of the row.
    #[error("data table row {row_number} is missing cell {column_index}")]
    MissingCell {
        /// Row being parsed.
        row_number: usize,
        /// Requested column.
        column_index: usize,
    },
    /// A cell parser rejected its input.
    #[error("row {row_number}, column {column_index}{column_label}: {source}")]
    CellParse {
        /// Row being parsed.
        row_number: usize,
        /// Column that failed.
        column_index: usize,
        /// ` (name)` when the table has a header, otherwise empty.
        column_label: String,
        /// Error reported by the parser.
        #[source]
        source: BoxError,
    },
}

impl DataTableError {
    pub(crate) fn cell_parse(
        row_number: usize,
        column_index: usize,
        column_name: Option<&str>,
        source: BoxError,
    ) -> Self {
        Self::CellParse {
            row_number,
            column_index: column_index + 1,
            column_label: column_name
                .map(|name| format!(" ({name})"))
                .unwrap_or_default(),
            source,
        }
    }
}
