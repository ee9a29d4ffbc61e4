//! The raw tabular argument grid and typed row parsing over it.

mod error;
mod parsers;
mod rows;
mod spec;
mod table;

pub use error::DataTableError;
pub use parsers::{TrimmedParseError, TruthyBoolError, trimmed, truthy_bool};
pub use rows::{DataTableRow, Rows};
pub use spec::{HeaderSpec, RowSpec};
pub use table::DataTable;
