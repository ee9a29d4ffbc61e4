//! Typed rows parsed out of a [`DataTable`].

use std::ops::Deref;

use super::{DataTable, DataTableError, HeaderSpec, RowSpec};

/// Implemented by record types built from one table row.
pub trait DataTableRow: Sized {
    /// When `true` the first table row is read as a header and excluded from
    /// the parsed rows.
    const REQUIRES_HEADER: bool = false;

    /// Build a record from one row.
    ///
    /// # Errors
    ///
    /// Implementors report missing or unparsable cells as [`DataTableError`].
    fn parse_row(row: RowSpec<'_>) -> Result<Self, DataTableError>;
}

/// Records parsed from every data row of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rows<T>(Vec<T>);

impl<T: DataTableRow> Rows<T> {
    /// Parse every data row of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::MissingHeader`] for an empty table when `T`
    /// expects a header, [`DataTableError::DuplicateHeader`] for repeated
    /// column names, or the first error reported by [`DataTableRow::parse_row`].
    pub fn parse(table: &DataTable) -> Result<Self, DataTableError> {
        let mut rows = table.cells().iter();
        let header = if T::REQUIRES_HEADER {
            let header_row = rows.next().ok_or(DataTableError::MissingHeader)?;
            Some(HeaderSpec::new(header_row)?)
        } else {
            None
        };
        let first_row_number = if header.is_some() { 2 } else { 1 };
        rows.enumerate()
            .map(|(index, cells)| {
                T::parse_row(RowSpec::new(
                    header.as_ref(),
                    first_row_number + index,
                    index,
                    cells,
                ))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl<T> Rows<T> {
    /// Number of parsed rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no data rows were present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The parsed rows as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Iterate over the parsed rows.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Unwrap into the underlying vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T: DataTableRow> TryFrom<&DataTable> for Rows<T> {
    type Error = DataTableError;

    fn try_from(table: &DataTable) -> Result<Self, Self::Error> {
        Self::parse(table)
    }
}

impl<T> Deref for Rows<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> IntoIterator for Rows<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Rows<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
