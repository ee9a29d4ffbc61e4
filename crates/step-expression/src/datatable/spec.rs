//! Header and row views handed to [`DataTableRow`](super::DataTableRow)
//! implementations.

use std::error::Error as StdError;

use hashbrown::HashMap;

use super::DataTableError;

/// Column names taken from the first row of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpec {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl HeaderSpec {
    /// Index the supplied header row.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::DuplicateHeader`] when a name repeats.
    pub fn new(header_row: &[String]) -> Result<Self, DataTableError> {
        let mut index = HashMap::with_capacity(header_row.len());
        for (position, column) in header_row.iter().enumerate() {
            if index.insert(column.clone(), position).is_some() {
                return Err(DataTableError::DuplicateHeader {
                    column: column.clone(),
                });
            }
        }
        Ok(Self {
            columns: header_row.to_vec(),
            index,
        })
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// `true` when the header has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column name at `index`.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// All column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of the column called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::MissingColumn`] when no column has that name.
    pub fn require(&self, name: &str, row_number: usize) -> Result<usize, DataTableError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DataTableError::MissingColumn {
                row_number,
                column: name.to_owned(),
            })
    }
}

/// A borrowed data row together with its position and the table header.
#[derive(Debug, Clone, Copy)]
pub struct RowSpec<'t> {
    header: Option<&'t HeaderSpec>,
    row_number: usize,
    index: usize,
    cells: &'t [String],
}

impl<'t> RowSpec<'t> {
    pub(super) fn new(
        header: Option<&'t HeaderSpec>,
        row_number: usize,
        index: usize,
        cells: &'t [String],
    ) -> Self {
        Self {
            header,
            row_number,
            index,
            cells,
        }
    }

    /// 1-based row number within the whole table, header included.
    #[must_use]
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// Zero-based index among data rows.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` for a zero-width row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The raw cells.
    #[must_use]
    pub fn cells(&self) -> &'t [String] {
        self.cells
    }

    /// Cell at `column_index`.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::MissingCell`] when the index is out of range.
    pub fn cell(&self, column_index: usize) -> Result<&'t str, DataTableError> {
        self.cells
            .get(column_index)
            .map(String::as_str)
            .ok_or(DataTableError::MissingCell {
                row_number: self.row_number,
                column_index,
            })
    }

    /// Cell under the header column `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::MissingHeader`] when the row type does not
    /// read a header, or [`DataTableError::MissingColumn`] for unknown names.
    pub fn column(&self, name: &str) -> Result<&'t str, DataTableError> {
        let index = self.column_index(name)?;
        self.cell(index)
    }

    /// Parse the cell at `column_index` with `parser`.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::MissingCell`] or
    /// [`DataTableError::CellParse`].
    pub fn parse_with<F, T, E>(&self, column_index: usize, parser: F) -> Result<T, DataTableError>
    where
        F: FnOnce(&str) -> Result<T, E>,
        E: StdError + Send + Sync + 'static,
    {
        let raw = self.cell(column_index)?;
        parser(raw).map_err(|err| {
            let name = self.header.and_then(|header| header.column(column_index));
            DataTableError::cell_parse(self.row_number, column_index, name, Box::new(err))
        })
    }

    /// Parse the cell under the header column `name` with `parser`.
    ///
    /// # Errors
    ///
    /// Returns [`DataTableError::MissingHeader`],
    /// [`DataTableError::MissingColumn`] or [`DataTableError::CellParse`].
    pub fn parse_column_with<F, T, E>(&self, name: &str, parser: F) -> Result<T, DataTableError>
    where
        F: FnOnce(&str) -> Result<T, E>,
        E: StdError + Send + Sync + 'static,
    {
        let index = self.column_index(name)?;
        self.parse_with(index, parser)
    }

    fn column_index(&self, name: &str) -> Result<usize, DataTableError> {
        self.header
            .ok_or(DataTableError::MissingHeader)?
            .require(name, self.row_number)
    }
}
