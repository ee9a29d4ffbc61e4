//! The immutable raw grid behind table and doc-string arguments.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::convert::{ConversionError, StructuralType, TableConverter, downcast_value};
use step_expression_patterns::Value;

use super::{DataTableError, DataTableRow, Rows};

/// A rectangular grid of text cells.
///
/// A table may carry a [`TableConverter`]; [`convert`](Self::convert) hands
/// the grid to it. Transposing produces a new table sharing the same
/// converter.
///
/// # Examples
/// ```
/// use step_expression::DataTable;
///
/// let table = DataTable::from_rows([["a", "b"], ["c", "d"]]).expect("rows are rectangular");
/// let flipped = table.transpose();
/// assert_eq!(flipped.cell(0, 1), Some("c"));
/// assert_eq!(table.cell(0, 1), Some("b"));
/// ```
#[derive(Clone, Default)]
pub struct DataTable {
    cells: Vec<Vec<String>>,
    converter: Option<Arc<dyn TableConverter>>,
}

fn check_rectangular(rows: &[Vec<String>]) -> Result<(), DataTableError> {
    let Some(expected) = rows.first().map(Vec::len) else {
        return Ok(());
    };
    rows.iter()
        .enumerate()
        .find(|(_, row)| row.len() != expected)
        .map_or(Ok(()), |(index, row)| {
            Err(DataTableError::UnevenRow {
                row_number: index + 1,
                expected,
                actual: row.len(),
            })
        })
}

impl DataTable {
    /// Wrap `rows` in a table without a converter.
    ///
    /// # Errors
    /// Returns [`DataTableError::UnevenRow`] when rows differ in length.
    pub fn create(rows: Vec<Vec<String>>) -> Result<Self, DataTableError> {
        check_rectangular(&rows)?;
        Ok(Self {
            cells: rows,
            converter: None,
        })
    }

    /// Wrap `rows` in a table bound to `converter`.
    ///
    /// # Errors
    /// Returns [`DataTableError::UnevenRow`] when rows differ in length.
    pub fn create_with_converter(
        rows: Vec<Vec<String>>,
        converter: Arc<dyn TableConverter>,
    ) -> Result<Self, DataTableError> {
        let mut table = Self::create(rows)?;
        table.converter = Some(converter);
        Ok(table)
    }

    /// Build a table from anything iterable as rows of string-like cells.
    ///
    /// # Errors
    /// Returns [`DataTableError::UnevenRow`] when rows differ in length.
    pub fn from_rows<R, C>(rows: R) -> Result<Self, DataTableError>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item: Into<String>>,
    {
        Self::create(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// The table holding `text` as its only cell.
    #[must_use]
    pub fn single_cell(text: &str) -> Self {
        Self {
            cells: vec![vec![text.to_owned()]],
            converter: None,
        }
    }

    /// Rebind this table to `converter`.
    #[must_use]
    pub fn with_converter(mut self, converter: Arc<dyn TableConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Rows of cells.
    #[must_use]
    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    /// Take the rows out of the table.
    #[must_use]
    pub fn into_cells(self) -> Vec<Vec<String>> {
        self.cells
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// `true` when the table has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0
    }

    /// Row at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.cells.get(index).map(Vec::as_slice)
    }

    /// Cell at `row`, `column`.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.cells.get(row)?.get(column).map(String::as_str)
    }

    /// A new table with rows and columns swapped.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut columns: Vec<Vec<String>> = (0..self.width())
            .map(|_| Vec::with_capacity(self.height()))
            .collect();
        for row in &self.cells {
            for (column, cell) in columns.iter_mut().zip(row) {
                column.push(cell.clone());
            }
        }
        Self {
            cells: columns,
            converter: self.converter.clone(),
        }
    }

    /// Convert through the bound converter, transposing first when asked.
    ///
    /// # Errors
    /// Returns [`ConversionError::NoConverter`] for an unbound table, or
    /// whatever the converter reports.
    pub fn convert(&self, ty: StructuralType, transpose: bool) -> Result<Value, ConversionError> {
        let converter = self
            .converter
            .as_ref()
            .ok_or_else(|| ConversionError::NoConverter {
                type_name: ty.name().to_owned(),
            })?;
        if transpose {
            converter.convert(&self.transpose(), ty)
        } else {
            converter.convert(self, ty)
        }
    }

    /// Typed form of [`convert`](Self::convert).
    ///
    /// # Errors
    /// As for [`convert`](Self::convert), plus
    /// [`ConversionError::TypeMismatch`] when the converter returns another
    /// type.
    pub fn convert_to<T: Any>(&self, transpose: bool) -> Result<T, ConversionError> {
        downcast_value(self.convert(StructuralType::of::<T>(), transpose)?)
    }

    /// Parse the rows into records.
    ///
    /// # Errors
    /// See [`Rows::parse`].
    pub fn as_rows<T: DataTableRow>(&self) -> Result<Rows<T>, DataTableError> {
        Rows::parse(self)
    }
}

impl PartialEq for DataTable {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for DataTable {}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("cells", &self.cells)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}
