//! Structural conversions every registry starts with.

use std::collections::HashMap;

use crate::convert::ConversionError;
use crate::datatable::DataTable;

pub(super) fn table(table: &DataTable) -> Result<DataTable, ConversionError> {
    Ok(table.clone())
}

pub(super) fn cells(table: &DataTable) -> Result<Vec<Vec<String>>, ConversionError> {
    Ok(table.cells().to_vec())
}

/// Every cell, row by row.
pub(super) fn flattened(table: &DataTable) -> Result<Vec<String>, ConversionError> {
    Ok(table.cells().iter().flatten().cloned().collect())
}

pub(super) fn single_cell(table: &DataTable) -> Result<String, ConversionError> {
    match table.cells() {
        [row] => match row.as_slice() {
            [cell] => Ok(cell.clone()),
            _ => Err(not_single(table)),
        },
        _ => Err(not_single(table)),
    }
}

fn not_single(table: &DataTable) -> ConversionError {
    ConversionError::NotSingleCell {
        height: table.height(),
        width: table.width(),
    }
}

/// One map per data row, keyed by the header row.
pub(super) fn header_maps(
    table: &DataTable,
) -> Result<Vec<HashMap<String, String>>, ConversionError> {
    let Some((header, rows)) = table.cells().split_first() else {
        return Ok(Vec::new());
    };
    Ok(rows
        .iter()
        .map(|row| header.iter().cloned().zip(row.iter().cloned()).collect())
        .collect())
}

/// First column as keys, second as values.
pub(super) fn key_value_map(table: &DataTable) -> Result<HashMap<String, String>, ConversionError> {
    let mut map = HashMap::with_capacity(table.height());
    for row in table.cells() {
        let [key, value] = row.as_slice() else {
            return Err(ConversionError::ColumnCount {
                expected: 2,
                actual: row.len(),
            });
        };
        if map.insert(key.clone(), value.clone()).is_some() {
            return Err(ConversionError::DuplicateKey { key: key.clone() });
        }
    }
    Ok(map)
}
