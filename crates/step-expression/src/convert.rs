//! Structural type descriptors and the converter contract tables use.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use step_expression_patterns::{BoxError, ParameterError, Value};
use thiserror::Error;

use crate::datatable::{DataTable, DataTableError};

/// Identifies a Rust type a table can be converted into.
///
/// Equality and hashing use the [`TypeId`] only; the name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct StructuralType {
    id: TypeId,
    name: &'static str,
}

impl StructuralType {
    /// Descriptor for `T`.
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The described type's [`TypeId`].
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The described type's name as reported by [`type_name`].
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// `true` when this describes `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for StructuralType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StructuralType {}

impl Hash for StructuralType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for StructuralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructuralType").field(&self.name).finish()
    }
}

impl fmt::Display for StructuralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Converts a whole table into a value of a requested structural type.
///
/// Implementations must be safe to call from several threads at once.
pub trait TableConverter: Send + Sync {
    /// Convert `table` into a value of type `ty`.
    ///
    /// # Errors
    /// Returns [`ConversionError`] when `ty` is unsupported or the cells do
    /// not fit it.
    fn convert(&self, table: &DataTable, ty: StructuralType) -> Result<Value, ConversionError>;
}

/// A converter rejected its input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// Nothing knows how to build the requested type.
    #[error("no table converter registered for `{type_name}`")]
    NoConverter {
        /// Requested type.
        type_name: String,
    },
    /// A single value was requested from a table with more or fewer cells.
    #[error("expected a single cell but the table is {height}x{width}")]
    NotSingleCell {
        /// Rows in the table.
        height: usize,
        /// Columns in the table.
        width: usize,
    },
    /// The table has the wrong number of columns for the requested shape.
    #[error("expected {expected} columns but the table has {actual}")]
    ColumnCount {
        /// Columns the conversion needs.
        expected: usize,
        /// Columns present.
        actual: usize,
    },
    /// A key column repeats a value.
    #[error("duplicate key '{key}' in table")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
    /// The converted value is of a different type than the caller asked for.
    #[error("converted value is not a `{expected}`")]
    TypeMismatch {
        /// Type the caller asked for.
        expected: &'static str,
    },
    /// Typed row parsing failed.
    #[error(transparent)]
    Table(#[from] DataTableError),
    /// A captured step argument could not be coerced.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    /// A user-supplied transform failed.
    #[error("cannot convert table to `{type_name}`: {source}")]
    Transform {
        /// Type or registered name being produced.
        type_name: String,
        /// Error returned by the transform.
        #[source]
        source: BoxError,
    },
}

/// Unbox a conversion result as `T`.
///
/// # Errors
/// Returns [`ConversionError::TypeMismatch`] when the value holds another
/// type.
pub fn downcast_value<T: Any>(value: Value) -> Result<T, ConversionError> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| ConversionError::TypeMismatch {
            expected: type_name::<T>(),
        })
}
