//! Named table converters.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use step_expression_patterns::{BoxError, Value};

use crate::convert::ConversionError;
use crate::datatable::{DataTable, DataTableRow};

type TableTransformFn = dyn Fn(Vec<Vec<String>>) -> Result<Value, BoxError> + Send + Sync;

/// A converter registered under a name and looked up by that name when a
/// named-type step expression converts its argument.
///
/// # Examples
/// ```
/// use step_expression::DataTableType;
///
/// let widths = DataTableType::new("widths", |rows: Vec<Vec<String>>| {
///     Ok::<_, std::convert::Infallible>(rows.iter().map(Vec::len).collect::<Vec<_>>())
/// });
/// let value = widths
///     .transform(vec![vec!["a".into(), "b".into()]])
///     .expect("transform succeeds");
/// assert_eq!(value.downcast_ref::<Vec<usize>>(), Some(&vec![2]));
/// ```
#[derive(Clone)]
pub struct DataTableType {
    name: String,
    target: &'static str,
    transform: Arc<TableTransformFn>,
}

impl DataTableType {
    /// Register `transform` under `name`.
    pub fn new<T, E, F>(name: impl Into<String>, transform: F) -> Self
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(Vec<Vec<String>>) -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            target: type_name::<T>(),
            transform: Arc::new(move |rows: Vec<Vec<String>>| -> Result<Value, BoxError> {
                match transform(rows) {
                    Ok(value) => Ok(Box::new(value)),
                    Err(err) => Err(err.into()),
                }
            }),
        }
    }

    /// A named type producing [`Rows<T>`](crate::datatable::Rows).
    pub fn rows<T>(name: impl Into<String>) -> Self
    where
        T: DataTableRow + Send + Sync + 'static,
    {
        Self::new(name, |rows: Vec<Vec<String>>| {
            DataTable::create(rows).and_then(|table| table.as_rows::<T>())
        })
    }

    /// Registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the Rust type the transform produces.
    #[must_use]
    pub fn target_type(&self) -> &'static str {
        self.target
    }

    /// Run the transform over raw rows.
    ///
    /// # Errors
    /// Returns [`ConversionError::Transform`] wrapping the transform's own
    /// error.
    pub fn transform(&self, rows: Vec<Vec<String>>) -> Result<Value, ConversionError> {
        (self.transform)(rows).map_err(|source| ConversionError::Transform {
            type_name: self.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for DataTableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTableType")
            .field("name", &self.name)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
