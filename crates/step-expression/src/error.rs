//! The error type returned by the factory and by step expressions.

use step_expression_patterns::{ParameterError, PatternError};
use thiserror::Error;

use crate::convert::ConversionError;
use crate::datatable::DataTableError;

/// Failures raised while building or using a
/// [`StepExpression`](crate::StepExpression).
///
/// None of these are retried; each surfaces to the caller unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StepExpressionError {
    /// A required construction argument was missing or empty.
    #[error("{message}")]
    InvalidArgument {
        /// Which argument was missing.
        message: String,
    },
    /// The step pattern failed to compile.
    #[error("malformed step expression: {0}")]
    MalformedExpression(#[from] PatternError),
    /// No table type is registered under the requested name.
    #[error("data table type `{name}` is not defined")]
    UndefinedTableType {
        /// The name that was looked up.
        name: String,
    },
    /// The raw rows do not form a rectangular grid.
    #[error(transparent)]
    MalformedTable(#[from] DataTableError),
    /// A converter rejected its input or produced an unexpected type.
    #[error(transparent)]
    ConversionFailure(#[from] ConversionError),
}

impl StepExpressionError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<ParameterError> for StepExpressionError {
    fn from(err: ParameterError) -> Self {
        Self::ConversionFailure(ConversionError::Parameter(err))
    }
}
