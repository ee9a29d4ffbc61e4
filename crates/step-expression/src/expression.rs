//! A compiled step pattern bound to its argument transformers.

use std::any::Any;
use std::fmt;

use step_expression_patterns::{Argument, Expression, Value};

use crate::convert::downcast_value;
use crate::error::StepExpressionError;

/// Converts the text of a doc-string argument.
pub type DocStringTransformer =
    Box<dyn Fn(&str) -> Result<Value, StepExpressionError> + Send + Sync>;

/// Converts the raw rows of a table argument.
pub type RawTableTransformer =
    Box<dyn Fn(Vec<Vec<String>>) -> Result<Value, StepExpressionError> + Send + Sync>;

/// A step matcher plus the conversions for its doc-string and table
/// arguments.
///
/// Instances are normally built by
/// [`StepExpressionFactory`](crate::StepExpressionFactory) and are immutable
/// afterwards.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use step_expression::{StepExpressionFactory, TypeRegistry};
///
/// let factory = StepExpressionFactory::new(Arc::new(TypeRegistry::new()));
/// let step = factory
///     .create_expression("I eat {count:u32} cukes")
///     .expect("pattern compiles");
/// let arguments = step
///     .match_text("I eat 12 cukes")
///     .expect("12 fits in u32")
///     .expect("text matches");
/// assert_eq!(arguments[0].downcast_ref::<u32>(), Some(&12));
/// ```
pub struct StepExpression {
    expression: Expression,
    doc_string: DocStringTransformer,
    table: RawTableTransformer,
}

impl StepExpression {
    /// Bind `expression` to the given transformers.
    #[must_use]
    pub fn new(
        expression: Expression,
        doc_string: DocStringTransformer,
        table: RawTableTransformer,
    ) -> Self {
        Self {
            expression,
            doc_string,
            table,
        }
    }

    /// The pattern text this step was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.expression.source()
    }

    /// The compiled matcher.
    #[must_use]
    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Match a step's text, returning its typed arguments.
    ///
    /// Returns `Ok(None)` when the text does not match the pattern.
    ///
    /// # Errors
    /// Returns [`StepExpressionError::ConversionFailure`] when a capture
    /// cannot be coerced to its parameter type.
    pub fn match_text(&self, text: &str) -> Result<Option<Vec<Argument>>, StepExpressionError> {
        Ok(self.expression.match_text(text)?)
    }

    /// Convert a doc-string argument.
    ///
    /// # Errors
    /// Returns whatever the bound conversion reports.
    pub fn convert_doc_string(&self, doc_string: &str) -> Result<Value, StepExpressionError> {
        (self.doc_string)(doc_string)
    }

    /// Convert a table argument given as raw rows.
    ///
    /// # Errors
    /// Returns [`StepExpressionError::MalformedTable`] for rows of unequal
    /// length, or whatever the bound conversion reports.
    pub fn convert_table_argument(
        &self,
        rows: Vec<Vec<String>>,
    ) -> Result<Value, StepExpressionError> {
        (self.table)(rows)
    }

    /// Convert a doc-string and downcast the result to `T`.
    ///
    /// # Errors
    /// As for [`convert_doc_string`](Self::convert_doc_string), plus a
    /// conversion failure when the value is not a `T`.
    pub fn convert_doc_string_as<T: Any>(&self, doc_string: &str) -> Result<T, StepExpressionError> {
        Ok(downcast_value(self.convert_doc_string(doc_string)?)?)
    }

    /// Convert a table and downcast the result to `T`.
    ///
    /// # Errors
    /// As for [`convert_table_argument`](Self::convert_table_argument), plus
    /// a conversion failure when the value is not a `T`.
    pub fn convert_table_argument_as<T: Any>(
        &self,
        rows: Vec<Vec<String>>,
    ) -> Result<T, StepExpressionError> {
        Ok(downcast_value(self.convert_table_argument(rows)?)?)
    }
}

impl fmt::Debug for StepExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepExpression")
            .field("pattern", &self.pattern())
            .finish_non_exhaustive()
    }
}
