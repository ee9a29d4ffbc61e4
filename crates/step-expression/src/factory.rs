//! Builds [`StepExpression`]s from patterns and argument type descriptors.
//!
//! Each constructor compiles the pattern through the shared
//! [`TypeRegistry`] and then picks the pair of argument transformers for the
//! requested [`ArgumentConversion`]. Structural conversions bind the
//! registry's converter into the table; named conversions look the type up on
//! every call so that types defined after construction are honoured.

use std::sync::Arc;

use step_expression_patterns::Value;

use crate::convert::StructuralType;
use crate::datatable::DataTable;
use crate::error::StepExpressionError;
use crate::expression::{DocStringTransformer, RawTableTransformer, StepExpression};
use crate::registry::{DataTableType, TypeRegistry};

const MISSING_PATTERN: &str = "expression can not be null";
const MISSING_TYPE: &str = "table or doc-string type can not be null";
const EMPTY_TYPE_NAME: &str = "table or doc-string type name can not be empty";

/// How a step's doc-string and table arguments are converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentConversion {
    /// Doc-strings stay text and tables become a plain [`DataTable`].
    Identity,
    /// Convert to a Rust type through the registry's structural converters.
    Structural {
        /// Requested target type.
        ty: StructuralType,
        /// Swap rows and columns before converting.
        transpose: bool,
    },
    /// Convert with the table type registered under `name`, resolved when
    /// the argument is converted.
    Named {
        /// Registered table type name.
        name: String,
        /// Swap rows and columns of tables before converting. Doc-strings
        /// are never transposed.
        transpose: bool,
    },
}

/// Compiles step patterns into [`StepExpression`]s.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use step_expression::{StepExpressionFactory, StructuralType, TypeRegistry};
///
/// let factory = StepExpressionFactory::new(Arc::new(TypeRegistry::new()));
/// let step = factory
///     .create_typed_expression("the menu", StructuralType::of::<Vec<String>>())
///     .expect("pattern compiles");
/// let dishes: Vec<String> = step
///     .convert_table_argument_as(vec![vec!["soup".into()], vec!["stew".into()]])
///     .expect("table flattens");
/// assert_eq!(dishes, ["soup", "stew"]);
/// ```
#[derive(Debug, Clone)]
pub struct StepExpressionFactory {
    registry: Arc<TypeRegistry>,
}

impl StepExpressionFactory {
    /// A factory compiling and converting through `registry`.
    #[must_use]
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// The registry shared by every expression this factory builds.
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Build an expression whose arguments are left unconverted.
    ///
    /// # Errors
    /// Returns [`StepExpressionError::InvalidArgument`] when `pattern` is
    /// `None`, or [`StepExpressionError::MalformedExpression`] when it does not
    /// compile.
    pub fn create_expression<'p>(
        &self,
        pattern: impl Into<Option<&'p str>>,
    ) -> Result<StepExpression, StepExpressionError> {
        let pattern = pattern
            .into()
            .ok_or_else(|| StepExpressionError::invalid_argument(MISSING_PATTERN))?;
        self.create(pattern, ArgumentConversion::Identity)
    }

    /// Build an expression converting arguments to `ty` without transposing.
    ///
    /// # Errors
    /// As for [`create_transposable_expression`](Self::create_transposable_expression).
    pub fn create_typed_expression<'p>(
        &self,
        pattern: impl Into<Option<&'p str>>,
        ty: impl Into<Option<StructuralType>>,
    ) -> Result<StepExpression, StepExpressionError> {
        self.create_transposable_expression(pattern, ty, false)
    }

    /// Build an expression converting arguments to `ty`.
    ///
    /// # Errors
    /// Returns [`StepExpressionError::InvalidArgument`] when `pattern` or `ty`
    /// is `None`, or [`StepExpressionError::MalformedExpression`] when the
    /// pattern does not compile.
    pub fn create_transposable_expression<'p>(
        &self,
        pattern: impl Into<Option<&'p str>>,
        ty: impl Into<Option<StructuralType>>,
        transpose: bool,
    ) -> Result<StepExpression, StepExpressionError> {
        let pattern = pattern
            .into()
            .ok_or_else(|| StepExpressionError::invalid_argument(MISSING_PATTERN))?;
        let ty = ty
            .into()
            .ok_or_else(|| StepExpressionError::invalid_argument(MISSING_TYPE))?;
        self.create(pattern, ArgumentConversion::Structural { ty, transpose })
    }

    /// Build an expression converting arguments with the table type
    /// registered as `name`.
    ///
    /// The name is resolved each time an argument is converted, so it need
    /// not be registered yet.
    ///
    /// # Errors
    /// Returns [`StepExpressionError::InvalidArgument`] when `pattern` or
    /// `name` is `None` or `name` is empty, or
    /// [`StepExpressionError::MalformedExpression`] when the pattern does not
    /// compile.
    pub fn create_named_expression<'p, 'n>(
        &self,
        pattern: impl Into<Option<&'p str>>,
        name: impl Into<Option<&'n str>>,
        transpose: bool,
    ) -> Result<StepExpression, StepExpressionError> {
        let pattern = pattern
            .into()
            .ok_or_else(|| StepExpressionError::invalid_argument(MISSING_PATTERN))?;
        let name = name
            .into()
            .ok_or_else(|| StepExpressionError::invalid_argument(MISSING_TYPE))?;
        if name.is_empty() {
            return Err(StepExpressionError::invalid_argument(EMPTY_TYPE_NAME));
        }
        self.create(
            pattern,
            ArgumentConversion::Named {
                name: name.to_owned(),
                transpose,
            },
        )
    }

    /// Compile `pattern` and bind the transformers for `conversion`.
    ///
    /// # Errors
    /// Returns [`StepExpressionError::MalformedExpression`] when the pattern
    /// does not compile, or [`StepExpressionError::InvalidArgument`] for a
    /// named conversion with an empty name.
    pub fn create(
        &self,
        pattern: &str,
        conversion: ArgumentConversion,
    ) -> Result<StepExpression, StepExpressionError> {
        if matches!(&conversion, ArgumentConversion::Named { name, .. } if name.is_empty()) {
            return Err(StepExpressionError::invalid_argument(EMPTY_TYPE_NAME));
        }
        let expression = self.registry.compile_expression(pattern)?;
        log::debug!("compiled step expression {pattern:?} with {conversion:?}");
        let (doc_string, table) = match conversion {
            ArgumentConversion::Identity => identity_transformers(),
            ArgumentConversion::Structural { ty, transpose } => {
                self.structural_transformers(ty, transpose)
            }
            ArgumentConversion::Named { name, transpose } => {
                self.named_transformers(name, transpose)
            }
        };
        Ok(StepExpression::new(expression, doc_string, table))
    }

    fn structural_transformers(
        &self,
        ty: StructuralType,
        transpose: bool,
    ) -> (DocStringTransformer, RawTableTransformer) {
        let converter = self.registry.table_converter();
        let table_converter = Arc::clone(&converter);
        let table: RawTableTransformer = Box::new(
            move |rows: Vec<Vec<String>>| -> Result<Value, StepExpressionError> {
                let table = DataTable::create_with_converter(rows, Arc::clone(&table_converter))?;
                Ok(table.convert(ty, transpose)?)
            },
        );
        let doc_string: DocStringTransformer = Box::new(
            move |text: &str| -> Result<Value, StepExpressionError> {
                let table = DataTable::single_cell(text).with_converter(Arc::clone(&converter));
                Ok(table.convert(ty, transpose)?)
            },
        );
        (doc_string, table)
    }

    fn named_transformers(
        &self,
        name: String,
        transpose: bool,
    ) -> (DocStringTransformer, RawTableTransformer) {
        let table_registry = Arc::clone(&self.registry);
        let table_name = name.clone();
        let table: RawTableTransformer = Box::new(
            move |rows: Vec<Vec<String>>| -> Result<Value, StepExpressionError> {
                let table = DataTable::create(rows)?;
                let table_type = resolve(&table_registry, &table_name)?;
                let rows = if transpose {
                    table.transpose().into_cells()
                } else {
                    table.into_cells()
                };
                Ok(table_type.transform(rows)?)
            },
        );
        let registry = Arc::clone(&self.registry);
        let doc_string: DocStringTransformer = Box::new(
            move |text: &str| -> Result<Value, StepExpressionError> {
                let table_type = resolve(&registry, &name)?;
                Ok(table_type.transform(DataTable::single_cell(text).into_cells())?)
            },
        );
        (doc_string, table)
    }
}

fn identity_transformers() -> (DocStringTransformer, RawTableTransformer) {
    let doc_string: DocStringTransformer =
        Box::new(|text: &str| -> Result<Value, StepExpressionError> {
            Ok(Box::new(text.to_owned()))
        });
    let table: RawTableTransformer =
        Box::new(|rows: Vec<Vec<String>>| -> Result<Value, StepExpressionError> {
            Ok(Box::new(DataTable::create(rows)?))
        });
    (doc_string, table)
}

fn resolve(registry: &TypeRegistry, name: &str) -> Result<DataTableType, StepExpressionError> {
    let table_type = registry.lookup_table_type_by_name(name).ok_or_else(|| {
        StepExpressionError::UndefinedTableType {
            name: name.to_owned(),
        }
    })?;
    log::debug!(
        "resolved data table type `{name}` producing `{}`",
        table_type.target_type()
    );
    Ok(table_type)
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests require descriptive panic messages")]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn factory() -> StepExpressionFactory {
        StepExpressionFactory::new(Arc::new(TypeRegistry::new()))
    }

    #[rstest]
    #[case(ArgumentConversion::Identity)]
    #[case(ArgumentConversion::Structural { ty: StructuralType::of::<DataTable>(), transpose: false })]
    #[case(ArgumentConversion::Named { name: "anything".into(), transpose: true })]
    fn malformed_patterns_fail_in_every_mode(
        factory: StepExpressionFactory,
        #[case] conversion: ArgumentConversion,
    ) {
        let Err(err) = factory.create("unbalanced {", conversion) else {
            panic!("unbalanced braces must not compile");
        };
        assert!(matches!(err, StepExpressionError::MalformedExpression(_)));
    }

    #[rstest]
    fn create_rejects_empty_names(factory: StepExpressionFactory) {
        let conversion = ArgumentConversion::Named {
            name: String::new(),
            transpose: false,
        };
        let Err(err) = factory.create("a step", conversion) else {
            panic!("empty names are rejected");
        };
        assert!(matches!(err, StepExpressionError::InvalidArgument { .. }));
    }

    #[rstest]
    fn structural_tables_share_the_registry_converter(factory: StepExpressionFactory) {
        let step = factory
            .create_typed_expression("a table", StructuralType::of::<DataTable>())
            .expect("pattern compiles");
        let table: DataTable = step
            .convert_table_argument_as(vec![vec!["a".into(), "b".into()]])
            .expect("DataTable converts to itself");
        let flattened: Vec<String> = table.convert_to(true).expect("bound converter is kept");
        assert_eq!(flattened, ["a", "b"]);
    }
}
