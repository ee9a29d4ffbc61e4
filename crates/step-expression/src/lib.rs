//! Core library for `step-expression`.
//!
//! A [`StepExpressionFactory`] turns a step pattern such as
//! `"I have {count:u32} cukes"` into a [`StepExpression`]. The expression
//! matches step text into typed [`Argument`]s and converts the step's
//! doc-string or table argument in one of three ways:
//!
//! - unchanged, as text or a plain [`DataTable`];
//! - into a Rust type through the structural converters of a
//!   [`TypeRegistry`], optionally transposing the table first;
//! - through a [`DataTableType`] registered by name and looked up on every
//!   conversion.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use step_expression::{DataTableType, StepExpressionFactory, TypeRegistry};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let factory = StepExpressionFactory::new(Arc::clone(&registry));
//! let step = factory
//!     .create_named_expression("these totals", "sums", false)
//!     .expect("pattern compiles");
//!
//! registry.define_data_table_type(DataTableType::new("sums", |rows: Vec<Vec<String>>| {
//!     rows.iter()
//!         .map(|row| row.iter().map(|cell| cell.parse::<u32>()).sum::<Result<u32, _>>())
//!         .collect::<Result<Vec<_>, _>>()
//! }));
//!
//! let sums: Vec<u32> = step
//!     .convert_table_argument_as(vec![vec!["1".into(), "2".into()], vec!["3".into(), "4".into()]])
//!     .expect("cells are numbers");
//! assert_eq!(sums, [3, 7]);
//! ```

pub mod config;
mod convert;
pub mod datatable;
mod error;
mod expression;
mod factory;
mod registry;

pub use convert::{ConversionError, StructuralType, TableConverter, downcast_value};
pub use datatable::{DataTable, DataTableError, DataTableRow, Rows};
pub use error::StepExpressionError;
pub use expression::{DocStringTransformer, RawTableTransformer, StepExpression};
pub use factory::{ArgumentConversion, StepExpressionFactory};
pub use registry::{CellMap, DataTableType, TypeRegistry};
pub use step_expression_patterns::{
    Argument, BoxError, Expression, ExpressionConfig, ParameterError, ParameterType,
    ParameterTypeRegistry, PatternError, Value,
};
