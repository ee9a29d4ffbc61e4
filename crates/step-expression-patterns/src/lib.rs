//! Step-pattern compilation for `step-expression`.
//!
//! Patterns are plain text with `{name}` or `{name:hint}` placeholders. Each
//! hint names a [`ParameterType`] which supplies the regex fragment for the
//! placeholder and the transform that turns the captured text into a typed
//! value. [`Expression`] ties the compiled regex to those transforms.

mod capture;
mod errors;
mod expression;
mod parameter;
mod pattern;

pub use capture::extract_captured_values;
pub use errors::{BoxError, ParameterError, PatternError, PlaceholderErrorInfo};
pub use expression::{Argument, Expression, ExpressionConfig};
pub use parameter::{ParameterType, ParameterTypeRegistry, Value};
pub use pattern::{build_regex_from_pattern, compile_regex_from_pattern};
