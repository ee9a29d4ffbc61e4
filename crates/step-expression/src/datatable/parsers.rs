//! Cell parsers for use with [`RowSpec::parse_with`](super::RowSpec::parse_with).

use std::error::Error as StdError;
use std::str::FromStr;

use thiserror::Error;

/// Parses yes/no style booleans.
///
/// # Examples
/// ```
/// # use step_expression::datatable::truthy_bool;
/// assert_eq!(truthy_bool(" Yes ").ok(), Some(true));
/// assert_eq!(truthy_bool("0").ok(), Some(false));
/// ```
///
/// # Errors
///
/// Returns [`TruthyBoolError`] when the input is not a recognised form.
pub fn truthy_bool(value: &str) -> Result<bool, TruthyBoolError> {
    let normalised = value.trim().to_ascii_lowercase();
    match normalised.as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        _ => Err(TruthyBoolError { value: normalised }),
    }
}

/// Returned when [`truthy_bool`] cannot classify a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised boolean value '{value}' (expected yes/y/true/1 or no/n/false/0)")]
pub struct TruthyBoolError {
    value: String,
}

/// Parses a value with [`FromStr`] after trimming surrounding whitespace.
///
/// # Examples
/// ```
/// # use step_expression::datatable::trimmed;
/// let value: i32 = trimmed(" 42 ").expect("42 parses");
/// assert_eq!(value, 42);
/// ```
///
/// # Errors
///
/// Returns [`TrimmedParseError`] wrapping the inner parser failure.
pub fn trimmed<T>(value: &str) -> Result<T, TrimmedParseError<T::Err>>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    value.trim().parse().map_err(TrimmedParseError)
}

/// Returned when [`trimmed`] fails to parse the value.
#[derive(Debug, Error)]
#[error("failed to parse trimmed value: {0}")]
pub struct TrimmedParseError<E: StdError + 'static>(#[source] E);
