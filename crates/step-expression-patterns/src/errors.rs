//! Error types raised while compiling step patterns and coercing captures.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed error returned by user-supplied parameter transforms.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Position and placeholder context for a malformed pattern.
///
/// # Examples
/// ```
/// use step_expression_patterns::PlaceholderErrorInfo;
/// let info = PlaceholderErrorInfo::new("invalid placeholder", 3, Some("value".into()));
/// assert_eq!(info.placeholder.as_deref(), Some("value"));
/// assert_eq!(info.position, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderErrorInfo {
    /// Reason the pattern was rejected.
    pub message: &'static str,
    /// Zero-based byte offset into the pattern.
    pub position: usize,
    /// Placeholder name, when the failure happened inside one.
    pub placeholder: Option<String>,
}

impl PlaceholderErrorInfo {
    /// Describe a failure at `position`, optionally naming the placeholder.
    #[must_use]
    pub fn new(message: &'static str, position: usize, placeholder: Option<String>) -> Self {
        Self {
            message,
            position,
            placeholder,
        }
    }
}

impl fmt::Display for PlaceholderErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)?;
        if let Some(name) = &self.placeholder {
            write!(f, " for placeholder `{name}`")?;
        }
        write!(f, " at byte {} (zero-based)", self.position)
    }
}

/// Errors surfaced while turning a step pattern into an [`Expression`].
///
/// [`Expression`]: crate::Expression
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// Placeholder or brace syntax is malformed.
    #[error("{0}")]
    Placeholder(PlaceholderErrorInfo),
    /// A placeholder names a parameter type nobody registered while strict
    /// parameter types are enabled.
    #[error("undefined parameter type `{name}` at byte {position} (zero-based)")]
    UndefinedParameterType {
        /// Hint text used in the placeholder.
        name: String,
        /// Zero-based byte offset of the placeholder.
        position: usize,
    },
    /// A parameter type was declared with a regular expression that does not
    /// compile.
    #[error("parameter type `{name}` has an invalid regular expression: {source}")]
    InvalidParameterRegex {
        /// Name of the offending parameter type.
        name: String,
        /// Underlying regex failure.
        #[source]
        source: regex::Error,
    },
    /// The generated regular expression failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub(crate) fn placeholder_error(
    message: &'static str,
    position: usize,
    placeholder: Option<String>,
) -> PatternError {
    PatternError::Placeholder(PlaceholderErrorInfo::new(message, position, placeholder))
}

/// Raised when a captured substring cannot be coerced by its parameter type.
#[derive(Debug, Error)]
#[error("cannot convert `{value}` to parameter type `{parameter}`: {source}")]
pub struct ParameterError {
    /// Name of the parameter type that rejected the capture.
    pub parameter: String,
    /// Raw captured text.
    pub value: String,
    /// Error reported by the parameter transform.
    #[source]
    pub source: BoxError,
}
