//! Parameter types: the regex fragment a placeholder hint expands to and the
//! transform that coerces the captured text into a typed value.

use std::any::Any;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;

use crate::errors::{BoxError, ParameterError, PatternError};

/// Type-erased value produced by parameter and table conversions.
pub type Value = Box<dyn Any + Send + Sync>;

type TransformFn = dyn Fn(&str) -> Result<Value, BoxError> + Send + Sync;

const LAZY_TEXT: &str = r".+?";
const UNSIGNED: &str = r"\d+";
const SIGNED: &str = r"[+-]?\d+";
const FLOAT: &str = r"(?i:(?:[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?|nan|inf|infinity))";
const WORD: &str = r"[^\s]+";
const BOOL: &str = r"(?i:true|false)";

/// A named placeholder type.
///
/// # Examples
/// ```
/// use step_expression_patterns::ParameterType;
///
/// let colour = ParameterType::new("colour", "red|green|blue", |raw: &str| {
///     Ok::<_, std::convert::Infallible>(raw.to_uppercase())
/// })
/// .expect("regex is valid");
/// let value = colour.transform("red").expect("transform succeeds");
/// assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("RED"));
/// ```
#[derive(Clone)]
pub struct ParameterType {
    name: String,
    regex: String,
    inner_groups: usize,
    transform: Arc<TransformFn>,
}

impl ParameterType {
    /// Declare a parameter type whose captures are converted with `transform`.
    ///
    /// # Errors
    /// Returns [`PatternError::InvalidParameterRegex`] when `regex` does not
    /// compile on its own.
    pub fn new<T, E, F>(
        name: impl Into<String>,
        regex: impl Into<String>,
        transform: F,
    ) -> Result<Self, PatternError>
    where
        T: Any + Send + Sync,
        E: Into<BoxError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        let name = name.into();
        let regex = regex.into();
        let inner_groups = match Regex::new(&regex) {
            Ok(compiled) => compiled.captures_len().saturating_sub(1),
            Err(source) => return Err(PatternError::InvalidParameterRegex { name, source }),
        };
        Ok(Self {
            name,
            regex,
            inner_groups,
            transform: Arc::new(move |raw: &str| -> Result<Value, BoxError> {
                match transform(raw) {
                    Ok(value) => Ok(Box::new(value)),
                    Err(err) => Err(err.into()),
                }
            }),
        })
    }

    /// Declare a parameter type parsed through [`FromStr`].
    ///
    /// # Errors
    /// Returns [`PatternError::InvalidParameterRegex`] when `regex` does not
    /// compile.
    pub fn parsed<T>(name: impl Into<String>, regex: impl Into<String>) -> Result<Self, PatternError>
    where
        T: FromStr + Any + Send + Sync,
        T::Err: StdError + Send + Sync + 'static,
    {
        Self::new(name, regex, str::parse::<T>)
    }

    fn builtin<T>(name: &str, regex: &'static str) -> Self
    where
        T: FromStr + Any + Send + Sync,
        T::Err: StdError + Send + Sync + 'static,
    {
        Self::trusted(name, regex, |raw| {
            raw.parse::<T>()
                .map(|value| Box::new(value) as Value)
                .map_err(Into::into)
        })
    }

    /// Built-in regexes have no capture groups of their own.
    fn trusted(
        name: &str,
        regex: &'static str,
        transform: impl Fn(&str) -> Result<Value, BoxError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_owned(),
            regex: regex.to_owned(),
            inner_groups: 0,
            transform: Arc::new(transform),
        }
    }

    /// The fallback used for placeholders without a known hint: a lazy match
    /// yielding the captured `String`.
    pub(crate) fn text(name: &str) -> Self {
        Self::trusted(name, LAZY_TEXT, |raw| Ok(Box::new(raw.to_owned()) as Value))
    }

    /// Name referenced by placeholder hints.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Regular-expression fragment substituted for the placeholder.
    #[must_use]
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Number of capture groups the fragment itself declares.
    #[must_use]
    pub fn inner_groups(&self) -> usize {
        self.inner_groups
    }

    /// Coerce a captured substring.
    ///
    /// # Errors
    /// Returns [`ParameterError`] when the transform rejects `raw`.
    pub fn transform(&self, raw: &str) -> Result<Value, ParameterError> {
        (self.transform)(raw).map_err(|source| ParameterError {
            parameter: self.name.clone(),
            value: raw.to_owned(),
            source,
        })
    }
}

impl fmt::Debug for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterType")
            .field("name", &self.name)
            .field("regex", &self.regex)
            .finish_non_exhaustive()
    }
}

/// Lookup table from placeholder hints to [`ParameterType`]s.
///
/// A fresh registry knows the Rust integer and float primitives, `String`,
/// `word` (one run of non-whitespace) and `bool`.
#[derive(Debug, Clone)]
pub struct ParameterTypeRegistry {
    types: HashMap<String, ParameterType>,
}

impl Default for ParameterTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterTypeRegistry {
    /// Create a registry holding the built-in parameter types.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.insert(ParameterType::builtin::<u8>("u8", UNSIGNED));
        registry.insert(ParameterType::builtin::<u16>("u16", UNSIGNED));
        registry.insert(ParameterType::builtin::<u32>("u32", UNSIGNED));
        registry.insert(ParameterType::builtin::<u64>("u64", UNSIGNED));
        registry.insert(ParameterType::builtin::<u128>("u128", UNSIGNED));
        registry.insert(ParameterType::builtin::<usize>("usize", UNSIGNED));
        registry.insert(ParameterType::builtin::<i8>("i8", SIGNED));
        registry.insert(ParameterType::builtin::<i16>("i16", SIGNED));
        registry.insert(ParameterType::builtin::<i32>("i32", SIGNED));
        registry.insert(ParameterType::builtin::<i64>("i64", SIGNED));
        registry.insert(ParameterType::builtin::<i128>("i128", SIGNED));
        registry.insert(ParameterType::builtin::<isize>("isize", SIGNED));
        registry.insert(ParameterType::builtin::<f32>("f32", FLOAT));
        registry.insert(ParameterType::builtin::<f64>("f64", FLOAT));
        registry.insert(ParameterType::text("String"));
        registry.insert(ParameterType::trusted("word", WORD, |raw| {
            Ok(Box::new(raw.to_owned()) as Value)
        }));
        registry.insert(ParameterType::trusted("bool", BOOL, |raw| {
            raw.to_ascii_lowercase()
                .parse::<bool>()
                .map(|value| Box::new(value) as Value)
                .map_err(Into::into)
        }));
        registry
    }

    /// Create a registry without any built-in types.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    fn insert(&mut self, parameter_type: ParameterType) -> Option<ParameterType> {
        self.types
            .insert(parameter_type.name.clone(), parameter_type)
    }

    /// Register `parameter_type`, returning the definition it replaced.
    pub fn define(&mut self, parameter_type: ParameterType) -> Option<ParameterType> {
        let replaced = self.insert(parameter_type);
        if let Some(previous) = &replaced {
            log::warn!(
                "parameter type `{}` was redefined; later expressions use the new definition",
                previous.name
            );
        }
        replaced
    }

    /// Look up a parameter type by hint.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ParameterType> {
        self.types.get(name)
    }

    /// Names of all registered parameter types, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
