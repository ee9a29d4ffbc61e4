//! Compiled step expressions and the typed arguments they capture.

use std::any::Any;
use std::fmt;

use regex::Regex;

use crate::capture::select_groups;
use crate::errors::{ParameterError, PatternError};
use crate::parameter::{ParameterType, ParameterTypeRegistry, Value};
use crate::pattern::{BoundPlaceholder, compile_pattern};

/// Switches that change how patterns compile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpressionConfig {
    /// Reject placeholder hints that name no registered parameter type
    /// instead of capturing them as text.
    pub strict_parameter_types: bool,
}

/// One value captured from matched step text.
pub struct Argument {
    name: String,
    parameter_type: String,
    text: String,
    value: Value,
}

impl Argument {
    /// Placeholder name as written in the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the parameter type that produced the value.
    #[must_use]
    pub fn parameter_type(&self) -> &str {
        &self.parameter_type
    }

    /// Raw captured substring.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The coerced value.
    #[must_use]
    pub fn value(&self) -> &(dyn Any + Send + Sync) {
        self.value.as_ref()
    }

    /// Borrow the coerced value as `T`, if that is its type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take ownership of the coerced value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("name", &self.name)
            .field("parameter_type", &self.parameter_type)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
struct Slot {
    name: String,
    parameter_type: ParameterType,
}

/// A step pattern compiled against a [`ParameterTypeRegistry`].
///
/// Parameter types are resolved once, at compile time; later changes to the
/// registry do not affect an existing expression.
///
/// # Examples
/// ```
/// use step_expression_patterns::{Expression, ExpressionConfig, ParameterTypeRegistry};
///
/// let expression = Expression::compile(
///     "I have {count:u32} cukes",
///     &ParameterTypeRegistry::new(),
///     ExpressionConfig::default(),
/// )
/// .expect("pattern compiles");
/// let arguments = expression
///     .match_text("I have 42 cukes")
///     .expect("42 fits in u32")
///     .expect("text matches");
/// assert_eq!(arguments[0].downcast_ref::<u32>(), Some(&42));
/// ```
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    regex: Regex,
    slots: Vec<Slot>,
    groups: Vec<usize>,
}

impl Expression {
    /// Compile `pattern`, resolving placeholder hints through `registry`.
    ///
    /// # Errors
    /// Returns [`PatternError`] for malformed placeholders, unbalanced braces,
    /// undefined hints under strict configuration, or an oversized regex.
    pub fn compile(
        pattern: &str,
        registry: &ParameterTypeRegistry,
        config: ExpressionConfig,
    ) -> Result<Self, PatternError> {
        let compiled = compile_pattern(pattern, registry, config)?;
        let regex = Regex::new(&compiled.source)?;
        let mut groups = Vec::with_capacity(compiled.placeholders.len());
        let mut next_group = 1;
        let slots = compiled
            .placeholders
            .into_iter()
            .map(|BoundPlaceholder { name, parameter_type }| {
                groups.push(next_group);
                next_group += 1 + parameter_type.inner_groups();
                Slot {
                    name,
                    parameter_type,
                }
            })
            .collect();
        Ok(Self {
            source: pattern.to_owned(),
            regex,
            slots,
            groups,
        })
    }

    /// The pattern text this expression was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The anchored regular expression used for matching.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Placeholder names in pattern order.
    #[must_use]
    pub fn parameter_names(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.name.as_str()).collect()
    }

    /// Match `text`, coercing each capture through its parameter type.
    ///
    /// Returns `Ok(None)` when the text does not match.
    ///
    /// # Errors
    /// Returns [`ParameterError`] when a capture matches the placeholder regex
    /// but its parameter type cannot convert it, such as an integer overflow.
    pub fn match_text(&self, text: &str) -> Result<Option<Vec<Argument>>, ParameterError> {
        let Some(captured) = select_groups(&self.regex, text, &self.groups) else {
            return Ok(None);
        };
        self.slots
            .iter()
            .zip(captured)
            .map(|(slot, text)| {
                let value = slot.parameter_type.transform(&text)?;
                Ok(Argument {
                    name: slot.name.clone(),
                    parameter_type: slot.parameter_type.name().to_owned(),
                    text,
                    value,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests require descriptive panic messages")]
mod tests {
    use super::*;
    use crate::errors::BoxError;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> ParameterTypeRegistry {
        ParameterTypeRegistry::new()
    }

    fn compile(pattern: &str, registry: &ParameterTypeRegistry) -> Expression {
        Expression::compile(pattern, registry, ExpressionConfig::default())
            .expect("pattern should compile")
    }

    #[rstest]
    fn returns_none_for_non_matching_text(registry: ParameterTypeRegistry) {
        let expression = compile("I have {n:u32} cukes", &registry);
        let matched = expression
            .match_text("I have many cukes")
            .expect("no coercion happens without a match");
        assert!(matched.is_none());
    }

    #[rstest]
    fn coerces_each_capture(registry: ParameterTypeRegistry) {
        let expression = compile("{who} pays {amount:f64} for {count:i32} {item:word}", &registry);
        let arguments = expression
            .match_text("Alice pays 2.5 for -3 apples")
            .expect("captures coerce")
            .expect("text matches");
        assert_eq!(arguments.len(), 4);
        let [who, amount, count, item] = arguments.as_slice() else {
            panic!("expected four arguments");
        };
        assert_eq!(who.downcast_ref::<String>().map(String::as_str), Some("Alice"));
        assert_eq!(amount.downcast_ref::<f64>(), Some(&2.5));
        assert_eq!(count.downcast_ref::<i32>(), Some(&-3));
        assert_eq!(item.text(), "apples");
        assert_eq!(item.parameter_type(), "word");
        assert_eq!(item.name(), "item");
    }

    #[rstest]
    fn reports_overflow_as_parameter_error(registry: ParameterTypeRegistry) {
        let expression = compile("{n:u8} items", &registry);
        let Err(err) = expression.match_text("300 items") else {
            panic!("300 does not fit in u8");
        };
        assert_eq!(err.parameter, "u8");
        assert_eq!(err.value, "300");
    }

    #[test]
    fn custom_types_with_inner_groups_keep_alignment() {
        let mut registry = ParameterTypeRegistry::new();
        registry.define(
            ParameterType::new("range", r"(\d+)\.\.(\d+)", |raw: &str| -> Result<(u32, u32), BoxError> {
                let (low, high) = raw.split_once("..").ok_or("missing `..`")?;
                Ok((low.parse()?, high.parse()?))
            })
            .expect("regex is valid"),
        );
        let expression = compile("between {span:range} and {label}", &registry);
        let arguments = expression
            .match_text("between 3..9 and done")
            .expect("captures coerce")
            .expect("text matches");
        assert_eq!(arguments.first().and_then(|a| a.downcast_ref::<(u32, u32)>()), Some(&(3, 9)));
        assert_eq!(arguments.get(1).map(Argument::text), Some("done"));
    }

    #[rstest]
    fn exposes_source_and_names(registry: ParameterTypeRegistry) {
        let expression = compile("{a} and {b:u8}", &registry);
        assert_eq!(expression.source(), "{a} and {b:u8}");
        assert_eq!(expression.parameter_names(), vec!["a", "b"]);
        assert_eq!(expression.regex().as_str(), r"^(.+?) and (\d+)$");
    }
}
