//! Convert lexed tokens into an anchored regular-expression source.

use crate::errors::{PatternError, placeholder_error};
use crate::expression::ExpressionConfig;
use crate::parameter::{ParameterType, ParameterTypeRegistry};

use super::lexer::{Token, lex_pattern};
use super::placeholder::Placeholder;

/// A placeholder bound to the parameter type its hint resolved to.
#[derive(Debug, Clone)]
pub(crate) struct BoundPlaceholder {
    pub name: String,
    pub parameter_type: ParameterType,
}

/// Regex source plus the placeholders it captures, in pattern order.
#[derive(Debug, Clone)]
pub(crate) struct CompiledPattern {
    pub source: String,
    pub placeholders: Vec<BoundPlaceholder>,
}

fn resolve(
    placeholder: &Placeholder,
    registry: &ParameterTypeRegistry,
    config: ExpressionConfig,
) -> Result<ParameterType, PatternError> {
    let Some(hint) = placeholder.hint.as_deref() else {
        return Ok(ParameterType::text("String"));
    };
    if let Some(parameter_type) = registry.lookup(hint) {
        return Ok(parameter_type.clone());
    }
    if config.strict_parameter_types {
        return Err(PatternError::UndefinedParameterType {
            name: hint.to_owned(),
            position: placeholder.start,
        });
    }
    log::debug!(
        "placeholder `{}` uses unknown hint `{hint}`; capturing it as text",
        placeholder.name
    );
    Ok(ParameterType::text(hint))
}

pub(crate) fn compile_pattern(
    pat: &str,
    registry: &ParameterTypeRegistry,
    config: ExpressionConfig,
) -> Result<CompiledPattern, PatternError> {
    let mut source = String::with_capacity(pat.len().saturating_mul(2) + 2);
    let mut placeholders = Vec::new();
    let mut stray_depth = 0usize;
    source.push('^');

    for token in lex_pattern(pat)? {
        match token {
            Token::Literal(text) => source.push_str(&regex::escape(&text)),
            Token::Placeholder(placeholder) => {
                let parameter_type = resolve(&placeholder, registry, config)?;
                source.push('(');
                source.push_str(parameter_type.regex());
                source.push(')');
                placeholders.push(BoundPlaceholder {
                    name: placeholder.name,
                    parameter_type,
                });
            }
            Token::OpenBrace(_) => {
                stray_depth = stray_depth.saturating_add(1);
                source.push_str(r"\{");
            }
            Token::CloseBrace(index) => {
                stray_depth = stray_depth.checked_sub(1).ok_or_else(|| {
                    placeholder_error("unmatched closing brace '}' in step pattern", index, None)
                })?;
                source.push_str(r"\}");
            }
        }
    }

    if stray_depth != 0 {
        return Err(placeholder_error(
            "unbalanced braces in step pattern",
            pat.len(),
            None,
        ));
    }
    source.push('$');
    Ok(CompiledPattern {
        source,
        placeholders,
    })
}

/// Build an anchored regular expression from a step pattern using the
/// built-in parameter types, capturing unknown hints as text.
///
/// # Errors
/// Returns [`PatternError`] when the pattern has malformed placeholders or
/// unbalanced braces.
///
/// # Examples
/// ```
/// # use step_expression_patterns::build_regex_from_pattern;
/// let regex = build_regex_from_pattern("Given {item}")
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(regex, r"^Given (.+?)$");
/// ```
pub fn build_regex_from_pattern(pat: &str) -> Result<String, PatternError> {
    compile_pattern(
        pat,
        &ParameterTypeRegistry::new(),
        ExpressionConfig::default(),
    )
    .map(|compiled| compiled.source)
}
