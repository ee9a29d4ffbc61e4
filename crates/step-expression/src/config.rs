//! Process-wide configuration for expression compilation.
//!
//! The only switch is `strict_parameter_types`, which makes placeholders with
//! an unregistered hint a compile error. It is read from the
//! `STEP_EXPRESSION_STRICT_PARAMETER_TYPES` environment variable and may be
//! overridden in-process.

use std::sync::atomic::{AtomicU8, Ordering};

use step_expression_patterns::ExpressionConfig;

/// Environment variable consulted when no override is set.
pub const STRICT_PARAMETER_TYPES_ENV: &str = "STEP_EXPRESSION_STRICT_PARAMETER_TYPES";

const UNSET: u8 = 0;
const FORCED_OFF: u8 = 1;
const FORCED_ON: u8 = 2;

static STRICT_OVERRIDE: AtomicU8 = AtomicU8::new(UNSET);

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn strict_from_env() -> Option<bool> {
    let value = std::env::var(STRICT_PARAMETER_TYPES_ENV).ok()?;
    let parsed = parse_env_bool(&value);
    if parsed.is_none() {
        log::warn!("ignoring unrecognised {STRICT_PARAMETER_TYPES_ENV} value {value:?}");
    }
    parsed
}

fn strict_override() -> Option<bool> {
    match STRICT_OVERRIDE.load(Ordering::Relaxed) {
        FORCED_OFF => Some(false),
        FORCED_ON => Some(true),
        _ => None,
    }
}

/// Whether unknown placeholder hints are rejected at compile time.
#[must_use]
pub fn strict_parameter_types() -> bool {
    strict_override()
        .or_else(strict_from_env)
        .unwrap_or(false)
}

/// Force the `strict_parameter_types` flag for the current process.
pub fn set_strict_parameter_types(enabled: bool) {
    let state = if enabled { FORCED_ON } else { FORCED_OFF };
    STRICT_OVERRIDE.store(state, Ordering::Relaxed);
}

/// Drop any in-process override, returning to the environment.
pub fn clear_strict_parameter_types_override() {
    STRICT_OVERRIDE.store(UNSET, Ordering::Relaxed);
}

/// Resolve the process-wide compiler configuration.
#[must_use]
pub fn expression_config() -> ExpressionConfig {
    ExpressionConfig {
        strict_parameter_types: strict_parameter_types(),
    }
}
