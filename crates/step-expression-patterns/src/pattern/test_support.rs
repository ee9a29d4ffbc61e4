//! Test helpers for asserting placeholder parser outcomes.
use super::placeholder::{Placeholder, parse_placeholder};
use crate::errors::PatternError;

pub(crate) fn parse_ok(pattern: &str) -> (usize, Placeholder) {
    parse_placeholder(pattern, 0)
        .unwrap_or_else(|err| panic!("placeholder {pattern:?} should parse: {err}"))
}

pub(crate) fn parse_err(pattern: &str) -> PatternError {
    match parse_placeholder(pattern, 0) {
        Ok((_, placeholder)) => panic!("placeholder {pattern:?} should fail, got {placeholder:?}"),
        Err(err) => err,
    }
}
