//! Regex capture helpers.

use regex::Regex;

/// Collect the text of each listed capture group when `text` matches `re`.
///
/// Groups that did not participate yield empty strings so positions stay
/// aligned with `groups`.
pub(crate) fn select_groups(re: &Regex, text: &str, groups: &[usize]) -> Option<Vec<String>> {
    let captures = re.captures(text)?;
    Some(
        groups
            .iter()
            .map(|&group| {
                captures
                    .get(group)
                    .map_or_else(String::new, |m| m.as_str().to_owned())
            })
            .collect(),
    )
}

/// Extract every capture group when `text` matches `re`, returning `None`
/// otherwise.
///
/// Group 0 (the whole match) is skipped.
///
/// # Examples
/// ```
/// # use regex::Regex;
/// # use step_expression_patterns::extract_captured_values;
/// let regex = Regex::new(r"^(\d+)-(\w+)$")
///     .expect("example ensures fallible call succeeds");
/// let values = extract_captured_values(&regex, "42-answer")
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(values, vec!["42".to_string(), "answer".to_string()]);
/// assert!(extract_captured_values(&regex, "nope").is_none());
/// ```
#[must_use]
pub fn extract_captured_values(re: &Regex, text: &str) -> Option<Vec<String>> {
    let groups: Vec<usize> = (1..re.captures_len()).collect();
    select_groups(re, text, &groups)
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require descriptive panic messages"
)]
mod tests {
    use super::*;

    #[test]
    fn returns_none_when_pattern_does_not_match() {
        let regex = Regex::new(r"^(\d+)$").expect("test regex must compile");
        assert!(extract_captured_values(&regex, "nope").is_none());
    }

    #[test]
    fn supports_empty_optional_groups() {
        let regex = Regex::new(r"^(a)?(b)?$").expect("test regex must compile");
        let captures = extract_captured_values(&regex, "a").expect("`a` matches");
        assert_eq!(captures, vec![String::from("a"), String::new()]);
    }

    #[test]
    fn selects_only_requested_groups() {
        let regex = Regex::new(r"^((\w)\w*) and (\d+)$").expect("test regex must compile");
        let captures = select_groups(&regex, "apple and 7", &[1, 3]).expect("text matches");
        assert_eq!(captures, vec![String::from("apple"), String::from("7")]);
    }
}
