//! Recipient-list parser for the compose form.
//!
//! Accepts a free-form list separated by spaces, commas, semicolons or tabs.
//! Plain names address users; a leading `@` addresses a group. Both must
//! match the conventional POSIX user-name shape.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecipientError {
    #[error("invalid user name: {0}")]
    InvalidUser(String),
    #[error("invalid group name: {0}")]
    InvalidGroup(String),
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z_]([a-z0-9_-]{0,31}|[a-z0-9_-]{0,30}\$)$")
            .expect("recipient pattern is a valid regex")
    })
}

/// Parse a recipient list, preserving order. An empty input yields an empty
/// list; the first invalid name fails the whole list.
pub fn parse_recipients(text: &str) -> Result<Vec<String>, RecipientError> {
    let separators = |c: char| c == ' ' || c == ',' || c == ';' || c == '\t';
    let trimmed = text.trim_matches(|c: char| separators(c) || c == '\n');

    let mut recipients = Vec::new();
    for name in trimmed.split(separators).filter(|s| !s.is_empty()) {
        match name.strip_prefix('@') {
            Some(group) => {
                if !name_pattern().is_match(group) {
                    return Err(RecipientError::InvalidGroup(name.to_string()));
                }
            }
            None => {
                if !name_pattern().is_match(name) {
                    return Err(RecipientError::InvalidUser(name.to_string()));
                }
            }
        }
        recipients.push(name.to_string());
    }
    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_user() {
        assert_eq!(parse_recipients("alice"), Ok(vec!["alice".to_string()]));
    }

    #[test]
    fn test_mixed_separators_preserve_order() {
        assert_eq!(
            parse_recipients(" alice, bob;\tcarol dave "),
            Ok(vec![
                "alice".to_string(),
                "bob".to_string(),
                "carol".to_string(),
                "dave".to_string(),
            ])
        );
    }

    #[test]
    fn test_groups_keep_their_prefix() {
        assert_eq!(
            parse_recipients("alice @ops"),
            Ok(vec!["alice".to_string(), "@ops".to_string()])
        );
    }

    #[test]
    fn test_empty_input_is_an_empty_list() {
        assert_eq!(parse_recipients(""), Ok(vec![]));
        assert_eq!(parse_recipients(" ,; \t"), Ok(vec![]));
    }

    #[test]
    fn test_invalid_user_name_fails_the_list() {
        assert_eq!(
            parse_recipients("alice 9bob"),
            Err(RecipientError::InvalidUser("9bob".to_string()))
        );
        assert_eq!(
            parse_recipients("Alice"),
            Err(RecipientError::InvalidUser("Alice".to_string()))
        );
    }

    #[test]
    fn test_invalid_group_name_fails_the_list() {
        assert_eq!(
            parse_recipients("@9ops"),
            Err(RecipientError::InvalidGroup("@9ops".to_string()))
        );
    }

    #[test]
    fn test_trailing_dollar_is_allowed() {
        assert_eq!(parse_recipients("svc$"), Ok(vec!["svc$".to_string()]));
    }

    #[test]
    fn test_overlong_name_is_rejected() {
        let name = "a".repeat(33);
        assert_eq!(
            parse_recipients(&name),
            Err(RecipientError::InvalidUser(name))
        );
    }
}
