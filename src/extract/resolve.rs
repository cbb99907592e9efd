//! Topic to page-number resolution over table-of-contents text.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?\d+(\.\d+)?").expect("valid number regex"))
}

/// Find the page number listed for `topic` in `toc_text`.
///
/// The first line containing `topic` is selected, and the first integer or
/// decimal token on that line is returned, truncated to an integer. No
/// bounds checking happens here; the extraction window clamps later.
pub fn resolve_page(toc_text: &str, topic: &str) -> Result<i64> {
    let (line, number) = resolve_line(toc_text, topic)?;
    log::debug!("Topic {:?} matched TOC line {:?}", topic, line);
    Ok(number)
}

/// Like [`resolve_page`], also returning the matched line.
pub fn resolve_line(toc_text: &str, topic: &str) -> Result<(String, i64)> {
    let topic: String = topic.nfc().collect();
    let toc_text: String = toc_text.nfc().collect();

    // `lines()` accepts both "\n" and "\r\n" endings.
    let line = toc_text
        .lines()
        .find(|line| line.contains(topic.as_str()))
        .ok_or_else(|| Error::TopicNotFound(topic.clone()))?;

    let number = first_number(line).ok_or_else(|| Error::PageNumberMissing {
        topic: topic.clone(),
        line: line.to_string(),
    })?;

    Ok((line.to_string(), number))
}

/// First numeric token of `line`, truncated toward zero.
fn first_number(line: &str) -> Option<i64> {
    let token = number_pattern().find(line)?.as_str();
    match token.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => token.parse::<f64>().ok().map(|f| f.trunc() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOC: &str = "Intro ....... 5\nComputer Science ....... 42\n";

    #[test]
    fn test_resolves_listed_topic() {
        assert_eq!(resolve_page(TOC, "Computer Science").unwrap(), 42);
        assert_eq!(resolve_page(TOC, "Intro").unwrap(), 5);
    }

    #[test]
    fn test_absent_topic() {
        let err = resolve_page(TOC, "Biology").unwrap_err();
        assert!(matches!(err, Error::TopicNotFound(ref t) if t == "Biology"));
    }

    #[test]
    fn test_line_without_number() {
        let toc = "Faculty of Arts\nHistory ..... 12\n";
        let err = resolve_page(toc, "Arts").unwrap_err();
        assert!(matches!(err, Error::PageNumberMissing { .. }));
    }

    #[test]
    fn test_first_matching_line_wins() {
        // Substring match: "Science" also appears in the first line.
        let toc = "Political Science 17\nScience 30\n";
        assert_eq!(resolve_page(toc, "Science").unwrap(), 17);
    }

    #[test]
    fn test_first_number_on_line_wins() {
        let toc = "Engineering 2024 edition 88\n";
        assert_eq!(resolve_page(toc, "Engineering").unwrap(), 2024);
    }

    #[test]
    fn test_crlf_and_decimal_tokens() {
        let toc = "Intro 3\r\nStatistics ...... 12.5\r\n";
        let (line, page) = resolve_line(toc, "Statistics").unwrap();
        assert_eq!(page, 12);
        assert!(!line.ends_with('\r'));
    }

    #[test]
    fn test_negative_token_is_returned_as_is() {
        assert_eq!(resolve_page("Errata -3\n", "Errata").unwrap(), -3);
    }

    #[test]
    fn test_hebrew_line() {
        let toc = "תוכן העניינים\nמדעי המחשב ......... 118\n";
        assert_eq!(resolve_page(toc, "מדעי המחשב").unwrap(), 118);
    }

    #[test]
    fn test_oversized_token_truncates() {
        let toc = "Huge 99999999999999999999\n";
        assert!(resolve_page(toc, "Huge").is_ok());
    }
}
