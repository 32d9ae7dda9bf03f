//! Reformats numbered-list lines (`1. text`) into Homebrewery syntax

use crate::template::{self, NUMBER};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use std::borrow::Cow;

/// A single digit 1-9, a period, and a space at the start of a line
static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([1-9])\. ").expect("Invalid numbered line regex"));

/// How to rewrite a numbered line
///
/// `prefix` replaces the `<digit>. ` at the start of the line and `suffix` is
/// appended to its end. Both may contain `{{NUMBER}}`, which is replaced with
/// the digit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedFormat {
    pub prefix: String,

    #[serde(default)]
    pub suffix: String,
}

impl NumberedFormat {
    pub fn new<P: Into<String>, S: Into<String>>(prefix: P, suffix: S) -> Self {
        NumberedFormat {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// The format used for numbered lines in the campaign body
    pub fn body() -> Self {
        NumberedFormat::new(template::BODY_NUMBER_PREFIX, template::BODY_NUMBER_SUFFIX)
    }

    /// The format used for numbered lines in the table of contents
    pub fn table_of_contents() -> Self {
        NumberedFormat::new(template::TOC_NUMBER_PREFIX, template::TOC_NUMBER_SUFFIX)
    }

    /// Rewrites every numbered line of `text`, leaving all other lines as
    /// they are
    pub fn apply(&self, text: &str) -> String {
        text.split('\n')
            .map(|line| self.apply_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn apply_line<'a>(&self, line: &'a str) -> Cow<'a, str> {
        match numbered_prefix(line) {
            Some((digit, rest)) => {
                let values = [(NUMBER, digit)];
                Cow::Owned(format!(
                    "{}{}{}",
                    template::interpolate(&self.prefix, &values),
                    rest,
                    template::interpolate(&self.suffix, &values)
                ))
            }
            None => Cow::Borrowed(line),
        }
    }
}

/// Splits a numbered line into its digit and the text after `<digit>. `
///
/// Returns `None` for lines that would be left unchanged, including `0. ` and
/// multi-digit numbers such as `10. `.
pub fn numbered_prefix(line: &str) -> Option<(&str, &str)> {
    NUMBERED_LINE.captures(line).and_then(|caps| {
        let whole = caps.get(0)?;
        let digit = caps.get(1)?;
        Some((digit.as_str(), &line[whole.end()..]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_format() {
        let out = NumberedFormat::body().apply("1. Meet the king");
        assert_eq!(out, "### 1. Meet the king\n");
    }

    #[test]
    fn toc_format() {
        let out = NumberedFormat::table_of_contents().apply("4. The Ruins");
        assert_eq!(out, "  - {{ 4. The Ruins }}");
    }

    #[test]
    fn digit_range() {
        let format = NumberedFormat::body();
        assert_eq!(format.apply("0. text"), "0. text");
        assert_eq!(format.apply("10. text"), "10. text");
        assert_eq!(format.apply("5. text"), "### 5. text\n");
        assert_eq!(format.apply("9. text"), "### 9. text\n");
    }

    #[test]
    fn requires_period_and_space() {
        let format = NumberedFormat::body();
        assert_eq!(format.apply("1.text"), "1.text");
        assert_eq!(format.apply("1) text"), "1) text");
        assert_eq!(format.apply(" 1. text"), " 1. text");
        assert_eq!(format.apply("1."), "1.");
    }

    #[test]
    fn passes_other_lines_through() {
        let input = "Intro\n\nSome text 1. inline\n\n## Heading\n";
        assert_eq!(NumberedFormat::body().apply(input), input);
        assert_eq!(NumberedFormat::table_of_contents().apply(input), input);
        assert_eq!(NumberedFormat::body().apply(""), "");
    }

    #[test]
    fn mixed_lines_keep_empty_lines() {
        let out = NumberedFormat::body().apply("a\n\n2. b\n\nc");
        assert_eq!(out, "a\n\n### 2. b\n\n\nc");
    }

    #[test]
    fn number_in_suffix() {
        let format = NumberedFormat::new("- ", " (#p{{NUMBER}})");
        assert_eq!(format.apply("3. Town"), "- Town (#p3)");
    }

    #[test]
    fn prefix_split() {
        assert_eq!(numbered_prefix("7. Seven"), Some(("7", "Seven")));
        assert_eq!(numbered_prefix("7.  Seven"), Some(("7", " Seven")));
        assert_eq!(numbered_prefix("77. Seven"), None);
    }
}
