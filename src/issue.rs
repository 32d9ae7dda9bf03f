//! Warnings about campaign text that will not export the way it looks like
//! it should, and their presentation

use crate::SourceFiles;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::Files;
use color_eyre::Result;
use std::cmp::Ordering;
use std::fmt;
use std::io::Write;
use std::ops::Range;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

/// The label the exporter looks for
pub const TOC_LABEL: &str = "Table of Contents:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// A list item numbered 0 or 10 and up. Contains the number
    UnreformattedListItem(String),

    /// "background:" in some casing other than "Background:". Contains the
    /// text found
    LowercaseBackground(String),

    /// A line that looks like a table of contents marker but is not one.
    /// Contains the line
    MisspelledTableOfContents(String),

    MissingTableOfContents,

    MissingTitle,
}

impl WarningKind {
    /// The name used to allow or deny this warning
    pub fn get_name(&self) -> &'static str {
        match self {
            WarningKind::UnreformattedListItem(_) => "UnreformattedListItem",
            WarningKind::LowercaseBackground(_) => "LowercaseBackground",
            WarningKind::MisspelledTableOfContents(_) => "MisspelledTableOfContents",
            WarningKind::MissingTableOfContents => "MissingTableOfContents",
            WarningKind::MissingTitle => "MissingTitle",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WarningKind::UnreformattedListItem(number) => write!(
                f,
                "List item \"{}.\" will not be turned into a heading",
                number
            ),
            WarningKind::LowercaseBackground(found) => write!(
                f,
                "\"{}\" will not be turned into a Background heading",
                found
            ),
            WarningKind::MisspelledTableOfContents(line) => write!(
                f,
                "\"{}\" is not recognized as a table of contents",
                line
            ),
            WarningKind::MissingTableOfContents => write!(
                f,
                "No table of contents found; only the campaign title will be listed"
            ),
            WarningKind::MissingTitle => write!(f, "Campaign title is empty"),
        }
    }
}

/// A warning and the byte range of the campaign text it refers to, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub span: Option<Range<usize>>,
}

impl Warning {
    pub fn new(kind: WarningKind, span: Option<Range<usize>>) -> Self {
        Warning { kind, span }
    }

    pub fn get_name(&self) -> &'static str {
        self.kind.get_name()
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// A warning that survived filtering. Denied warnings are reported as errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub warning: Warning,
    pub denied: bool,
}

impl Issue {
    fn help_message(&self) -> Option<String> {
        match &self.warning.kind {
            WarningKind::UnreformattedListItem(_) => {
                Some("Only items numbered 1 through 9 become headings".to_string())
            }
            WarningKind::LowercaseBackground(found) => {
                Some(format!("Try replacing {} with Background:", found))
            }
            WarningKind::MisspelledTableOfContents(line) => {
                Some(format!("Try replacing {} with {}", line, TOC_LABEL))
            }
            WarningKind::MissingTableOfContents => Some(format!(
                "Add a line starting with \"{}\" followed by numbered entries",
                TOC_LABEL
            )),
            WarningKind::MissingTitle => None,
        }
    }

    pub fn report(&self, file_id: usize) -> Diagnostic<usize> {
        let diagnostic = if self.denied {
            Diagnostic::error()
        } else {
            Diagnostic::warning()
        }
        .with_message(self.warning.to_string())
        .with_code(self.warning.get_name());

        let labels = self
            .warning
            .span
            .clone()
            .map(|range| vec![Label::primary(file_id, range)])
            .unwrap_or_default();

        let notes = self.help_message().into_iter().collect();

        diagnostic.with_labels(labels).with_notes(notes)
    }
}

/// Drops allowed warnings, marks denied ones, and sorts the rest by position
///
/// `all` may be used in either list. Allowing takes precedence over denying.
/// The returned flag is true if any issue was denied.
pub fn filter_and_sort_issues(
    mut warnings: Vec<Warning>,
    allowed: &[String],
    denied: &[String],
) -> (Vec<Issue>, bool) {
    let mut issues = Vec::new();
    let mut is_err = false;

    let all = "all".to_string();
    let allow_all = allowed.contains(&all);
    let deny_all = denied.contains(&all);
    for warning in warnings.drain(..) {
        let name = warning.get_name().to_string();
        if allow_all || allowed.contains(&name) {
            continue;
        }
        let denied = deny_all || denied.contains(&name);
        if denied {
            is_err = true;
        }
        issues.push(Issue { warning, denied });
    }

    issues.sort_by(|left, right| match (&left.warning.span, &right.warning.span) {
        (None, None) => Ordering::Equal,
        (None, _) => Ordering::Less,
        (_, None) => Ordering::Greater,
        (Some(l), Some(r)) => l.start.cmp(&r.start),
    });

    (issues, is_err)
}

/// Prints an issue on a single line, prefixed with its location
pub fn print_issue(
    issue: &Issue,
    files: &SourceFiles,
    file_id: usize,
    stream: &mut StandardStream,
) -> Result<()> {
    let kind = if issue.denied {
        stream.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        "Error"
    } else {
        stream.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        "Warning"
    };
    write!(stream, "{}: ", kind)?;
    stream.reset()?;

    let name = files.name(file_id).unwrap_or("<input>");
    let location = issue
        .warning
        .span
        .as_ref()
        .and_then(|span| location(files, file_id, span.start));
    match location {
        Some((line, column)) => write!(stream, "{}:{}:{}: ", name, line, column)?,
        None => write!(stream, "{}: ", name)?,
    }
    writeln!(stream, "{} [{}]", issue.warning, issue.warning.get_name())?;
    Ok(())
}

/// One-based line and column of a byte offset. Columns count characters
fn location(files: &SourceFiles, file_id: usize, byte_index: usize) -> Option<(usize, usize)> {
    let line = files.line_index(file_id, byte_index)?;
    let range = files.line_range(file_id, line)?;
    let source = files.source(file_id)?;
    let column = source.get(range.start..byte_index)?.chars().count() + 1;
    Some((line + 1, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warnings() -> Vec<Warning> {
        vec![
            Warning::new(WarningKind::LowercaseBackground("background:".into()), Some(20..31)),
            Warning::new(WarningKind::UnreformattedListItem("10".into()), Some(3..6)),
            Warning::new(WarningKind::MissingTableOfContents, None),
        ]
    }

    fn names(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.warning.get_name()).collect()
    }

    #[test]
    fn sorted_by_position() {
        let (issues, is_err) = filter_and_sort_issues(warnings(), &[], &[]);
        assert!(!is_err);
        assert_eq!(
            names(&issues),
            vec![
                "MissingTableOfContents",
                "UnreformattedListItem",
                "LowercaseBackground"
            ]
        );
        assert!(issues.iter().all(|i| !i.denied));
    }

    #[test]
    fn allow_and_deny() {
        let allowed = vec!["MissingTableOfContents".to_string()];
        let denied = vec!["LowercaseBackground".to_string()];
        let (issues, is_err) = filter_and_sort_issues(warnings(), &allowed, &denied);
        assert!(is_err);
        assert_eq!(names(&issues), vec!["UnreformattedListItem", "LowercaseBackground"]);
        assert!(!issues[0].denied);
        assert!(issues[1].denied);
    }

    #[test]
    fn all() {
        let all = vec!["all".to_string()];
        let (issues, is_err) = filter_and_sort_issues(warnings(), &all, &all);
        assert!(issues.is_empty());
        assert!(!is_err);

        let (issues, is_err) = filter_and_sort_issues(warnings(), &[], &all);
        assert!(is_err);
        assert!(issues.iter().all(|i| i.denied));
    }

    #[test]
    fn columns_count_characters() {
        let mut files = SourceFiles::new();
        let content = "Intro\n\u{e9}p\u{e9}e 10. Ten\nbackground:";
        let id = files.add("campaign.md", content);
        let start = content.find("10.").unwrap();
        assert_eq!(location(&files, id, start), Some((2, 6)));
        let start = content.find("background").unwrap();
        assert_eq!(location(&files, id, start), Some((3, 1)));
        assert_eq!(location(&files, id, 0), Some((1, 1)));
    }

    #[test]
    fn report_has_label_and_note() {
        let issue = Issue {
            warning: Warning::new(WarningKind::UnreformattedListItem("10".into()), Some(3..6)),
            denied: true,
        };
        let diagnostic = issue.report(0);
        assert_eq!(diagnostic.code.as_deref(), Some("UnreformattedListItem"));
        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.labels[0].range, 3..6);
        assert_eq!(diagnostic.notes.len(), 1);

        let issue = Issue {
            warning: Warning::new(WarningKind::MissingTitle, None),
            denied: false,
        };
        let diagnostic = issue.report(0);
        assert!(diagnostic.labels.is_empty());
        assert!(diagnostic.notes.is_empty());
    }
}
