//! Checks campaign text for constructs the exporter will leave untouched
//! and reports them based on the given [`Config`]
//!
//! [`Config`]: struct.Config.html

use crate::issue::{self, Warning, WarningKind, TOC_LABEL};
use crate::request::TOC_LABEL as TOC_MARKER;
use crate::Config;
use crate::ExportRequest;
use crate::SourceFiles;
use codespan_reporting::term;
use color_eyre::Result;
use eyre::eyre;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::io::Write;
use termcolor::StandardStream;

/// A numbered line the exporter will not reformat: `0. ` or two or more
/// digits
static UNREFORMATTED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|[0-9]{2,})\. ").expect("Invalid list item regex"));

static BACKGROUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)background:").expect("Invalid background regex"));

/// Collects warnings for the given request
///
/// Spans are byte ranges into `request.main_content`.
pub fn scan(request: &ExportRequest) -> Vec<Warning> {
    let content = request.main_content.as_str();
    let mut warnings = Vec::new();

    if request.campaign_title.trim().is_empty() {
        warnings.push(Warning::new(WarningKind::MissingTitle, None));
    }

    if request.table_of_contents_raw.is_empty() {
        warnings.push(Warning::new(WarningKind::MissingTableOfContents, None));
    }

    for found in BACKGROUND.find_iter(content) {
        if found.as_str() != "Background:" {
            warnings.push(Warning::new(
                WarningKind::LowercaseBackground(found.as_str().to_string()),
                Some(found.range()),
            ));
        }
    }

    let mut offset = 0;
    for line in content.split('\n') {
        if let Some(caps) = UNREFORMATTED_ITEM.captures(line) {
            if let Some(number) = caps.get(1) {
                warnings.push(Warning::new(
                    WarningKind::UnreformattedListItem(number.as_str().to_string()),
                    Some(offset..offset + number.end() + 1),
                ));
            }
        }

        let trimmed = line.trim();
        if trimmed.ends_with(':') && !TOC_MARKER.is_match(trimmed) {
            if let Some(suggestion) = did_you_mean(trimmed, &[TOC_LABEL]).pop() {
                log::debug!("\"{}\" resembles \"{}\"", trimmed, suggestion);
                let start = offset + (line.len() - line.trim_start().len());
                warnings.push(Warning::new(
                    WarningKind::MisspelledTableOfContents(trimmed.to_string()),
                    Some(start..start + trimmed.len()),
                ));
            }
        }

        offset += line.len() + 1;
    }

    warnings
}

/// Lints the given request and writes warnings/errors to the given stream
///
/// Warnings are ignored or promoted to errors as specified in the config.
/// `source_name` is the name shown for the campaign text in diagnostics.
pub fn lint(
    request: &ExportRequest,
    source_name: &str,
    config: &Config,
    stream: &mut StandardStream,
) -> Result<()> {
    let mut files = SourceFiles::new();
    let file_id = files.add(source_name, request.main_content.as_str());

    let (issues, is_err) =
        issue::filter_and_sort_issues(scan(request), &config.allowed, &config.denied);

    if config.compact {
        for issue in &issues {
            issue::print_issue(issue, &files, file_id, stream)?;
        }
    } else {
        let term_config = term::Config::default();
        for issue in &issues {
            let diagnostic = issue.report(file_id);
            term::emit(&mut stream.lock(), &term_config, &files, &diagnostic)?;
        }
    }

    // Force reset of color
    stream.flush()?;

    if is_err {
        Err(eyre!("Failed due to previous errors"))
    } else {
        Ok(())
    }
}

/// Returns the entries of `possible_values` that `v` is probably a typo of,
/// best match last. Comparison ignores case
fn did_you_mean<T, I>(v: &str, possible_values: I) -> Vec<String>
where
    T: AsRef<str>,
    I: IntoIterator<Item = T>,
{
    let v = v.to_lowercase();
    let mut candidates: Vec<(f64, String)> = possible_values
        .into_iter()
        .map(|pv| {
            (
                strsim::jaro_winkler(&v, &pv.as_ref().to_lowercase()),
                pv.as_ref().to_owned(),
            )
        })
        .filter(|(confidence, _)| *confidence > 0.9)
        .collect();
    candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    candidates.into_iter().map(|(_, pv)| pv).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str) -> ExportRequest {
        ExportRequest::from_content(content, "Crown", "x")
    }

    fn kinds(warnings: &[Warning]) -> Vec<&WarningKind> {
        warnings.iter().map(|w| &w.kind).collect()
    }

    #[test]
    fn clean_content() {
        let warnings = scan(&request(
            "Intro\nTable of Contents:\n1. One\n# Start\nBackground:\n2. Two",
        ));
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn unreformatted_items() {
        let content = "Table of Contents:\n9. Nine\n10. Ten\n0. Zero";
        let warnings = scan(&request(content));
        assert_eq!(
            kinds(&warnings),
            vec![
                &WarningKind::UnreformattedListItem("10".into()),
                &WarningKind::UnreformattedListItem("0".into()),
            ]
        );
        let span = warnings[0].span.clone().unwrap();
        assert_eq!(&content[span], "10.");
        let span = warnings[1].span.clone().unwrap();
        assert_eq!(&content[span], "0.");
    }

    #[test]
    fn lowercase_background() {
        let content = "Table of Contents:\nbackground: the war\nBACKGROUND: again\nBackground: fine";
        let warnings = scan(&request(content));
        assert_eq!(warnings.len(), 2);
        let span = warnings[0].span.clone().unwrap();
        assert_eq!(&content[span], "background:");
        assert_eq!(
            warnings[1].kind,
            WarningKind::LowercaseBackground("BACKGROUND:".into())
        );
    }

    #[test]
    fn misspelled_toc() {
        let content = "Intro\n  Table of Content:\n1. One";
        let warnings = scan(&request(content));
        assert_eq!(
            kinds(&warnings),
            vec![
                &WarningKind::MissingTableOfContents,
                &WarningKind::MisspelledTableOfContents("Table of Content:".into()),
            ]
        );
        let span = warnings[1].span.clone().unwrap();
        assert_eq!(&content[span], "Table of Content:");
    }

    #[test]
    fn unrelated_labels_are_fine() {
        let warnings = scan(&request("Table of Contents:\nVillains:\nLocations:\nNotes:"));
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn missing_title() {
        let request = ExportRequest::from_content("Table of Contents:", "  ", "x");
        assert_eq!(kinds(&scan(&request)), vec![&WarningKind::MissingTitle]);
    }

    #[test]
    fn suggestions() {
        assert_eq!(did_you_mean("table of contnets:", &[TOC_LABEL]), vec![TOC_LABEL]);
        assert!(did_you_mean("Background:", &[TOC_LABEL]).is_empty());
    }
}
