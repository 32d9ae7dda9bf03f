//! The inputs to a Homebrewery export and how they are derived from raw
//! campaign text

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Case-insensitive table of contents marker
pub(crate) static TOC_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)table of contents:").expect("Invalid table of contents regex"));

/// Everything the generator needs for one export
///
/// Serialized with the camelCase names a web client sends. Missing fields are
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportRequest {
    /// The full body text of the campaign
    pub main_content: String,

    /// Used in the header and footer, and as the table of contents heading
    pub campaign_title: String,

    /// Short line shown under the title and in the concept note
    pub concept_header: String,

    /// The table of contents section of `main_content`, or empty
    pub table_of_contents_raw: String,
}

impl ExportRequest {
    /// Builds a request from raw campaign text, deriving the concept header
    /// and the table of contents from it
    pub fn from_content<C, T>(main_content: C, campaign_title: T, placeholder: &str) -> Self
    where
        C: Into<String>,
        T: Into<String>,
    {
        let main_content = main_content.into();
        let concept_header = extract_concept_header(&main_content, placeholder);
        let table_of_contents_raw = extract_table_of_contents(&main_content).to_string();

        ExportRequest {
            main_content,
            campaign_title: campaign_title.into(),
            concept_header,
            table_of_contents_raw,
        }
    }

    pub fn with_concept_header<S: Into<String>>(mut self, concept_header: S) -> Self {
        self.concept_header = concept_header.into();
        self
    }

    pub fn with_campaign_title<S: Into<String>>(mut self, campaign_title: S) -> Self {
        self.campaign_title = campaign_title.into();
        self
    }
}

/// The first non-blank line of `content`, trimmed, or `placeholder`
pub fn extract_concept_header(content: &str, placeholder: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

/// The slice of `content` from the first "Table of Contents:" (any case) up
/// to the next "\n#", or to the end when there is no such boundary
///
/// Empty when `content` has no marker.
pub fn extract_table_of_contents(content: &str) -> &str {
    let marker = match TOC_LABEL.find(content) {
        Some(marker) => marker,
        None => return "",
    };

    let end = content[marker.end()..]
        .find("\n#")
        .map(|pos| marker.end() + pos)
        .unwrap_or_else(|| content.len());

    &content[marker.start()..end]
}
