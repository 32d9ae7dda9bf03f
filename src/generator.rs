//! Assembles a Homebrewery document from an [`ExportRequest`]
//!
//! [`ExportRequest`]: ../struct.ExportRequest.html

use crate::request::TOC_LABEL;
use crate::template::{interpolate, CAMPAIGN_TITLE, CONCEPT_HEADER};
use crate::ExportRequest;
use crate::Theme;

use regex::NoExpand;

/// Converts export requests into Homebrewery Markdown using a [`Theme`]
///
/// Generation is pure: the same request and theme always produce the same
/// document, and nothing is retained between calls.
///
/// [`Theme`]: struct.Theme.html
#[derive(Debug, Clone, Default)]
pub struct Generator {
    theme: Theme,
}

impl Generator {
    pub fn new(theme: Theme) -> Self {
        Generator { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Produces the full document for `request`
    pub fn generate(&self, request: &ExportRequest) -> String {
        let theme = &self.theme;
        let title = request.campaign_title.as_str();
        let concept = request.concept_header.as_str();

        let parts = [
            interpolate(
                &theme.page_header,
                &[(CAMPAIGN_TITLE, title), (CONCEPT_HEADER, concept)],
            ),
            theme.title_page_style.clone(),
            theme.background_image.clone(),
            theme.stain_image.clone(),
            theme.page_break.clone(),
            theme.page_number.clone(),
            interpolate(&theme.footnote, &[(CAMPAIGN_TITLE, title)]),
            interpolate(&theme.concept_note, &[(CONCEPT_HEADER, concept)]),
            self.table_of_contents(&request.table_of_contents_raw, title),
            theme.campaign_heading.clone(),
            self.body(&request.main_content),
        ];

        let document = parts.concat();
        log::debug!(
            "Generated {} bytes for \"{}\" with theme {}",
            document.len(),
            title,
            theme.name
        );
        document
    }

    /// Replaces "Background:" with the background heading, then rewrites
    /// numbered lines
    pub fn body(&self, main_content: &str) -> String {
        let content = main_content.replace("Background:", &self.theme.background_heading);
        self.theme.body_numbering.apply(&content)
    }

    /// Builds the table of contents block
    ///
    /// Without a raw table of contents the block holds only the campaign
    /// title. The heading replaces the first "Table of Contents:" label, or
    /// is put in front when there is none, so the block is always opened
    /// exactly once. Later labels are dropped.
    pub fn table_of_contents(&self, raw: &str, campaign_title: &str) -> String {
        let heading = interpolate(&self.theme.toc_heading, &[(CAMPAIGN_TITLE, campaign_title)]);

        if raw.is_empty() {
            return format!("{}{}", heading, self.theme.toc_close);
        }

        let toc = match TOC_LABEL.find(raw) {
            Some(label) => format!(
                "{}{}{}",
                &raw[..label.start()],
                heading,
                TOC_LABEL.replace_all(&raw[label.end()..], NoExpand(""))
            ),
            None => format!("{}{}", heading, raw),
        };
        let toc = toc.replace("\\n", "\n");
        format!("{}{}", self.theme.toc_numbering.apply(&toc), self.theme.toc_close)
    }
}

/// Generates a Homebrewery document with the built-in theme
pub fn generate_homebrewery_markdown(request: &ExportRequest) -> String {
    Generator::default().generate(request)
}
