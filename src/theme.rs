use crate::template;
use crate::NumberedFormat;

use serde::{Deserialize, Serialize};

use color_eyre::Result;
use eyre::WrapErr;

use json_comments::StripComments;

use std::fs::File;
use std::path::Path;

/// The template strings a [`Generator`] assembles a document from
///
/// Every field falls back to the built-in Homebrewery fragment when a theme
/// file leaves it out.
///
/// [`Generator`]: struct.Generator.html
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    // name: Shown in status output. Defaults to "homebrewery"
    pub name: String,

    // page_header: Title page heading. Takes {{CAMPAIGN_TITLE}} and
    // {{CONCEPT_HEADER}}
    pub page_header: String,

    // title_page_style: <style> block for the title page
    pub title_page_style: String,

    // background_image: Full-page background image for the title page
    pub background_image: String,

    // stain_image: Decorative stain on the title page
    pub stain_image: String,

    // page_break: Ends the title page
    pub page_break: String,

    // page_number: Page number marker for the second page
    pub page_number: String,

    // footnote: Page footer. Takes {{CAMPAIGN_TITLE}}
    pub footnote: String,

    // concept_note: Note block. Takes {{CONCEPT_HEADER}}
    pub concept_note: String,

    // toc_heading: Opens the table of contents. Takes {{CAMPAIGN_TITLE}}
    pub toc_heading: String,

    // toc_close: Closes the table of contents
    pub toc_close: String,

    // campaign_heading: Precedes the campaign body
    pub campaign_heading: String,

    // background_heading: Replaces every "Background:" in the body
    pub background_heading: String,

    // body_numbering: Rewrites "1. " lines in the body
    pub body_numbering: NumberedFormat,

    // toc_numbering: Rewrites "1. " lines in the table of contents
    pub toc_numbering: NumberedFormat,

    // concept_placeholder: Concept header used when the content has no
    // non-blank line
    pub concept_placeholder: String,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            name: "homebrewery".to_string(),
            page_header: template::PAGE_HEADER.to_string(),
            title_page_style: template::TITLE_PAGE_STYLE.to_string(),
            background_image: template::BACKGROUND_IMAGE.to_string(),
            stain_image: template::STAIN_IMAGE.to_string(),
            page_break: template::PAGE_BREAK.to_string(),
            page_number: template::PAGE_NUMBER.to_string(),
            footnote: template::FOOTNOTE.to_string(),
            concept_note: template::CONCEPT_NOTE.to_string(),
            toc_heading: template::TOC_HEADING.to_string(),
            toc_close: template::TOC_CLOSE.to_string(),
            campaign_heading: template::CAMPAIGN_HEADING.to_string(),
            background_heading: template::BACKGROUND_HEADING.to_string(),
            body_numbering: NumberedFormat::body(),
            toc_numbering: NumberedFormat::table_of_contents(),
            concept_placeholder: template::CONCEPT_PLACEHOLDER.to_string(),
        }
    }
}

impl Theme {
    /// Loads a theme from a JSON file, which may contain comments
    pub fn load<P: AsRef<Path>>(file_path: P) -> Result<Theme> {
        let file_path = file_path.as_ref();
        let file = File::open(file_path)
            .wrap_err_with(|| format!("Failed to open theme file {:?}", file_path))?;
        let theme: Theme = serde_json::from_reader(StripComments::new(file))
            .wrap_err_with(|| format!("Failed to parse theme JSON in {:?}", file_path))?;
        log::debug!("Loaded theme {} from {:?}", theme.name, file_path);
        Ok(theme)
    }
}
