//! Brewmark exports tabletop campaign text as Homebrewery-flavored Markdown
//!
//! Raw campaign text goes in, along with a title. The concept header and the
//! table of contents are pulled out of the text, numbered lines become
//! headings, and the whole thing is wrapped in a styled title page ready to be
//! pasted into the Homebrewery editor.
//!
//! ```
//! use brewmark::{generate_homebrewery_markdown, ExportRequest};
//!
//! let request = ExportRequest::from_content(
//!     "The Lost Crown\nBackground:\n1. Meet the king",
//!     "The Lost Crown",
//!     "A New Adventure",
//! );
//! let markdown = generate_homebrewery_markdown(&request);
//! assert!(markdown.contains("### 1. Meet the king\n"));
//! ```

mod config;
pub use config::CliConfig;
pub use config::Config;
pub use config::ConfigFile;
pub use config::LintConfig;

mod generator;
pub use generator::generate_homebrewery_markdown;
pub use generator::Generator;

pub mod issue;
pub use issue::Issue;

mod numbered;
pub use numbered::numbered_prefix;
pub use numbered::NumberedFormat;

mod request;
pub use request::extract_concept_header;
pub use request::extract_table_of_contents;
pub use request::ExportRequest;

mod source_files;
pub use source_files::SourceFiles;

pub mod template;

mod theme;
pub use theme::Theme;

pub mod linter;

pub mod export;
