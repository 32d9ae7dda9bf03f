//! Handles the actual running of the exporter

use crate::extract_concept_header;
use crate::linter;
use crate::Config;
use crate::ExportRequest;
use crate::Generator;
use crate::Theme;

use color_eyre::Result;
use eyre::WrapErr;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

/// Title used when neither the command line, the request, nor the input file
/// name provide one
pub const DEFAULT_TITLE: &str = "Untitled Campaign";

/// Runs the exporter
pub fn run() -> Result<()> {
    let config = Config::build()?;

    // Status and diagnostics go to stderr so --stdout output stays clean
    let mut stderr = StandardStream::stderr(config.use_color);

    let theme = match &config.theme_file {
        Some(theme_file) => Theme::load(theme_file)
            .wrap_err_with(|| format!("Failed to load theme file: {:?}", theme_file))?,
        None => Theme::default(),
    };

    let request = load_request(&config, &theme)?;
    linter::lint(&request, &config.input, &config, &mut stderr)?;

    if config.linting {
        return Ok(());
    }

    let generator = Generator::new(theme);
    let output = generator.generate(&request);

    if config.to_stdout {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.as_bytes())
            .wrap_err_with(|| "Failed to write to stdout")?;
        return Ok(());
    }

    let file_name = output_file_name(&config, &request);
    let mut file = File::create(&file_name)
        .wrap_err_with(|| format!("Failed to create output file {}", &file_name))?;
    file.write_all(output.as_bytes())
        .wrap_err_with(|| format!("Failed to write output file {}", &file_name))?;

    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    write!(stderr, "Exported")?;
    stderr.reset()?;
    writeln!(
        stderr,
        " {} to {} ({} theme)",
        request.campaign_title,
        file_name,
        generator.theme().name
    )?;

    if config.should_open {
        if let Err(e) = opener::open(&file_name) {
            log::warn!("Couldn't open output file {}: {}", &file_name, e);
        }
    }

    Ok(())
}

/// Reads the input named by the config and builds the export request
///
/// Title and concept header given on the command line take precedence over
/// those in a JSON request or derived from the text.
pub fn load_request(config: &Config, theme: &Theme) -> Result<ExportRequest> {
    let contents = std::fs::read_to_string(&config.input)
        .wrap_err_with(|| format!("Failed to read input file {}", &config.input))?;

    let request = if config.json_request {
        let mut request: ExportRequest = serde_json::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse export request {}", &config.input))?;
        if let Some(title) = &config.title {
            request = request.with_campaign_title(title.as_str());
        } else if request.campaign_title.trim().is_empty() {
            request.campaign_title = title_from_path(&config.input);
        }
        if request.concept_header.trim().is_empty() {
            request.concept_header =
                extract_concept_header(&request.main_content, &theme.concept_placeholder);
        }
        request
    } else {
        let title = config
            .title
            .clone()
            .unwrap_or_else(|| title_from_path(&config.input));
        ExportRequest::from_content(contents, title, &theme.concept_placeholder)
    };

    let request = match &config.concept {
        Some(concept) => request.with_concept_header(concept.as_str()),
        None => request,
    };
    log::debug!(
        "Exporting \"{}\" ({} bytes of content)",
        request.campaign_title,
        request.main_content.len()
    );

    Ok(request)
}

/// The input file's stem, or the default title
fn title_from_path(input: &str) -> String {
    Path::new(input)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

fn output_file_name(config: &Config, request: &ExportRequest) -> String {
    config.output_file.clone().unwrap_or_else(|| {
        let title = request.campaign_title.trim();
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };
        format!("{}.md", title)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::ColorChoice;

    fn config(input: &str) -> Config {
        Config {
            linting: false,
            input: input.to_string(),
            json_request: false,
            title: None,
            concept: None,
            theme_file: None,
            output_file: None,
            to_stdout: false,
            should_open: false,
            allowed: vec![],
            denied: vec![],
            use_color: ColorChoice::Never,
            compact: false,
        }
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn titles_from_paths() {
        assert_eq!(title_from_path("campaigns/The Lost Crown.txt"), "The Lost Crown");
        assert_eq!(title_from_path("notes"), "notes");
        assert_eq!(title_from_path(""), DEFAULT_TITLE);
    }

    #[test]
    fn output_names() {
        let request = ExportRequest::from_content("", "Crown", "x");
        assert_eq!(output_file_name(&config("in.txt"), &request), "Crown.md");

        let request = ExportRequest::from_content("", " ", "x");
        assert_eq!(
            output_file_name(&config("in.txt"), &request),
            "Untitled Campaign.md"
        );

        let mut given = config("in.txt");
        given.output_file = Some("out.md".to_string());
        assert_eq!(output_file_name(&given, &request), "out.md");
    }

    #[test]
    fn load_text_request() {
        let path = temp_file("crown.txt", "\nThe king is gone\nTable of Contents:\n1. Court");
        let mut config = config(path.to_str().unwrap());
        config.title = Some("The Lost Crown".to_string());
        let request = load_request(&config, &Theme::default());
        std::fs::remove_file(&path).unwrap();

        let request = request.unwrap();
        assert_eq!(request.campaign_title, "The Lost Crown");
        assert_eq!(request.concept_header, "The king is gone");
        assert_eq!(request.table_of_contents_raw, "Table of Contents:\n1. Court");
    }

    #[test]
    fn load_json_request() {
        let path = temp_file(
            "request.json",
            r#"{ "mainContent": "1. One", "campaignTitle": "From JSON", "conceptHeader": "Idea" }"#,
        );
        let mut config = config(path.to_str().unwrap());
        config.json_request = true;
        config.concept = Some("Override".to_string());
        let request = load_request(&config, &Theme::default());
        std::fs::remove_file(&path).unwrap();

        let request = request.unwrap();
        assert_eq!(request.campaign_title, "From JSON");
        assert_eq!(request.concept_header, "Override");
        assert_eq!(request.main_content, "1. One");
        assert_eq!(request.table_of_contents_raw, "");
    }

    #[test]
    fn load_json_request_without_title() {
        let path = temp_file("The Lost Crown.json", r#"{ "mainContent": "\n  Intro\n1. One" }"#);
        let mut config = config(path.to_str().unwrap());
        config.json_request = true;
        let request = load_request(&config, &Theme::default());
        std::fs::remove_file(&path).unwrap();

        let request = request.unwrap();
        assert!(request.campaign_title.ends_with("The Lost Crown"));
        assert_eq!(request.concept_header, "Intro");

        let path = temp_file("empty.json", r#"{ "campaignTitle": "Given" }"#);
        let mut config = self::config(path.to_str().unwrap());
        config.json_request = true;
        let request = load_request(&config, &Theme::default());
        std::fs::remove_file(&path).unwrap();

        let request = request.unwrap();
        assert_eq!(request.campaign_title, "Given");
        assert_eq!(request.concept_header, "A New Adventure");
    }

    #[test]
    fn load_missing_input() {
        let config = config("/nonexistent/brewmark/input.txt");
        assert!(load_request(&config, &Theme::default()).is_err());
    }
}
