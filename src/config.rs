use clap::{crate_authors, crate_description, crate_name, crate_version};
use clap::{App, Arg};
use color_eyre::Result;
use eyre::eyre;
use eyre::WrapErr;
use json_comments::StripComments;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;

use termcolor::ColorChoice;

use std::path::PathBuf;

/// The file every theme directory must contain
pub const THEME_FILE_NAME: &str = "theme.json";

/// Represents a unified configuration for a run of brewmark.
///
/// Compiled from the configuration file and command-line arguments given
pub struct Config {
    /// True if this is a lint-only run
    pub linting: bool,

    /// Input campaign text, or JSON export request if `json_request` is set
    pub input: String,

    /// True if the input is a JSON export request
    pub json_request: bool,

    /// Campaign title override
    pub title: Option<String>,

    /// Concept header override
    pub concept: Option<String>,

    /// The theme file to use. The built-in theme is used if this is None
    pub theme_file: Option<PathBuf>,

    /// Output file, if given
    pub output_file: Option<String>,

    /// True if the document should be written to stdout instead of a file
    pub to_stdout: bool,

    /// True if the output should be sent to `opener`
    pub should_open: bool,

    /// List of allowed (ignored) warning names
    pub allowed: Vec<String>,

    /// List of denied (treated as errors) warning names
    pub denied: Vec<String>,

    /// Whether or not to use color output
    pub use_color: ColorChoice,

    /// If true, use compact output format
    pub compact: bool,
}

impl Config {
    /// Loads the [`ConfigFile`], parses the [`CliConfig`], and produces a
    /// unified `Config`
    ///
    /// [`CliConfig`]: struct.CliConfig.html
    /// [`ConfigFile`]: struct.ConfigFile.html
    pub fn build() -> Result<Self> {
        let config_file = ConfigFile::load()?;
        let cli_config = CliConfig::from_args();
        Ok(Config::layer(config_file, cli_config))
    }

    /// Creates a unified `Config` from the given [`ConfigFile`] and
    /// [`CliConfig`]
    ///
    /// Lint lists are combined in order: command line, then the `default`
    /// theme config, then the selected theme's config.
    ///
    /// [`CliConfig`]: struct.CliConfig.html
    /// [`ConfigFile`]: struct.ConfigFile.html
    pub fn layer(config_file: ConfigFile, cli_config: CliConfig) -> Self {
        let theme_file = cli_config.theme.as_ref().map(|t| {
            config_file
                .themes
                .get(t)
                .cloned()
                .unwrap_or_else(|| t.into())
        });

        let theme_configs = &config_file.theme_configs;
        let lint_configs = || {
            let default = theme_configs.get("default");
            let selected = cli_config
                .theme
                .as_ref()
                .and_then(|t| theme_configs.get(t));
            default.into_iter().chain(selected)
        };

        let mut allowed = cli_config.allowed.clone();
        for lint_config in lint_configs() {
            allowed.extend(lint_config.allow.iter().cloned());
        }

        let mut denied = cli_config.denied.clone();
        for lint_config in lint_configs() {
            denied.extend(lint_config.deny.iter().cloned());
        }

        Config {
            linting: cli_config.linting,
            input: cli_config.input,
            json_request: cli_config.json_request,
            title: cli_config.title,
            concept: cli_config.concept,
            theme_file,
            output_file: cli_config.output_file,
            to_stdout: cli_config.to_stdout,
            should_open: cli_config.should_open,
            allowed,
            denied,
            use_color: cli_config.use_color,
            compact: cli_config.compact,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub allow: Vec<String>,
    #[serde(default)]
    pub deny: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigFileInternal {
    #[serde(default)]
    pub theme_paths: Vec<String>,
    #[serde(default)]
    pub theme_configs: HashMap<String, LintConfig>,
}

const DEFAULT_CONFIG: &str = r#"// This file defines the configuration for brewmark
// It is mostly standard JSON, but supports //, /**/, and # style comments.
//
// For path related configuration, brewmark defines several special variables
// that can be used to specify locations:
// * $BREWMARK_BIN_DIR: directory in which the brewmark executable is located
// * $BREWMARK_DATA_DIR: brewmark's system data dir (OS-specific)
// * $PWD: directory from which brewmark is being invoked
// * $HOME: user's home directory (~ is not currently supported)
//
// Arbitrary environment variables are not currently supported
{
  // Directories to search for themes in. Each subdirectory containing a
  // theme.json file is a theme named after that subdirectory
  "theme_paths": [
    "$BREWMARK_DATA_DIR/themes",
    "$BREWMARK_BIN_DIR/themes",
    "$HOME/.brewmark/themes",
    "$PWD/themes",
    "$PWD/.themes"
  ],
  "theme_configs": {
    // This is the default configuration which theme-specific configurations
    // are layered over. Items given for a theme are appended to the ones
    // given here.
    "default": {
      // Warnings to ignore ("allow")
      "allow": [],
      // Warnings to treat as errors ("deny")
      "deny": []
    }
  }
}"#;

/// Stores theme paths and lint settings parsed from the brewmark config file
#[derive(Debug, Default)]
pub struct ConfigFile {
    /// Maps theme names to theme files based on the name of the containing
    /// directories
    pub themes: HashMap<String, PathBuf>,

    /// Maps a theme (or default) to the lint settings for that theme
    pub theme_configs: HashMap<String, LintConfig>,
}

impl ConfigFile {
    /// Loads the config file
    ///
    /// If the config file does not exist, it will try to create a default one
    /// in the config directory. Also searches for all themes in the paths
    /// specified by the config file
    pub fn load() -> Result<Self> {
        let config_path = dirs_next::config_dir()
            .ok_or_else(|| eyre!("Error getting config directory"))?
            .join("brewmark/config.json");

        let config_contents = if !config_path.exists() {
            if let Some(prefix) = config_path.parent() {
                std::fs::create_dir_all(prefix)
                    .wrap_err_with(|| format!("Error creating config directory: {:?}", prefix))?;
            }
            let mut config_file = File::create(&config_path)
                .wrap_err_with(|| format!("Error creating config file: {:?}", config_path))?;
            config_file.write_all(DEFAULT_CONFIG.as_bytes())?;
            log::info!("Wrote default config to {:?}", config_path);

            DEFAULT_CONFIG.to_string()
        } else {
            std::fs::read_to_string(&config_path)
                .wrap_err_with(|| format!("Error reading config file: {:?}", config_path))?
        };

        ConfigFile::parse(&config_contents)
            .wrap_err_with(|| format!("Error parsing config file: {:?}", config_path))
    }

    /// Parses config file contents and discovers the themes they point to
    pub fn parse(contents: &str) -> Result<Self> {
        // Strip the comments from the input (use `as_bytes()` to get a `Read`).
        let stripped = StripComments::new(contents.as_bytes());
        let cf: ConfigFileInternal = serde_json::from_reader(stripped)?;
        log::debug!("Parsed config file: {:?}", cf);

        let mut themes = HashMap::new();
        for p in &cf.theme_paths {
            let path = expand_path_variables(p)
                .wrap_err_with(|| format!("Error while parsing {}", p))?;
            discover_themes(&path, &mut themes)?;
        }

        Ok(ConfigFile {
            themes,
            theme_configs: cf.theme_configs,
        })
    }
}

/// Replaces the special `$` variables in a configured path
pub fn expand_path_variables(p: &str) -> Result<String> {
    let mut path = p.to_string();

    // Everything before `searched` has already been expanded
    let mut searched = 0;
    while let Some(found) = path[searched..].find('$') {
        let start = searched + found;
        let end = path[start..]
            .find('/')
            .map(|pos| start + pos)
            .unwrap_or_else(|| path.len());

        // Excluding the $
        let var_name = &path[start + 1..end];
        let replace: Result<PathBuf> = match var_name {
            "HOME" => dirs_next::home_dir().ok_or_else(|| eyre!("Failed to get HOME")),
            "PWD" => std::env::current_dir().wrap_err_with(|| "Failed to get PWD"),
            "BREWMARK_BIN_DIR" => match std::env::current_exe() {
                Ok(ok) => ok
                    .parent()
                    .map(|p| p.to_path_buf())
                    .ok_or_else(|| eyre!("Failed to get brewmark executable's parent")),
                Err(err) => Err(err).wrap_err_with(|| "Failed to get BREWMARK_BIN_DIR"),
            },
            "BREWMARK_DATA_DIR" => dirs_next::data_dir()
                .map(|d| d.join("brewmark"))
                .ok_or_else(|| eyre!("Failed to get BREWMARK_DATA_DIR")),
            _ => Err(eyre!(
                "Arbitrary environment variables are not currently supported: ${}",
                var_name
            )),
        };
        let replace = replace?.into_os_string().to_string_lossy().into_owned();

        path.replace_range(start..end, &replace);
        searched = start + replace.len();
    }

    Ok(path)
}

/// Registers every `<path>/<name>/theme.json` as theme `<name>`
///
/// Earlier registrations win. Paths that don't exist or aren't directories
/// are skipped.
fn discover_themes(path: &str, themes: &mut HashMap<String, PathBuf>) -> Result<()> {
    let path_buf = PathBuf::from(path);
    if !path_buf.is_dir() {
        log::debug!("Skipping theme path {}", path);
        return Ok(());
    }

    let themes_dir = std::fs::read_dir(&path_buf)
        .wrap_err_with(|| format!("Error while reading directory {}", path))?;
    for entry in themes_dir {
        let theme_dir = match entry {
            Ok(entry) => entry.path(),
            Err(_) => continue,
        };

        let theme_file = theme_dir.join(THEME_FILE_NAME);
        if !theme_file.is_file() {
            continue;
        }

        let name = theme_dir
            .file_name()
            .ok_or_else(|| eyre!("Error getting directory name for path {}", path))?
            .to_string_lossy()
            .into_owned();
        log::debug!("Found theme {} at {:?}", name, theme_file);
        themes.entry(name).or_insert(theme_file);
    }

    Ok(())
}

/// The command line options supplied by the user
pub struct CliConfig {
    /// If true, lint then exit
    pub linting: bool,

    /// Input file to lint/export
    pub input: String,

    /// If true, the input is a JSON export request
    pub json_request: bool,

    /// The campaign title
    pub title: Option<String>,

    /// The concept header
    pub concept: Option<String>,

    /// The theme name or path
    pub theme: Option<String>,

    /// The file name to output. Defaults to <campaign title>.md
    pub output_file: Option<String>,

    /// If true, write the document to stdout
    pub to_stdout: bool,

    /// If true, send the output file to `opener` for the user
    pub should_open: bool,

    /// List of allowed (ignored) warnings, by name
    pub allowed: Vec<String>,

    /// List of denied (treated as errors) warnings, by name
    pub denied: Vec<String>,

    /// Controls color output
    pub use_color: ColorChoice,

    /// If true, use compact warning and error output
    pub compact: bool,
}

impl CliConfig {
    /// Parses the command line arguments
    pub fn from_args() -> Self {
        #[allow(deprecated, unknown_lints, dangerous_implicit_autorefs)]
        let m = App::new(crate_name!())
            .about(crate_description!())
            .author(crate_authors!("\n"))
            .version(crate_version!())
            .arg(
                Arg::with_name("allow")
                    .help("Specifies warnings to ignore. Overrides deny.")
                    .short("a")
                    .long("allow")
                    .takes_value(true)
                    .multiple(true),
            )
            .arg(
                Arg::with_name("color")
                    .help("Turns on colored output (always, ansi, auto, never)")
                    .long("color")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("compact")
                    .help("Turns on compact error and warning output")
                    .long("compact"),
            )
            .arg(
                Arg::with_name("concept")
                    .help("Sets the concept header (default: first non-blank line)")
                    .short("c")
                    .long("concept")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("deny")
                    .help("Specifies warnings to treat as errors")
                    .short("D")
                    .long("deny")
                    .takes_value(true)
                    .multiple(true),
            )
            .arg(
                Arg::with_name("json")
                    .help("Reads the input as a JSON export request")
                    .short("j")
                    .long("json"),
            )
            .arg(
                Arg::with_name("lint")
                    .help("Runs the linter without producing any output")
                    .short("L")
                    .long("lint"),
            )
            .arg(
                Arg::with_name("open")
                    .help("Opens the exported file")
                    .long("open")
                    .conflicts_with_all(&["lint", "stdout"]),
            )
            .arg(
                Arg::with_name("output")
                    .help("Sets the output file (default: <Campaign Title>.md)")
                    .short("o")
                    .long("output")
                    .takes_value(true)
                    .conflicts_with_all(&["lint", "stdout"]),
            )
            .arg(
                Arg::with_name("stdout")
                    .help("Writes the document to stdout instead of a file")
                    .long("stdout")
                    .conflicts_with("lint"),
            )
            .arg(
                Arg::with_name("theme")
                    .help("Sets the theme by name or theme file location")
                    .short("T")
                    .long("theme")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("title")
                    .help("Sets the campaign title (default: input file name)")
                    .short("t")
                    .long("title")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("INPUT")
                    .help("Sets the campaign text file to use")
                    .required(true)
                    .index(1),
            )
            .get_matches();

        let linting = m.is_present("lint");
        let input = m.value_of("INPUT").unwrap_or_default().to_string();
        let json_request = m.is_present("json");
        let title = m.value_of("title").map(|s| s.to_string());
        let concept = m.value_of("concept").map(|s| s.to_string());
        let theme = m.value_of("theme").map(|s| s.to_string());
        let output_file = m.value_of("output").map(|s| s.to_string());
        let to_stdout = m.is_present("stdout");
        let should_open = m.is_present("open");
        let allowed = m
            .values_of("allow")
            .unwrap_or_default()
            .map(|s| s.to_string())
            .collect();
        let denied = m
            .values_of("deny")
            .unwrap_or_default()
            .map(|s| s.to_string())
            .collect();
        let use_color = match m.value_of("color").unwrap_or("auto") {
            "always" => ColorChoice::Always,
            "ansi" => ColorChoice::AlwaysAnsi,
            "auto" => {
                if atty::is(atty::Stream::Stderr) {
                    ColorChoice::Auto
                } else {
                    ColorChoice::Never
                }
            }
            _ => ColorChoice::Never,
        };
        let compact = m.is_present("compact");

        CliConfig {
            linting,
            input,
            json_request,
            title,
            concept,
            theme,
            output_file,
            to_stdout,
            should_open,
            allowed,
            denied,
            use_color,
            compact,
        }
    }
}
