// Configuration of a run: where the report goes and how it looks

use crate::caller_location::LocationStrategy;
use clap::Parser;
use serde::Deserialize;
use std::ffi::OsString;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {file}: {error}")]
    Io {
        file: PathBuf,
        error: std::io::Error,
    },

    #[error("Invalid TOML in {file}: {error}")]
    Toml {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Cli(#[from] clap::Error),
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Let the terminal decide
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub color: ColorChoice,
    // Suppress lines of passing assertions
    pub quiet: bool,
    pub location: LocationStrategy,
}

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// When to color the report
    #[arg(long, value_enum)]
    color: Option<ColorChoice>,

    /// Hide the lines of passing assertions
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// How failed assertions find their source location
    #[arg(long, value_enum)]
    location: Option<LocationStrategy>,
}

impl HarnessConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = read_to_string(path).map_err(|error| ConfigError::Io {
            file: path.to_path_buf(),
            error,
        })?;

        toml::from_str(&source).map_err(|error| ConfigError::Toml {
            file: path.to_path_buf(),
            error,
        })
    }

    /// Reads the command line of the current process. Exits with a usage
    /// message on malformed arguments, like any `clap` program.
    pub fn from_args() -> Result<Self, ConfigError> {
        Self::from_parsed(Args::parse())
    }

    pub fn try_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_parsed(Args::try_parse_from(args)?)
    }

    // Command line flags override the configuration file
    fn from_parsed(args: Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(color) = args.color {
            config.color = color;
        }
        if let Some(location) = args.location {
            config.location = location;
        }
        config.quiet |= args.quiet;

        tracing::debug!(?config, "harness configuration");
        Ok(config)
    }
}
