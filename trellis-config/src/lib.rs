#[macro_use]
extern crate tracing;

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use miette::{Context as _, IntoDiagnostic as _};

pub mod output;
pub mod present;
pub mod utils;
pub mod workspace;

pub use crate::output::{Output, OutputMode, OutputScale, Outputs};
pub use crate::present::Present;
pub use crate::utils::Flag;
pub use crate::workspace::{Workspace, WorkspaceName};

#[derive(knuffel::Decode, Debug, PartialEq)]
pub struct Config {
    #[knuffel(children(name = "output"))]
    pub outputs: Outputs,
    #[knuffel(children(name = "workspace"))]
    pub workspaces: Vec<Workspace>,
    #[knuffel(child, default)]
    pub present: Present,
}

#[derive(Debug, Clone)]
pub enum ConfigPath {
    /// Explicitly set config path.
    ///
    /// Load the config only from this path.
    Explicit(PathBuf),

    /// Default config path.
    ///
    /// Prioritize the user path, fallback to the system path, fallback to the built-in default.
    Regular {
        /// User config path, usually `$XDG_CONFIG_HOME/trellis/config.kdl`.
        user_path: PathBuf,
        /// System config path, usually `/etc/trellis/config.kdl`.
        system_path: PathBuf,
    },
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let config = Self::parse(
            path.file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("config.kdl"),
            &contents,
        )
        .context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let _span = tracy_client::span!("Config::parse");
        knuffel::parse(filename, text)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::parse(
            "default-config.kdl",
            include_str!("../../resources/default-config.kdl"),
        )
        .unwrap()
    }
}

impl ConfigPath {
    /// Loads the config.
    ///
    /// For [`ConfigPath::Regular`], falls back to the built-in default when neither the user nor
    /// the system config exists. An explicit path must exist.
    pub fn load(&self) -> miette::Result<Config> {
        let _span = tracy_client::span!("ConfigPath::load");

        let path = match self {
            ConfigPath::Explicit(path) => path.as_path(),
            ConfigPath::Regular {
                user_path,
                system_path,
            } => {
                if user_path.exists() {
                    user_path.as_path()
                } else if system_path.exists() {
                    system_path.as_path()
                } else {
                    debug!("no config file found, using the default config");
                    return Ok(Config::default());
                }
            }
        };

        Config::load(path).context("error loading config")
    }
}
