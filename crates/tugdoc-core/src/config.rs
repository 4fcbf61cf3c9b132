//! Configuration handling for tugdoc.
//!
//! Configuration is read from a `tugdoc.toml` file (a `[tugdoc]` table) and
//! then overridden by command-line flags:
//!
//! ```toml
//! [tugdoc]
//! base_nav = "/api"
//! out = "assets/api"
//! std_links = true
//! max_depth = 10
//!
//! [tugdoc.external_links]
//! "numpy.ndarray" = "https://numpy.org/doc/stable/reference/generated/numpy.ndarray.html"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TugdocError;

/// Name of the configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "tugdoc.toml";

/// Default maximum module nesting depth before a run is aborted.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Top-level layout of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Tugdoc settings
    #[serde(default)]
    pub tugdoc: Config,
}

/// Settings of a documentation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Base URL prefix of the navigation, e.g. `/api`.
    #[serde(default = "default_base_nav")]
    pub base_nav: String,

    /// Output directory in which documentation files are generated.
    #[serde(default = "default_out")]
    pub out: PathBuf,

    /// External symbol path → URL, for references outside the project.
    #[serde(default)]
    pub external_links: BTreeMap<String, String>,

    /// Include the built-in Python standard library link table.
    #[serde(default = "default_std_links")]
    pub std_links: bool,

    /// Maximum module nesting depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_base_nav() -> String {
    "/api".to_string()
}

fn default_out() -> PathBuf {
    PathBuf::from("assets").join("api")
}

fn default_std_links() -> bool {
    true
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_nav: default_base_nav(),
            out: default_out(),
            external_links: BTreeMap::new(),
            std_links: default_std_links(),
            max_depth: default_max_depth(),
        }
    }
}

/// Command-line overrides; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_nav: Option<String>,
    pub out: Option<PathBuf>,
    pub external_links: Vec<(String, String)>,
    pub no_std_links: bool,
    pub max_depth: Option<usize>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, TugdocError> {
        let content = fs::read_to_string(path).map_err(|e| TugdocError::Config {
            message: format!("failed to read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, TugdocError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| TugdocError::Config {
            message: format!("failed to parse config file: {}", e),
        })?;
        Ok(file.tugdoc)
    }

    /// Load `tugdoc.toml` from the given project root, or defaults if absent.
    pub fn load_from_project(project_root: &Path) -> Result<Self, TugdocError> {
        let config_path = project_root.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(base_nav) = overrides.base_nav {
            self.base_nav = base_nav;
        }
        if let Some(out) = overrides.out {
            self.out = out;
        }
        for (name, url) in overrides.external_links {
            self.external_links.insert(name, url);
        }
        if overrides.no_std_links {
            self.std_links = false;
        }
        if let Some(max_depth) = overrides.max_depth {
            self.max_depth = max_depth;
        }
        self
    }

    /// Base navigation prefix with a leading `/` and no trailing `/`.
    ///
    /// An empty base yields an empty prefix, so links read `@nav/<path>`.
    pub fn normalized_base_nav(&self) -> String {
        let trimmed = self.base_nav.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

/// Parse an external link override in `NAME=URL` format.
pub fn parse_external_link(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, url)) if !name.trim().is_empty() && !url.trim().is_empty() => {
            Ok((name.trim().to_string(), url.trim().to_string()))
        }
        _ => Err(format!(
            "invalid external link '{}', expected 'NAME=URL' (e.g., 'numpy.ndarray=https://...')",
            s
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
