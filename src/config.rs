use crate::emitter::GraphStyle;
use crate::manifest::{MANIFEST_FILE, MANIFEST_LINE_BUDGET};
use crate::scanner::LARGE_FILE_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::info;

pub const SOURCE_LINE_BUDGET: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_directory: PathBuf,
    pub manifest_file: String,
    pub manifest_line_budget: usize,
    pub source_line_budget: usize,
    pub large_file_threshold: u64,
    pub file_extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub parallel: bool,
    pub internal_only: bool,
    pub graph: GraphStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_directory: PathBuf::from("."),
            manifest_file: MANIFEST_FILE.to_string(),
            manifest_line_budget: MANIFEST_LINE_BUDGET,
            source_line_budget: SOURCE_LINE_BUDGET,
            large_file_threshold: LARGE_FILE_THRESHOLD,
            file_extensions: vec!["go".to_string()],
            ignore_patterns: vec!["vendor".to_string(), ".git".to_string()],
            parallel: true,
            internal_only: false,
            graph: GraphStyle::default(),
        }
    }
}

impl Config {
    /// Get the default config file path (~/.go-depgraph.toml)
    pub fn default_config_path() -> crate::Result<PathBuf> {
        let home_dir = env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(PathBuf::from(home_dir).join(".go-depgraph.toml"))
    }

    /// Load config from the default location, falling back to defaults.
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            info!(path = %config_path.display(), "loading configuration");
            Self::from_file(&config_path)
        } else {
            info!(path = %config_path.display(), "no config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// A config file with every option documented.
    pub fn create_documented_config() -> String {
        r#"# go-depgraph configuration file

# Project root to scan (defaults to the current directory)
target_directory = "."

# Manifest holding the root module path, searched upwards from the target
manifest_file = "go.mod"

# Non-comment lines read from the manifest before giving up
manifest_line_budget = 10

# Non-comment lines read from each source file before giving up
source_line_budget = 500

# Files larger than this (bytes) get a warning that only a prefix is read
large_file_threshold = 10000000

# File extensions treated as source files
file_extensions = ["go"]

# Paths to skip: exact directory/file names, "*.ext", or wildcards like "*_test.go"
ignore_patterns = ["vendor", ".git"]

# Scan files on all cores (output is identical either way)
parallel = true

# Keep only imports under the root module path
internal_only = false

[graph]
# DOT graph name
name = "mygraph"

# Font for the graph, nodes and edges
font_name = "Helvetica,Arial,sans-serif"

# Node shape
node_shape = "box"
"#
        .to_string()
    }
}
