use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid config value: {0}")]
    ValidationFailed(String),
}

/// Upstream base URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub debian: String,
    pub ubuntu: String,
    pub madison: String,
    pub arch: String,
    pub aur: String,
    pub mint: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            debian: "https://packages.debian.org/".to_string(),
            ubuntu: "https://packages.ubuntu.com/".to_string(),
            madison: "https://qa.debian.org/madison.php".to_string(),
            arch: "https://archlinux.org/packages/search/json/".to_string(),
            aur: "https://aur.archlinux.org/rpc/".to_string(),
            mint: "http://packages.linuxmint.com/list.php".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Architectures requested from madison; `all` and `source` are always added.
    pub archs: Vec<String>,
    /// Entries listed per summary. The reported count is unaffected.
    pub max_results: usize,
    pub verbose: bool,
    /// Queries allowed in flight at once.
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    pub endpoints: Endpoints,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            archs: vec!["amd64".to_string(), "i386".to_string()],
            max_results: 50,
            verbose: false,
            concurrency: 4,
            request_timeout_secs: 30,
            endpoints: Endpoints::default(),
        }
    }
}

impl LookupConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_results == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_results must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads `path` if given, else the per-user config file. A missing
    /// per-user file yields defaults; an explicit path must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `$XDG_CONFIG_HOME/pkginfo/config.toml`, else `$HOME/.config/pkginfo/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("pkginfo").join("config.toml"))
}
