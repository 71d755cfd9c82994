//! Raw provider configuration as supplied by the host.
//!
//! Values are decoded but not validated: every field is optional, and an
//! explicit `null` is treated the same as an omitted key. Unknown keys are
//! rejected while decoding, which is the surface-shape check the schema
//! describes.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};
use crate::security::SecretValue;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".buildkit-provider.toml";

/// Directory name under the user config dir.
pub const CONFIG_DIR_NAME: &str = "buildkit-provider";

/// Supported raw configuration encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Get the display name for this format.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Unvalidated provider configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Address of the BuildKit daemon
    #[serde(default)]
    pub buildkit_host: Option<String>,

    /// Registry credential blocks, in the order written
    #[serde(default)]
    pub registry_auth: Option<Vec<RawRegistryAuth>>,
}

/// One unvalidated `registry_auth` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRegistryAuth {
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<SecretValue>,
}

impl RawRegistryAuth {
    /// Create a block with all three fields set.
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            address: Some(address.into()),
            username: Some(username.into()),
            password: Some(SecretValue::new(password)),
        }
    }

    /// Check if every field is present.
    pub fn is_complete(&self) -> bool {
        self.address.is_some() && self.username.is_some() && self.password.is_some()
    }
}

impl RawConfig {
    /// Create an empty configuration (every key absent).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the daemon address.
    pub fn with_buildkit_host(mut self, host: impl Into<String>) -> Self {
        self.buildkit_host = Some(host.into());
        self
    }

    /// Append a registry credential block.
    pub fn with_registry_auth(mut self, auth: RawRegistryAuth) -> Self {
        self.registry_auth.get_or_insert_with(Vec::new).push(auth);
        self
    }

    /// Number of `registry_auth` blocks supplied.
    pub fn registry_auth_len(&self) -> usize {
        self.registry_auth.as_ref().map_or(0, Vec::len)
    }

    /// Parse a configuration from text in the given format.
    ///
    /// Blank input decodes to an empty configuration in every format.
    pub fn parse(content: &str, format: ConfigFormat) -> ProviderResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let parse_err = |message: String| ProviderError::Parse { format, message };
        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))
            }
        }
    }

    /// Parse a configuration from TOML.
    pub fn from_toml(content: &str) -> ProviderResult<Self> {
        Self::parse(content, ConfigFormat::Toml)
    }

    /// Parse a configuration from JSON.
    pub fn from_json(content: &str) -> ProviderResult<Self> {
        Self::parse(content, ConfigFormat::Json)
    }

    /// Parse a configuration from YAML.
    pub fn from_yaml(content: &str) -> ProviderResult<Self> {
        Self::parse(content, ConfigFormat::Yaml)
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn from_file(path: &Path) -> ProviderResult<Self> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ProviderError::UnsupportedFormat(path.to_path_buf()))?;

        if !path.exists() {
            return Err(ProviderError::NotFound(path.to_path_buf()));
        }

        tracing::debug!(path = %path.display(), format = %format, "Loading raw configuration");
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.buildkit-provider.toml` in current directory
    /// 2. `~/.config/buildkit-provider/config.toml`
    /// 3. Falls back to an empty configuration
    pub fn load() -> ProviderResult<Self> {
        let cwd = std::env::current_dir()?;
        match Self::discover(&cwd) {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("No configuration file found, using empty configuration");
                Ok(Self::default())
            }
        }
    }

    /// Find the configuration file that [`RawConfig::load`] would read.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        let local_config = dir.join(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        Self::global_config_path().filter(|p| p.exists())
    }

    /// Path of the per-user configuration file.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join("config.toml"))
    }
}
