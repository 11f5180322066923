use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::cli::DEFAULT_MAX_RESULTS;

/// Environment variable naming a config file when `--config` is absent
pub const CONFIG_ENV: &str = "JIRAQ_CONFIG";

/// Environment variable that overrides `jira.token`
pub const TOKEN_ENV: &str = "JIRA_API_TOKEN";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub fields: FieldsConfig,
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateDefinition>,
}

/// Connection settings for the tracker.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct JiraConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FieldsConfig {
    /// Name of the custom field holding story points, e.g. `customfield_10016`
    pub story_point_field: Option<String>,
}

/// A named, reusable query.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TemplateDefinition {
    pub query: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    DEFAULT_MAX_RESULTS
}

/// A config file location and whether it must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    pub path: PathBuf,
    pub required: bool,
}

/// Pick the config file in this order:
/// 1. Explicit path
/// 2. `JIRAQ_CONFIG` environment variable
/// 3. `<config dir>/jiraq/config.toml`
///
/// Only the implicit default may be missing.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_path: Option<OsString>,
    default_path: Option<PathBuf>,
) -> Option<ConfigPath> {
    if let Some(path) = explicit {
        return Some(ConfigPath {
            path: path.to_path_buf(),
            required: true,
        });
    }

    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        return Some(ConfigPath {
            path: PathBuf::from(path),
            required: true,
        });
    }

    default_path.map(|path| ConfigPath {
        path,
        required: false,
    })
}

impl Config {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let location = resolve_config_path(
            explicit,
            std::env::var_os(CONFIG_ENV),
            Self::default_path(),
        );
        let config = Self::load_at(location.as_ref())?;
        Ok(config.with_token_override(std::env::var(TOKEN_ENV).ok()))
    }

    /// Load from a resolved location, falling back to defaults when an optional
    /// file is absent.
    pub fn load_at(location: Option<&ConfigPath>) -> Result<Self> {
        let Some(ConfigPath { path, required }) = location else {
            return Ok(Self::default());
        };

        if !path.exists() {
            if *required {
                bail!("config file {} does not exist", path.display());
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            templates = config.templates.len(),
            "loaded config"
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("jiraq").join("config.toml"))
    }

    pub fn template_for(&self, name: &str) -> Option<&TemplateDefinition> {
        self.templates.get(name)
    }

    pub fn story_point_field(&self) -> Option<&str> {
        self.fields.story_point_field.as_deref()
    }

    /// Replace `jira.token` when a token came from the environment.
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.jira.token = Some(token);
        }
        self
    }
}
