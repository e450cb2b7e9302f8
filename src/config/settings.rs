//! TOML-based configuration for the `agql` tool.
//!
//! Supports a config file (`agql.toml`) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! schema = "${CORPUS_HOME}/schema.toml"
//!
//! [graph]
//! select = "transcript.transcript_id, transcript.ag_id"
//! limit = "LIMIT 100"
//!
//! [participant]
//! select = "speaker_number, name"
//! extra_where = "speaker.annotated_by = 'labbcat'"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compile::Root;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "AGQL_CONFIG";

/// Config file looked for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "agql.toml";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Path of the layer schema (supports `${ENV_VAR}` expansion).
    pub schema: Option<String>,

    /// Defaults for transcript queries.
    pub graph: QueryDefaults,

    /// Defaults for participant queries.
    pub participant: QueryDefaults,
}

/// Per-root defaults for the raw SQL parts of a query.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryDefaults {
    /// SELECT list.
    pub select: Option<String>,

    /// Raw condition AND-ed with every filter.
    pub extra_where: Option<String>,

    /// AGQL order expression.
    pub order: Option<String>,

    /// Raw LIMIT clause.
    pub limit: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `AGQL_CONFIG`
    /// 2. `./agql.toml`
    ///
    /// Falls back to defaults if neither exists.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        Ok(Settings::default())
    }

    /// Defaults for queries over `root`.
    pub fn defaults_for(&self, root: Root) -> &QueryDefaults {
        match root {
            Root::Transcript => &self.graph,
            Root::Participant => &self.participant,
        }
    }

    /// The configured SELECT list for `root`, or the built-in one.
    pub fn select_for(&self, root: Root) -> &str {
        self.defaults_for(root)
            .select
            .as_deref()
            .unwrap_or_else(|| default_select(root))
    }

    /// The schema path with environment variables expanded.
    pub fn schema_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.schema
            .as_deref()
            .map(|path| expand_env_vars(path).map(PathBuf::from))
            .transpose()
    }

    fn validate(&self) -> Result<(), SettingsError> {
        for (section, defaults) in [("graph", &self.graph), ("participant", &self.participant)] {
            if matches!(&defaults.select, Some(select) if select.trim().is_empty()) {
                return Err(SettingsError::InvalidConfig(format!(
                    "[{}] select must not be empty",
                    section
                )));
            }
        }
        Ok(())
    }
}

/// Built-in SELECT list for `root`.
pub fn default_select(root: Root) -> &'static str {
    match root {
        Root::Transcript => "transcript.transcript_id",
        Root::Participant => "speaker_number, name",
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. A lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.next_if_eq(&'{').is_some() {
            let name: String = std::iter::from_fn(|| chars.next_if(|&ch| ch != '}')).collect();
            if chars.next().is_none() {
                return Err(SettingsError::InvalidConfig(format!(
                    "unterminated ${{{}",
                    name
                )));
            }
            name
        } else {
            std::iter::from_fn(|| chars.next_if(|&ch| ch.is_alphanumeric() || ch == '_'))
                .collect()
        };

        if var_name.is_empty() {
            result.push('$');
            continue;
        }
        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
