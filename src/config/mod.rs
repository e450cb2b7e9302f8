//! Configuration for the `agql` tool.
//!
//! Handles the config file, environment variables, and per-root query
//! defaults.

mod settings;

pub use settings::{
    default_select, expand_env_vars, QueryDefaults, Settings, SettingsError, CONFIG_ENV_VAR,
    LOCAL_CONFIG_FILE,
};
