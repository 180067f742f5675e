//! Configuration for quickstack
//!
//! Layering, lowest to highest priority:
//! 1. Built-in defaults
//! 2. Config file (`--config`, `<app>/quickstack.toml`, or `~/.config/quickstack/config.toml`)
//! 3. Environment (`NONINTERACTIVE`, `PROFILE`, `DOMAIN`, `LE_EMAIL`, then `QUICKSTACK_*`)
//! 4. CLI flags (applied by the binary)

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{
    load_layered, load_with_warnings, resolve_config_path, with_env_overrides,
    with_env_overrides_from, ConfigWarning, CONFIG_FILE,
};
pub use types::{
    Config, CredentialsConfig, OutputConfig, PathsConfig, RuntimeConfig, TlsClient, TlsConfig,
    Verbosity,
};
