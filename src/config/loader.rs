//! Configuration loading and layering

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::Profile;
use crate::error::{ProvisionError, ProvisionResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::{Config, TlsClient, Verbosity};

pub const CONFIG_FILE: &str = "quickstack.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Key the config file does not define
    UnknownKey {
        key: String,
        file: PathBuf,
        line: Option<usize>,
        suggestion: Option<String>,
    },
    /// Environment value that did not parse; the previous setting stays
    InvalidEnv { var: String, message: String },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::UnknownKey {
                key,
                file,
                line,
                suggestion,
            } => {
                write!(f, "unknown config key '{}' in {}", key, file.display())?;
                if let Some(line) = line {
                    write!(f, ":{}", line)?;
                }
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{}'?)", suggestion)?;
                }
                Ok(())
            }
            ConfigWarning::InvalidEnv { message, .. } => write!(f, "{}", message),
        }
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> ProvisionResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ProvisionError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning::UnknownKey {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Which file, if any, a run should read
pub fn resolve_config_path(explicit: Option<&Path>, app_dir: &Path) -> ProvisionResult<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ProvisionError::MissingPrerequisite {
                path: path.to_path_buf(),
                hint: "Check the --config path.".to_string(),
            });
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = app_dir.join(CONFIG_FILE);
    if local.exists() {
        return Ok(Some(local));
    }

    Ok(dirs::config_dir()
        .map(|d| d.join("quickstack").join("config.toml"))
        .filter(|p| p.exists()))
}

/// File (or defaults), then environment; validated.
pub fn load_layered(
    explicit: Option<&Path>,
    app_dir: &Path,
) -> ProvisionResult<(Config, Vec<ConfigWarning>, Option<PathBuf>)> {
    let source = resolve_config_path(explicit, app_dir)?;
    let (config, mut warnings) = match &source {
        Some(path) => load_with_warnings(path)?,
        None => (Config::default(), Vec::new()),
    };
    let (config, env_warnings) = with_env_overrides(config);
    warnings.extend(env_warnings);
    let origin = source
        .clone()
        .unwrap_or_else(|| PathBuf::from("<environment>"));
    config.validate(&origin)?;
    Ok((config, warnings, source))
}

/// Apply environment variable overrides from the process environment
pub fn with_env_overrides(config: Config) -> (Config, Vec<ConfigWarning>) {
    with_env_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides: legacy names first, `QUICKSTACK_*` on top.
///
/// Values that do not parse leave the setting alone and come back as warnings.
pub fn with_env_overrides_from(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> (Config, Vec<ConfigWarning>) {
    let lookup = |primary: &str, legacy: Option<&str>| -> Option<(String, String)> {
        if let Some(v) = get_env(primary).filter(|v| !v.trim().is_empty()) {
            return Some((primary.to_string(), v));
        }
        legacy.and_then(|name| {
            get_env(name)
                .filter(|v| !v.trim().is_empty())
                .map(|v| (name.to_string(), v))
        })
    };
    let mut warnings = Vec::new();

    if let Some((name, value)) = lookup("QUICKSTACK_NONINTERACTIVE", Some("NONINTERACTIVE")) {
        let validator = EnvVarValidator::new(&name, &["1", "0", "true", "false"]);
        let parsed = validator.check(&value, parse_bool);
        apply(&mut config.runtime.noninteractive, parsed, &name, &mut warnings);
    }

    if let Some((name, value)) = lookup("QUICKSTACK_PROFILE", Some("PROFILE")) {
        let validator = EnvVarValidator::new(&name, &["static", "php", "dynamic"]);
        let parsed = validator.check(&value, |v| Profile::parse(v).map(Some));
        apply(&mut config.runtime.profile, parsed, &name, &mut warnings);
    }

    if let Some((_, value)) = lookup("QUICKSTACK_DOMAIN", Some("DOMAIN")) {
        config.tls.domain = Some(value.trim().to_string());
    }

    if let Some((_, value)) = lookup("QUICKSTACK_EMAIL", Some("LE_EMAIL")) {
        config.tls.email = Some(value.trim().to_string());
    }

    if let Some((name, value)) = lookup("QUICKSTACK_TLS_CLIENT", None) {
        let validator = EnvVarValidator::new(&name, &["container", "host"]);
        let parsed = validator.check(&value, TlsClient::parse);
        apply(&mut config.tls.client, parsed, &name, &mut warnings);
    }

    if let Some((name, value)) = lookup("QUICKSTACK_SECRET_LENGTH", None) {
        let parsed = value
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("Ignoring {}='{}': not a number", name, value));
        apply(&mut config.credentials.secret_length, parsed, &name, &mut warnings);
    }

    if let Some((_, value)) = lookup("QUICKSTACK_ACCOUNT", None) {
        config.runtime.account = Some(value.trim().to_string());
    }

    if let Some((name, value)) = lookup("QUICKSTACK_VERBOSITY", None) {
        let validator = EnvVarValidator::new(&name, &["quiet", "normal", "verbose", "debug"]);
        let parsed = validator.check(&value, Verbosity::parse);
        apply(&mut config.output.verbosity, parsed, &name, &mut warnings);
    }

    (config, warnings)
}

fn apply<T>(slot: &mut T, parsed: Result<T, String>, var: &str, warnings: &mut Vec<ConfigWarning>) {
    match parsed {
        Ok(value) => *slot = value,
        Err(message) => warnings.push(ConfigWarning::InvalidEnv {
            var: var.to_string(),
            message,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "paths",
        "app_dir",
        "letsencrypt_dir",
        "credentials",
        "secret_length",
        "database",
        "user",
        "runtime",
        "profile",
        "noninteractive",
        "account",
        "tls",
        "domain",
        "email",
        "client",
        "staging",
        "output",
        "verbosity",
        "log_file",
    ];

    CANDIDATES
        .iter()
        .map(|c| (*c, levenshtein(unknown, c)))
        .min_by_key(|(_, d)| *d)
        .filter(|(_, d)| *d <= 2)
        .map(|(c, _)| c.to_string())
}
