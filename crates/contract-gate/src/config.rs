// crates/contract-gate/src/config.rs
// ============================================================================
// Module: Contract Configuration
// Description: Process configuration sources for the contract switch.
// Purpose: Resolve the enabled setting from the environment, an in-process
//          variable store, or a TOML file with strict input guards.
// Dependencies: serde, thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! The contract switch reads one setting, [`ENABLED_KEY`], through a
//! [`ConfigSource`]. Sources stack through [`LayeredSource`]; the first source
//! that yields a value wins. Environment values are read strictly: invalid
//! UTF-8 and empty values fail closed rather than being ignored.
//!
//! Security posture: configuration files are untrusted input; paths, sizes,
//! and encodings are bounded before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::sync::PoisonError;
use std::sync::RwLock;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Setting that turns contract checking on or off.
pub const ENABLED_KEY: &str = "CONTRACT_GATE_ENABLED";
/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CONTRACT_GATE_CONFIG";
/// Default configuration file name.
const DEFAULT_CONFIG_NAME: &str = "contract-gate.toml";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// Parsing error for configuration contents.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Source Trait
// ============================================================================

/// A source of string-valued settings.
pub trait ConfigSource: Send + Sync {
    /// Returns the raw value of `key`, or `None` when the source has no value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the source holds a value it cannot
    /// deliver intact.
    fn setting(&self, key: &str) -> Result<Option<String>, ConfigError>;
}

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Reads settings from process environment variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn setting(&self, key: &str) -> Result<Option<String>, ConfigError> {
        read_env_nonempty(key)
    }
}

/// Reads an environment variable and enforces UTF-8 validity.
fn read_env_strict(name: &str) -> Result<Option<String>, ConfigError> {
    env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{name} must be valid UTF-8")))
    })
}

/// Reads an environment variable and rejects empty values.
fn read_env_nonempty(name: &str) -> Result<Option<String>, ConfigError> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::Invalid(format!("{name} must not be empty")))
        }
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

// ============================================================================
// SECTION: Runtime Settings
// ============================================================================

/// Process-wide runtime settings instance.
static RUNTIME: LazyLock<RuntimeSettings> = LazyLock::new(RuntimeSettings::new);

/// In-process variable store layered under the environment.
///
/// # Invariants
/// - When environment lookup is on, a set environment variable shadows the
///   in-process value of the same key.
#[derive(Debug, Default)]
pub struct RuntimeSettings {
    /// In-process variables.
    variables: RwLock<BTreeMap<String, String>>,
    /// Skips environment lookup when true.
    isolated: bool,
}

impl RuntimeSettings {
    /// Creates a store that consults the environment first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that never consults the environment.
    #[must_use]
    pub fn isolated() -> Self {
        Self {
            variables: RwLock::new(BTreeMap::new()),
            isolated: true,
        }
    }

    /// Returns the process-wide store.
    #[must_use]
    pub fn global() -> &'static Self {
        &RUNTIME
    }

    /// Returns the value of `key`, preferring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the environment value is not
    /// valid UTF-8 or is empty.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        if !self.isolated
            && let Some(value) = read_env_nonempty(key)?
        {
            return Ok(Some(value));
        }
        let variables = self.variables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(variables.get(key).cloned())
    }

    /// Sets an in-process variable, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let mut variables = self.variables.write().unwrap_or_else(PoisonError::into_inner);
        variables.insert(key.into(), value.into())
    }

    /// Removes an in-process variable, returning its value.
    pub fn remove(&self, key: &str) -> Option<String> {
        let mut variables = self.variables.write().unwrap_or_else(PoisonError::into_inner);
        variables.remove(key)
    }
}

impl ConfigSource for RuntimeSettings {
    fn setting(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.get(key)
    }
}

// ============================================================================
// SECTION: File Configuration
// ============================================================================

/// Contract settings loaded from TOML.
///
/// ```toml
/// [contracts]
/// enabled = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractConfig {
    /// Contract checking settings.
    #[serde(default)]
    pub contracts: ContractsSection,
}

/// The `[contracts]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractsSection {
    /// Explicit on/off setting; absent leaves the decision to other sources.
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl ContractConfig {
    /// Loads configuration from `path`, `CONTRACT_GATE_CONFIG`, or the
    /// default file name, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path is out of bounds, the file
    /// cannot be read, exceeds the size limit, is not UTF-8, or does not
    /// parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config must be utf-8".to_string()))?;
        let config = Self::from_toml_str(content)?;
        let enabled = config.contracts.enabled.map_or_else(|| "unset".to_string(), |v| v.to_string());
        debug!(path = %resolved.display(), enabled = %enabled, "loaded contract config");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown fields.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}

impl ConfigSource for ContractConfig {
    fn setting(&self, key: &str) -> Result<Option<String>, ConfigError> {
        if key == ENABLED_KEY {
            return Ok(self.contracts.enabled.map(|enabled| enabled.to_string()));
        }
        Ok(None)
    }
}

/// Resolves the configuration path from input or environment.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Some(env_path) = read_env_nonempty(CONFIG_ENV_VAR)? {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates path length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Layering
// ============================================================================

/// Consults sources in order; the first value found wins.
#[derive(Default)]
pub struct LayeredSource {
    /// Sources in precedence order.
    sources: Vec<Box<dyn ConfigSource>>,
}

impl LayeredSource {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a lower-precedence source.
    #[must_use]
    pub fn with(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl std::fmt::Debug for LayeredSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredSource").field("sources", &self.sources.len()).finish()
    }
}

impl ConfigSource for LayeredSource {
    fn setting(&self, key: &str) -> Result<Option<String>, ConfigError> {
        for source in &self.sources {
            if let Some(value) = source.setting(key)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl ConfigSource for BTreeMap<String, String> {
    fn setting(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.get(key).cloned())
    }
}

// ============================================================================
// SECTION: Parsing Helpers
// ============================================================================

/// Parses a boolean setting (`true`/`false` or `1`/`0`).
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for any other value.
pub fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::Invalid(format!("{name} must be true/false or 1/0"))),
    }
}
