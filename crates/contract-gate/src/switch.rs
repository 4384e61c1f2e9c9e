// crates/contract-gate/src/switch.rs
// ============================================================================
// Module: Contract Switch
// Description: Process-wide on/off gate for contract checking.
// Purpose: Let every wrapped call decide, with one load, whether to check.
// Dependencies: tracing, crate::config
// ============================================================================

//! ## Overview
//! A [`ContractSwitch`] combines an externally configured override with an
//! in-process flag. The override is resolved once when the switch is built;
//! afterwards [`ContractSwitch::is_enabled`] is a single atomic load.
//!
//! Precedence: configured override, then the in-process flag, then the
//! default of enabled.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tracing::info;
use tracing::warn;

use crate::config::ConfigError;
use crate::config::ConfigSource;
use crate::config::ENABLED_KEY;
use crate::config::RuntimeSettings;
use crate::config::parse_bool;

// ============================================================================
// SECTION: Global Switch
// ============================================================================

/// Process-wide switch, resolved on first use.
static GLOBAL: OnceLock<Arc<ContractSwitch>> = OnceLock::new();

// ============================================================================
// SECTION: Switch
// ============================================================================

/// On/off gate consulted by every contract call.
///
/// # Invariants
/// - `override_enabled` never changes after construction.
/// - With no override, the in-process flag starts enabled.
#[derive(Debug)]
pub struct ContractSwitch {
    /// Externally configured setting; wins over the in-process flag.
    override_enabled: Option<bool>,
    /// In-process flag.
    enabled: AtomicBool,
}

impl ContractSwitch {
    /// Creates an enabled switch with no external override.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_override(None)
    }

    /// Creates a switch with a fixed external override.
    #[must_use]
    pub const fn with_override(override_enabled: Option<bool>) -> Self {
        Self {
            override_enabled,
            enabled: AtomicBool::new(true),
        }
    }

    /// Builds a switch whose override comes from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the source fails or the setting is not a
    /// boolean.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ConfigError> {
        let override_enabled = source
            .setting(ENABLED_KEY)?
            .map(|raw| parse_bool(ENABLED_KEY, &raw))
            .transpose()?;
        Ok(Self::with_override(override_enabled))
    }

    /// Returns the process-wide switch.
    ///
    /// The override is read from [`RuntimeSettings::global`] on first use, so
    /// the environment shadows in-process variables. An unreadable setting is
    /// logged and ignored.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(
            GLOBAL.get_or_init(|| Arc::new(Self::from_source_or_default(RuntimeSettings::global()))),
        )
    }

    /// Builds a switch from `source`, logging and ignoring a bad setting.
    pub(crate) fn from_source_or_default(source: &dyn ConfigSource) -> Self {
        Self::from_source(source).unwrap_or_else(|err| {
            warn!(key = ENABLED_KEY, error = %err, "ignoring contract switch setting");
            Self::new()
        })
    }

    /// Returns true when contracts are checked.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.override_enabled.unwrap_or_else(|| self.enabled.load(Ordering::Acquire))
    }

    /// Turns checking off for every contract using this switch.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        info!(overridden = self.override_enabled.is_some(), "contract checking disabled");
    }

    /// Turns checking back on.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
        info!(overridden = self.override_enabled.is_some(), "contract checking enabled");
    }

    /// Returns the configured override, if any.
    #[must_use]
    pub const fn override_setting(&self) -> Option<bool> {
        self.override_enabled
    }
}

impl Default for ContractSwitch {
    fn default() -> Self {
        Self::new()
    }
}
