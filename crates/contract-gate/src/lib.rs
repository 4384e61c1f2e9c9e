// crates/contract-gate/src/lib.rs
// ============================================================================
// Module: Contract Gate Root
// Description: Public API surface for design-by-contract enforcement.
// Purpose: Wire bindings, call contexts, attribute readers, and the switch
//          around wrapped operations.
// Dependencies: crate::{attribute, binding, call, config, contract, error, switch}
// ============================================================================

//! ## Overview
//! Contract Gate wraps an operation with conditions from `predicate-logic`.
//! Conditions can guard every argument, selected arguments, a receiver
//! attribute before or after the call, or the returned value. Violations are
//! reported as [`ContractError::Violation`]; a process-wide
//! [`ContractSwitch`] turns all checking off.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod attribute;
pub mod binding;
pub mod call;
pub mod config;
pub mod contract;
pub mod error;
pub mod switch;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use attribute::AttributeError;
pub use attribute::AttributeKind;
pub use attribute::AttributeReader;
pub use attribute::AttributeTable;
pub use binding::AttributeSource;
pub use binding::ContractBinding;
pub use binding::Target;
pub use call::Arguments;
pub use call::CallContext;
pub use call::NamedArguments;
pub use config::ConfigError;
pub use config::ConfigSource;
pub use config::ContractConfig;
pub use config::ContractsSection;
pub use config::ENABLED_KEY;
pub use config::EnvSource;
pub use config::LayeredSource;
pub use config::RuntimeSettings;
pub use contract::Contract;
pub use contract::ContractBuilder;
pub use contract::ContractResult;
pub use error::CheckTarget;
pub use error::ContractError;
pub use error::ContractViolation;
pub use error::MalformedBinding;
pub use error::Stage;
pub use predicate_logic;
pub use switch::ContractSwitch;
