// crates/contract-gate/src/error.rs
// ============================================================================
// Module: Contract Error Definitions
// Description: Violations and misuse reported by contract-wrapped calls.
// Purpose: Keep "contract violated" distinct from malformed bindings,
//          ordering defects, external failures, and the operation's own errors.
// Dependencies: predicate-logic, thiserror
// ============================================================================

//! ## Overview
//! A wrapped call either returns the operation's value or one [`ContractError`].
//! [`ContractError::Violation`] is the only outcome of a predicate evaluating
//! false. Errors raised by external functions and accessors are carried as
//! their original boxed error; the operation's own error is carried unchanged
//! as [`ContractError::Operation`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use predicate_logic::BoxError;
use predicate_logic::NotComparable;
use predicate_logic::PredicateError;
use predicate_logic::Value;
use thiserror::Error;

use crate::attribute::AttributeError;

// ============================================================================
// SECTION: Violation Details
// ============================================================================

/// Point in a call at which a check ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Before the wrapped operation ran.
    PreCall,
    /// After the wrapped operation returned.
    PostCall,
}

impl Stage {
    /// Returns a stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreCall => "prior to the call",
            Self::PostCall => "after the call",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value a failed check was evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CheckTarget {
    /// The receiver of a method-style call.
    Receiver,
    /// A positional argument.
    Position(usize),
    /// A named argument.
    Named(String),
    /// An attribute of the receiver.
    Attribute(String),
    /// The value returned by the operation.
    Result,
}

impl fmt::Display for CheckTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Receiver => f.write_str("the receiver"),
            Self::Position(position) => write!(f, "argument #{position}"),
            Self::Named(name) => write!(f, "argument '{name}'"),
            Self::Attribute(name) => write!(f, "the attribute '{name}'"),
            Self::Result => f.write_str("the result"),
        }
    }
}

/// A bound condition evaluated false.
///
/// # Invariants
/// - `condition` is the description of the binding's condition tree.
/// - `value` is the first value that failed the condition.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{target} does not fulfill the contract '{condition}' {stage}; actual value: '{value}'")]
pub struct ContractViolation {
    /// When the failing check ran.
    pub stage: Stage,
    /// Which value failed.
    pub target: CheckTarget,
    /// Description of the failing condition.
    pub condition: String,
    /// The rejected value.
    pub value: Value,
}

// ============================================================================
// SECTION: Malformed Bindings
// ============================================================================

/// A binding that cannot be applied to the call or receiver it was given.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedBinding {
    /// A selected position beyond the supplied positional arguments.
    #[error("argument position {position} is out of range for {supplied} positional arguments")]
    PositionOutOfRange {
        /// Requested position.
        position: usize,
        /// Number of positional arguments supplied.
        supplied: usize,
    },
    /// A selected name absent from the supplied named arguments.
    #[error("named argument '{0}' was not supplied")]
    MissingNamedArgument(String),
    /// The attribute reader cannot resolve the attribute.
    #[error("attribute '{0}' cannot be resolved on the receiver")]
    UnknownAttribute(String),
    /// A named attribute binding on a contract without an attribute reader.
    #[error("attribute '{0}' is named but the contract has no attribute reader")]
    MissingAttributeReader(String),
    /// Accessor arguments bound to a plain field.
    #[error("attribute '{0}' is a field and takes no accessor arguments")]
    UnexpectedAttributeArguments(String),
    /// The operation's result could not be converted for a result check.
    #[error("result cannot be represented as a value: {0}")]
    ResultNotRepresentable(String),
    /// A result binding was added without a result conversion.
    #[error("result binding has no result conversion")]
    MissingResultView,
}

// ============================================================================
// SECTION: Contract Errors
// ============================================================================

/// Errors returned by a contract-wrapped call.
///
/// # Invariants
/// - `External` holds the failing function's error exactly as raised.
/// - `Operation` holds the wrapped operation's error exactly as raised.
#[derive(Debug, Error)]
pub enum ContractError<E> {
    /// A bound condition evaluated false.
    #[error("contract violated: {0}")]
    Violation(ContractViolation),
    /// A binding cannot be applied.
    #[error("malformed contract binding: {0}")]
    MalformedBinding(#[from] MalformedBinding),
    /// An ordering condition met values without a common ordering.
    #[error(transparent)]
    NotComparable(#[from] NotComparable),
    /// A function predicate or attribute accessor failed.
    #[error("{0}")]
    External(#[source] BoxError),
    /// The wrapped operation failed.
    #[error("{0}")]
    Operation(#[source] E),
}

impl<E> ContractError<E> {
    /// Returns true for contract violations.
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        matches!(self, Self::Violation(_))
    }

    /// Returns the violation details, if this is a violation.
    #[must_use]
    pub const fn violation(&self) -> Option<&ContractViolation> {
        match self {
            Self::Violation(violation) => Some(violation),
            _ => None,
        }
    }

    /// Returns the wrapped operation's error, if the operation failed.
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            Self::Operation(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the external error when it has type `T`.
    #[must_use]
    pub fn downcast_external_ref<T>(&self) -> Option<&T>
    where
        T: std::error::Error + 'static,
    {
        match self {
            Self::External(error) => error.downcast_ref::<T>(),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Conversion Helpers
// ============================================================================

impl<E> From<PredicateError> for ContractError<E> {
    fn from(error: PredicateError) -> Self {
        match error {
            PredicateError::NotComparable(error) => Self::NotComparable(error),
            PredicateError::Function(error) => Self::External(error),
        }
    }
}

impl<E> From<AttributeError> for ContractError<E> {
    fn from(error: AttributeError) -> Self {
        match error {
            AttributeError::NotFound(name) => {
                Self::MalformedBinding(MalformedBinding::UnknownAttribute(name))
            }
            AttributeError::Invocation {
                source, ..
            } => Self::External(source),
        }
    }
}
