// crates/predicate-logic/src/error.rs
// ============================================================================
// Module: Predicate Error Definitions
// Description: Failure kinds raised while evaluating predicate trees.
// Purpose: Separate defect conditions from a predicate simply evaluating false.
// Dependencies: thiserror, crate::value
// ============================================================================

//! ## Overview
//! A predicate that evaluates to `false` is not an error. Errors are reserved
//! for defect conditions: ordering two values that have no ordering, or a
//! failure raised inside an externally supplied predicate function. The latter
//! is carried as the original boxed error so callers can downcast it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::value::ValueKind;

// ============================================================================
// SECTION: Boxed External Errors
// ============================================================================

/// Boxed error raised by externally supplied functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// SECTION: Ordering Errors
// ============================================================================

/// Two values were ordered against each other but have no common ordering.
///
/// # Invariants
/// - `left` is the evaluated value kind and `right` the reference value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot order {left} against {right}")]
pub struct NotComparable {
    /// Kind of the value under evaluation.
    pub left: ValueKind,
    /// Kind of the reference value held by the predicate.
    pub right: ValueKind,
}

impl NotComparable {
    /// Creates an ordering failure for the given value kinds.
    #[must_use]
    pub const fn new(left: ValueKind, right: ValueKind) -> Self {
        Self {
            left,
            right,
        }
    }
}

// ============================================================================
// SECTION: Predicate Errors
// ============================================================================

/// Errors that can occur while evaluating a predicate.
///
/// # Invariants
/// - `Function` always holds the error exactly as the external function
///   returned it.
#[derive(Debug, Error)]
pub enum PredicateError {
    /// Ordering comparison between values that are not ordering-comparable.
    #[error(transparent)]
    NotComparable(#[from] NotComparable),
    /// Failure raised inside an externally supplied predicate function.
    #[error("{0}")]
    Function(#[source] BoxError),
}

impl PredicateError {
    /// Wraps an error raised by an external predicate function.
    pub fn function(error: impl Into<BoxError>) -> Self {
        Self::Function(error.into())
    }

    /// Returns true when this is an ordering failure.
    #[must_use]
    pub const fn is_not_comparable(&self) -> bool {
        matches!(self, Self::NotComparable(_))
    }

    /// Returns the external function error when it has type `T`.
    #[must_use]
    pub fn downcast_function_ref<T>(&self) -> Option<&T>
    where
        T: std::error::Error + 'static,
    {
        match self {
            Self::Function(error) => error.downcast_ref::<T>(),
            Self::NotComparable(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Result Alias
// ============================================================================

/// Result of evaluating a predicate.
pub type PredicateResult<T = bool> = Result<T, PredicateError>;
