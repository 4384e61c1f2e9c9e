// crates/predicate-logic/src/function.rs
// ============================================================================
// Module: Function Predicates
// Description: Leaf predicates delegating to caller-supplied functions.
// Purpose: Let callers plug arbitrary checks into condition trees.
// Dependencies: crate::{error, traits}
// ============================================================================

//! ## Overview
//! A [`FunctionPredicate`] wraps a one-argument function together with a
//! label used as its description. Errors returned by a fallible function are
//! surfaced as [`PredicateError::Function`] holding the original error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::error::PredicateError;
use crate::error::PredicateResult;
use crate::traits::Predicate;

// ============================================================================
// SECTION: Function Predicate
// ============================================================================

/// Shared predicate function signature.
type PredicateFn<V> = dyn Fn(&V) -> Result<bool, BoxError> + Send + Sync;

/// Leaf predicate backed by an external function.
///
/// # Invariants
/// - The wrapped function is shared, never mutated, and never called during
///   construction.
pub struct FunctionPredicate<V: ?Sized> {
    /// Description reported by [`Predicate::describe`].
    label: String,
    /// Wrapped predicate function.
    function: Arc<PredicateFn<V>>,
}

impl<V: ?Sized + 'static> FunctionPredicate<V> {
    /// Wraps an infallible predicate function.
    pub fn new<F>(label: impl Into<String>, function: F) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            function: Arc::new(move |value: &V| Ok::<bool, BoxError>(function(value))),
        }
    }

    /// Wraps a predicate function that may fail.
    pub fn fallible<F, E>(label: impl Into<String>, function: F) -> Self
    where
        F: Fn(&V) -> Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            label: label.into(),
            function: Arc::new(move |value: &V| function(value).map_err(Into::<BoxError>::into)),
        }
    }
}

impl<V: ?Sized> FunctionPredicate<V> {
    /// Returns the label used as description.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<V: ?Sized> Clone for FunctionPredicate<V> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            function: Arc::clone(&self.function),
        }
    }
}

impl<V: ?Sized> fmt::Debug for FunctionPredicate<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionPredicate").field("label", &self.label).finish_non_exhaustive()
    }
}

impl<V: ?Sized> Predicate<V> for FunctionPredicate<V> {
    fn evaluate(&self, value: &V) -> PredicateResult {
        (self.function)(value).map_err(PredicateError::Function)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
