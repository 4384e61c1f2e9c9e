// crates/predicate-logic/src/traits.rs
// ============================================================================
// Module: Predicate Traits
// Description: Evaluation contract shared by leaves and combinators.
// Purpose: Define the predicate capability and leaf trace hooks.
// Dependencies: crate::error
// ============================================================================

//! ## Overview
//! Every node of a condition tree, leaf or combinator, implements
//! [`Predicate`]. Trace hooks observe leaf outcomes during evaluation without
//! changing the result.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::error::PredicateResult;

// ============================================================================
// SECTION: Predicate Trait
// ============================================================================

/// Evaluates a single value to true or false and describes itself.
///
/// Implementations must be deterministic and free of side effects: repeated
/// evaluation of an unchanged value returns the same outcome.
pub trait Predicate<V: ?Sized> {
    /// Evaluates the predicate against `value`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PredicateError`] for defect conditions such as
    /// ordering incomparable values or a failing external function.
    fn evaluate(&self, value: &V) -> PredicateResult;

    /// Returns a human-readable description used in diagnostics.
    fn describe(&self) -> String;
}

impl<V, P> Predicate<V> for Box<P>
where
    V: ?Sized,
    P: Predicate<V> + ?Sized,
{
    fn evaluate(&self, value: &V) -> PredicateResult {
        (**self).evaluate(value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<V, P> Predicate<V> for Arc<P>
where
    V: ?Sized,
    P: Predicate<V> + ?Sized,
{
    fn evaluate(&self, value: &V) -> PredicateResult {
        (**self).evaluate(value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Observes leaf outcomes while a condition tree is evaluated.
///
/// Leaves skipped by short-circuiting are never reported.
pub trait ConditionTrace<V: ?Sized> {
    /// Called after a leaf predicate evaluated successfully.
    fn on_leaf_evaluated(&mut self, leaf: &dyn Predicate<V>, outcome: bool);
}

/// No-op trace hook for fast paths
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl<V: ?Sized> ConditionTrace<V> for NoopTrace {
    fn on_leaf_evaluated(&mut self, _leaf: &dyn Predicate<V>, _outcome: bool) {}
}

/// Trace hook recording each evaluated leaf in evaluation order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LeafLog {
    /// Leaf descriptions paired with their outcomes.
    entries: Vec<(String, bool)>,
}

impl LeafLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the recorded `(description, outcome)` pairs.
    #[must_use]
    pub fn entries(&self) -> &[(String, bool)] {
        &self.entries
    }

    /// Returns the descriptions of leaves that evaluated false.
    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter(|(_, outcome)| !outcome).map(|(description, _)| description.as_str())
    }
}

impl<V: ?Sized> ConditionTrace<V> for LeafLog {
    fn on_leaf_evaluated(&mut self, leaf: &dyn Predicate<V>, outcome: bool) {
        self.entries.push((leaf.describe(), outcome));
    }
}
