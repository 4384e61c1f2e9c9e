// crates/predicate-logic/src/condition.rs
// ============================================================================
// Module: Condition Trees
// Description: Boolean combinators over shared leaf predicates.
// Purpose: Compose predicates with `and`, `or`, and `not` while preserving
//          short-circuit evaluation.
// Dependencies: crate::{comparison, error, function, traits, value}
// ============================================================================

//! ## Overview
//! [`Condition`] is the expression tree every contract evaluates. Leaves are
//! shared predicates; `And`, `Or`, and `Not` own their operands. A condition
//! is itself a [`Predicate`], so trees nest freely.
//!
//! Composition never mutates operands: `a & b` builds a new node, and the
//! borrowed forms (`&a & &b`) clone the operands, which only bumps reference
//! counts on the shared leaves.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::ops::BitAnd;
use std::ops::BitOr;
use std::ops::Not;
use std::sync::Arc;

use crate::comparison::Comparison;
use crate::error::PredicateResult;
use crate::function::FunctionPredicate;
use crate::traits::ConditionTrace;
use crate::traits::NoopTrace;
use crate::traits::Predicate;
use crate::value::Value;

// ============================================================================
// SECTION: Condition Definition
// ============================================================================

/// Shared leaf predicate.
type Leaf<V> = Arc<dyn Predicate<V> + Send + Sync>;

/// Boolean expression tree over leaf predicates.
///
/// # Invariants
/// - Nodes are immutable after construction.
/// - `And` never evaluates its right operand when the left is false; `Or`
///   never evaluates its right operand when the left is true.
pub enum Condition<V: ?Sized + 'static = Value> {
    /// Atomic predicate.
    Leaf(Leaf<V>),
    /// Both operands must hold.
    And(Box<Self>, Box<Self>),
    /// At least one operand must hold.
    Or(Box<Self>, Box<Self>),
    /// The operand must not hold.
    Not(Box<Self>),
}

impl<V: ?Sized + 'static> Condition<V> {
    /// Wraps a predicate as a leaf.
    pub fn leaf<P>(predicate: P) -> Self
    where
        P: Predicate<V> + Send + Sync + 'static,
    {
        Self::Leaf(Arc::new(predicate))
    }

    /// Builds `self and other`.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Builds `self or other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Builds `not self`.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluates the tree, reporting each evaluated leaf to `trace`.
    ///
    /// # Errors
    ///
    /// Returns the first leaf error encountered. Operands skipped by
    /// short-circuiting are never evaluated and cannot fail.
    pub fn evaluate_with_trace<T>(&self, value: &V, trace: &mut T) -> PredicateResult
    where
        T: ConditionTrace<V> + ?Sized,
    {
        match self {
            Self::Leaf(predicate) => {
                let outcome = predicate.evaluate(value)?;
                trace.on_leaf_evaluated(predicate.as_ref(), outcome);
                Ok(outcome)
            }
            Self::And(left, right) => Ok(left.evaluate_with_trace(value, trace)?
                && right.evaluate_with_trace(value, trace)?),
            Self::Or(left, right) => Ok(left.evaluate_with_trace(value, trace)?
                || right.evaluate_with_trace(value, trace)?),
            Self::Not(inner) => Ok(!inner.evaluate_with_trace(value, trace)?),
        }
    }
}

impl<V: ?Sized + 'static> Predicate<V> for Condition<V> {
    fn evaluate(&self, value: &V) -> PredicateResult {
        self.evaluate_with_trace(value, &mut NoopTrace)
    }

    fn describe(&self) -> String {
        match self {
            Self::Leaf(predicate) => predicate.describe(),
            Self::And(left, right) => format!("{} and {}", left.describe(), right.describe()),
            Self::Or(left, right) => format!("{} or {}", left.describe(), right.describe()),
            Self::Not(inner) => format!("not {}", inner.describe()),
        }
    }
}

// ============================================================================
// SECTION: Standard Trait Implementations
// ============================================================================

impl<V: ?Sized + 'static> Clone for Condition<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(predicate) => Self::Leaf(Arc::clone(predicate)),
            Self::And(left, right) => Self::And(left.clone(), right.clone()),
            Self::Or(left, right) => Self::Or(left.clone(), right.clone()),
            Self::Not(inner) => Self::Not(inner.clone()),
        }
    }
}

impl<V: ?Sized + 'static> fmt::Debug for Condition<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Condition").field(&self.describe()).finish()
    }
}

impl<V: ?Sized + 'static> fmt::Display for Condition<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<Comparison> for Condition<Value> {
    fn from(comparison: Comparison) -> Self {
        Self::leaf(comparison)
    }
}

impl<V: ?Sized + 'static> From<FunctionPredicate<V>> for Condition<V> {
    fn from(function: FunctionPredicate<V>) -> Self {
        Self::leaf(function)
    }
}

// ============================================================================
// SECTION: Operator Trait Implementations
// ============================================================================

/// `a & b` builds `a and b`.
impl<V: ?Sized + 'static> BitAnd for Condition<V> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<V: ?Sized + 'static> BitAnd for &Condition<V> {
    type Output = Condition<V>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.clone().and(rhs.clone())
    }
}

/// `a | b` builds `a or b`.
impl<V: ?Sized + 'static> BitOr for Condition<V> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl<V: ?Sized + 'static> BitOr for &Condition<V> {
    type Output = Condition<V>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.clone().or(rhs.clone())
    }
}

/// `!a` builds `not a`.
impl<V: ?Sized + 'static> Not for Condition<V> {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl<V: ?Sized + 'static> Not for &Condition<V> {
    type Output = Condition<V>;

    fn not(self) -> Self::Output {
        self.clone().negate()
    }
}
