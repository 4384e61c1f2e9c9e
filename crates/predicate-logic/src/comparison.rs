// crates/predicate-logic/src/comparison.rs
// ============================================================================
// Module: Comparison Predicates
// Description: Leaf predicates comparing a value against a reference value.
// Purpose: Implement identity, null, equality, and ordering checks.
// Dependencies: serde, crate::{error, traits, value}
// ============================================================================

//! ## Overview
//! A [`Comparison`] pairs a [`ComparisonKind`] with a reference [`Value`].
//! Identity and equality are distinct: identity asks whether the evaluated
//! handle is the reference handle, equality compares contents. Ordering
//! kinds fail with [`crate::NotComparable`] rather than returning false when
//! the two values have no common ordering.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::error::PredicateResult;
use crate::traits::Predicate;
use crate::value::Value;

// ============================================================================
// SECTION: Comparison Kind
// ============================================================================

/// The relation a [`Comparison`] checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    /// The value is the reference object itself.
    Identity,
    /// The value is not the null sentinel.
    NotNone,
    /// The value is structurally equal to the reference.
    Equals,
    /// The value orders strictly before the reference.
    LessThan,
    /// The value orders before or equal to the reference.
    LessThanOrEqual,
    /// The value orders strictly after the reference.
    GreaterThan,
    /// The value orders after or equal to the reference.
    GreaterThanOrEqual,
}

impl ComparisonKind {
    /// Returns the description prefix for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Identity => "is",
            Self::NotNone => "is not",
            Self::Equals => "equals",
            Self::LessThan => "less than",
            Self::LessThanOrEqual => "less than or equal to",
            Self::GreaterThan => "greater than",
            Self::GreaterThanOrEqual => "greater than or equal to",
        }
    }

    /// Returns true for the four ordering kinds.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::LessThan | Self::LessThanOrEqual | Self::GreaterThan | Self::GreaterThanOrEqual
        )
    }
}

// ============================================================================
// SECTION: Comparison Predicate
// ============================================================================

/// Leaf predicate comparing evaluated values against a reference value.
///
/// # Invariants
/// - `NotNone` comparisons always hold the null sentinel as reference.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Relation to check.
    kind: ComparisonKind,
    /// Reference value the input is compared against.
    reference: Value,
}

impl Comparison {
    /// Creates a comparison of `kind` against `reference`.
    ///
    /// `NotNone` ignores `reference` and compares against null.
    pub fn new(kind: ComparisonKind, reference: impl Into<Value>) -> Self {
        let reference = match kind {
            ComparisonKind::NotNone => Value::null(),
            _ => reference.into(),
        };
        Self {
            kind,
            reference,
        }
    }

    /// Identity against `reference`.
    pub fn identity(reference: impl Into<Value>) -> Self {
        Self::new(ComparisonKind::Identity, reference)
    }

    /// The value is not null.
    #[must_use]
    pub fn not_none() -> Self {
        Self::new(ComparisonKind::NotNone, Value::null())
    }

    /// Structural equality with `reference`.
    pub fn equals(reference: impl Into<Value>) -> Self {
        Self::new(ComparisonKind::Equals, reference)
    }

    /// The value is strictly less than `reference`.
    pub fn less_than(reference: impl Into<Value>) -> Self {
        Self::new(ComparisonKind::LessThan, reference)
    }

    /// The value is less than or equal to `reference`.
    pub fn less_than_or_equal(reference: impl Into<Value>) -> Self {
        Self::new(ComparisonKind::LessThanOrEqual, reference)
    }

    /// The value is strictly greater than `reference`.
    pub fn greater_than(reference: impl Into<Value>) -> Self {
        Self::new(ComparisonKind::GreaterThan, reference)
    }

    /// The value is greater than or equal to `reference`.
    pub fn greater_than_or_equal(reference: impl Into<Value>) -> Self {
        Self::new(ComparisonKind::GreaterThanOrEqual, reference)
    }

    /// Returns the relation this comparison checks.
    #[must_use]
    pub const fn kind(&self) -> ComparisonKind {
        self.kind
    }

    /// Returns the reference value.
    #[must_use]
    pub const fn reference(&self) -> &Value {
        &self.reference
    }
}

impl Predicate<Value> for Comparison {
    fn evaluate(&self, value: &Value) -> PredicateResult {
        let outcome = match self.kind {
            ComparisonKind::Identity => value.same_as(&self.reference),
            ComparisonKind::NotNone => !value.same_as(&self.reference),
            ComparisonKind::Equals => *value == self.reference,
            ComparisonKind::LessThan => value.compare(&self.reference)?.is_lt(),
            ComparisonKind::LessThanOrEqual => value.compare(&self.reference)?.is_le(),
            ComparisonKind::GreaterThan => value.compare(&self.reference)?.is_gt(),
            ComparisonKind::GreaterThanOrEqual => value.compare(&self.reference)?.is_ge(),
        };
        Ok(outcome)
    }

    fn describe(&self) -> String {
        format!("{} {}", self.kind.label(), self.reference)
    }
}
