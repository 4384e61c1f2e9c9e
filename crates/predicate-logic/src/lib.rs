// crates/predicate-logic/src/lib.rs
// ============================================================================
// Module: Predicate Logic Root
// Description: Public API surface for the predicate expression engine.
// Purpose: Wire together values, leaf predicates, and condition trees.
// Dependencies: crate::{comparison, condition, error, function, traits, value}
// ============================================================================

//! ## Overview
//! Composable boolean predicates over dynamic values. Leaves compare against
//! a reference value or delegate to a function; [`Condition`] combines them
//! with short-circuit `and`/`or` and `not`, and describes itself for
//! diagnostics.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod comparison;
pub mod condition;
pub mod error;
pub mod function;
pub mod traits;
pub mod value;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use comparison::Comparison;
pub use comparison::ComparisonKind;
pub use condition::Condition;
pub use error::BoxError;
pub use error::NotComparable;
pub use error::PredicateError;
pub use error::PredicateResult;
pub use function::FunctionPredicate;
pub use traits::ConditionTrace;
pub use traits::LeafLog;
pub use traits::NoopTrace;
pub use traits::Predicate;
pub use value::Value;
pub use value::ValueKind;

// ============================================================================
// SECTION: Convenience Constructors
// ============================================================================

/// Convenience functions for creating conditions without naming leaf types
pub mod convenience {
    use super::BoxError;
    use super::Comparison;
    use super::Condition;
    use super::FunctionPredicate;
    use super::Value;

    /// The value is the reference object itself
    pub fn is(reference: impl Into<Value>) -> Condition {
        Comparison::identity(reference).into()
    }

    /// The value is the null sentinel
    #[must_use]
    pub fn is_null() -> Condition {
        is(Value::null())
    }

    /// The value is not the null sentinel
    #[must_use]
    pub fn not_none() -> Condition {
        Comparison::not_none().into()
    }

    /// The value is structurally equal to the reference
    pub fn equals(reference: impl Into<Value>) -> Condition {
        Comparison::equals(reference).into()
    }

    /// The value orders strictly before the reference
    pub fn less_than(reference: impl Into<Value>) -> Condition {
        Comparison::less_than(reference).into()
    }

    /// The value orders before or equal to the reference
    pub fn less_than_or_equal(reference: impl Into<Value>) -> Condition {
        Comparison::less_than_or_equal(reference).into()
    }

    /// The value orders strictly after the reference
    pub fn greater_than(reference: impl Into<Value>) -> Condition {
        Comparison::greater_than(reference).into()
    }

    /// The value orders after or equal to the reference
    pub fn greater_than_or_equal(reference: impl Into<Value>) -> Condition {
        Comparison::greater_than_or_equal(reference).into()
    }

    /// The value satisfies an infallible function
    pub fn function<V, F>(label: impl Into<String>, function: F) -> Condition<V>
    where
        V: ?Sized + 'static,
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        FunctionPredicate::new(label, function).into()
    }

    /// The value satisfies a function that may fail
    pub fn fallible<V, F, E>(label: impl Into<String>, function: F) -> Condition<V>
    where
        V: ?Sized + 'static,
        F: Fn(&V) -> Result<bool, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        FunctionPredicate::fallible(label, function).into()
    }

    /// Both conditions must hold
    #[must_use]
    pub fn and<V: ?Sized + 'static>(left: Condition<V>, right: Condition<V>) -> Condition<V> {
        left.and(right)
    }

    /// At least one condition must hold
    #[must_use]
    pub fn or<V: ?Sized + 'static>(left: Condition<V>, right: Condition<V>) -> Condition<V> {
        left.or(right)
    }

    /// The condition must not hold
    #[must_use]
    pub fn not<V: ?Sized + 'static>(condition: Condition<V>) -> Condition<V> {
        condition.negate()
    }
}
