// crates/contract-gate/src/call.rs
// ============================================================================
// Module: Call Context
// Description: Positional and named arguments supplied to a wrapped call.
// Purpose: Give argument bindings one view of a call regardless of how the
//          caller assembled it.
// Dependencies: predicate-logic, smallvec
// ============================================================================

//! ## Overview
//! [`CallContext`] is the seam between contract enforcement and whatever
//! produced the call. [`Arguments`] is the stock implementation: positional
//! values in order plus uniquely keyed named values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::btree_map;

use predicate_logic::Value;
use smallvec::SmallVec;

use crate::error::MalformedBinding;

// ============================================================================
// SECTION: Call Context Trait
// ============================================================================

/// Read access to the arguments of one call.
///
/// # Invariants
/// - `positional` preserves call order.
/// - Named argument keys are unique.
pub trait CallContext {
    /// Iterator over named arguments.
    type Named<'a>: Iterator<Item = (&'a str, &'a Value)>
    where
        Self: 'a;

    /// Returns the positional arguments in call order.
    fn positional(&self) -> &[Value];

    /// Returns the named arguments.
    fn named(&self) -> Self::Named<'_>;

    /// Returns the named argument with the given key, if supplied.
    fn named_value(&self, name: &str) -> Option<&Value>;

    /// Returns the positional argument at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedBinding::PositionOutOfRange`] when fewer arguments
    /// were supplied.
    fn argument_at(&self, position: usize) -> Result<&Value, MalformedBinding> {
        let positional = self.positional();
        positional.get(position).ok_or(MalformedBinding::PositionOutOfRange {
            position,
            supplied: positional.len(),
        })
    }

    /// Returns the named argument with the given key.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedBinding::MissingNamedArgument`] when the key was not
    /// supplied.
    fn argument_named(&self, name: &str) -> Result<&Value, MalformedBinding> {
        self.named_value(name).ok_or_else(|| MalformedBinding::MissingNamedArgument(name.to_string()))
    }
}

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Owned arguments for one call.
///
/// # Examples
/// ```
/// use contract_gate::Arguments;
/// use contract_gate::CallContext;
///
/// let args = Arguments::new().with(1).with("two").with_named("value", 3);
/// assert_eq!(args.positional().len(), 2);
/// assert!(args.named_value("value").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    /// Positional arguments in call order.
    positional: SmallVec<[Value; 4]>,
    /// Named arguments keyed by name.
    named: BTreeMap<String, Value>,
}

impl Arguments {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates arguments from positional values.
    pub fn positional_from<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: BTreeMap::new(),
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn with(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    /// Adds a named argument, replacing any earlier value under the same key.
    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Appends a positional argument in place.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.positional.push(value.into());
    }

    /// Sets a named argument in place, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.named.insert(name.into(), value.into())
    }

    /// Returns the total number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Returns true when no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// Iterator over the named entries of [`Arguments`].
#[derive(Debug, Clone)]
pub struct NamedArguments<'a> {
    /// Underlying ordered map iterator.
    inner: btree_map::Iter<'a, String, Value>,
}

impl<'a> Iterator for NamedArguments<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, value)| (name.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl CallContext for Arguments {
    type Named<'a> = NamedArguments<'a>;

    fn positional(&self) -> &[Value] {
        &self.positional
    }

    fn named(&self) -> Self::Named<'_> {
        NamedArguments {
            inner: self.named.iter(),
        }
    }

    fn named_value(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }
}
