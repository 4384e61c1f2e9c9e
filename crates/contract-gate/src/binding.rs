// crates/contract-gate/src/binding.rs
// ============================================================================
// Module: Contract Bindings
// Description: Conditions paired with the value each one is checked against.
// Purpose: Describe the five enforcement strategies as data so a contract can
//          validate them once and apply them on every call.
// Dependencies: predicate-logic
// ============================================================================

//! ## Overview
//! A [`ContractBinding`] is one condition plus a [`Target`]:
//! - every argument (and optionally the receiver) before the call
//! - selected positional or named arguments before the call
//! - a receiver attribute before the call
//! - a receiver attribute after the call
//! - the returned value after the call
//!
//! Attribute targets read through an [`AttributeSource`]: either a name
//! resolved by the contract's attribute reader or an inline accessor.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use predicate_logic::BoxError;
use predicate_logic::Condition;
use predicate_logic::Predicate;
use predicate_logic::Value;

use crate::error::Stage;

// ============================================================================
// SECTION: Attribute Sources
// ============================================================================

/// Inline attribute accessor.
type AccessorFn<R> = dyn Fn(&R) -> Result<Value, BoxError> + Send + Sync;

/// Where an attribute binding reads its value.
pub enum AttributeSource<R: ?Sized> {
    /// A name resolved by the contract's attribute reader.
    Named {
        /// Attribute name.
        name: String,
        /// Arguments passed when the attribute is an accessor method.
        arguments: Vec<Value>,
    },
    /// A closure reading the value directly from the receiver.
    Accessor {
        /// Label used in violation reports.
        label: String,
        /// Reader closure.
        accessor: Arc<AccessorFn<R>>,
    },
}

impl<R: ?Sized + 'static> AttributeSource<R> {
    /// Reads the named attribute without arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Reads the named accessor with bound arguments.
    pub fn named_with<I, T>(name: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Named {
            name: name.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads through an infallible closure.
    pub fn accessor<F, T>(label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> T + Send + Sync + 'static,
        T: Into<Value>,
    {
        let accessor = move |receiver: &R| Ok::<Value, BoxError>(accessor(receiver).into());
        Self::Accessor {
            label: label.into(),
            accessor: Arc::new(accessor),
        }
    }

    /// Reads through a closure that may fail.
    pub fn fallible_accessor<F, E>(label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> Result<Value, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let accessor = move |receiver: &R| accessor(receiver).map_err(Into::<BoxError>::into);
        Self::Accessor {
            label: label.into(),
            accessor: Arc::new(accessor),
        }
    }
}

impl<R: ?Sized> AttributeSource<R> {
    /// Returns the attribute name or accessor label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Named {
                name, ..
            } => name,
            Self::Accessor {
                label, ..
            } => label,
        }
    }
}

impl<R: ?Sized> Clone for AttributeSource<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Named {
                name,
                arguments,
            } => Self::Named {
                name: name.clone(),
                arguments: arguments.clone(),
            },
            Self::Accessor {
                label,
                accessor,
            } => Self::Accessor {
                label: label.clone(),
                accessor: Arc::clone(accessor),
            },
        }
    }
}

impl<R: ?Sized> fmt::Debug for AttributeSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named {
                name,
                arguments,
            } => f.debug_struct("Named").field("name", name).field("arguments", arguments).finish(),
            Self::Accessor {
                label, ..
            } => f.debug_struct("Accessor").field("label", label).finish_non_exhaustive(),
        }
    }
}

// ============================================================================
// SECTION: Targets
// ============================================================================

/// The value a binding's condition is evaluated against.
pub enum Target<R: ?Sized> {
    /// Every positional and named argument, plus the receiver when its
    /// reader exposes one.
    AllArguments,
    /// The listed positional and named arguments.
    Arguments {
        /// Zero-based positions.
        positions: Vec<usize>,
        /// Argument names.
        names: Vec<String>,
    },
    /// A receiver attribute read before the call.
    AttributeBeforeCall(AttributeSource<R>),
    /// A receiver attribute read after the call.
    AttributeAfterCall(AttributeSource<R>),
    /// The operation's return value.
    ResultAfterCall,
}

impl<R: ?Sized> Target<R> {
    /// Returns when checks for this target run.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::AllArguments | Self::Arguments { .. } | Self::AttributeBeforeCall(_) => {
                Stage::PreCall
            }
            Self::AttributeAfterCall(_) | Self::ResultAfterCall => Stage::PostCall,
        }
    }

    /// Returns the attribute source for attribute targets.
    #[must_use]
    pub const fn attribute(&self) -> Option<&AttributeSource<R>> {
        match self {
            Self::AttributeBeforeCall(source) | Self::AttributeAfterCall(source) => Some(source),
            Self::AllArguments | Self::Arguments { .. } | Self::ResultAfterCall => None,
        }
    }
}

impl<R: ?Sized> Clone for Target<R> {
    fn clone(&self) -> Self {
        match self {
            Self::AllArguments => Self::AllArguments,
            Self::Arguments {
                positions,
                names,
            } => Self::Arguments {
                positions: positions.clone(),
                names: names.clone(),
            },
            Self::AttributeBeforeCall(source) => Self::AttributeBeforeCall(source.clone()),
            Self::AttributeAfterCall(source) => Self::AttributeAfterCall(source.clone()),
            Self::ResultAfterCall => Self::ResultAfterCall,
        }
    }
}

impl<R: ?Sized> fmt::Debug for Target<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllArguments => f.write_str("AllArguments"),
            Self::Arguments {
                positions,
                names,
            } => f
                .debug_struct("Arguments")
                .field("positions", positions)
                .field("names", names)
                .finish(),
            Self::AttributeBeforeCall(source) => {
                f.debug_tuple("AttributeBeforeCall").field(source).finish()
            }
            Self::AttributeAfterCall(source) => {
                f.debug_tuple("AttributeAfterCall").field(source).finish()
            }
            Self::ResultAfterCall => f.write_str("ResultAfterCall"),
        }
    }
}

// ============================================================================
// SECTION: Bindings
// ============================================================================

/// A condition bound to the value it guards.
///
/// # Examples
/// ```
/// use contract_gate::ContractBinding;
/// use contract_gate::Stage;
/// use predicate_logic::convenience::not_none;
///
/// let binding = ContractBinding::<()>::all_arguments(not_none());
/// assert_eq!(binding.stage(), Stage::PreCall);
/// ```
pub struct ContractBinding<R: ?Sized> {
    /// Condition evaluated against the target.
    condition: Condition,
    /// Value the condition guards.
    target: Target<R>,
}

impl<R: ?Sized> ContractBinding<R> {
    /// Pairs a condition with an explicit target.
    pub fn new(condition: impl Into<Condition>, target: Target<R>) -> Self {
        Self {
            condition: condition.into(),
            target,
        }
    }

    /// Checks every argument before the call.
    pub fn all_arguments(condition: impl Into<Condition>) -> Self {
        Self::new(condition, Target::AllArguments)
    }

    /// Checks the listed positions and names before the call.
    pub fn arguments<P, N, S>(condition: impl Into<Condition>, positions: P, names: N) -> Self
    where
        P: IntoIterator<Item = usize>,
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(condition, Target::Arguments {
            positions: positions.into_iter().collect(),
            names: names.into_iter().map(Into::into).collect(),
        })
    }

    /// Checks the listed positions before the call.
    pub fn positions(
        condition: impl Into<Condition>,
        positions: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self::arguments(condition, positions, std::iter::empty::<String>())
    }

    /// Checks the listed named arguments before the call.
    pub fn names<N, S>(condition: impl Into<Condition>, names: N) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::arguments(condition, std::iter::empty(), names)
    }

    /// Checks a receiver attribute before the call.
    pub fn attribute_before(condition: impl Into<Condition>, source: AttributeSource<R>) -> Self {
        Self::new(condition, Target::AttributeBeforeCall(source))
    }

    /// Checks a receiver attribute after the call.
    pub fn attribute_after(condition: impl Into<Condition>, source: AttributeSource<R>) -> Self {
        Self::new(condition, Target::AttributeAfterCall(source))
    }

    /// Checks the returned value after the call.
    pub fn result(condition: impl Into<Condition>) -> Self {
        Self::new(condition, Target::ResultAfterCall)
    }

    /// Returns the bound condition.
    #[must_use]
    pub const fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Returns the bound target.
    #[must_use]
    pub const fn target(&self) -> &Target<R> {
        &self.target
    }

    /// Returns when this binding is checked.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.target.stage()
    }
}

impl<R: ?Sized> Clone for ContractBinding<R> {
    fn clone(&self) -> Self {
        Self {
            condition: self.condition.clone(),
            target: self.target.clone(),
        }
    }
}

impl<R: ?Sized> fmt::Debug for ContractBinding<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("condition", &self.condition.describe())
            .field("target", &self.target)
            .finish()
    }
}
