// crates/contract-gate/src/attribute.rs
// ============================================================================
// Module: Attribute Reading
// Description: Named attribute access on receivers of wrapped calls.
// Purpose: Resolve fields and zero-or-more-argument accessors by name so
//          attribute bindings can be validated before the first call.
// Dependencies: predicate-logic, thiserror
// ============================================================================

//! ## Overview
//! Receivers expose attributes through an [`AttributeReader`]. A reader
//! answers two questions: which names exist (and whether each is a plain
//! field or an accessor method), and what an attribute's current value is.
//! [`AttributeTable`] is a closure-backed reader for ordinary structs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use predicate_logic::BoxError;
use predicate_logic::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Attribute Metadata
// ============================================================================

/// How an attribute is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// A stored value read without arguments.
    Field,
    /// An accessor invoked with bound arguments.
    Method,
}

/// Errors raised while reading an attribute.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// The receiver has no attribute with this name.
    #[error("attribute '{0}' not found")]
    NotFound(String),
    /// The accessor itself failed.
    #[error("attribute '{name}' failed: {source}")]
    Invocation {
        /// Attribute name.
        name: String,
        /// Error raised by the accessor.
        #[source]
        source: BoxError,
    },
}

// ============================================================================
// SECTION: Reader Trait
// ============================================================================

/// Resolves named attributes on receivers of type `R`.
pub trait AttributeReader<R: ?Sized>: Send + Sync {
    /// Returns the kind of the named attribute, or `None` when it is unknown.
    fn lookup(&self, name: &str) -> Option<AttributeKind>;

    /// Reads the named attribute from `receiver`.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::NotFound`] for unknown names and
    /// [`AttributeError::Invocation`] when an accessor fails.
    fn read(&self, receiver: &R, name: &str, arguments: &[Value]) -> Result<Value, AttributeError>;

    /// Returns the receiver itself as a value for all-argument checks.
    ///
    /// Receivers that return `None` are left out of all-argument checks.
    fn receiver_value(&self, _receiver: &R) -> Option<Value> {
        None
    }
}

// ============================================================================
// SECTION: Attribute Table
// ============================================================================

/// Field reader closure.
type FieldFn<R> = dyn Fn(&R) -> Value + Send + Sync;

/// Accessor closure taking bound arguments.
type MethodFn<R> = dyn Fn(&R, &[Value]) -> Result<Value, BoxError> + Send + Sync;

/// Registered attribute implementation.
enum Accessor<R: ?Sized> {
    /// Plain field.
    Field(Arc<FieldFn<R>>),
    /// Accessor method.
    Method(Arc<MethodFn<R>>),
}

impl<R: ?Sized> Accessor<R> {
    /// Returns the attribute kind.
    const fn kind(&self) -> AttributeKind {
        match self {
            Self::Field(_) => AttributeKind::Field,
            Self::Method(_) => AttributeKind::Method,
        }
    }
}

impl<R: ?Sized> Clone for Accessor<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Field(read) => Self::Field(Arc::clone(read)),
            Self::Method(call) => Self::Method(Arc::clone(call)),
        }
    }
}

/// Closure-backed [`AttributeReader`].
///
/// # Examples
/// ```
/// use contract_gate::AttributeKind;
/// use contract_gate::AttributeReader;
/// use contract_gate::AttributeTable;
///
/// struct Counter {
///     value: i64,
/// }
///
/// let table = AttributeTable::new().field("value", |counter: &Counter| counter.value.into());
/// assert_eq!(table.lookup("value"), Some(AttributeKind::Field));
/// ```
pub struct AttributeTable<R: ?Sized> {
    /// Attributes keyed by name.
    entries: BTreeMap<String, Accessor<R>>,
    /// Optional projection of the receiver itself.
    receiver: Option<Arc<FieldFn<R>>>,
}

impl<R: ?Sized + 'static> AttributeTable<R> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            receiver: None,
        }
    }

    /// Registers a plain field.
    #[must_use]
    pub fn field<F>(mut self, name: impl Into<String>, read: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Accessor::Field(Arc::new(read)));
        self
    }

    /// Registers an accessor method that takes bound arguments.
    #[must_use]
    pub fn method<F, E>(mut self, name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&R, &[Value]) -> Result<Value, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let call = move |receiver: &R, arguments: &[Value]| {
            call(receiver, arguments).map_err(Into::<BoxError>::into)
        };
        self.entries.insert(name.into(), Accessor::Method(Arc::new(call)));
        self
    }

    /// Includes the receiver in all-argument checks using `project`.
    #[must_use]
    pub fn with_receiver_value<F>(mut self, project: F) -> Self
    where
        F: Fn(&R) -> Value + Send + Sync + 'static,
    {
        self.receiver = Some(Arc::new(project));
        self
    }
}

impl<R: ?Sized> AttributeTable<R> {
    /// Returns the registered attribute names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<R: ?Sized + 'static> Default for AttributeTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> Clone for AttributeTable<R> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            receiver: self.receiver.clone(),
        }
    }
}

impl<R: ?Sized> fmt::Debug for AttributeTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeTable")
            .field("attributes", &self.entries.keys().collect::<Vec<_>>())
            .field("receiver_value", &self.receiver.is_some())
            .finish()
    }
}

impl<R: ?Sized> AttributeReader<R> for AttributeTable<R> {
    fn lookup(&self, name: &str) -> Option<AttributeKind> {
        self.entries.get(name).map(Accessor::kind)
    }

    fn read(&self, receiver: &R, name: &str, arguments: &[Value]) -> Result<Value, AttributeError> {
        match self.entries.get(name) {
            None => Err(AttributeError::NotFound(name.to_string())),
            Some(Accessor::Field(read)) => Ok(read(receiver)),
            Some(Accessor::Method(call)) => {
                call(receiver, arguments).map_err(|source| AttributeError::Invocation {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    fn receiver_value(&self, receiver: &R) -> Option<Value> {
        self.receiver.as_ref().map(|project| project(receiver))
    }
}
