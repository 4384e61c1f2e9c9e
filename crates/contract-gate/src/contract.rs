// crates/contract-gate/src/contract.rs
// ============================================================================
// Module: Contract Enforcement
// Description: Operations wrapped with pre- and post-call condition checks.
// Purpose: Apply validated bindings as nested scopes around one operation and
//          report the first violated condition.
// Dependencies: predicate-logic, serde, tracing
// ============================================================================

//! ## Overview
//! A [`Contract`] owns an operation and an ordered list of bindings. Bindings
//! nest: the first declared binding is outermost, so its pre-call check runs
//! first and its post-call check runs last. Each call reads the switch once;
//! when checking is off the operation runs directly.
//!
//! [`ContractBuilder::build`] resolves every named attribute binding against
//! the attribute reader up front, so a typo fails at construction rather than
//! on the first call.
//!
//! Results are only converted to [`Value`] when a result binding exists. The
//! conversion is chosen when the binding is added:
//! [`ContractBuilder::require_result`] hands `Value` results through as the
//! same handle, [`ContractBuilder::require_serialized_result`] goes through
//! `serde`, and [`ContractBuilder::with_result_view`] takes any function.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use predicate_logic::Condition;
use predicate_logic::Predicate;
use predicate_logic::Value;
use serde::Serialize;
use tracing::debug;

use crate::attribute::AttributeKind;
use crate::attribute::AttributeReader;
use crate::binding::AttributeSource;
use crate::binding::ContractBinding;
use crate::binding::Target;
use crate::call::Arguments;
use crate::call::CallContext;
use crate::error::CheckTarget;
use crate::error::ContractError;
use crate::error::ContractViolation;
use crate::error::MalformedBinding;
use crate::error::Stage;
use crate::switch::ContractSwitch;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Wrapped operation.
type Operation<R, C, T, E> = dyn Fn(&mut R, &C) -> Result<T, E> + Send + Sync;

/// Converts an operation result into the value its bindings check.
type ResultView<T> = dyn Fn(&T) -> Result<Value, MalformedBinding> + Send + Sync;

/// Result of a contract-wrapped call.
pub type ContractResult<T, E> = Result<T, ContractError<E>>;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Collects bindings for a [`Contract`].
///
/// # Invariants
/// - Bindings are kept in declaration order; the first is outermost.
pub struct ContractBuilder<R: ?Sized, T, E, C = Arguments> {
    /// Operation being wrapped.
    operation: Arc<Operation<R, C, T, E>>,
    /// Bindings in declaration order.
    bindings: Vec<ContractBinding<R>>,
    /// Resolver for named attributes.
    reader: Option<Arc<dyn AttributeReader<R>>>,
    /// Switch override; the global switch is used when unset.
    switch: Option<Arc<ContractSwitch>>,
    /// Result conversion for result bindings.
    result_view: Option<Arc<ResultView<T>>>,
}

impl<R, T, E, C> ContractBuilder<R, T, E, C>
where
    R: ?Sized + 'static,
{
    /// Adds a binding inside every binding added before it.
    #[must_use]
    pub fn require(mut self, binding: ContractBinding<R>) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Checks the returned value after the call.
    ///
    /// The result is cloned into a [`Value`]; a `Value` result keeps its
    /// handle, so identity conditions see the returned reference.
    #[must_use]
    pub fn require_result(self, condition: impl Into<Condition>) -> Self
    where
        T: Clone + Into<Value> + 'static,
    {
        self.with_result_view(|result: &T| result.clone().into())
            .require(ContractBinding::result(condition))
    }

    /// Checks the returned value after the call through its `serde` form.
    #[must_use]
    pub fn require_serialized_result(mut self, condition: impl Into<Condition>) -> Self
    where
        T: Serialize + 'static,
    {
        self.result_view = Some(Arc::new(|result: &T| {
            Value::from_serialize(result)
                .map_err(|err| MalformedBinding::ResultNotRepresentable(err.to_string()))
        }));
        self.require(ContractBinding::result(condition))
    }

    /// Sets how results are converted for every result binding.
    #[must_use]
    pub fn with_result_view<F>(mut self, view: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.result_view =
            Some(Arc::new(move |result: &T| Ok::<_, MalformedBinding>(view(result))));
        self
    }

    /// Sets the reader used for named attribute bindings and receiver checks.
    #[must_use]
    pub fn with_reader(mut self, reader: impl AttributeReader<R> + 'static) -> Self {
        self.reader = Some(Arc::new(reader));
        self
    }

    /// Sets a shared attribute reader.
    #[must_use]
    pub fn with_shared_reader(mut self, reader: Arc<dyn AttributeReader<R>>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Uses `switch` instead of the process-wide switch.
    #[must_use]
    pub fn with_switch(mut self, switch: Arc<ContractSwitch>) -> Self {
        self.switch = Some(switch);
        self
    }

    /// Validates every binding and produces the contract.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedBinding`] when a named attribute binding has no
    /// reader, names an attribute the reader cannot resolve, or passes
    /// accessor arguments to a plain field, and when a result binding has no
    /// result conversion.
    pub fn build(self) -> Result<Contract<R, T, E, C>, MalformedBinding> {
        for binding in &self.bindings {
            validate_binding(binding, self.reader.as_deref())?;
            if matches!(binding.target(), Target::ResultAfterCall) && self.result_view.is_none() {
                return Err(MalformedBinding::MissingResultView);
            }
        }
        Ok(Contract {
            operation: self.operation,
            bindings: self.bindings.into(),
            reader: self.reader,
            switch: self.switch.unwrap_or_else(ContractSwitch::global),
            result_view: self.result_view,
        })
    }
}

impl<R: ?Sized, T, E, C> fmt::Debug for ContractBuilder<R, T, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBuilder")
            .field("bindings", &self.bindings)
            .field("reader", &self.reader.is_some())
            .field("result_view", &self.result_view.is_some())
            .finish_non_exhaustive()
    }
}

/// Checks that a binding's attribute can be resolved.
fn validate_binding<R: ?Sized>(
    binding: &ContractBinding<R>,
    reader: Option<&dyn AttributeReader<R>>,
) -> Result<(), MalformedBinding> {
    let Some(AttributeSource::Named {
        name,
        arguments,
    }) = binding.target().attribute()
    else {
        return Ok(());
    };
    let reader = reader.ok_or_else(|| MalformedBinding::MissingAttributeReader(name.clone()))?;
    match reader.lookup(name) {
        None => Err(MalformedBinding::UnknownAttribute(name.clone())),
        Some(AttributeKind::Field) if !arguments.is_empty() => {
            Err(MalformedBinding::UnexpectedAttributeArguments(name.clone()))
        }
        Some(AttributeKind::Field | AttributeKind::Method) => Ok(()),
    }
}

// ============================================================================
// SECTION: Contract
// ============================================================================

/// An operation guarded by condition bindings.
///
/// # Invariants
/// - Every named attribute binding resolved against `reader` at build time.
/// - The switch is read once per call.
///
/// # Examples
/// ```
/// use contract_gate::Arguments;
/// use contract_gate::CallContext;
/// use contract_gate::Contract;
/// use contract_gate::ContractBinding;
/// use predicate_logic::convenience::less_than;
///
/// let halve = Contract::builder(|_: &mut (), args: &Arguments| {
///     let value = args.positional()[0].as_i64().unwrap_or_default();
///     Ok::<i64, std::convert::Infallible>(value / 2)
/// })
/// .require(ContractBinding::positions(less_than(100), [0]))
/// .build()
/// .unwrap();
///
/// assert_eq!(halve.call_free(&Arguments::new().with(10)).unwrap(), 5);
/// assert!(halve.call_free(&Arguments::new().with(500)).is_err());
/// ```
pub struct Contract<R: ?Sized, T, E, C = Arguments> {
    /// Operation being wrapped.
    operation: Arc<Operation<R, C, T, E>>,
    /// Bindings in declaration order; index 0 is outermost.
    bindings: Arc<[ContractBinding<R>]>,
    /// Resolver for named attributes.
    reader: Option<Arc<dyn AttributeReader<R>>>,
    /// Gate consulted once per call.
    switch: Arc<ContractSwitch>,
    /// Result conversion; present whenever a result binding exists.
    result_view: Option<Arc<ResultView<T>>>,
}

impl<R, T, E, C> Contract<R, T, E, C>
where
    R: ?Sized + 'static,
{
    /// Starts a contract around `operation`.
    pub fn builder<F>(operation: F) -> ContractBuilder<R, T, E, C>
    where
        F: Fn(&mut R, &C) -> Result<T, E> + Send + Sync + 'static,
    {
        ContractBuilder {
            operation: Arc::new(operation),
            bindings: Vec::new(),
            reader: None,
            switch: None,
            result_view: None,
        }
    }

    /// Returns the bindings in declaration order.
    #[must_use]
    pub fn bindings(&self) -> &[ContractBinding<R>] {
        &self.bindings
    }

    /// Returns the switch this contract consults.
    #[must_use]
    pub const fn switch(&self) -> &Arc<ContractSwitch> {
        &self.switch
    }
}

impl<R, T, E, C> Contract<R, T, E, C>
where
    R: ?Sized + 'static,
    C: CallContext,
{
    /// Invokes the operation with every binding enforced.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Violation`] for the first failed check,
    /// [`ContractError::Operation`] when the operation fails, and the other
    /// variants for malformed bindings, incomparable values, or failing
    /// external functions.
    pub fn call(&self, receiver: &mut R, context: &C) -> ContractResult<T, E> {
        if !self.switch.is_enabled() {
            return (self.operation)(receiver, context).map_err(ContractError::Operation);
        }
        self.invoke_layer(0, receiver, context)
    }

    /// Applies the binding at `layer` around the remaining layers.
    fn invoke_layer(&self, layer: usize, receiver: &mut R, context: &C) -> ContractResult<T, E> {
        let Some(binding) = self.bindings.get(layer) else {
            return (self.operation)(receiver, context).map_err(ContractError::Operation);
        };
        let condition = binding.condition();
        match binding.target() {
            Target::AllArguments => {
                self.check_all_arguments(condition, receiver, context)?;
                self.invoke_layer(layer + 1, receiver, context)
            }
            Target::Arguments {
                positions,
                names,
            } => {
                for &position in positions {
                    let value = context.argument_at(position)?;
                    check(condition, value, Stage::PreCall, || CheckTarget::Position(position))?;
                }
                for name in names {
                    let value = context.argument_named(name)?;
                    check(condition, value, Stage::PreCall, || CheckTarget::Named(name.clone()))?;
                }
                self.invoke_layer(layer + 1, receiver, context)
            }
            Target::AttributeBeforeCall(source) => {
                self.check_attribute(condition, source, receiver, Stage::PreCall)?;
                self.invoke_layer(layer + 1, receiver, context)
            }
            Target::AttributeAfterCall(source) => {
                let result = self.invoke_layer(layer + 1, receiver, context)?;
                self.check_attribute(condition, source, receiver, Stage::PostCall)?;
                Ok(result)
            }
            Target::ResultAfterCall => {
                let result = self.invoke_layer(layer + 1, receiver, context)?;
                let view = self.result_view.as_ref().ok_or(MalformedBinding::MissingResultView)?;
                let value = view(&result)?;
                check(condition, &value, Stage::PostCall, || CheckTarget::Result)?;
                Ok(result)
            }
        }
    }

    /// Checks the receiver (when exposed) and every argument.
    fn check_all_arguments(
        &self,
        condition: &Condition,
        receiver: &R,
        context: &C,
    ) -> ContractResult<(), E> {
        if let Some(value) = self.reader.as_ref().and_then(|reader| reader.receiver_value(receiver)) {
            check(condition, &value, Stage::PreCall, || CheckTarget::Receiver)?;
        }
        for (position, value) in context.positional().iter().enumerate() {
            check(condition, value, Stage::PreCall, || CheckTarget::Position(position))?;
        }
        for (name, value) in context.named() {
            check(condition, value, Stage::PreCall, || CheckTarget::Named(name.to_string()))?;
        }
        Ok(())
    }

    /// Reads an attribute and checks it.
    fn check_attribute(
        &self,
        condition: &Condition,
        source: &AttributeSource<R>,
        receiver: &R,
        stage: Stage,
    ) -> ContractResult<(), E> {
        let value = match source {
            AttributeSource::Named {
                name,
                arguments,
            } => {
                let reader = self
                    .reader
                    .as_ref()
                    .ok_or_else(|| MalformedBinding::MissingAttributeReader(name.clone()))?;
                reader.read(receiver, name, arguments)?
            }
            AttributeSource::Accessor {
                accessor, ..
            } => accessor(receiver).map_err(ContractError::External)?,
        };
        check(condition, &value, stage, || CheckTarget::Attribute(source.label().to_string()))
    }
}

impl<T, E, C> Contract<(), T, E, C>
where
    C: CallContext,
{
    /// Invokes a contract whose operation has no receiver.
    ///
    /// # Errors
    ///
    /// Same as [`Contract::call`].
    pub fn call_free(&self, context: &C) -> ContractResult<T, E> {
        self.call(&mut (), context)
    }
}

impl<R: ?Sized, T, E, C> Clone for Contract<R, T, E, C> {
    fn clone(&self) -> Self {
        Self {
            operation: Arc::clone(&self.operation),
            bindings: Arc::clone(&self.bindings),
            reader: self.reader.clone(),
            switch: Arc::clone(&self.switch),
            result_view: self.result_view.clone(),
        }
    }
}

impl<R: ?Sized, T, E, C> fmt::Debug for Contract<R, T, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("bindings", &self.bindings)
            .field("reader", &self.reader.is_some())
            .field("enabled", &self.switch.is_enabled())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Checks
// ============================================================================

/// Evaluates one condition and converts a false outcome into a violation.
fn check<E>(
    condition: &Condition,
    value: &Value,
    stage: Stage,
    target: impl FnOnce() -> CheckTarget,
) -> ContractResult<(), E> {
    if condition.evaluate(value)? {
        return Ok(());
    }
    let violation = ContractViolation {
        stage,
        target: target(),
        condition: condition.describe(),
        value: value.clone(),
    };
    debug!(
        checked = %violation.target,
        stage = %violation.stage,
        condition = %violation.condition,
        "contract violated"
    );
    Err(ContractError::Violation(violation))
}
