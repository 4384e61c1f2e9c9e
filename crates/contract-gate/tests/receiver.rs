// crates/contract-gate/tests/receiver.rs
// ============================================================================
// Module: Receiver Contract Tests
// Description: Contracts on the methods of a stateful receiver.
// Purpose: Exercise every enforcement strategy against a value holder with
//          setters, getters, and guarded increments.
// Dependencies: contract_gate, predicate_logic
// ============================================================================
//! ## Overview
//! Integration tests for argument, attribute, and result checks on a receiver.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::convert::Infallible;
use std::sync::Arc;

use contract_gate::Arguments;
use contract_gate::AttributeSource;
use contract_gate::AttributeTable;
use contract_gate::CallContext;
use contract_gate::CheckTarget;
use contract_gate::Contract;
use contract_gate::ContractBinding;
use contract_gate::ContractError;
use contract_gate::ContractSwitch;
use contract_gate::Stage;
use predicate_logic::Value;
use predicate_logic::convenience::greater_than;
use predicate_logic::convenience::less_than;
use predicate_logic::convenience::not_none;
use support::TestResult;
use support::ensure;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Receiver holding a value and a text slot.
#[derive(Debug, Default)]
struct Thing {
    /// Stored value.
    value: Value,
    /// Stored text.
    text: Value,
}

/// Contract over a `Thing` method.
type ThingContract<T> = Contract<Thing, T, Infallible>;

/// Exposes the stored value as a field and through an accessor.
fn thing_attributes() -> AttributeTable<Thing> {
    AttributeTable::new().field("value", |thing: &Thing| thing.value.clone()).method(
        "get_value",
        |thing: &Thing, _: &[Value]| Ok::<_, Infallible>(thing.value.clone()),
    )
}

/// Returns an enabled switch private to one test.
fn switch() -> Arc<ContractSwitch> {
    Arc::new(ContractSwitch::new())
}

/// Returns the positional argument at `position`, or null.
fn positional(args: &Arguments, position: usize) -> Value {
    args.positional().get(position).cloned().unwrap_or_default()
}

/// Stores the value and text positional arguments.
fn set_value_and_text(thing: &mut Thing, args: &Arguments) -> Result<(), Infallible> {
    thing.value = positional(args, 0);
    thing.text = positional(args, 1);
    Ok(())
}

/// Stores the value and text named arguments.
fn set_named_value_and_text(thing: &mut Thing, args: &Arguments) -> Result<(), Infallible> {
    thing.value = args.named_value("value").cloned().unwrap_or_default();
    thing.text = args.named_value("text").cloned().unwrap_or_default();
    Ok(())
}

/// Stores the first positional argument as the value.
fn set_value(thing: &mut Thing, args: &Arguments) -> Result<(), Infallible> {
    thing.value = positional(args, 0);
    Ok(())
}

/// Returns the stored value.
fn get_value(thing: &mut Thing, _: &Arguments) -> Result<Value, Infallible> {
    Ok(thing.value.clone())
}

/// Adds `step` to the stored value and returns the new value.
fn shift(thing: &mut Thing, step: i64) -> Result<i64, Infallible> {
    let next = thing.value.as_i64().unwrap_or_default() + step;
    thing.value = Value::from(next);
    Ok(next)
}

/// Returns the violation carried by a failed call.
fn violation_of<T>(result: Result<T, ContractError<Infallible>>) -> TestResult<(Stage, CheckTarget, String)> {
    match result {
        Err(ContractError::Violation(violation)) => {
            Ok((violation.stage, violation.target, violation.condition))
        }
        Err(other) => Err(format!("expected a violation, got {other}").into()),
        Ok(_) => Err("expected a violation, call succeeded".into()),
    }
}

// ============================================================================
// SECTION: Argument Checks
// ============================================================================

/// Tests all arguments not none.
#[test]
fn test_all_arguments_not_none() -> TestResult {
    let contract: ThingContract<()> = Contract::builder(set_value_and_text)
        .require(ContractBinding::all_arguments(not_none()))
        .with_switch(switch())
        .build()?;
    let mut thing = Thing::default();
    contract.call(&mut thing, &Arguments::new().with(1).with("1"))?;
    ensure(thing.text.as_str() == Some("1"), "setter ran")?;

    let rejected = [
        Arguments::new().with(Value::null()).with(""),
        Arguments::new().with(Value::null()).with(Value::null()),
        Arguments::new().with(1).with(Value::null()),
    ];
    for args in &rejected {
        let result = contract.call(&mut thing, args);
        ensure(result.is_err_and(|error| error.is_violation()), "null argument must violate")?;
    }
    ensure(thing.value.as_i64() == Some(1), "rejected calls leave the value unchanged")?;
    ensure(thing.text.as_str() == Some("1"), "rejected calls leave the text unchanged")?;
    Ok(())
}

/// Tests selected position not none.
#[test]
fn test_selected_position_not_none() -> TestResult {
    let contract: ThingContract<()> = Contract::builder(set_value_and_text)
        .require(ContractBinding::positions(not_none(), [0]))
        .with_switch(switch())
        .build()?;
    let mut thing = Thing::default();
    contract.call(&mut thing, &Arguments::new().with(1).with("1"))?;
    contract.call(&mut thing, &Arguments::new().with(1).with(Value::null()))?;
    ensure(thing.text.is_null(), "unchecked position accepts null")?;

    for args in [
        Arguments::new().with(Value::null()).with(""),
        Arguments::new().with(Value::null()).with(Value::null()),
    ] {
        let (stage, target, condition) = violation_of(contract.call(&mut thing, &args))?;
        ensure(stage == Stage::PreCall, "argument checks run before the call")?;
        ensure(target == CheckTarget::Position(0), "violation names the position")?;
        ensure(condition == "is not null", "violation names the condition")?;
    }
    Ok(())
}

/// Tests named argument not none.
#[test]
fn test_named_argument_not_none() -> TestResult {
    let contract: ThingContract<()> = Contract::builder(set_named_value_and_text)
        .require(ContractBinding::names(not_none(), ["value"]))
        .with_switch(switch())
        .build()?;
    let mut thing = Thing::default();
    contract.call(&mut thing, &Arguments::new().with_named("value", 1).with_named("text", "1"))?;
    contract
        .call(&mut thing, &Arguments::new().with_named("value", 1).with_named("text", Value::null()))?;

    let args = Arguments::new().with_named("value", Value::null()).with_named("text", "");
    let (_, target, _) = violation_of(contract.call(&mut thing, &args))?;
    ensure(target == CheckTarget::Named("value".to_string()), "violation names the argument")?;
    ensure(thing.value.as_i64() == Some(1), "rejected call leaves the value unchanged")?;
    Ok(())
}

/// Tests selected position greater than zero.
#[test]
fn test_selected_position_greater_than_zero() -> TestResult {
    let setter: ThingContract<()> = Contract::builder(set_value)
        .require(ContractBinding::positions(greater_than(0), [0]))
        .with_switch(switch())
        .build()?;
    let mut thing = Thing::default();
    setter.call(&mut thing, &Arguments::new().with(99))?;
    ensure(thing.value.as_i64() == Some(99), "positive value stored")?;

    let (_, _, condition) = violation_of(setter.call(&mut thing, &Arguments::new().with(-5)))?;
    ensure(condition == "greater than 0", "negative value violates")?;

    let null = setter.call(&mut thing, &Arguments::new().with(Value::null()));
    ensure(
        matches!(null, Err(ContractError::NotComparable(_))),
        "null has no ordering against a number",
    )?;
    ensure(thing.value.as_i64() == Some(99), "failed calls leave the value unchanged")?;
    Ok(())
}

/// Tests stacked not none then less than.
#[test]
fn test_stacked_not_none_then_less_than() -> TestResult {
    let setter: ThingContract<()> = Contract::builder(set_value)
        .require(ContractBinding::positions(not_none(), [0]))
        .require(ContractBinding::positions(less_than(10), [0]))
        .with_switch(switch())
        .build()?;
    let mut thing = Thing::default();
    setter.call(&mut thing, &Arguments::new().with(4))?;
    ensure(thing.value.as_i64() == Some(4), "small value stored")?;

    let (_, _, condition) = violation_of(setter.call(&mut thing, &Arguments::new().with(111)))?;
    ensure(condition == "less than 10", "inner binding rejects large values")?;

    let (_, _, condition) =
        violation_of(setter.call(&mut thing, &Arguments::new().with(Value::null())))?;
    ensure(condition == "is not null", "outer binding rejects null before ordering runs")?;
    Ok(())
}

// ============================================================================
// SECTION: Attribute Checks
// ============================================================================

/// Tests decrement guarded by field.
#[test]
fn test_decrement_guarded_by_field() -> TestResult {
    let decrement: ThingContract<i64> =
        Contract::builder(|thing: &mut Thing, _: &Arguments| shift(thing, -1))
            .require(ContractBinding::attribute_before(
                greater_than(0),
                AttributeSource::named("value"),
            ))
            .with_reader(thing_attributes())
            .with_switch(switch())
            .build()?;
    let mut thing = Thing {
        value: Value::from(2),
        ..Thing::default()
    };
    let args = Arguments::new();
    ensure(decrement.call(&mut thing, &args)? == 1, "2 - 1")?;
    ensure(decrement.call(&mut thing, &args)? == 0, "1 - 1")?;
    let (stage, target, _) = violation_of(decrement.call(&mut thing, &args))?;
    ensure(stage == Stage::PreCall, "field read before the call")?;
    ensure(target == CheckTarget::Attribute("value".to_string()), "violation names the field")?;
    ensure(thing.value.as_i64() == Some(0), "guarded body did not run")?;
    Ok(())
}

/// Tests increment guarded by accessor.
#[test]
fn test_increment_guarded_by_accessor() -> TestResult {
    let increment: ThingContract<i64> =
        Contract::builder(|thing: &mut Thing, _: &Arguments| shift(thing, 1))
            .require(ContractBinding::attribute_before(
                less_than(10),
                AttributeSource::named("get_value"),
            ))
            .with_reader(thing_attributes())
            .with_switch(switch())
            .build()?;
    let mut thing = Thing {
        value: Value::from(8),
        ..Thing::default()
    };
    let args = Arguments::new();
    ensure(increment.call(&mut thing, &args)? == 9, "8 + 1")?;
    ensure(increment.call(&mut thing, &args)? == 10, "9 + 1")?;
    ensure(increment.call(&mut thing, &args).is_err_and(|e| e.is_violation()), "10 is not < 10")?;
    ensure(thing.value.as_i64() == Some(10), "guarded body did not run")?;
    Ok(())
}

/// Tests inline accessor needs no reader.
#[test]
fn test_inline_accessor_needs_no_reader() -> TestResult {
    let decrement: ThingContract<i64> =
        Contract::builder(|thing: &mut Thing, _: &Arguments| shift(thing, -1))
            .require(ContractBinding::attribute_before(
                greater_than(0),
                AttributeSource::accessor("value", |thing: &Thing| thing.value.clone()),
            ))
            .with_switch(switch())
            .build()?;
    let mut thing = Thing {
        value: Value::from(1),
        ..Thing::default()
    };
    ensure(decrement.call(&mut thing, &Arguments::new())? == 0, "1 - 1")?;
    let (_, target, _) = violation_of(decrement.call(&mut thing, &Arguments::new()))?;
    ensure(target == CheckTarget::Attribute("value".to_string()), "accessor label reported")?;
    Ok(())
}

/// Tests post attribute keeps side effect.
#[test]
fn test_post_attribute_keeps_side_effect() -> TestResult {
    let setter: ThingContract<()> = Contract::builder(set_value)
        .require(ContractBinding::attribute_after(not_none(), AttributeSource::named("value")))
        .with_reader(thing_attributes())
        .with_switch(switch())
        .build()?;
    let mut thing = Thing::default();
    setter.call(&mut thing, &Arguments::new().with(8))?;
    ensure(thing.value.as_i64() == Some(8), "value stored")?;

    let (stage, _, _) = violation_of(setter.call(&mut thing, &Arguments::new().with(Value::null())))?;
    ensure(stage == Stage::PostCall, "field read after the call")?;
    ensure(thing.value.is_null(), "side effect is not rolled back")?;
    Ok(())
}

// ============================================================================
// SECTION: Result Checks
// ============================================================================

/// Tests result not none.
#[test]
fn test_result_not_none() -> TestResult {
    let getter: ThingContract<Value> = Contract::builder(get_value)
        .require_result(not_none())
        .with_switch(switch())
        .build()?;
    let setter: ThingContract<()> = Contract::builder(set_value)
        .require(ContractBinding::attribute_after(not_none(), AttributeSource::named("value")))
        .with_reader(thing_attributes())
        .with_switch(switch())
        .build()?;
    let mut thing = Thing::default();
    setter.call(&mut thing, &Arguments::new().with(99))?;
    ensure(getter.call(&mut thing, &Arguments::new())?.as_i64() == Some(99), "getter returns 99")?;

    thing.value = Value::null();
    let (stage, target, _) = violation_of(getter.call(&mut thing, &Arguments::new()))?;
    ensure(stage == Stage::PostCall, "result checked after the call")?;
    ensure(target == CheckTarget::Result, "violation names the result")?;
    Ok(())
}

/// Tests setter then getter end to end.
#[test]
fn test_setter_then_getter_end_to_end() -> TestResult {
    let setter: ThingContract<()> = Contract::builder(set_value)
        .require(ContractBinding::all_arguments(not_none()))
        .with_switch(switch())
        .build()?;
    let getter: ThingContract<Value> = Contract::builder(get_value).with_switch(switch()).build()?;
    let mut thing = Thing::default();

    setter.call(&mut thing, &Arguments::new().with(5))?;
    ensure(getter.call(&mut thing, &Arguments::new())?.as_i64() == Some(5), "getter returns 5")?;

    let rejected = setter.call(&mut thing, &Arguments::new().with(Value::null()));
    ensure(rejected.is_err_and(|e| e.is_violation()), "null rejected")?;
    ensure(getter.call(&mut thing, &Arguments::new())?.as_i64() == Some(5), "value unchanged")?;
    Ok(())
}

// ============================================================================
// SECTION: Receiver Participation
// ============================================================================

/// Tests receiver checked only when exposed.
#[test]
fn test_receiver_checked_only_when_exposed() -> TestResult {
    let args = Arguments::new().with(1).with("1");
    let hidden: ThingContract<()> = Contract::builder(set_value_and_text)
        .require(ContractBinding::all_arguments(not_none()))
        .with_reader(thing_attributes())
        .with_switch(switch())
        .build()?;
    let mut thing = Thing::default();
    hidden.call(&mut thing, &args)?;

    let exposed: ThingContract<()> = Contract::builder(set_value_and_text)
        .require(ContractBinding::all_arguments(not_none()))
        .with_reader(thing_attributes().with_receiver_value(|thing: &Thing| thing.value.clone()))
        .with_switch(switch())
        .build()?;
    thing.value = Value::null();
    let (_, target, _) = violation_of(exposed.call(&mut thing, &args))?;
    ensure(target == CheckTarget::Receiver, "receiver checked first")?;
    Ok(())
}
