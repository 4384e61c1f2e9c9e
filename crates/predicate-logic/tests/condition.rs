// crates/predicate-logic/tests/condition.rs
// ============================================================================
// Module: Condition Tree Tests
// Description: Truth tables, short-circuiting, descriptions, and operators.
// Purpose: Ensure combinators compose leaves without surprises.
// Dependencies: predicate_logic
// ============================================================================
//! ## Overview
//! Integration tests for [`predicate_logic::Condition`] combinators.

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

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use predicate_logic::Condition;
use predicate_logic::LeafLog;
use predicate_logic::Predicate;
use predicate_logic::PredicateError;
use predicate_logic::Value;
use predicate_logic::convenience;
use predicate_logic::convenience::equals;
use predicate_logic::convenience::function;
use predicate_logic::convenience::greater_than;
use predicate_logic::convenience::less_than;
use predicate_logic::convenience::not_none;
use support::TestResult;
use support::ensure;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Error raised by the exploding predicate.
#[derive(Debug)]
struct Exploded;

impl fmt::Display for Exploded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("exploded")
    }
}

impl std::error::Error for Exploded {}

/// Constant predicate that ignores its input.
fn constant(outcome: bool) -> Condition {
    function(if outcome { "always true" } else { "always false" }, move |_: &Value| outcome)
}

/// Predicate that fails and counts how often it ran.
fn explodes(calls: &Arc<AtomicUsize>) -> Condition {
    let calls = Arc::clone(calls);
    convenience::fallible("explodes", move |_: &Value| {
        calls.fetch_add(1, Ordering::SeqCst);
        Err::<bool, _>(Exploded)
    })
}

/// Evaluates a condition against the null value.
fn eval(condition: &Condition) -> TestResult<bool> {
    Ok(condition.evaluate(&Value::null())?)
}

// ============================================================================
// SECTION: Truth Tables
// ============================================================================

/// Tests and truth table.
#[test]
fn test_and_truth_table() -> TestResult {
    for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
        let outcome = eval(&convenience::and(constant(a), constant(b)))?;
        ensure(outcome == (a && b), format!("and({a}, {b}) returned {outcome}"))?;
    }
    Ok(())
}

/// Tests or truth table.
#[test]
fn test_or_truth_table() -> TestResult {
    for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
        let outcome = eval(&convenience::or(constant(a), constant(b)))?;
        ensure(outcome == (a || b), format!("or({a}, {b}) returned {outcome}"))?;
    }
    Ok(())
}

/// Tests not truth table.
#[test]
fn test_not_truth_table() -> TestResult {
    for a in [false, true] {
        let outcome = eval(&convenience::not(constant(a)))?;
        ensure(outcome == !a, format!("not({a}) returned {outcome}"))?;
    }
    Ok(())
}

/// Tests range composition.
#[test]
fn test_range_composition() -> TestResult {
    let inside = greater_than(10) & less_than(20);
    for (value, expected) in [(11, true), (10, false), (19, true), (20, false)] {
        let outcome = inside.evaluate(&Value::from(value))?;
        ensure(outcome == expected, format!("range check failed for {value}"))?;
    }

    let outside = greater_than(20) | less_than(10);
    for (value, expected) in [(9, true), (10, false), (21, true), (20, false), (15, false)] {
        let outcome = outside.evaluate(&Value::from(value))?;
        ensure(outcome == expected, format!("outside check failed for {value}"))?;
    }
    Ok(())
}

/// Tests not equals.
#[test]
fn test_not_equals() -> TestResult {
    let condition = !equals("String");
    ensure(!condition.evaluate(&Value::from("String"))?, "equal text must fail")?;
    ensure(condition.evaluate(&Value::from("AnotherString"))?, "other text must pass")?;
    Ok(())
}

// ============================================================================
// SECTION: Short-Circuiting
// ============================================================================

/// Tests and skips right operand when left fails.
#[test]
fn test_and_skips_right_operand_when_left_fails() -> TestResult {
    let calls = Arc::new(AtomicUsize::new(0));
    let condition = constant(false) & explodes(&calls);
    ensure(!eval(&condition)?, "false and x is false")?;
    ensure(calls.load(Ordering::SeqCst) == 0, "right operand must not run")?;
    Ok(())
}

/// Tests or skips right operand when left holds.
#[test]
fn test_or_skips_right_operand_when_left_holds() -> TestResult {
    let calls = Arc::new(AtomicUsize::new(0));
    let condition = constant(true) | explodes(&calls);
    ensure(eval(&condition)?, "true or x is true")?;
    ensure(calls.load(Ordering::SeqCst) == 0, "right operand must not run")?;
    Ok(())
}

/// Tests right operand errors propagate when reached.
#[test]
fn test_right_operand_errors_propagate_when_reached() -> TestResult {
    let calls = Arc::new(AtomicUsize::new(0));
    let condition = constant(true) & explodes(&calls);
    let result = condition.evaluate(&Value::null());
    let Err(error) = result else {
        return Err("expected the exploding predicate to fail".into());
    };
    ensure(error.downcast_function_ref::<Exploded>().is_some(), "original error type preserved")?;
    ensure(matches!(error, PredicateError::Function(_)), "function failure variant")?;
    ensure(calls.load(Ordering::SeqCst) == 1, "right operand ran exactly once")?;
    Ok(())
}

// ============================================================================
// SECTION: Composition Semantics
// ============================================================================

/// Tests borrowed operators leave operands usable.
#[test]
fn test_borrowed_operators_leave_operands_usable() -> TestResult {
    let low = greater_than(0);
    let high = less_than(10);
    let both = &low & &high;
    let either = &low | &high;
    let neither = !&both;

    ensure(low.evaluate(&Value::from(-1)).is_ok_and(|v| !v), "operand unchanged")?;
    ensure(both.evaluate(&Value::from(5))?, "5 within range")?;
    ensure(either.evaluate(&Value::from(50))?, "50 above zero")?;
    ensure(neither.evaluate(&Value::from(50))?, "50 outside range")?;
    ensure(low.describe() == "greater than 0", "operand description unchanged")?;
    Ok(())
}

/// Tests descriptions compose.
#[test]
fn test_descriptions_compose() -> TestResult {
    let condition = (greater_than(10) & less_than(20)) | !not_none();
    ensure(
        condition.describe() == "greater than 10 and less than 20 or not is not null",
        format!("unexpected description: {}", condition.describe()),
    )?;
    ensure(condition.to_string() == condition.describe(), "display matches description")?;
    Ok(())
}

/// Tests named constructors match operators.
#[test]
fn test_named_constructors_match_operators() -> TestResult {
    let named = convenience::and(greater_than(1), convenience::not(equals(5)));
    let infix = greater_than(1) & !equals(5);
    for value in [0, 1, 2, 5, 6] {
        let value = Value::from(value);
        ensure(
            named.evaluate(&value)? == infix.evaluate(&value)?,
            "named and infix construction must agree",
        )?;
    }
    Ok(())
}

/// Tests evaluation is deterministic.
#[test]
fn test_evaluation_is_deterministic() -> TestResult {
    let condition = (greater_than(3) | equals("x")) & not_none();
    let value = Value::from(4);
    let first = condition.evaluate(&value)?;
    for _ in 0 .. 16 {
        ensure(condition.evaluate(&value)? == first, "repeated evaluation must agree")?;
    }
    Ok(())
}

/// Tests conditions over typed values.
#[test]
fn test_conditions_over_typed_values() -> TestResult {
    let even: Condition<i64> = function("is even", |value: &i64| value % 2 == 0);
    let positive: Condition<i64> = function("is positive", |value: &i64| *value > 0);
    let condition = even & positive;
    ensure(condition.evaluate(&4)?, "4 is even and positive")?;
    ensure(!condition.evaluate(&-4)?, "-4 is not positive")?;
    ensure(condition.describe() == "is even and is positive", "typed description")?;
    Ok(())
}

/// Tests conditions are shareable across threads.
#[test]
fn test_conditions_are_shareable_across_threads() -> TestResult {
    let condition = Arc::new(greater_than(0) & less_than(100));
    let handles: Vec<_> = (0 .. 4)
        .map(|offset| {
            let condition = Arc::clone(&condition);
            std::thread::spawn(move || condition.evaluate(&Value::from(offset * 10)).is_ok())
        })
        .collect();
    for handle in handles {
        ensure(handle.join().is_ok_and(|ok| ok), "evaluation on worker thread")?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Tests trace reports only evaluated leaves.
#[test]
fn test_trace_reports_only_evaluated_leaves() -> TestResult {
    let condition = less_than(5) & greater_than(0);
    let mut log = LeafLog::new();
    let outcome = condition.evaluate_with_trace(&Value::from(7), &mut log)?;
    ensure(!outcome, "7 is not less than 5")?;
    ensure(log.entries().len() == 1, "short-circuited leaf must not be traced")?;
    ensure(log.failed().eq(["less than 5"]), "failing leaf recorded")?;

    let mut log = LeafLog::new();
    let outcome = condition.evaluate_with_trace(&Value::from(3), &mut log)?;
    ensure(outcome, "3 is within range")?;
    ensure(
        log.entries() == [("less than 5".to_string(), true), ("greater than 0".to_string(), true)],
        "both leaves recorded in order",
    )?;
    Ok(())
}
