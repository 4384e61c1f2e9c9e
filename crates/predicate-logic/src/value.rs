// crates/predicate-logic/src/value.rs
// ============================================================================
// Module: Dynamic Values
// Description: Shared handles over dynamically typed data.
// Purpose: Give predicates identity, structural equality, and ordering.
// Dependencies: bigdecimal, serde, serde_json
// ============================================================================

//! ## Overview
//! [`Value`] is a cheap-to-clone handle over a JSON datum. Cloning a handle
//! keeps its identity, so identity checks can tell "the same object" apart
//! from "an equal object". Null is a singleton: every null handle is
//! identical to every other null handle.
//!
//! Numeric equality and ordering are decimal-aware, so `1` equals `1.0` and
//! large integers order exactly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::LazyLock;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Number;
use serde_json::Value as Json;

use crate::error::NotComparable;

// ============================================================================
// SECTION: Value Kind
// ============================================================================

/// Coarse kind of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// The null sentinel.
    Null,
    /// A boolean.
    Bool,
    /// A number.
    Number,
    /// A string.
    String,
    /// An array of values.
    Array,
    /// A string-keyed object.
    Object,
}

impl ValueKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Classifies a JSON datum.
    const fn of(json: &Json) -> Self {
        match json {
            Json::Null => Self::Null,
            Json::Bool(_) => Self::Bool,
            Json::Number(_) => Self::Number,
            Json::String(_) => Self::String,
            Json::Array(_) => Self::Array,
            Json::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Value Handle
// ============================================================================

/// Shared null datum; every null handle points here.
static NULL: LazyLock<Arc<Json>> = LazyLock::new(|| Arc::new(Json::Null));

/// Shared handle to a dynamically typed datum.
///
/// # Invariants
/// - The datum is immutable once wrapped.
/// - Clones share identity with the original handle.
///
/// # Non-finite numbers
/// JSON has no NaN or infinity. `From<f64>` and [`Value::from_serialize`]
/// turn them into null, so a NaN checked against `not_none` fails as
/// `null`. Use [`Value::from_finite`] to reject them instead.
#[derive(Clone)]
pub struct Value {
    /// Shared datum.
    inner: Arc<Json>,
}

impl Value {
    /// Wraps a JSON datum in a fresh handle.
    #[must_use]
    pub fn new(json: Json) -> Self {
        if json.is_null() {
            return Self::null();
        }
        Self {
            inner: Arc::new(json),
        }
    }

    /// Returns the null sentinel.
    #[must_use]
    pub fn null() -> Self {
        Self {
            inner: Arc::clone(&NULL),
        }
    }

    /// Converts any serializable value into a fresh handle.
    ///
    /// # Errors
    ///
    /// Returns the serializer error when `value` cannot be represented as JSON.
    pub fn from_serialize<T>(value: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_value(value).map(Self::new)
    }

    /// Wraps a float, returning `None` for NaN and infinities.
    #[must_use]
    pub fn from_finite(value: f64) -> Option<Self> {
        Number::from_f64(value).map(|number| Self::new(Json::Number(number)))
    }

    /// Returns true for the null sentinel.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.inner.is_null()
    }

    /// Returns the kind of the wrapped datum.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        ValueKind::of(&self.inner)
    }

    /// Borrows the wrapped datum.
    #[must_use]
    pub fn as_json(&self) -> &Json {
        &self.inner
    }

    /// Returns the wrapped integer, if the datum is an integer that fits `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.inner.as_i64()
    }

    /// Returns the wrapped string, if the datum is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.inner.as_str()
    }

    /// Returns true when both handles denote the same object.
    ///
    /// Null is a singleton, so two null handles are always the same object.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || (self.is_null() && other.is_null())
    }

    /// Orders this value against `other`.
    ///
    /// # Errors
    ///
    /// Returns [`NotComparable`] when the two values have no common ordering.
    pub fn compare(&self, other: &Self) -> Result<Ordering, NotComparable> {
        json_cmp(&self.inner, &other.inner)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || json_eq(&self.inner, &other.inner)
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

// ============================================================================
// SECTION: Formatting
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.as_ref() {
            Json::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(self.inner.as_ref()).finish()
    }
}

// ============================================================================
// SECTION: Serde
// ============================================================================

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.inner.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Json::deserialize(deserializer).map(Self::new)
    }
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        Self::new(json)
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::new(Json::Bool(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::new(Json::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::new(Json::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::new(Json::from(value))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::new(Json::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::new(Json::from(value))
    }
}

/// Non-finite floats have no JSON representation and become null; see
/// [`Value::from_finite`].
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::new(Number::from_f64(value).map_or(Json::Null, Json::Number))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::new(Json::String(value.to_string()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::new(Json::String(value))
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Self>,
{
    fn from(values: Vec<T>) -> Self {
        let items = values.into_iter().map(|item| item.into().as_json().clone()).collect();
        Self::new(Json::Array(items))
    }
}

// ============================================================================
// SECTION: Equality + Ordering Helpers
// ============================================================================

/// Structural equality with decimal-aware numbers.
fn json_eq(left: &Json, right: &Json) -> bool {
    match (left, right) {
        (Json::Number(left), Json::Number(right)) => {
            match (decimal_from_number(left), decimal_from_number(right)) {
                (Some(left), Some(right)) => left == right,
                _ => left == right,
            }
        }
        (Json::Array(left), Json::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right).all(|(l, r)| json_eq(l, r))
        }
        (Json::Object(left), Json::Object(right)) => {
            left.len() == right.len()
                && left.iter().all(|(key, l)| right.get(key).is_some_and(|r| json_eq(l, r)))
        }
        _ => left == right,
    }
}

/// Orders two JSON data, failing for pairs without a common ordering.
fn json_cmp(left: &Json, right: &Json) -> Result<Ordering, NotComparable> {
    let incomparable = || NotComparable::new(ValueKind::of(left), ValueKind::of(right));
    match (left, right) {
        (Json::Number(l), Json::Number(r)) => decimal_cmp(l, r).ok_or_else(incomparable),
        (Json::String(l), Json::String(r)) => Ok(l.cmp(r)),
        (Json::Bool(l), Json::Bool(r)) => Ok(l.cmp(r)),
        (Json::Array(l), Json::Array(r)) => {
            for (a, b) in l.iter().zip(r) {
                let ordering = json_cmp(a, b)?;
                if ordering.is_ne() {
                    return Ok(ordering);
                }
            }
            Ok(l.len().cmp(&r.len()))
        }
        _ => Err(incomparable()),
    }
}

/// Orders numeric JSON values using decimal-aware comparison.
fn decimal_cmp(left: &Number, right: &Number) -> Option<Ordering> {
    let left = decimal_from_number(left)?;
    let right = decimal_from_number(right)?;
    Some(left.cmp(&right))
}

/// Parses a JSON number into `BigDecimal` with a stable string representation.
fn decimal_from_number(number: &Number) -> Option<BigDecimal> {
    BigDecimal::from_str(&number.to_string()).ok()
}
