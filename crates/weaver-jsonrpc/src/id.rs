//! Request identifiers and their total ordering.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{self, AtomicI64};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Identifier correlating a request with its response.
///
/// Identifiers are totally ordered: `Null < Number(_) < String(_)`. Numbers
/// compare by numeric value (an integer sorts before an equal float) and
/// strings lexicographically. This makes the type usable as a `BTreeMap` key
/// for pending request tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Explicit JSON `null`, used by servers answering unparseable requests.
    Null,
    /// Numeric identifier, integral or not.
    Number(Number),
    /// String identifier.
    String(String),
}

impl RequestId {
    /// Interprets a JSON value as an identifier.
    ///
    /// Strings, numbers and `null` are accepted. Returns `None` for booleans,
    /// arrays and objects.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::Null),
            Value::Number(number) => Some(Self::Number(number.clone())),
            Value::String(text) => Some(Self::String(text.clone())),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Encodes the identifier as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Number(number) => Value::Number(number.clone()),
            Self::String(text) => Value::String(text.clone()),
        }
    }

    /// Position of the tag in the identifier order.
    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Number(_) => 1,
            Self::String(_) => 2,
        }
    }
}

/// Orders two JSON numbers by value.
///
/// Integers are compared exactly. Mixed or fractional values fall back to
/// `f64`, with the integer first when the values coincide so the order agrees
/// with `Number` equality.
fn compare_numbers(left: &Number, right: &Number) -> Ordering {
    if let (Some(lhs), Some(rhs)) = (left.as_i64(), right.as_i64()) {
        return lhs.cmp(&rhs);
    }
    if let (Some(lhs), Some(rhs)) = (left.as_u64(), right.as_u64()) {
        return lhs.cmp(&rhs);
    }
    match (left.is_f64(), right.is_f64()) {
        // One integer is negative, the other exceeds `i64::MAX`.
        (false, false) => {
            if left.is_u64() {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (left_float, right_float) => left
            .as_f64()
            .zip(right.as_f64())
            .and_then(|(lhs, rhs)| lhs.partial_cmp(&rhs))
            .unwrap_or(Ordering::Equal)
            .then(left_float.cmp(&right_float)),
    }
}

impl Ord for RequestId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(left), Self::Number(right)) => compare_numbers(left, right),
            (Self::String(left), Self::String(right)) => left.cmp(right),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for RequestId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Number(number) => write!(formatter, "{number}"),
            Self::String(text) => formatter.write_str(text),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i32> for RequestId {
    fn from(value: i32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u32> for RequestId {
    fn from(value: u32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Thread-safe source of numeric request identifiers.
///
/// Identifiers are monotonically increasing. Each generator keeps its own
/// counter, so independent connections never share a sequence.
#[derive(Debug)]
pub struct RequestIdGenerator {
    next: AtomicI64,
}

impl RequestIdGenerator {
    /// Creates a generator whose first identifier is `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a generator whose first identifier is `first`.
    #[must_use]
    pub const fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }

    /// Returns the next identifier.
    #[must_use]
    pub fn next_id(&self) -> RequestId {
        RequestId::from(self.next.fetch_add(1, atomic::Ordering::SeqCst))
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
