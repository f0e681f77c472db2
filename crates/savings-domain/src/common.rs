//! Shared identifiers and numeric coercion rules for budgeting primitives.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier for a plan. Persisted as a bare integer.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PlanId(pub u64);

impl PlanId {
    /// Placeholder for plans whose id has not been assigned by a store yet.
    pub const UNASSIGNED: PlanId = PlanId(0);

    /// Derives an id from a creation timestamp, in milliseconds since the epoch.
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        PlanId(at.timestamp_millis().max(1) as u64)
    }

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Keeps a typed amount only when it is finite and strictly positive.
///
/// Every numeric field of a plan goes through this rule before it takes part
/// in a calculation, so partially filled plans never produce NaN or negative
/// contributions.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Coerces an arbitrary JSON value into a non-negative finite number.
///
/// Numbers and numeric strings pass through [`sanitize_amount`]; anything else
/// (null, booleans, arrays, objects, unparsable text) becomes `0.0`.
pub fn to_non_negative_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().map(sanitize_amount).unwrap_or(0.0),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map(sanitize_amount)
            .unwrap_or(0.0),
        _ => 0.0,
    }
}
