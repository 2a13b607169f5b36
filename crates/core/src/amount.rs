//! Monetary amounts that keep their wire form.
//!
//! A stored `"costPrice": 2` must come back as `2`, not `2.0`, so the number
//! is held as the JSON number it was read as. Amounts computed here are
//! written the way a browser would: whole values without a fraction.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Largest integer an `f64` represents exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Number);

impl Amount {
    /// Wrap a computed value. Non-finite values become zero.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
            return Self(Number::from(value as i64));
        }
        Self(Number::from_f64(value).unwrap_or_else(|| Number::from(0)))
    }

    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or(0.0)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}
