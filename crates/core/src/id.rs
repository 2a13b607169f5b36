//! Numeric identifiers for inventory items and sale records.
//!
//! Identifiers are plain integers on the wire (`"id": 1718000000000`). They
//! are derived from the wall clock in milliseconds, but handed out through an
//! [`IdGenerator`] so two records created in the same millisecond still get
//! distinct, increasing values.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LedgerError;

/// Identifier of an inventory item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(i64);

/// Identifier of a sale record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SaleId(i64);

/// Wire representation accepted when decoding an identifier.
///
/// Browser forms often submit `"1718000000000"` rather than a number, so both
/// are accepted; anything else is rejected.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

macro_rules! impl_numeric_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            pub fn as_raw(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| LedgerError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                match RawId::deserialize(deserializer)? {
                    RawId::Number(raw) => Ok(Self(raw)),
                    RawId::Text(text) => text.parse().map_err(serde::de::Error::custom),
                }
            }
        }
    };
}

impl_numeric_id!(ItemId, "ItemId");
impl_numeric_id!(SaleId, "SaleId");

/// Hands out unique, strictly increasing identifiers.
///
/// Each value is the current time in milliseconds unless that would not be
/// greater than the last value issued (same millisecond, clock stepped back,
/// or a restored document carrying ids from the future), in which case it is
/// `last + 1`. Items and sales draw from the same sequence.
///
/// Once `i64::MAX` has been issued or observed the sequence is exhausted and
/// every further request fails rather than repeating an identifier.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure future identifiers sort after `raw`.
    pub fn observe(&mut self, raw: i64) {
        self.last = self.last.max(raw);
    }

    pub fn last(&self) -> i64 {
        self.last
    }

    pub fn next_raw_at(&mut self, now: DateTime<Utc>) -> Result<i64, LedgerError> {
        let after_last = self.last.checked_add(1).ok_or_else(|| {
            LedgerError::validation(format!(
                "no identifiers left after {}; remove the record carrying it",
                self.last
            ))
        })?;
        let next = now.timestamp_millis().max(after_last);
        self.last = next;
        Ok(next)
    }

    pub fn next_item_id(&mut self) -> Result<ItemId, LedgerError> {
        self.next_raw_at(Utc::now()).map(ItemId)
    }

    pub fn next_sale_id(&mut self) -> Result<SaleId, LedgerError> {
        self.next_raw_at(Utc::now()).map(SaleId)
    }
}
