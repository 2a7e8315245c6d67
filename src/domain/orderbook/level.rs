/// Price Level Primitives
///
/// `Price` is a totally ordered wrapper around the feed's floating point
/// prices so it can key a `BTreeMap`. Construction goes through
/// `Price::new`, which only admits finite, strictly positive values.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Book side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }

    /// Returns true if `candidate` ranks at least as well as `reference`
    /// under this side's ordering (higher for bids, lower for asks).
    #[inline]
    pub fn ranks_at_least(&self, candidate: Price, reference: Price) -> bool {
        match self {
            Side::Bid => candidate >= reference,
            Side::Ask => candidate <= reference,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finite, strictly positive price
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    /// Returns `None` for NaN, infinities, zero and negative values
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value > 0.0 {
            Some(Price(value))
        } else {
            None
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Price {}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single price and its aggregate resting size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceLevel {
    pub price: Price,
    pub size: f64,
}

impl PriceLevel {
    pub fn new(price: Price, size: f64) -> Self {
        Self { price, size }
    }
}
