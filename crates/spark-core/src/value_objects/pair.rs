//! Unordered user pair

use serde::Serialize;

use super::Snowflake;

/// Two users with no direction, stored low id first
///
/// `PairKey::new(a, b) == PairKey::new(b, a)` for any `a`, `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PairKey {
    low: Snowflake,
    high: Snowflake,
}

impl PairKey {
    pub fn new(a: Snowflake, b: Snowflake) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    #[inline]
    pub fn low(&self) -> Snowflake {
        self.low
    }

    #[inline]
    pub fn high(&self) -> Snowflake {
        self.high
    }

    pub fn contains(&self, user: Snowflake) -> bool {
        self.low == user || self.high == user
    }

    /// The member of the pair that is not `user`
    pub fn other(&self, user: Snowflake) -> Option<Snowflake> {
        if user == self.low {
            Some(self.high)
        } else if user == self.high {
            Some(self.low)
        } else {
            None
        }
    }
}
