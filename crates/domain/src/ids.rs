use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain identifier for a trainer.
///
/// Distinct from the store-assigned opaque identifier: this is the
/// business-meaningful integer key that pokemon reference their owner
/// by. Unique across trainers, immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainerId(i64);

impl TrainerId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TrainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TrainerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<TrainerId> for i64 {
    fn from(value: TrainerId) -> Self {
        value.0
    }
}
