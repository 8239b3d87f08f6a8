use std::fmt::Display;

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRef, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WattHours(pub i32);

impl WattHours {
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Display for WattHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Wh", self.0)
    }
}

impl From<i32> for WattHours {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<WattHours> for i32 {
    fn from(value: WattHours) -> Self {
        value.0
    }
}
