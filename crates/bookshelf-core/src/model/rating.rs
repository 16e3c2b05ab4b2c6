use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// A star rating from 0 to [`Rating::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, Error> {
        Self::try_from(i64::from(value))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Render as filled and empty stars, e.g. `★★★☆☆`.
    #[must_use]
    pub fn stars(self) -> String {
        let filled = usize::from(self.0);
        let empty = usize::from(Self::MAX - self.0);
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }
}

impl TryFrom<i64> for Rating {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
            .ok_or(Error::InvalidRating {
                value,
                max: Self::MAX,
            })
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}
