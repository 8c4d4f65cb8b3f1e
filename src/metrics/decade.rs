use serde::{Serialize, Serializer};
use std::fmt;

/// The ten-year period a release year falls into. Titles without a known
/// year land in `Unknown`, which sorts after every decade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecadeBucket {
    Decade(i32),
    Unknown,
}

impl DecadeBucket {
    pub fn from_year(year: Option<i32>) -> Self {
        match year {
            Some(year) => DecadeBucket::Decade(year.div_euclid(10) * 10),
            None => DecadeBucket::Unknown,
        }
    }

    pub fn start_year(&self) -> Option<i32> {
        match self {
            DecadeBucket::Decade(start) => Some(*start),
            DecadeBucket::Unknown => None,
        }
    }
}

impl fmt::Display for DecadeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecadeBucket::Decade(start) => write!(f, "{}s", start),
            DecadeBucket::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for DecadeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecadeBucket::Decade(start) => serializer.serialize_i32(*start),
            DecadeBucket::Unknown => serializer.serialize_str("unknown"),
        }
    }
}
