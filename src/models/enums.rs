use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// One of the four fixed day windows a dose can fall into.
///
/// The segments partition the 24-hour clock into contiguous half-open
/// intervals: [06,12) morning, [12,16) afternoon, [16,22) evening,
/// [22,06) night (wrapping midnight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Segment {
    pub const ALL: [Segment; 4] = [
        Segment::Morning,
        Segment::Afternoon,
        Segment::Evening,
        Segment::Night,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Segment {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            "night" => Ok(Self::Night),
            _ => Err(DatabaseError::InvalidEnum {
                field: "Segment".into(),
                value: s.into(),
            }),
        }
    }
}
