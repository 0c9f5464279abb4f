use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of per-user records the calculators read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    Valuation,
    UnitEconomics,
}

impl RecordKind {
    /// All record kinds, in the order onboarding seeds them.
    pub const ALL: [RecordKind; 2] = [RecordKind::UnitEconomics, RecordKind::Valuation];

    /// Returns the attribute name the record is stored under.
    pub fn attribute(&self) -> &'static str {
        match self {
            RecordKind::Valuation => "valuation",
            RecordKind::UnitEconomics => "unitEconomics",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

impl FromStr for RecordKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valuation" => Ok(RecordKind::Valuation),
            "unitEconomics" => Ok(RecordKind::UnitEconomics),
            other => Err(CoreError::InvalidInput(
                "record kind".to_string(),
                other.to_string(),
            )),
        }
    }
}
