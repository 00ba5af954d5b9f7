use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SwimmerId(pub i64);

impl fmt::Display for SwimmerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tracked swimmer and the laps counted for them so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swimmer {
    pub id: SwimmerId,
    pub name: String,
    pub lap_count: u32,
}

impl Swimmer {
    pub fn new(id: SwimmerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            lap_count: 0,
        }
    }

    /// Lenient decode of one persisted record.
    ///
    /// Returns `None` when a required field is missing, has the wrong type,
    /// the lap count is negative or the name is blank.
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.as_object()?;
        let id = record.get("id")?.as_i64()?;
        let name = normalize_name(record.get("name")?.as_str()?)?;
        let lap_count = u32::try_from(record.get("lapCount")?.as_u64()?).ok()?;
        Some(Self {
            id: SwimmerId(id),
            name,
            lap_count,
        })
    }

    pub fn increment(&mut self) {
        self.lap_count = self.lap_count.saturating_add(1);
    }

    /// Lowers the count by one. Returns `false` (and changes nothing) at zero.
    pub fn decrement(&mut self) -> bool {
        if self.lap_count == 0 {
            return false;
        }
        self.lap_count -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.lap_count = 0;
    }
}

/// Trims a user supplied swimmer name, rejecting names that are empty after trimming.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSwimmers {
    pub swimmers: Vec<Swimmer>,
    pub dropped: usize,
}

/// Decodes a persisted swimmer array, keeping valid records in their stored order.
///
/// Anything that is not an array decodes to an empty collection. Malformed
/// entries and repeated ids are dropped and counted rather than failing the load.
pub fn decode_swimmers(value: &Value) -> DecodedSwimmers {
    let Some(entries) = value.as_array() else {
        return DecodedSwimmers {
            swimmers: Vec::new(),
            dropped: usize::from(!value.is_null()),
        };
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut decoded = DecodedSwimmers::default();
    for entry in entries {
        match Swimmer::from_value(entry) {
            Some(swimmer) if seen.insert(swimmer.id) => decoded.swimmers.push(swimmer),
            _ => decoded.dropped += 1,
        }
    }
    decoded
}
