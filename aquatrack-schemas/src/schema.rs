//! Defines the on-disk record layouts a reading file can use.
//! A file holds exactly one schema; the schema is chosen by the caller and never inferred
//! from a line, because a five-column line is valid under both layouts.

use crate::metric::Metric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The measurement profile carried by every reading in a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// `id,timestamp,pH,magnesium,mercury,oil,trash` (legacy files omit oil and trash).
    #[default]
    Contamination,
    /// `id,timestamp,level,pH,turbidity`.
    Hydrological,
}

/// Columns that precede the measurement fields on every line.
pub const KEY_COLUMNS: usize = 2;

impl Schema {
    pub const ALL: [Schema; 2] = [Schema::Contamination, Schema::Hydrological];

    /// Measurement field names in column order, as written by the full layout.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            Schema::Contamination => &["pH", "magnesium", "mercury", "oil", "trash"],
            Schema::Hydrological => &["level", "pH", "turbidity"],
        }
    }

    /// Number of columns written for a record of this schema.
    pub fn written_columns(self) -> usize {
        KEY_COLUMNS + self.field_names().len()
    }

    /// Whether a line with `columns` fields can be decoded under this schema.
    pub fn accepts_columns(self, columns: usize) -> bool {
        match self {
            Schema::Contamination => columns == 5 || columns == 7,
            Schema::Hydrological => columns == 5,
        }
    }

    /// Human-readable form of the accepted column counts, used in parse errors.
    pub fn expected_columns(self) -> &'static str {
        match self {
            Schema::Contamination => "5 or 7",
            Schema::Hydrological => "5",
        }
    }

    /// The metric summarised by the stats report.
    pub fn primary_metric(self) -> Metric {
        match self {
            Schema::Contamination => Metric::RiskScore,
            Schema::Hydrological => Metric::Level,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Schema::Contamination => "contamination",
            Schema::Hydrological => "hydrological",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a schema name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSchema(pub String);

impl fmt::Display for UnknownSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown schema '{}' (expected 'contamination' or 'hydrological')",
            self.0
        )
    }
}

impl std::error::Error for UnknownSchema {}

impl FromStr for Schema {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contamination" => Ok(Schema::Contamination),
            "hydrological" => Ok(Schema::Hydrological),
            other => Err(UnknownSchema(other.to_string())),
        }
    }
}
