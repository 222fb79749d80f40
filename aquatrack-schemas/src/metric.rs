use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric projection of a reading that aggregates can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    RiskScore,
    Ph,
    Magnesium,
    Mercury,
    Oil,
    Trash,
    Level,
    Turbidity,
}

impl Metric {
    /// Whether readings of `schema` carry this metric.
    pub fn applies_to(self, schema: Schema) -> bool {
        match self {
            Metric::Ph => true,
            Metric::RiskScore
            | Metric::Magnesium
            | Metric::Mercury
            | Metric::Oil
            | Metric::Trash => schema == Schema::Contamination,
            Metric::Level | Metric::Turbidity => schema == Schema::Hydrological,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::RiskScore => "risk",
            Metric::Ph => "pH",
            Metric::Magnesium => "magnesium",
            Metric::Mercury => "mercury",
            Metric::Oil => "oil",
            Metric::Trash => "trash",
            Metric::Level => "level",
            Metric::Turbidity => "turbidity",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
