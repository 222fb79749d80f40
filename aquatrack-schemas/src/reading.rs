//! Defines a single timestamped water-quality sample and the measurement profiles it can carry.

use crate::{metric::Metric, risk::RiskLevel, schema::Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chemical and debris contamination of a water sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContaminationProfile {
    pub ph: f64,
    /// mg/L
    pub magnesium: f64,
    /// mg/L
    pub mercury: f64,
    /// mg/L
    pub oil: f64,
    /// Items per cubic metre.
    pub trash: f64,
}

/// Water level and clarity at a gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrologicalProfile {
    /// Metres.
    pub level: f64,
    pub ph: f64,
    /// NTU
    pub turbidity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "profile", rename_all = "snake_case")]
pub enum Measurements {
    Contamination(ContaminationProfile),
    Hydrological(HydrologicalProfile),
}

impl Measurements {
    pub fn schema(&self) -> Schema {
        match self {
            Measurements::Contamination(_) => Schema::Contamination,
            Measurements::Hydrological(_) => Schema::Hydrological,
        }
    }

    /// Projects `metric` out of the profile, or `None` when the profile does not carry it.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match (self, metric) {
            (Measurements::Contamination(c), Metric::RiskScore) => Some(c.risk_score()),
            (Measurements::Contamination(c), Metric::Ph) => Some(c.ph),
            (Measurements::Contamination(c), Metric::Magnesium) => Some(c.magnesium),
            (Measurements::Contamination(c), Metric::Mercury) => Some(c.mercury),
            (Measurements::Contamination(c), Metric::Oil) => Some(c.oil),
            (Measurements::Contamination(c), Metric::Trash) => Some(c.trash),
            (Measurements::Hydrological(h), Metric::Level) => Some(h.level),
            (Measurements::Hydrological(h), Metric::Ph) => Some(h.ph),
            (Measurements::Hydrological(h), Metric::Turbidity) => Some(h.turbidity),
            _ => None,
        }
    }

    /// Builds a profile from values in the column order of `schema`.
    /// Trailing fields that are not supplied are zero.
    pub fn from_values(schema: Schema, values: &[f64]) -> Self {
        let value = |i: usize| values.get(i).copied().unwrap_or(0.0);
        match schema {
            Schema::Contamination => Measurements::Contamination(ContaminationProfile {
                ph: value(0),
                magnesium: value(1),
                mercury: value(2),
                oil: value(3),
                trash: value(4),
            }),
            Schema::Hydrological => Measurements::Hydrological(HydrologicalProfile {
                level: value(0),
                ph: value(1),
                turbidity: value(2),
            }),
        }
    }

    /// Field values in the column order of the full layout for this profile.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Measurements::Contamination(c) => vec![c.ph, c.magnesium, c.mercury, c.oil, c.trash],
            Measurements::Hydrological(h) => vec![h.level, h.ph, h.turbidity],
        }
    }
}

/// One sensor sample. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    id: String,
    timestamp: DateTime<Utc>,
    measurements: Measurements,
}

impl SensorReading {
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        measurements: Measurements,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            measurements,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    pub fn schema(&self) -> Schema {
        self.measurements.schema()
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.measurements.metric(metric)
    }

    /// Contamination risk score, `None` for hydrological readings.
    pub fn risk_score(&self) -> Option<f64> {
        match &self.measurements {
            Measurements::Contamination(c) => Some(c.risk_score()),
            Measurements::Hydrological(_) => None,
        }
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        match &self.measurements {
            Measurements::Contamination(c) => Some(c.risk_level()),
            Measurements::Hydrological(_) => None,
        }
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | ",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        )?;
        match &self.measurements {
            Measurements::Contamination(c) => write!(
                f,
                "pH={:.2} mg={:.2}mg/L hg={:.4}mg/L oil={:.2}mg/L trash={:.1} risk={:.1}({})",
                c.ph,
                c.magnesium,
                c.mercury,
                c.oil,
                c.trash,
                c.risk_score(),
                c.risk_level()
            ),
            Measurements::Hydrological(h) => write!(
                f,
                "level={:.3}m pH={:.2} turbidity={:.2}NTU",
                h.level, h.ph, h.turbidity
            ),
        }
    }
}
