use aquatrack_schemas::{metric::Metric, reading::SensorReading};
use std::fmt;

/// Aggregate statistics of one metric over a reading collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary<'a> {
    pub metric: Metric,
    pub count: usize,
    /// NaN when no reading carries the metric.
    pub average: f64,
    pub min: Option<&'a SensorReading>,
    pub max: Option<&'a SensorReading>,
}

/// Decimal places used when reporting an average of `metric`.
pub fn display_precision(metric: Metric) -> usize {
    match metric {
        Metric::RiskScore | Metric::Trash => 1,
        Metric::Mercury => 4,
        Metric::Level => 3,
        Metric::Ph | Metric::Magnesium | Metric::Oil | Metric::Turbidity => 2,
    }
}

fn or_none(reading: Option<&SensorReading>) -> String {
    reading.map_or_else(|| "none".to_string(), |r| r.to_string())
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.metric {
            Metric::RiskScore => "avgRisk".to_string(),
            Metric::Level => "avg".to_string(),
            other => format!("avg_{}", other),
        };
        write!(
            f,
            "count={} {}={:.*} min={} max={}",
            self.count,
            label,
            display_precision(self.metric),
            self.average,
            or_none(self.min),
            or_none(self.max)
        )
    }
}
