use crate::error::AquaTrackError;
use aquatrack_schemas::reading::{
    ContaminationProfile, HydrologicalProfile, Measurements, SensorReading,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Generates a short opaque reading id: eight lowercase hex digits.
pub fn generate_id() -> String {
    format!("{:08x}", rand::thread_rng().gen::<u32>())
}

/// A fluent builder for constructing a `SensorReading`.
///
/// Unless overridden, the id is freshly generated and the timestamp is the moment
/// `build` is called. Measurement values are stored verbatim; nothing is range-checked.
#[derive(Debug, Default)]
pub struct ReadingBuilder {
    id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    measurements: Option<Measurements>,
}

impl ReadingBuilder {
    /// Creates a new, empty `ReadingBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a fixed id instead of generating one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Uses a fixed capture instant instead of the current time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_measurements(mut self, measurements: Measurements) -> Self {
        self.measurements = Some(measurements);
        self
    }

    pub fn with_contamination(self, profile: ContaminationProfile) -> Self {
        self.with_measurements(Measurements::Contamination(profile))
    }

    pub fn with_hydrology(self, profile: HydrologicalProfile) -> Self {
        self.with_measurements(Measurements::Hydrological(profile))
    }

    /// Consumes the builder and returns the reading.
    ///
    /// # Errors
    ///
    /// Returns `AquaTrackError::MeasurementsNotDefined` if no measurements were provided.
    pub fn build(self) -> Result<SensorReading, AquaTrackError> {
        let measurements = self
            .measurements
            .ok_or(AquaTrackError::MeasurementsNotDefined)?;
        let id = self.id.unwrap_or_else(generate_id);
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);
        Ok(SensorReading::new(id, timestamp, measurements))
    }
}
