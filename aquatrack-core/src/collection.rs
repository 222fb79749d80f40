//! The ordered, single-schema container of readings.

use crate::{analysis::Summary, error::AquaTrackError, store};
use aquatrack_schemas::{metric::Metric, reading::SensorReading, schema::Schema};
use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Readings in insertion order, all sharing one `Schema`.
///
/// Every query is a linear scan. Ids are not checked for uniqueness.
#[derive(Debug, Clone, Default)]
pub struct ReadingList {
    schema: Schema,
    readings: VecDeque<SensorReading>,
}

impl ReadingList {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            readings: VecDeque::new(),
        }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorReading> {
        self.readings.iter()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }

    fn check_schema(&self, reading: &SensorReading) -> Result<(), AquaTrackError> {
        if reading.schema() != self.schema {
            return Err(AquaTrackError::SchemaMismatch {
                expected: self.schema,
                found: reading.schema(),
            });
        }
        Ok(())
    }

    pub fn insert_front(&mut self, reading: SensorReading) -> Result<(), AquaTrackError> {
        self.check_schema(&reading)?;
        self.readings.push_front(reading);
        Ok(())
    }

    pub fn insert_back(&mut self, reading: SensorReading) -> Result<(), AquaTrackError> {
        self.check_schema(&reading)?;
        self.readings.push_back(reading);
        Ok(())
    }

    /// Removes every reading matching `predicate`, keeping the survivors in order.
    /// Returns whether anything was removed.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> bool
    where
        F: FnMut(&SensorReading) -> bool,
    {
        let before = self.readings.len();
        self.readings.retain(|reading| !predicate(reading));
        before != self.readings.len()
    }

    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let removed = self.remove_where(|r| r.id() == id);
        debug!(id, removed, "remove by id");
        removed
    }

    pub fn find_first<F>(&self, mut predicate: F) -> Option<&SensorReading>
    where
        F: FnMut(&SensorReading) -> bool,
    {
        self.readings.iter().find(|reading| predicate(reading))
    }

    /// Mean of `metric` over the readings that carry it.
    ///
    /// Returns `f64::NAN` when there is nothing to average; check `is_empty` first.
    pub fn average_of(&self, metric: Metric) -> f64 {
        let (sum, count) = self
            .readings
            .iter()
            .filter_map(|r| r.metric(metric))
            .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    }

    // Strict comparison keeps the first-encountered reading on ties.
    fn extreme_by(
        &self,
        metric: Metric,
        replaces: fn(f64, f64) -> bool,
    ) -> Option<&SensorReading> {
        let mut best: Option<(&SensorReading, f64)> = None;
        for reading in &self.readings {
            let Some(value) = reading.metric(metric) else {
                continue;
            };
            match best {
                Some((_, current)) if !replaces(value, current) => {}
                _ => best = Some((reading, value)),
            }
        }
        best.map(|(reading, _)| reading)
    }

    pub fn min_by(&self, metric: Metric) -> Option<&SensorReading> {
        self.extreme_by(metric, |candidate, current| candidate < current)
    }

    pub fn max_by(&self, metric: Metric) -> Option<&SensorReading> {
        self.extreme_by(metric, |candidate, current| candidate > current)
    }

    /// Count, mean, min and max of `metric` in one report, or `None` when empty.
    pub fn summary(&self, metric: Metric) -> Option<Summary<'_>> {
        if self.is_empty() {
            return None;
        }
        Some(Summary {
            metric,
            count: self.len(),
            average: self.average_of(metric),
            min: self.min_by(metric),
            max: self.max_by(metric),
        })
    }

    /// Overwrites `path` with one line per reading in current order.
    pub fn save_all<P: AsRef<Path>>(&self, path: P) -> Result<usize, AquaTrackError> {
        store::write_all(path, &self.readings)
    }

    /// Replaces the contents with the readings stored at `path`.
    ///
    /// On any failure the list is left exactly as it was.
    pub fn load_all<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, AquaTrackError> {
        let loaded = store::read_all(path.as_ref(), self.schema)?;
        self.readings = loaded.into();
        info!(path = %path.as_ref().display(), count = self.readings.len(), "loaded readings");
        Ok(self.readings.len())
    }
}

impl<'a> IntoIterator for &'a ReadingList {
    type Item = &'a SensorReading;
    type IntoIter = std::collections::vec_deque::Iter<'a, SensorReading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

impl fmt::Display for ReadingList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for reading in &self.readings {
            writeln!(f, "{}", reading)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ReadingBuilder;
    use aquatrack_schemas::reading::{ContaminationProfile, HydrologicalProfile};

    fn contamination(id: &str, ph: f64, mercury: f64) -> SensorReading {
        ReadingBuilder::new()
            .with_id(id)
            .with_contamination(ContaminationProfile {
                ph,
                magnesium: 0.0,
                mercury,
                oil: 0.0,
                trash: 0.0,
            })
            .build()
            .unwrap()
    }

    fn ids(list: &ReadingList) -> Vec<&str> {
        list.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_insert_at_both_ends() {
        let mut list = ReadingList::new(Schema::Contamination);
        list.insert_back(contamination("b", 7.0, 0.0)).unwrap();
        list.insert_back(contamination("c", 7.0, 0.0)).unwrap();
        list.insert_front(contamination("a", 7.0, 0.0)).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(ids(&list), vec!["a", "b", "c"]);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.schema(), Schema::Contamination);
    }

    #[test]
    fn test_mixing_schemas_is_rejected() {
        let mut list = ReadingList::new(Schema::Contamination);
        let hydro = ReadingBuilder::new()
            .with_hydrology(HydrologicalProfile {
                level: 1.0,
                ph: 7.0,
                turbidity: 2.0,
            })
            .build()
            .unwrap();
        let err = list.insert_back(hydro).unwrap_err();
        assert!(matches!(
            err,
            AquaTrackError::SchemaMismatch {
                expected: Schema::Contamination,
                found: Schema::Hydrological,
            }
        ));
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_where_removes_all_matches_in_order() {
        let mut list = ReadingList::new(Schema::Contamination);
        for id in ["abc123", "x", "abc123", "y", "z", "abc123"] {
            list.insert_back(contamination(id, 7.0, 0.0)).unwrap();
        }
        assert!(list.remove_by_id("abc123"));
        assert_eq!(ids(&list), vec!["x", "y", "z"]);
        assert_eq!(list.len(), 3);
        assert!(!list.remove_by_id("abc123"));
        assert_eq!(ids(&list), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_find_first() {
        let mut list = ReadingList::new(Schema::Contamination);
        list.insert_back(contamination("a", 6.0, 0.0)).unwrap();
        list.insert_back(contamination("b", 8.0, 0.0)).unwrap();
        list.insert_back(contamination("c", 8.0, 0.0)).unwrap();

        let found = list.find_first(|r| r.metric(Metric::Ph) == Some(8.0));
        assert_eq!(found.map(|r| r.id()), Some("b"));
        assert!(list.find_first(|r| r.id() == "zz").is_none());
    }

    #[test]
    fn test_empty_aggregates() {
        let list = ReadingList::new(Schema::Contamination);
        assert!(list.average_of(Metric::RiskScore).is_nan());
        assert!(list.min_by(Metric::RiskScore).is_none());
        assert!(list.max_by(Metric::RiskScore).is_none());
        assert!(list.summary(Metric::RiskScore).is_none());
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let mut list = ReadingList::new(Schema::Contamination);
        list.insert_back(contamination("first", 7.0, 0.0)).unwrap();
        list.insert_back(contamination("second", 7.0, 0.0)).unwrap();
        assert_eq!(list.min_by(Metric::RiskScore).unwrap().id(), "first");
        assert_eq!(list.max_by(Metric::RiskScore).unwrap().id(), "first");
    }

    #[test]
    fn test_aggregates_over_risk() {
        let mut list = ReadingList::new(Schema::Contamination);
        list.insert_back(contamination("mid", 7.0, 0.001)).unwrap();
        list.insert_back(contamination("low", 7.0, 0.0)).unwrap();
        list.insert_back(contamination("high", 3.0, 0.002)).unwrap();

        assert_eq!(list.average_of(Metric::RiskScore), (15.0 + 0.0 + 60.0) / 3.0);
        assert_eq!(list.min_by(Metric::RiskScore).unwrap().id(), "low");
        assert_eq!(list.max_by(Metric::RiskScore).unwrap().id(), "high");
    }

    #[test]
    fn test_metric_not_carried_by_schema() {
        let mut list = ReadingList::new(Schema::Contamination);
        list.insert_back(contamination("a", 7.0, 0.0)).unwrap();
        assert!(list.average_of(Metric::Level).is_nan());
        assert!(list.max_by(Metric::Level).is_none());
    }

    #[test]
    fn test_display_lists_one_reading_per_line() {
        let mut list = ReadingList::new(Schema::Contamination);
        list.insert_back(contamination("a", 7.0, 0.0)).unwrap();
        list.insert_back(contamination("b", 7.0, 0.0)).unwrap();
        let rendered = list.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("a | "));
        assert!(lines[1].starts_with("b | "));
    }
}
