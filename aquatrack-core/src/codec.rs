//! Line-level encoding of readings.
//!
//! A line is `id,timestamp,<fields...>` with the fields in the order given by
//! `Schema::field_names`. Nothing is quoted or escaped, so ids must not contain commas.
//! Timestamps are RFC 3339 in UTC with as many fractional digits as needed to round-trip.

use crate::error::{AquaTrackError, ParseError};
use aquatrack_schemas::{
    reading::{Measurements, SensorReading},
    schema::{Schema, KEY_COLUMNS},
};
use chrono::{DateTime, SecondsFormat, Utc};

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    let value = raw.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| ParseError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    let value = raw.trim();
    value.parse::<f64>().map_err(|source| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
        source,
    })
}

/// Splits a reading into its columns, full layout.
pub fn encode_fields(reading: &SensorReading) -> Vec<String> {
    let mut fields = Vec::with_capacity(reading.schema().written_columns());
    fields.push(reading.id().to_string());
    fields.push(format_timestamp(&reading.timestamp()));
    // Debug keeps a trailing ".0" on whole numbers and round-trips exactly.
    fields.extend(reading.measurements().values().iter().map(|v| format!("{:?}", v)));
    fields
}

/// Builds a reading from already-split columns.
pub fn decode_fields(fields: &[&str], schema: Schema) -> Result<SensorReading, ParseError> {
    if !schema.accepts_columns(fields.len()) {
        return Err(ParseError::ColumnCount {
            expected: schema.expected_columns(),
            found: fields.len(),
        });
    }

    let id = fields[0];
    let timestamp = parse_timestamp(fields[1])?;
    let values = fields[KEY_COLUMNS..]
        .iter()
        .zip(schema.field_names())
        .map(|(raw, name)| parse_number(name, raw))
        .collect::<Result<Vec<f64>, ParseError>>()?;
    // Legacy contamination lines stop after mercury; oil and trash read as zero.
    let measurements = Measurements::from_values(schema, &values);

    Ok(SensorReading::new(id, timestamp, measurements))
}

/// Serialises a reading to a single line without a terminator.
pub fn to_line(reading: &SensorReading) -> String {
    encode_fields(reading).join(",")
}

/// Parses one line written by `to_line` (or a legacy five-column contamination line).
pub fn from_line(line: &str, schema: Schema) -> Result<SensorReading, AquaTrackError> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let fields: Vec<&str> = line.split(',').collect();
    Ok(decode_fields(&fields, schema)?)
}
