use crate::{
    codec,
    error::{AquaTrackError, ParseError},
};
use aquatrack_schemas::{reading::SensorReading, schema::Schema};
use csv::{ByteRecord, QuoteStyle, ReaderBuilder, Terminator, Writer, WriterBuilder};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

fn path_label(path: &Path) -> String {
    path.display().to_string()
}

/// Streams readings to a data file, one unquoted line each.
///
/// The target is truncated on creation. Nothing is renamed into place, so a failure
/// part-way leaves a partially written file behind.
pub struct ReadingWriter {
    writer: Writer<fs::File>,
    path: String,
    written: usize,
}

impl ReadingWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, AquaTrackError> {
        let path = path_label(path.as_ref());
        let writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_path(&path)
            .map_err(|e| AquaTrackError::Csv(path.clone(), e))?;
        Ok(Self {
            writer,
            path,
            written: 0,
        })
    }

    pub fn write(&mut self, reading: &SensorReading) -> Result<(), AquaTrackError> {
        self.writer
            .write_record(codec::encode_fields(reading))
            .map_err(|e| AquaTrackError::Csv(self.path.clone(), e))?;
        self.written += 1;
        Ok(())
    }

    /// Flushes buffered lines and returns how many readings were written.
    pub fn finish(mut self) -> Result<usize, AquaTrackError> {
        self.writer
            .flush()
            .map_err(|e| AquaTrackError::FileIO(self.path.clone(), e))?;
        Ok(self.written)
    }
}

/// Overwrites `path` with `readings` in iteration order.
pub fn write_all<'a, P, I>(path: P, readings: I) -> Result<usize, AquaTrackError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a SensorReading>,
{
    let mut writer = ReadingWriter::create(path.as_ref())?;
    for reading in readings {
        writer.write(reading)?;
    }
    let written = writer.finish()?;
    info!(path = %path.as_ref().display(), count = written, "saved readings");
    Ok(written)
}

fn is_blank(record: &ByteRecord) -> bool {
    record.len() <= 1
        && record
            .iter()
            .all(|field| field.iter().all(u8::is_ascii_whitespace))
}

/// Decodes each column as UTF-8, naming the first offending column (1-based).
fn decode_columns(record: &ByteRecord) -> Result<Vec<&str>, ParseError> {
    record
        .iter()
        .enumerate()
        .map(|(i, field)| {
            std::str::from_utf8(field)
                .map_err(|source| ParseError::InvalidEncoding { column: i + 1, source })
        })
        .collect()
}

/// Parses every non-blank line of `path` under `schema`.
///
/// The first malformed line aborts the whole read; no partial result is returned.
pub fn read_all<P: AsRef<Path>>(
    path: P,
    schema: Schema,
) -> Result<Vec<SensorReading>, AquaTrackError> {
    let path = path_label(path.as_ref());
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(&path)
        .map_err(|e| AquaTrackError::Csv(path.clone(), e))?;

    let mut readings = Vec::new();
    for result in reader.byte_records() {
        let record = result.map_err(|e| AquaTrackError::Csv(path.clone(), e))?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map(|p| p.line() as usize);
        let reading = decode_columns(&record)
            .and_then(|fields| codec::decode_fields(&fields, schema))
            .map_err(|source| AquaTrackError::Parse { line, source })?;
        readings.push(reading);
    }

    debug!(path = %path, count = readings.len(), %schema, "read readings");
    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquatrack_schemas::metric::Metric;
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        let file = format!("aquatrack-store-{}-{}.csv", std::process::id(), name);
        std::env::temp_dir().join(file)
    }

    #[test]
    fn test_blank_and_whitespace_lines_are_skipped() {
        let path = scratch_file("blank");
        fs::write(
            &path,
            concat!(
                "a,2024-01-01T00:00:00Z,7.0,10.0,0.0,0.0,0.0\n\n   \n",
                "b,2024-01-02T00:00:00Z,9.0,60.0,0.002\n",
            ),
        )
        .unwrap();
        let readings = read_all(&path, Schema::Contamination).unwrap();
        fs::remove_file(&path).unwrap();

        let ids: Vec<&str> = readings.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_failure_reports_line_number() {
        let path = scratch_file("line-number");
        fs::write(
            &path,
            concat!(
                "a,2024-01-01T00:00:00Z,7.0,10.0,0.0,0.0,0.0\n\n",
                "b,2024-01-02T00:00:00Z,9.0,60.0,0.002,1.0\n",
            ),
        )
        .unwrap();
        let err = read_all(&path, Schema::Contamination).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(err.is_parse());
        assert!(matches!(err, AquaTrackError::Parse { line: Some(_), .. }));
        assert!(err.to_string().contains("expected 5 or 7 columns, found 6"));
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_failure_with_line() {
        let path = scratch_file("utf8");
        fs::write(
            &path,
            [
                &b"a,2024-01-01T00:00:00Z,7.0,10.0,0.0,0.0,0.0\n\n"[..],
                &b"b\xff,2024-01-02T00:00:00Z,7.0,10.0,0.0\n"[..],
            ]
            .concat(),
        )
        .unwrap();
        let err = read_all(&path, Schema::Contamination).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(err.is_parse());
        assert!(!err.is_io());
        assert!(matches!(
            err,
            AquaTrackError::Parse {
                line: Some(_),
                source: ParseError::InvalidEncoding { column: 1, .. },
            }
        ));
    }

    #[test]
    fn test_crlf_file_with_padded_fields() {
        let path = scratch_file("crlf");
        fs::write(
            &path,
            concat!(
                "a,2024-01-01T00:00:00Z,7.0,10.0,0.0,0.0,0.0\r\n\r\n",
                "b, 2024-01-02T00:00:00Z , 9.0 ,60.0,0.002\r\n",
            ),
        )
        .unwrap();
        let readings = read_all(&path, Schema::Contamination).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].id(), "b");
        assert_eq!(readings[1].metric(Metric::Ph), Some(9.0));
        assert_eq!(readings[1].metric(Metric::Mercury), Some(0.002));
    }

    #[test]
    fn test_missing_file_is_io_not_parse() {
        let err = read_all(scratch_file("does-not-exist"), Schema::Hydrological).unwrap_err();
        assert!(err.is_io());
        assert!(err.is_not_found());
        assert!(!err.is_parse());
    }

    #[test]
    fn test_writer_emits_plain_lines() {
        let path = scratch_file("writer");
        let reading =
            codec::from_line("g1,2024-01-01T00:00:00Z,1.5,7.0,3.0", Schema::Hydrological).unwrap();
        let count = write_all(&path, [&reading, &reading]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            content,
            "g1,2024-01-01T00:00:00Z,1.5,7.0,3.0\ng1,2024-01-01T00:00:00Z,1.5,7.0,3.0\n"
        );
    }
}
