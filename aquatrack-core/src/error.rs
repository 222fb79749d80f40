use aquatrack_schemas::schema::Schema;
use thiserror::Error;

/// Why a single CSV line could not be turned into a reading.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: &'static str, found: usize },

    #[error("invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid number '{value}' for {field}: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("column {column} is not valid UTF-8: {source}")]
    InvalidEncoding {
        column: usize,
        #[source]
        source: std::str::Utf8Error,
    },
}

#[derive(Debug, Error)]
pub enum AquaTrackError {
    #[error("Parse failure{}: {source}", line_label(.line))]
    Parse {
        line: Option<usize>,
        #[source]
        source: ParseError,
    },

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    Csv(String, #[source] csv::Error),

    #[error("Reading has {found} measurements but the collection holds {expected} readings")]
    SchemaMismatch { expected: Schema, found: Schema },

    #[error("Reading measurements are missing")]
    MeasurementsNotDefined,
}

fn line_label(line: &Option<usize>) -> String {
    line.map(|n| format!(" on line {}", n)).unwrap_or_default()
}

impl AquaTrackError {
    pub fn is_parse(&self) -> bool {
        matches!(self, AquaTrackError::Parse { .. })
    }

    /// True for failures reading or writing the file itself, as opposed to its contents.
    pub fn is_io(&self) -> bool {
        match self {
            AquaTrackError::FileIO(..) => true,
            AquaTrackError::Csv(_, e) => e.is_io_error(),
            _ => false,
        }
    }

    /// True when the file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        match self {
            AquaTrackError::FileIO(_, e) => e.kind() == std::io::ErrorKind::NotFound,
            AquaTrackError::Csv(_, e) => match e.kind() {
                csv::ErrorKind::Io(io) => io.kind() == std::io::ErrorKind::NotFound,
                _ => false,
            },
            _ => false,
        }
    }
}

impl From<ParseError> for AquaTrackError {
    fn from(source: ParseError) -> Self {
        AquaTrackError::Parse { line: None, source }
    }
}
