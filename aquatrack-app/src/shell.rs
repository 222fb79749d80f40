use aquatrack_core::{
    builder::ReadingBuilder, collection::ReadingList, error::ParseError,
};
use aquatrack_schemas::{reading::Measurements, schema::Schema};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const BANNER: &str = "\
+------------------+
|   AQUA TRACK     |
+------------------+";

/// Prompt text for a measurement field, with its unit.
fn field_prompt(field: &'static str) -> &'static str {
    match field {
        "magnesium" => "magnesium (mg/L)",
        "mercury" => "mercury (mg/L)",
        "oil" => "oil (mg/L)",
        "trash" => "trash (items/m^3)",
        "level" => "level (m)",
        "turbidity" => "turbidity (NTU)",
        other => other,
    }
}

fn stats_caption(schema: Schema) -> String {
    format!("Stats (avg/min/max {})", schema.primary_metric())
}

/// Hydrates an empty `readings` from `path`.
///
/// `load_all` leaves the list untouched on failure, so a missing or unusable file
/// keeps it empty.
pub fn load_on_startup(readings: &mut ReadingList, path: &Path) {
    match readings.load_all(path) {
        Ok(count) => info!("Loaded {} readings from {}", count, path.display()),
        Err(e) if e.is_not_found() => {
            info!("No data file at {}; starting empty", path.display())
        }
        Err(e) => warn!(
            "Could not load {}: {}. Starting with no readings.",
            path.display(),
            e
        ),
    }
}

/// The interactive menu loop. Generic over its input and output so it can be scripted.
pub struct Shell {
    readings: ReadingList,
    data_file: PathBuf,
}

impl Shell {
    pub fn new(readings: ReadingList, data_file: PathBuf) -> Self {
        Self {
            readings,
            data_file,
        }
    }

    pub fn readings(&self) -> &ReadingList {
        &self.readings
    }

    /// Runs until the user exits or input ends. Either way the readings are saved first.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> io::Result<()> {
        loop {
            self.print_menu(out)?;
            let Some(choice) = read_line(input)? else {
                writeln!(out)?;
                break;
            };
            debug!(choice = %choice, "menu choice");
            match choice.as_str() {
                "1" => self.add_reading(input, out)?,
                "2" => self.list(out)?,
                "3" => self.stats(out)?,
                "4" => self.remove_by_id(input, out)?,
                "5" => self.save(out)?,
                "0" => break,
                _ => writeln!(out, "Invalid option")?,
            }
        }
        self.save(out)?;
        writeln!(out, "Bye.")?;
        Ok(())
    }

    fn print_menu<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", BANNER)?;
        writeln!(
            out,
            "AquaTrack - water monitoring ({})",
            self.readings.schema()
        )?;
        writeln!(out, "1) Add reading")?;
        writeln!(out, "2) List readings")?;
        writeln!(out, "3) {}", stats_caption(self.readings.schema()))?;
        writeln!(out, "4) Remove by id")?;
        writeln!(out, "5) Save")?;
        writeln!(out, "0) Exit")?;
        write!(out, "> ")?;
        out.flush()
    }

    fn add_reading<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> io::Result<()> {
        let schema = self.readings.schema();
        let mut values = Vec::with_capacity(schema.field_names().len());
        for &field in schema.field_names() {
            let Some(raw) = prompt(input, out, field_prompt(field))? else {
                return Ok(());
            };
            match raw.parse::<f64>() {
                Ok(value) => values.push(value),
                Err(source) => {
                    let err = ParseError::InvalidNumber {
                        field,
                        value: raw,
                        source,
                    };
                    return writeln!(out, "Bad input: {}", err);
                }
            }
        }

        let result = ReadingBuilder::new()
            .with_measurements(Measurements::from_values(schema, &values))
            .build()
            .and_then(|reading| {
                let shown = reading.to_string();
                self.readings.insert_back(reading).map(|()| shown)
            });
        match result {
            Ok(shown) => writeln!(out, "Added: {}", shown),
            Err(e) => writeln!(out, "Bad input: {}", e),
        }
    }

    fn list<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.readings.is_empty() {
            return writeln!(out, "no readings");
        }
        writeln!(out, "readings:")?;
        write!(out, "{}", self.readings)
    }

    fn stats<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.readings.summary(self.readings.schema().primary_metric()) {
            Some(summary) => writeln!(out, "{}", summary),
            None => writeln!(out, "no readings"),
        }
    }

    fn remove_by_id<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> io::Result<()> {
        let Some(id) = prompt(input, out, "id")? else {
            return Ok(());
        };
        if self.readings.remove_by_id(&id) {
            writeln!(out, "removed")
        } else {
            writeln!(out, "not found")
        }
    }

    fn save<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.readings.save_all(&self.data_file) {
            Ok(_) => writeln!(out, "Saved to {}", self.data_file.display()),
            Err(e) => {
                warn!("Save to {} failed: {}", self.data_file.display(), e);
                writeln!(out, "Save failed: {}", e)
            }
        }
    }
}

/// Reads one trimmed line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(out, "{}: ", label)?;
    out.flush()?;
    read_line(input)
}
