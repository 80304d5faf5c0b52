use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FormatError, Result};
use crate::math::{Point3, Vector3};
use crate::sensitivity::{SensitivityRecord, SensitivityTable};

/// Column header of a sensitivity table.
pub const SENSITIVITY_HEADER: &str = "x,y,z,dx,dy,dz,magnitude,dxdP,dydP,dzdP";

const COLUMNS: [&str; 10] = [
    "x",
    "y",
    "z",
    "dx",
    "dy",
    "dz",
    "magnitude",
    "dxdP",
    "dydP",
    "dzdP",
];

/// Writes a sensitivity table as CSV, one row per record.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_sensitivity_csv<W: Write>(table: &SensitivityTable, mut writer: W) -> Result<()> {
    writeln!(writer, "{SENSITIVITY_HEADER}")?;
    for r in &table.records {
        let (p, d, g) = (r.position, r.displacement, r.derivative);
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{}",
            p.x, p.y, p.z, d.x, d.y, d.z, r.magnitude, g.x, g.y, g.z
        )?;
    }
    Ok(())
}

/// Writes every table to `dir` under its [`SensitivityTable::file_name`],
/// returning the paths written.
///
/// # Errors
///
/// Returns an error if a file cannot be created or written.
pub fn write_sensitivity_tables<P: AsRef<Path>>(
    dir: P,
    tables: &[SensitivityTable],
) -> Result<Vec<PathBuf>> {
    tables
        .iter()
        .map(|table| -> Result<PathBuf> {
            let path = dir.as_ref().join(table.file_name());
            let mut writer = BufWriter::new(File::create(&path)?);
            write_sensitivity_csv(table, &mut writer)?;
            writer.flush()?;
            debug!(path = %path.display(), records = table.records.len(), "wrote sensitivity table");
            Ok(path)
        })
        .collect()
}

/// Reads the records of a sensitivity table.
///
/// Columns are located by header name, so extra columns and any column
/// order are accepted. Blank lines are skipped.
///
/// # Errors
///
/// Returns an error if the header lacks a required column or a row has a
/// missing or non-numeric value.
pub fn read_sensitivity_csv<R: BufRead>(reader: R) -> Result<Vec<SensitivityRecord>> {
    let mut lines = reader.lines().enumerate();
    let header = match lines.next() {
        Some((_, line)) => line?,
        None => {
            return Err(FormatError::Csv {
                line: 1,
                message: "missing header".to_owned(),
            }
            .into())
        }
    };
    let names: Vec<&str> = header.split(',').map(str::trim).collect();
    let mut index = [0_usize; 10];
    for (slot, column) in index.iter_mut().zip(COLUMNS) {
        *slot = names
            .iter()
            .position(|name| *name == column)
            .ok_or_else(|| FormatError::Csv {
                line: 1,
                message: format!("missing column {column}"),
            })?;
    }

    let mut records = Vec::new();
    for (n, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let mut values = [0.0_f64; 10];
        for (value, (&column, name)) in values.iter_mut().zip(index.iter().zip(COLUMNS)) {
            let field = fields.get(column).copied().map(str::trim).ok_or_else(|| FormatError::Csv {
                line: n + 1,
                message: format!("missing value for {name}"),
            })?;
            *value = field.parse().map_err(|_| FormatError::Csv {
                line: n + 1,
                message: format!("invalid number '{field}' for {name}"),
            })?;
        }
        records.push(SensitivityRecord {
            position: Point3::new(values[0], values[1], values[2]),
            displacement: Vector3::new(values[3], values[4], values[5]),
            magnitude: values[6],
            derivative: Vector3::new(values[7], values[8], values[9]),
        });
    }
    Ok(records)
}

/// Reads a sensitivity table file written by [`write_sensitivity_tables`].
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is malformed.
pub fn read_sensitivity_csv_file<P: AsRef<Path>>(path: P) -> Result<Vec<SensitivityRecord>> {
    let file = File::open(path.as_ref())?;
    read_sensitivity_csv(BufReader::new(file))
}
