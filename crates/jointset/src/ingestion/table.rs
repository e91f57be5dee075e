//! Tabular reader for joint measurements

use calamine::Reader;
use jointset_core::Measurement;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Required dip direction header (matched trimmed, case-insensitive)
pub const DIP_DIRECTION_COLUMN: &str = "dip direction";
/// Required dip angle header (matched trimmed, case-insensitive)
pub const DIP_ANGLE_COLUMN: &str = "dip angle";

/// Supported tabular formats
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
    Xls,
    Unsupported(String),
}

impl TableFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "csv" => Self::Csv,
            "xlsx" => Self::Xlsx,
            "xls" => Self::Xls,
            other => Self::Unsupported(other.to_string()),
        }
    }

    pub fn from_filename(filename: &str) -> Self {
        let ext = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }
}

/// Counts of what happened to each data row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionStats {
    /// Data rows read (header excluded)
    pub total_rows: usize,
    /// Rows kept for clustering
    pub kept: usize,
    /// Rows with a missing, non-numeric or non-finite value
    pub dropped_non_numeric: usize,
    /// Rows whose dip angle is outside 0-90
    pub dropped_out_of_range: usize,
}

impl IngestionStats {
    pub fn dropped(&self) -> usize {
        self.dropped_non_numeric + self.dropped_out_of_range
    }
}

/// Cleaned measurements ready for clustering
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    pub measurements: Vec<Measurement>,
    /// 1-based CSV line or worksheet row of each kept measurement
    pub source_rows: Vec<usize>,
    pub stats: IngestionStats,
}

impl MeasurementTable {
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

/// Parser for measurement files
pub struct TableReader;

impl TableReader {
    /// Read and clean a measurement file from disk
    pub fn read_path(path: impl AsRef<Path>) -> Result<MeasurementTable> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::parse(&filename, &data)
    }

    /// Parse a measurement file based on its extension
    pub fn parse(filename: &str, data: &[u8]) -> Result<MeasurementTable> {
        let table = match TableFormat::from_filename(filename) {
            TableFormat::Csv => Self::parse_csv(filename, data)?,
            TableFormat::Xlsx | TableFormat::Xls => Self::parse_spreadsheet(filename, data)?,
            TableFormat::Unsupported(ext) => {
                return Err(Error::UnsupportedFileType(format!(
                    "'{}' - expected .csv or .xlsx",
                    ext
                )))
            }
        };

        let stats = &table.stats;
        if stats.dropped_non_numeric > 0 {
            tracing::warn!(
                "{}: dropped {} row(s) with missing or non-numeric values",
                filename,
                stats.dropped_non_numeric
            );
        }
        if stats.dropped_out_of_range > 0 {
            tracing::warn!(
                "{}: dropped {} row(s) with dip angle outside 0-90",
                filename,
                stats.dropped_out_of_range
            );
        }
        tracing::info!(
            "{}: loaded {} of {} row(s)",
            filename,
            stats.kept,
            stats.total_rows
        );

        Ok(table)
    }

    fn parse_csv(filename: &str, data: &[u8]) -> Result<MeasurementTable> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let (dd_col, dip_col) = locate_columns(filename, &headers)?;

        let mut lines = LineIndex::new(data);
        let mut builder = TableBuilder::default();
        for record in reader.records() {
            let record = record?;
            let line = match record.position() {
                Some(pos) => lines.line_of(pos.byte() as usize),
                None => builder.last_line + 1,
            };
            let dd = record.get(dd_col).and_then(parse_number);
            let dip = record.get(dip_col).and_then(parse_number);
            builder.push(line, dd, dip);
        }

        builder.finish(filename)
    }

    fn parse_spreadsheet(filename: &str, data: &[u8]) -> Result<MeasurementTable> {
        let cursor = std::io::Cursor::new(data);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Error::file_parse(filename, "workbook has no worksheets"))?;
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        // the range starts at its first used cell, not necessarily A1
        let first_row = range.start().map_or(0, |(row, _)| row as usize);
        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(row) => row.iter().map(cell_text).collect(),
            None => Vec::new(),
        };
        let (dd_col, dip_col) = locate_columns(filename, &headers)?;

        let mut builder = TableBuilder::default();
        for (offset, row) in rows.enumerate() {
            if row.iter().all(|cell| matches!(cell, calamine::Data::Empty)) {
                continue;
            }
            let dd = row.get(dd_col).and_then(cell_number);
            let dip = row.get(dip_col).and_then(cell_number);
            builder.push(first_row + offset + 2, dd, dip);
        }

        builder.finish(filename)
    }
}

/// Find the two required columns, matching trimmed lower-cased headers
fn locate_columns(filename: &str, headers: &[String]) -> Result<(usize, usize)> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
        .collect();
    let find = |name: &str| normalized.iter().position(|h| h == name);

    match (find(DIP_DIRECTION_COLUMN), find(DIP_ANGLE_COLUMN)) {
        (Some(dd), Some(dip)) => Ok((dd, dip)),
        (dd, dip) => {
            let missing: Vec<&str> = [(dd, DIP_DIRECTION_COLUMN), (dip, DIP_ANGLE_COLUMN)]
                .iter()
                .filter(|(found, _)| found.is_none())
                .map(|(_, name)| *name)
                .collect();
            Err(Error::invalid_configuration(format!(
                "{}: missing required column(s): {} (headers are matched case-insensitively)",
                filename,
                missing.join(", ")
            )))
        }
    }
}

/// Coerce a text cell to a finite number
fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn cell_number(cell: &calamine::Data) -> Option<f64> {
    match cell {
        calamine::Data::Float(f) => Some(*f).filter(|v| v.is_finite()),
        calamine::Data::Int(i) => Some(*i as f64),
        calamine::Data::String(s) => parse_number(s),
        _ => None,
    }
}

fn cell_text(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::String(s) => s.clone(),
        calamine::Data::Float(f) => f.to_string(),
        calamine::Data::Int(i) => i.to_string(),
        calamine::Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Maps record byte offsets to 1-based lines.
///
/// A record's offset is where the reader resumed, so it can sit before the
/// blank lines the reader skipped; those are stepped over first.
struct LineIndex<'a> {
    data: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineIndex<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            line: 1,
        }
    }

    /// Offsets must be non-decreasing
    fn line_of(&mut self, byte: usize) -> usize {
        let rest = self.data.get(byte..).unwrap_or_default();
        let start = byte + rest.iter().take_while(|&&b| matches!(b, b'\n' | b'\r')).count();
        if start > self.offset {
            self.line += self.data[self.offset..start]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.offset = start;
        }
        self.line
    }
}

#[derive(Default)]
struct TableBuilder {
    measurements: Vec<Measurement>,
    source_rows: Vec<usize>,
    stats: IngestionStats,
    last_line: usize,
}

impl TableBuilder {
    fn push(&mut self, line: usize, dip_direction: Option<f64>, dip_angle: Option<f64>) {
        self.stats.total_rows += 1;
        self.last_line = line;

        match (dip_direction, dip_angle) {
            (Some(dd), Some(dip)) if (0.0..=90.0).contains(&dip) => {
                self.measurements.push(Measurement::new(dd, dip));
                self.source_rows.push(line);
                self.stats.kept += 1;
            }
            (Some(_), Some(_)) => self.stats.dropped_out_of_range += 1,
            _ => self.stats.dropped_non_numeric += 1,
        }
    }

    fn finish(self, filename: &str) -> Result<MeasurementTable> {
        if self.measurements.is_empty() {
            return Err(Error::invalid_configuration(format!(
                "{}: no usable rows; '{}' and '{}' are empty or non-numeric",
                filename, DIP_DIRECTION_COLUMN, DIP_ANGLE_COLUMN
            )));
        }

        Ok(MeasurementTable {
            measurements: self.measurements,
            source_rows: self.source_rows,
            stats: self.stats,
        })
    }
}
