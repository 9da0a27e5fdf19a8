//! Row-windowed readers for the supported input containers.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use calamine::{Data, Range, Reader, Xls, Xlsx, open_workbook};
use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::error::{Result, SifterError};
use super::record::{ContactRecord, InputSchema, RowWindow};
use super::source::{InputFormat, SourceMetadata};

/// Reads contact records out of a spreadsheet-like file.
#[derive(Debug, Clone, Copy)]
pub struct TabularSource {
    schema: InputSchema,
    window: RowWindow,
}

impl TabularSource {
    pub fn new(schema: InputSchema, window: RowWindow) -> Self {
        Self { schema, window }
    }

    pub fn schema(&self) -> InputSchema {
        self.schema
    }

    pub fn window(&self) -> RowWindow {
        self.window
    }

    /// Load every valid record inside the window, in file order.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<ContactRecord>> {
        let path = path.as_ref();
        let format = InputFormat::from_path(path)?;
        if !path.exists() {
            return Err(SifterError::MissingInput(path.to_path_buf()));
        }

        let records = match format {
            InputFormat::Xlsx => {
                let mut workbook: Xlsx<BufReader<File>> =
                    open_workbook(path).map_err(|e| spreadsheet_error(path, e))?;
                let range = first_sheet(&mut workbook, path)?;
                self.collect_range(&range)
            }
            InputFormat::Xls => {
                let mut workbook: Xls<BufReader<File>> =
                    open_workbook(path).map_err(|e| spreadsheet_error(path, e))?;
                let range = first_sheet(&mut workbook, path)?;
                self.collect_range(&range)
            }
            InputFormat::Csv => {
                let file = File::open(path).map_err(|e| SifterError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })?;
                self.collect_csv(file)?
            }
        };

        info!(
            "Loaded {} record(s) from {} ({}, window {}..{})",
            records.len(),
            path.display(),
            format,
            self.window.start,
            self.window
                .end
                .map(|e| e.to_string())
                .unwrap_or_else(|| "end".to_string())
        );

        Ok(records)
    }

    /// Load records and fingerprint the input file for the run summary.
    pub fn load_with_metadata(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(Vec<ContactRecord>, SourceMetadata)> {
        let path = path.as_ref();
        let records = self.load(path)?;
        let metadata = fingerprint(path)?;
        Ok((records, metadata))
    }

    /// Read delimited text with no header handling; row 0 is the first line.
    pub fn collect_csv<R: Read>(&self, reader: R) -> Result<Vec<ContactRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.window.is_past_end(row_idx) {
                break;
            }
            if row_idx < self.window.start {
                continue;
            }

            let row = result?;
            let cells: Vec<String> = row.iter().map(|s| s.trim().to_string()).collect();
            self.push_row(&mut records, row_idx, &cells);
        }

        Ok(records)
    }

    /// Walk a worksheet by absolute row index.
    ///
    /// Worksheet ranges start at the first used cell, so positions are mapped
    /// back to absolute coordinates before the window is applied.
    fn collect_range(&self, range: &Range<Data>) -> Vec<ContactRecord> {
        let mut records = Vec::new();
        let (Some((first_row, _)), Some((last_row, last_col))) = (range.start(), range.end())
        else {
            return records;
        };

        let from = (first_row as usize).max(self.window.start);
        for row_idx in from..=last_row as usize {
            if self.window.is_past_end(row_idx) {
                break;
            }

            let cells: Vec<String> = (0..=last_col)
                .map(|col| {
                    range
                        .get_value((row_idx as u32, col))
                        .map(cell_text)
                        .unwrap_or_default()
                })
                .collect();
            self.push_row(&mut records, row_idx, &cells);
        }

        records
    }

    fn push_row(&self, records: &mut Vec<ContactRecord>, row_idx: usize, cells: &[String]) {
        match self.schema.record_from_cells(row_idx, cells) {
            Some(record) => records.push(record),
            None => debug!("Skipping row {}: not a contact row", row_idx),
        }
    }
}

/// Normalize a worksheet cell to trimmed text.
///
/// Whole floats lose their fractional part so phone numbers stored as
/// numbers come out as digits.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn first_sheet<R>(workbook: &mut R, path: &Path) -> Result<Range<Data>>
where
    R: Reader<BufReader<File>>,
    R::Error: std::fmt::Display,
{
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(spreadsheet_error(path, e)),
        None => Err(SifterError::Spreadsheet {
            path: path.to_path_buf(),
            message: "workbook has no worksheets".to_string(),
        }),
    }
}

fn spreadsheet_error(path: &Path, err: impl std::fmt::Display) -> SifterError {
    SifterError::Spreadsheet {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Hash and describe an input file.
pub fn fingerprint(path: &Path) -> Result<SourceMetadata> {
    let format = InputFormat::from_path(path)?;
    let io_err = |e| SifterError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let size_bytes = file.metadata().map_err(io_err)?.len();

    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(io_err)?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let hash = format!("sha256:{:x}", hasher.finalize());

    Ok(SourceMetadata::new(path.to_path_buf(), hash, size_bytes, format))
}
