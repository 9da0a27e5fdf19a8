//! Incremental CSV output.
//!
//! Every record is flushed and synced to disk before `append` returns, so an
//! interrupted run leaves a valid file that a later run can append to.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::enrich::EnrichedRecord;
use crate::error::{Result, SifterError};
use crate::input::InputSchema;

/// Extra header cell written when the provider column is enabled.
pub const PROVIDER_COLUMN: &str = "Provider";

/// Append-only writer for enriched records.
pub struct ResultSink {
    path: PathBuf,
    schema: InputSchema,
    include_provider: bool,
    writer: csv::Writer<File>,
    written: usize,
}

impl ResultSink {
    /// Open `path` for appending, writing the header if the file is new or empty.
    pub fn open(
        path: impl AsRef<Path>,
        schema: InputSchema,
        include_provider: bool,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let output_err = |source| SifterError::Output {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(output_err)?;
            }
        }

        let needs_header = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(output_err)?;

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        let mut sink = Self {
            path,
            schema,
            include_provider,
            writer,
            written: 0,
        };

        if needs_header {
            let mut header: Vec<&str> = schema.output_header().to_vec();
            if include_provider {
                header.push(PROVIDER_COLUMN);
            }
            sink.writer.write_record(&header)?;
            sink.sync()?;
            debug!("Wrote header to {}", sink.path.display());
        } else {
            info!("Appending to existing output {}", sink.path.display());
        }

        Ok(sink)
    }

    /// Write one record and make it durable.
    pub fn append(&mut self, record: &EnrichedRecord) -> Result<()> {
        self.writer
            .write_record(record.to_row(self.schema, self.include_provider))?;
        self.sync()?;
        self.written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this sink.
    pub fn written(&self) -> usize {
        self.written
    }

    fn sync(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| SifterError::Output {
            path: self.path.clone(),
            source,
        })?;
        self.writer
            .get_ref()
            .sync_data()
            .map_err(|source| SifterError::Output {
                path: self.path.clone(),
                source,
            })
    }
}
