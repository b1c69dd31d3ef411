//! Delimited record writer
//!
//! Appends one row per lemma to a file that must not exist before the crawl
//! starts. The header is written once on creation, and every row is checked
//! against the configured feature set before a single byte reaches the file.

use crate::lemma::{FeatureSet, LemmaRecord};
use crate::output::{OutputError, OutputResult};
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Append-only writer for lemma records
pub struct RecordWriter {
    path: PathBuf,
    fields: FeatureSet,
    writer: csv::Writer<File>,
    rows_written: u64,
}

impl RecordWriter {
    /// Creates the output file and writes the header row
    ///
    /// # Arguments
    ///
    /// * `path` - Output path, must not exist yet
    /// * `fields` - Columns in output order
    /// * `delimiter` - Single ASCII field delimiter
    ///
    /// # Returns
    ///
    /// * `Ok(RecordWriter)` - File created and header written
    /// * `Err(OutputError::AlreadyExists)` - Refusing to overwrite or append
    /// * `Err(OutputError::Create)` - The file could not be created
    pub fn create(path: impl AsRef<Path>, fields: FeatureSet, delimiter: char) -> OutputResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !delimiter.is_ascii() {
            return Err(OutputError::Delimiter(delimiter));
        }

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| {
                if source.kind() == ErrorKind::AlreadyExists {
                    OutputError::AlreadyExists { path: path.clone() }
                } else {
                    OutputError::Create {
                        path: path.clone(),
                        source,
                    }
                }
            })?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter as u8)
            .has_headers(false)
            .from_writer(file);

        writer.write_record(fields.column_names())?;
        writer.flush()?;

        tracing::debug!(
            "Created output file {} with columns {:?}",
            path.display(),
            fields.column_names()
        );

        Ok(Self {
            path,
            fields,
            writer,
            rows_written: 0,
        })
    }

    /// Appends one record
    ///
    /// Fails with `OutputError::Validation` if the record's keys differ from
    /// the configured fields; nothing is written in that case.
    pub fn write_row(&mut self, row: &LemmaRecord) -> OutputResult<()> {
        let compatible =
            row.len() == self.fields.len() && self.fields.iter().all(|f| row.has_feature(f));

        if !compatible {
            return Err(OutputError::Validation {
                row: row.to_string(),
            });
        }

        self.writer
            .write_record(self.fields.iter().map(|f| row.get(f).unwrap_or("")))?;
        self.writer.flush()?;
        self.rows_written += 1;

        Ok(())
    }

    /// Path of the output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Columns in output order
    pub fn fields(&self) -> &FeatureSet {
        &self.fields
    }

    /// Number of data rows written so far (header excluded)
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}
