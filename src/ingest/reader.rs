//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::cell::Cell;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::rc::Rc;

use csv::StringRecord;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};

use crate::errors::{Result, ZiError};
use crate::ingest::format::ZiCsvOptions;

/// Row progress, reported after every processed row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressInfo {
    pub rows_processed: usize,
    pub bytes_read: u64,
    pub total_bytes: Option<u64>,
}

impl ProgressInfo {
    pub fn fraction(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => Some(self.bytes_read as f64 / total as f64),
            _ => None,
        }
    }
}

pub type ProgressCallback<'a> = Box<dyn FnMut(&ProgressInfo) + 'a>;

/// One input row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiInputRow {
    /// Zero-based data row index, not counting the header row.
    pub index: usize,
    pub fields: Vec<String>,
}

impl ZiInputRow {
    pub fn field(&self, column: usize) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// Counts raw bytes pulled from the underlying source.
struct ZiByteCounter<R> {
    inner: R,
    consumed: Rc<Cell<u64>>,
}

impl<R: Read> Read for ZiByteCounter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed.set(self.consumed.get() + n as u64);
        Ok(n)
    }
}

/// Streaming reader over delimited rows.
///
/// Rows may have differing lengths; a missing field is reported by
/// [`ZiInputRow::field`] rather than as a parse error. Input is decoded to
/// UTF-8 from the encoding named in the options; bytes that do not decode
/// become U+FFFD.
pub struct ZiRowReader<R: Read> {
    reader: csv::Reader<DecodeReaderBytes<ZiByteCounter<R>, Vec<u8>>>,
    headers: Option<Vec<String>>,
    consumed: Rc<Cell<u64>>,
    total_bytes: Option<u64>,
    rows_read: usize,
    record: StringRecord,
}

impl ZiRowReader<File> {
    pub fn open(path: &Path, options: &ZiCsvOptions) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| ZiError::Io(format!("cannot open {}: {}", path.display(), e)))?;
        let total_bytes = file.metadata().ok().map(|m| m.len());
        log::info!(
            "Reading input file '{}' of size {} bytes, with encoding {}",
            path.display(),
            total_bytes.unwrap_or(0),
            options.encoding
        );
        let mut reader = Self::from_reader(file, options)?;
        reader.total_bytes = total_bytes;
        Ok(reader)
    }
}

impl<R: Read> ZiRowReader<R> {
    pub fn from_reader(inner: R, options: &ZiCsvOptions) -> Result<Self> {
        let encoding = options.input_encoding()?;
        log::debug!("Decoding input as {}", encoding.name());

        // A byte-order mark for the chosen encoding is dropped by the decoder.
        let consumed = Rc::new(Cell::new(0));
        let decoded = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding))
            .build(ZiByteCounter {
                inner,
                consumed: Rc::clone(&consumed),
            });

        let reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(decoded);

        let mut rows = Self {
            reader,
            headers: None,
            consumed,
            total_bytes: None,
            rows_read: 0,
            record: StringRecord::new(),
        };

        if options.has_headers {
            log::info!("Treating first row as column headers");
            let headers = match rows.read_fields()? {
                Some(fields) => fields,
                None => return Err(ZiError::validation("input has no header row")),
            };
            rows.headers = Some(headers);
        } else {
            log::info!("No column headers - columns referenced by index");
        }

        Ok(rows)
    }

    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Resolves a column given by header name, or by 1-based position when
    /// the input has no header row.
    pub fn resolve_column(&self, column: &str) -> Result<usize> {
        match &self.headers {
            Some(headers) => headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| {
                    ZiError::validation(format!("column '{}' not found in header row", column))
                }),
            None => match column.trim().parse::<usize>() {
                Ok(position) if position >= 1 => Ok(position - 1),
                _ => Err(ZiError::validation(format!(
                    "column '{}' must be a number counting from 1 when there is no header row",
                    column
                ))),
            },
        }
    }

    /// Output header for a resolved column.
    pub fn column_name(&self, column: usize) -> String {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get(column).cloned())
            .unwrap_or_else(|| format!("Column {}", column + 1))
    }

    pub fn next_row(&mut self) -> Result<Option<ZiInputRow>> {
        match self.read_fields()? {
            Some(fields) => {
                let row = ZiInputRow {
                    index: self.rows_read,
                    fields,
                };
                self.rows_read += 1;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    /// Raw input bytes consumed so far, including read-ahead.
    pub fn bytes_read(&self) -> u64 {
        self.consumed.get()
    }

    pub fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    fn read_fields(&mut self) -> Result<Option<Vec<String>>> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        Ok(Some(self.record.iter().map(str::to_string).collect()))
    }
}

impl<R: Read> Iterator for ZiRowReader<R> {
    type Item = Result<ZiInputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
