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

//! # Row Writer Module
//!
//! Writes output rows as comma-separated values, flushing after every row so
//! that an interrupted run leaves every finished row on disk. Text is
//! re-encoded on the way out when the output encoding is not UTF-8;
//! characters the encoding cannot represent are written as numeric
//! character references (`&#8364;`).

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::ingest::format::{resolve_output_encoding, wants_bom};
use crate::record::ZiRowResult;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Statistics about write operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiWriteStats {
    /// Data rows written, not counting the header row.
    pub rows_written: usize,
    pub header_written: bool,
}

/// Encodes the UTF-8 produced by the csv writer into the target encoding.
struct ZiEncodingSink<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    pending: Vec<u8>,
    warned: bool,
}

impl<W: Write> Write for ZiEncodingSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.encoding == UTF_8 {
            return self.inner.write(buf);
        }
        self.pending.extend_from_slice(buf);
        // A chunk may end part way through a character; keep the tail.
        let complete = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };
        let text = std::str::from_utf8(&self.pending[..complete])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let (encoded, _, unmappable) = self.encoding.encode(text);
        if unmappable && !self.warned {
            log::warn!(
                "Output contains characters that {} cannot represent, writing them as character references",
                self.encoding.name()
            );
            self.warned = true;
        }
        self.inner.write_all(&encoded)?;
        self.pending.drain(..complete);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Row writer over any [`Write`] sink.
pub struct ZiRowWriter<W: Write> {
    writer: csv::Writer<ZiEncodingSink<W>>,
    width: Option<usize>,
    stats: ZiWriteStats,
}

impl ZiRowWriter<File> {
    /// Creates (or truncates) the output file. `utf-8-sig` output starts
    /// with a UTF-8 byte-order mark.
    pub fn create(path: &Path, encoding: &str) -> Result<Self> {
        let target = resolve_output_encoding(encoding)?;
        let mut file = File::create(path)
            .map_err(|e| ZiError::Io(format!("cannot create {}: {}", path.display(), e)))?;
        if wants_bom(encoding) {
            file.write_all(UTF8_BOM)?;
        }
        log::info!(
            "Writing to output file '{}' with encoding {}",
            path.display(),
            target.name()
        );
        Ok(Self::with_encoding(file, target))
    }
}

impl<W: Write> ZiRowWriter<W> {
    /// UTF-8 writer without a byte-order mark.
    pub fn from_writer(sink: W) -> Self {
        Self::with_encoding(sink, UTF_8)
    }

    pub fn with_encoding(sink: W, encoding: &'static Encoding) -> Self {
        let sink = ZiEncodingSink {
            inner: sink,
            encoding,
            pending: Vec::new(),
            warned: false,
        };
        Self {
            writer: csv::WriterBuilder::new().delimiter(b',').from_writer(sink),
            width: None,
            stats: ZiWriteStats::default(),
        }
    }

    pub fn write_header(&mut self, headers: &[String]) -> Result<()> {
        if self.stats.header_written || self.stats.rows_written > 0 {
            return Err(ZiError::internal("header must be written before any row"));
        }
        self.write_fields(headers)?;
        self.stats.header_written = true;
        Ok(())
    }

    /// Writes one row and flushes it.
    pub fn write_row(&mut self, row: ZiRowResult) -> Result<()> {
        let fields = row.into_fields();
        self.write_fields(&fields)?;
        self.stats.rows_written += 1;
        Ok(())
    }

    pub fn stats(&self) -> &ZiWriteStats {
        &self.stats
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map(|sink| sink.inner)
            .map_err(|e| ZiError::Io(format!("failed to flush output: {}", e.error())))
    }

    fn write_fields(&mut self, fields: &[String]) -> Result<()> {
        match self.width {
            Some(width) if width != fields.len() => {
                return Err(ZiError::internal(format!(
                    "output row has {} fields, expected {}",
                    fields.len(),
                    width
                )));
            }
            _ => self.width = Some(fields.len()),
        }
        self.writer.write_record(fields)?;
        self.writer.flush()?;
        Ok(())
    }
}
