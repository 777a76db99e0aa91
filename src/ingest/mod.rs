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

//! # Data Ingestion Module
//!
//! This module reads the delimited input rows that are sent for annotation.
//!
//! ## Module Components
//!
//! - **Format Detection** ([format.rs](format/index.html)): Delimiter from file extension, encoding checks
//! - **Reader** ([reader.rs](reader/index.html)): Streaming row reader with column resolution and progress
//!
//! ## Supported Input Formats
//!
//! - **CSV**: Comma-separated values
//! - **TSV**: Tab-separated values (`--tsv`, or a `.tsv`/`.tab` extension)
//!
//! Input is decoded from any encoding known by label (`utf-8`, `latin-1`,
//! `cp1252`, `shift_jis`, ...). A leading byte-order mark, as written by
//! spreadsheet applications, is skipped.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use zi_annotate::ingest::{ZiCsvOptions, ZiRowReader};
//!
//! let options = ZiCsvOptions::for_path(&path, false);
//! let mut reader = ZiRowReader::open(&path, &options)?;
//! let text_column = reader.resolve_column("text")?;
//! while let Some(row) = reader.next_row()? {
//!     println!("{:?}", row.field(text_column));
//! }
//! ```

pub mod format;
pub mod reader;

pub use format::{
    check_encoding, resolve_encoding, resolve_output_encoding, wants_bom, ZiCsvOptions,
    ZiDelimitedFormat, ZiFormatDetector,
};
pub use reader::{ProgressCallback, ProgressInfo, ZiInputRow, ZiRowReader};
