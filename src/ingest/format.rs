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

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiDelimitedFormat {
    Csv,
    Tsv,
}

impl ZiDelimitedFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            ZiDelimitedFormat::Csv => b',',
            ZiDelimitedFormat::Tsv => b'\t',
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ZiFormatDetector;

impl ZiFormatDetector {
    pub fn new() -> Self {
        Self
    }

    /// `.tsv` and `.tab` files are tab-separated; everything else is CSV.
    pub fn detect_from_path(&self, path: &Path) -> ZiDelimitedFormat {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "tsv" | "tab" => ZiDelimitedFormat::Tsv,
            _ => ZiDelimitedFormat::Csv,
        }
    }
}

/// How the input file is to be read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiCsvOptions {
    pub delimiter: u8,
    /// First row holds column names.
    pub has_headers: bool,
    pub encoding: String,
}

impl Default for ZiCsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            encoding: "utf-8-sig".to_string(),
        }
    }
}

impl ZiCsvOptions {
    /// Options for `path`, with the delimiter chosen from its extension
    /// unless `force_tsv` is set.
    pub fn for_path(path: &Path, force_tsv: bool) -> Self {
        let format = if force_tsv {
            ZiDelimitedFormat::Tsv
        } else {
            ZiFormatDetector::new().detect_from_path(path)
        };
        Self {
            delimiter: format.delimiter(),
            ..Self::default()
        }
    }

    pub fn has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Fails when the encoding label is unknown.
    pub fn validate(&self) -> Result<()> {
        self.input_encoding().map(|_| ())
    }

    pub fn input_encoding(&self) -> Result<&'static Encoding> {
        resolve_encoding(&self.encoding)
    }
}

/// Looks up an encoding by label.
///
/// Accepts WHATWG labels (`windows-1252`, `iso-8859-1`, `utf-8`) as well as
/// the common spellings `utf_8`, `latin-1`, `latin_1` and the `utf-8-sig`
/// variant, which reads and writes UTF-8 with a byte-order mark.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    if wants_bom(label) {
        return Ok(UTF_8);
    }
    let normalized = label.trim().to_ascii_lowercase();
    let candidates = [
        normalized.clone(),
        normalized.replace('_', "-"),
        normalized.replace(&['_', '-'][..], ""),
    ];
    candidates
        .iter()
        .find_map(|candidate| Encoding::for_label(candidate.as_bytes()))
        .ok_or_else(|| ZiError::config(format!("unknown encoding '{}'", label)))
}

pub fn check_encoding(label: &str) -> Result<()> {
    resolve_encoding(label).map(|_| ())
}

/// Like [`resolve_encoding`], but rejects encodings that can only be decoded
/// (UTF-16 and `replacement`).
pub fn resolve_output_encoding(label: &str) -> Result<&'static Encoding> {
    let encoding = resolve_encoding(label)?;
    if encoding.output_encoding() != encoding {
        return Err(ZiError::config(format!(
            "cannot write output as '{}', choose an ASCII-compatible encoding",
            label
        )));
    }
    Ok(encoding)
}

/// Whether output should start with a byte-order mark.
pub fn wants_bom(encoding: &str) -> bool {
    let normalized = encoding.trim().to_ascii_lowercase();
    normalized == "utf-8-sig" || normalized == "utf_8_sig"
}
