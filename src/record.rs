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

//! # Zi Row Module
//!
//! This module provides the output record of the annotation pipeline. One
//! [`ZiRowResult`] is produced for every input row, whatever happened to it.
//!
//! ## Output Shape
//!
//! Every output row has the same layout:
//!
//! ```text
//! copied columns..., status, derived columns...
//! ```
//!
//! - **Copied columns**: values taken verbatim from the input row
//! - **Status**: `Success`, or `Error: <message>` when the row failed
//! - **Derived columns**: one value per result column definition, empty for
//!   failed rows
//!
//! ## Usage Example
//!
//! ```rust
//! use zi_annotate::record::{ZiRowResult, ZiRowStatus};
//!
//! let row = ZiRowResult::success(vec!["42".into()], vec!["Alice".into(), "1".into()]);
//! assert_eq!(row.into_fields(), vec!["42", "Success", "Alice", "1"]);
//!
//! let row = ZiRowResult::failure(vec!["43".into()], "quota exceeded", 2);
//! assert_eq!(row.status, ZiRowStatus::Error("quota exceeded".into()));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Header of the status column.
pub const STATUS_HEADER: &str = "status";

/// Outcome of one row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiRowStatus {
    Success,
    /// The service reported an error, or no reply could be obtained.
    Error(String),
}

impl ZiRowStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ZiRowStatus::Success)
    }
}

impl fmt::Display for ZiRowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZiRowStatus::Success => write!(f, "Success"),
            ZiRowStatus::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// One output row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiRowResult {
    /// Values copied from the input row, in `--copy-columns` order.
    pub copied: Vec<String>,
    pub status: ZiRowStatus,
    /// One value per result column.
    pub derived: Vec<String>,
}

impl ZiRowResult {
    pub fn success(copied: Vec<String>, derived: Vec<String>) -> Self {
        Self {
            copied,
            status: ZiRowStatus::Success,
            derived,
        }
    }

    /// Failed row; the derived columns are left empty.
    pub fn failure(
        copied: Vec<String>,
        message: impl Into<String>,
        derived_columns: usize,
    ) -> Self {
        Self {
            copied,
            status: ZiRowStatus::Error(message.into()),
            derived: vec![String::new(); derived_columns],
        }
    }

    pub fn width(&self) -> usize {
        self.copied.len() + 1 + self.derived.len()
    }

    /// Flattens the row into output cells.
    pub fn into_fields(self) -> Vec<String> {
        let mut fields = Vec::with_capacity(self.width());
        fields.extend(self.copied);
        fields.push(self.status.to_string());
        fields.extend(self.derived);
        fields
    }
}

/// Output header row: copied column names, `status`, then result definitions.
pub fn output_headers<C, D>(copied: C, definitions: D) -> Vec<String>
where
    C: IntoIterator,
    C::Item: Into<String>,
    D: IntoIterator,
    D::Item: Into<String>,
{
    copied
        .into_iter()
        .map(Into::into)
        .chain(std::iter::once(STATUS_HEADER.to_string()))
        .chain(definitions.into_iter().map(Into::into))
        .collect()
}
