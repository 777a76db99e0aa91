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

use serde::{Deserialize, Serialize};

/// What a column extracts from the annotations of its type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiColumnKind {
    /// Text under each annotation, `;`-joined.
    Text,
    /// `1` when at least one annotation exists, `0` otherwise.
    Present,
    /// Number of annotations.
    Count,
    /// Template applied to each annotation, `;`-joined.
    Template(String),
}

/// A parsed column definition, before selector resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZiColumnDefinition {
    /// The definition as written (trimmed); used as the output header.
    pub source: String,
    /// Annotation type the column reads from.
    pub annotation_type: String,
    /// Explicit `set:Type` selector, when the definition carried one.
    pub selector: Option<String>,
    pub kind: ZiColumnKind,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZiColumnProgram {
    pub columns: Vec<ZiColumnDefinition>,
}

impl ZiColumnProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_column(mut self, column: ZiColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
