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

use crate::dsl::ir::{ZiColumnDefinition, ZiColumnKind, ZiColumnProgram};
use crate::errors::{Result, ZiError};

#[derive(Clone, Debug)]
pub struct ZiParseResult {
    pub program: ZiColumnProgram,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ZiColumnParser;

impl ZiColumnParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses a single column definition.
    pub fn parse(&self, source: &str) -> Result<ZiColumnDefinition> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(ZiError::validation("empty column definition"));
        }

        let (head, rest) = match trimmed.find(char::is_whitespace) {
            Some(idx) => (&trimmed[..idx], Some(trimmed[idx..].trim_start())),
            None => (trimmed, None),
        };

        let (annotation_type, selector) = match head.find(':') {
            Some(idx) => (head[idx + 1..].to_string(), Some(head.to_string())),
            None => (head.to_string(), None),
        };

        let kind = match rest {
            None | Some("text") => ZiColumnKind::Text,
            Some("present?") => ZiColumnKind::Present,
            Some("#count") => ZiColumnKind::Count,
            Some(template) => ZiColumnKind::Template(template.to_string()),
        };

        Ok(ZiColumnDefinition {
            source: trimmed.to_string(),
            annotation_type,
            selector,
            kind,
        })
    }

    /// Parses every definition, in order.
    pub fn parse_all<I, S>(&self, sources: I) -> Result<ZiParseResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut program = ZiColumnProgram::new();
        let mut warnings = Vec::new();

        for (idx, source) in sources.into_iter().enumerate() {
            let source = source.as_ref();
            if source.trim().is_empty() {
                warnings.push(format!("Column {}: blank definition skipped", idx + 1));
                continue;
            }
            let column = self
                .parse(source)
                .map_err(|e| ZiError::validation(format!("Column {}: {}", idx + 1, e)))?;
            log::info!("Processing column definition: {}", column.source);
            program = program.add_column(column);
        }

        Ok(ZiParseResult { program, warnings })
    }
}
