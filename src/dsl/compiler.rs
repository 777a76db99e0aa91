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

use std::collections::{BTreeSet, HashMap};

use crate::dsl::ir::{ZiColumnDefinition, ZiColumnKind, ZiColumnProgram};
use crate::dsl::parser::ZiColumnParser;
use crate::enrich::{ZiServiceResponse, ZiTemplate};
use crate::errors::{Result, ZiError};

/// Separator placed between values from several annotations of one type.
pub const VALUE_SEPARATOR: &str = ";";

/// Annotation type to selector, as advertised by the service metadata.
pub type ZiTypeSelectors = HashMap<String, String>;

/// Extraction function produced for one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZiExtractor {
    Text { annotation_type: String },
    Present { annotation_type: String },
    Count { annotation_type: String },
    Template { annotation_type: String, template: ZiTemplate },
}

impl ZiExtractor {
    pub fn annotation_type(&self) -> &str {
        match self {
            ZiExtractor::Text { annotation_type }
            | ZiExtractor::Present { annotation_type }
            | ZiExtractor::Count { annotation_type }
            | ZiExtractor::Template { annotation_type, .. } => annotation_type,
        }
    }

    /// Computes the cell value for one response.
    pub fn extract(&self, response: &ZiServiceResponse) -> String {
        let annotations = response.annotations(self.annotation_type());
        match self {
            ZiExtractor::Text { .. } => annotations
                .iter()
                .map(|ann| response.text_under(ann))
                .collect::<Vec<_>>()
                .join(VALUE_SEPARATOR),
            ZiExtractor::Present { .. } => {
                if annotations.is_empty() {
                    "0".to_string()
                } else {
                    "1".to_string()
                }
            }
            ZiExtractor::Count { .. } => annotations.len().to_string(),
            ZiExtractor::Template { template, .. } => annotations
                .iter()
                .map(|ann| template.evaluate(response, ann))
                .collect::<Vec<_>>()
                .join(VALUE_SEPARATOR),
        }
    }
}

/// A column ready to run: its header, selector and extractor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiCompiledColumn {
    pub header: String,
    pub selector: String,
    pub extractor: ZiExtractor,
}

/// All compiled columns of a run, plus the deduplicated selector set.
///
/// Built once before the first row and only read afterwards.
#[derive(Clone, Debug, Default)]
pub struct ZiColumnSpecSet {
    columns: Vec<ZiCompiledColumn>,
    selectors: BTreeSet<String>,
}

impl ZiColumnSpecSet {
    pub fn new(columns: Vec<ZiCompiledColumn>) -> Self {
        let selectors = columns.iter().map(|c| c.selector.clone()).collect();
        Self { columns, selectors }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ZiCompiledColumn] {
        &self.columns
    }

    /// Selectors to request, each once, in sorted order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.selectors.iter().map(String::as_str)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.header.as_str())
    }

    /// Annotation types read by at least one column.
    pub fn annotation_types(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.extractor.annotation_type())
    }

    /// One value per column, in definition order.
    pub fn extract_all(&self, response: &ZiServiceResponse) -> Vec<String> {
        self.columns.iter().map(|c| c.extractor.extract(response)).collect()
    }

    /// Placeholder values for rows that have no response.
    pub fn empty_values(&self) -> Vec<String> {
        vec![String::new(); self.columns.len()]
    }
}

#[derive(Debug, Default)]
pub struct ZiColumnCompiler {
    type_selectors: ZiTypeSelectors,
}

impl ZiColumnCompiler {
    pub fn new(type_selectors: ZiTypeSelectors) -> Self {
        Self { type_selectors }
    }

    pub fn resolve_selector(&self, column: &ZiColumnDefinition) -> String {
        if let Some(selector) = &column.selector {
            return selector.clone();
        }
        match self.type_selectors.get(&column.annotation_type) {
            Some(selector) => selector.clone(),
            None => format!(":{}", column.annotation_type),
        }
    }

    pub fn compile_column(&self, column: &ZiColumnDefinition) -> ZiCompiledColumn {
        let annotation_type = column.annotation_type.clone();
        let extractor = match &column.kind {
            ZiColumnKind::Text => {
                log::info!("Using text under annotation type {}", annotation_type);
                ZiExtractor::Text { annotation_type }
            }
            ZiColumnKind::Present => {
                log::info!(
                    "Existence check - 1 if annotation type {} is present, 0 otherwise",
                    annotation_type
                );
                ZiExtractor::Present { annotation_type }
            }
            ZiColumnKind::Count => {
                log::info!(
                    "Annotation count - number of occurrences of annotation type {}",
                    annotation_type
                );
                ZiExtractor::Count { annotation_type }
            }
            ZiColumnKind::Template(source) => {
                log::info!("Annotation feature template for type {}", annotation_type);
                ZiExtractor::Template {
                    annotation_type,
                    template: ZiTemplate::parse(source),
                }
            }
        };

        ZiCompiledColumn {
            header: column.source.clone(),
            selector: self.resolve_selector(column),
            extractor,
        }
    }

    pub fn compile(&self, program: &ZiColumnProgram) -> Result<ZiColumnSpecSet> {
        if program.is_empty() {
            return Err(ZiError::validation("at least one result column is required"));
        }
        let columns = program.columns.iter().map(|c| self.compile_column(c)).collect();
        let set = ZiColumnSpecSet::new(columns);
        log::info!(
            "Annotation selectors to send to service: {:?}",
            set.selectors().collect::<Vec<_>>()
        );
        Ok(set)
    }
}

/// Compiles one definition string into its selector and extractor.
pub fn compile(
    definition: &str,
    type_selectors: &ZiTypeSelectors,
) -> Result<(String, ZiExtractor)> {
    let column = ZiColumnParser::new().parse(definition)?;
    let compiled = ZiColumnCompiler::new(type_selectors.clone()).compile_column(&column);
    Ok((compiled.selector, compiled.extractor))
}

/// Parses and compiles a list of definitions, skipping blank ones.
pub fn compile_columns<I, S>(
    definitions: I,
    type_selectors: ZiTypeSelectors,
) -> Result<ZiColumnSpecSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = ZiColumnParser::new().parse_all(definitions)?;
    for warning in &parsed.warnings {
        log::warn!("{}", warning);
    }
    ZiColumnCompiler::new(type_selectors).compile(&parsed.program)
}
