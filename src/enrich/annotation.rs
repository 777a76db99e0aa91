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

//! # Annotation Data Model
//!
//! This module provides the structured response returned by the annotation
//! service: the processed text plus every annotation grouped by type.
//!
//! On the wire each annotation is a JSON object holding an `indices` pair and
//! any number of feature values next to it:
//!
//! ```json
//! {"text": "Sheffield is in England",
//!  "entities": {"Location": [{"indices": [0, 9], "locType": "city"}]}}
//! ```
//!
//! Annotation lists are decoded one type at a time. A type whose list does
//! not decode is recorded in [`ZiServiceResponse::malformed_types`] instead of
//! failing the whole response, so only columns that read that type are
//! affected.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single annotation: a span of the response text plus its features.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiAnnotation {
    /// `[start, end)` character offsets into the parent response text.
    pub indices: [usize; 2],
    /// Named attributes attached to the annotation.
    #[serde(flatten)]
    pub features: Map<String, Value>,
}

impl ZiAnnotation {
    /// Creates an annotation without features.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            indices: [start, end],
            features: Map::new(),
        }
    }

    /// Adds a feature value.
    pub fn with_feature(mut self, name: impl Into<String>, value: Value) -> Self {
        self.features.insert(name.into(), value);
        self
    }

    /// Looks up a feature by name.
    pub fn feature(&self, name: &str) -> Option<&Value> {
        self.features.get(name)
    }
}

/// Successful response of the annotation service.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ZiServiceResponse {
    /// The text as the service saw it; annotation indices point into it.
    pub text: String,
    /// Annotations grouped by annotation type, in service order.
    pub entities: HashMap<String, Vec<ZiAnnotation>>,
    /// Types whose annotation list could not be decoded.
    #[serde(skip)]
    pub malformed_types: BTreeSet<String>,
}

/// Top-level shape of a successful body. Annotation lists stay raw until
/// they are decoded per type.
#[derive(Deserialize)]
struct RawResponse {
    text: String,
    entities: Map<String, Value>,
}

impl ZiServiceResponse {
    /// Creates a response with no annotations.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entities: HashMap::new(),
            malformed_types: BTreeSet::new(),
        }
    }

    /// Appends an annotation of the given type.
    pub fn with_annotation(
        mut self,
        annotation_type: impl Into<String>,
        annotation: ZiAnnotation,
    ) -> Self {
        self.entities
            .entry(annotation_type.into())
            .or_default()
            .push(annotation);
        self
    }

    /// Parses a service body. Only a string `text` and an object `entities`
    /// are required; malformed annotation lists are set aside per type.
    pub fn from_json(body: &str) -> Option<Self> {
        let raw: RawResponse = serde_json::from_str(body).ok()?;
        let mut response = Self::new(raw.text);
        for (annotation_type, list) in raw.entities {
            match serde_json::from_value::<Vec<ZiAnnotation>>(list) {
                Ok(annotations) => {
                    response.entities.insert(annotation_type, annotations);
                }
                Err(e) => {
                    log::debug!("Ignoring malformed {} annotations: {}", annotation_type, e);
                    response.malformed_types.insert(annotation_type);
                }
            }
        }
        Some(response)
    }

    pub fn is_malformed(&self, annotation_type: &str) -> bool {
        self.malformed_types.contains(annotation_type)
    }

    /// All annotations of a type; empty when the type is absent.
    pub fn annotations(&self, annotation_type: &str) -> &[ZiAnnotation] {
        self.entities
            .get(annotation_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Text covered by an annotation, with `&amp;` and `&lt;` unescaped.
    pub fn text_under(&self, annotation: &ZiAnnotation) -> String {
        let [start, end] = annotation.indices;
        unescape_lt_amp(char_slice(&self.text, start, end))
    }
}

/// Reverses the two entity escapes the service applies to annotation text.
///
/// Only `&amp;` and `&lt;` are touched, in a single pass, so `&amp;lt;`
/// becomes `&lt;` and `&gt;` is left alone.
pub fn unescape_lt_amp(text: &str) -> String {
    static LT_AMP: OnceLock<Regex> = OnceLock::new();
    let re = LT_AMP.get_or_init(|| Regex::new(r"&(amp|lt);").expect("valid entity pattern"));
    re.replace_all(text, |caps: &Captures| {
        if &caps[1] == "amp" {
            "&"
        } else {
            "<"
        }
    })
    .into_owned()
}

/// Slices by character offsets, clamping both ends to the text.
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let mut offsets = text.char_indices().map(|(idx, _)| idx).chain(std::iter::once(text.len()));
    let from = offsets.nth(start).unwrap_or(text.len());
    let to = offsets.nth(end - start - 1).unwrap_or(text.len());
    &text[from..to]
}
