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

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dsl::ZiTypeSelectors;
use crate::errors::Result;

/// Body of the service's `/metadata` endpoint. Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZiServiceMetadata {
    /// Comma-separated selectors returned when none are requested.
    #[serde(default)]
    pub default_annotations: Option<String>,
    /// Comma-separated selectors available on request.
    #[serde(default)]
    pub additional_annotations: Option<String>,
}

impl ZiServiceMetadata {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Every advertised selector, default ones first.
    pub fn selectors(&self) -> Vec<String> {
        [&self.default_annotations, &self.additional_annotations]
            .into_iter()
            .flatten()
            .flat_map(|list| list.split(','))
            .map(str::trim)
            .filter(|sel| !sel.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Maps each annotation type to the first selector that provides it.
    pub fn type_selectors(&self) -> ZiTypeSelectors {
        let mut table = ZiTypeSelectors::new();
        for selector in self.selectors() {
            let annotation_type = annotation_type_of(&selector).to_string();
            table.entry(annotation_type).or_insert(selector);
        }
        table
    }

    pub fn annotation_types(&self) -> BTreeSet<String> {
        self.selectors()
            .iter()
            .map(|sel| annotation_type_of(sel).to_string())
            .collect()
    }
}

/// `set:Type` → `Type`; a selector without a set is the type itself.
pub fn annotation_type_of(selector: &str) -> &str {
    match selector.split_once(':') {
        Some((_, annotation_type)) => annotation_type,
        None => selector,
    }
}
