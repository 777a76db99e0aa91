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

//! # Enrichment Module
//!
//! This module holds everything needed to turn an annotation service response
//! into output cells.
//!
//! ## Module Components
//!
//! - **Annotation** ([annotation.rs](annotation/index.html)): The response data
//!   model and the text-under-annotation helper
//! - **Template** ([template.rs](template/index.html)): The column template
//!   language evaluated once per annotation
//!
//! ## Usage Patterns
//!
//! ```rust
//! use zi_annotate::enrich::{ZiAnnotation, ZiServiceResponse, ZiTemplate};
//! use serde_json::json;
//!
//! let response = ZiServiceResponse::new("Sheffield")
//!     .with_annotation("Location", ZiAnnotation::new(0, 9).with_feature("locType", json!("city")));
//! let template = ZiTemplate::parse("text[ (]locType[)]");
//! let cell = template.evaluate(&response, &response.annotations("Location")[0]);
//! assert_eq!(cell, "Sheffield (city)");
//! ```

pub mod annotation;
pub mod template;

pub use annotation::{unescape_lt_amp, ZiAnnotation, ZiServiceResponse};
pub use template::{evaluate_template, feature_to_string, ZiTemplate, ZiTemplateToken};
