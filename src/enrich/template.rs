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

//! # Column Template Module
//!
//! Templates describe how one annotation is rendered into an output cell.
//!
//! - `[literal text]` is copied as-is
//! - `word` is a feature reference; `text` means the annotated text
//! - `word as %` renders a numeric feature as a percentage
//! - anything else is copied as-is
//!
//! ```text
//! [Person: ]text[ (]gender[, ]confidence as %[)]
//! ```
//!
//! Evaluation never fails; a missing feature renders as `"<name> not found"`.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::enrich::annotation::{ZiAnnotation, ZiServiceResponse};

/// One piece of a parsed template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZiTemplateToken {
    /// Copied verbatim into the output.
    Literal(String),
    /// Looked up on the annotation at evaluation time.
    Feature { name: String, percent: bool },
}

/// A template parsed once and evaluated against many annotations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiTemplate {
    source: String,
    tokens: Vec<ZiTemplateToken>,
}

fn template_regex() -> &'static Regex {
    static TEMPLATE: OnceLock<Regex> = OnceLock::new();
    TEMPLATE.get_or_init(|| {
        Regex::new(r"\[(.*?)\]|([\p{L}_][\w-]*)(?:\s+(as\s+%))?").expect("valid template pattern")
    })
}

impl ZiTemplate {
    /// Tokenizes a template. Every input is a valid template.
    pub fn parse(source: &str) -> Self {
        let mut tokens = Vec::new();
        let mut last = 0;

        for caps in template_regex().captures_iter(source) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last {
                push_literal(&mut tokens, &source[last..whole.start()]);
            }
            if let Some(literal) = caps.get(1) {
                push_literal(&mut tokens, literal.as_str());
            } else if let Some(name) = caps.get(2) {
                tokens.push(ZiTemplateToken::Feature {
                    name: name.as_str().to_string(),
                    percent: caps.get(3).is_some(),
                });
            }
            last = whole.end();
        }
        if last < source.len() {
            push_literal(&mut tokens, &source[last..]);
        }

        Self {
            source: source.to_string(),
            tokens,
        }
    }

    /// The template as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[ZiTemplateToken] {
        &self.tokens
    }

    /// Renders the template for one annotation of `response`.
    pub fn evaluate(&self, response: &ZiServiceResponse, annotation: &ZiAnnotation) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                ZiTemplateToken::Literal(text) => out.push_str(text),
                ZiTemplateToken::Feature { name, percent } => {
                    out.push_str(&resolve_feature(response, annotation, name, *percent))
                }
            }
        }
        out
    }
}

/// Parses and evaluates `template` in one go.
pub fn evaluate_template(
    response: &ZiServiceResponse,
    annotation: &ZiAnnotation,
    template: &str,
) -> String {
    ZiTemplate::parse(template).evaluate(response, annotation)
}

fn push_literal(tokens: &mut Vec<ZiTemplateToken>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(ZiTemplateToken::Literal(prev)) = tokens.last_mut() {
        prev.push_str(text);
    } else {
        tokens.push(ZiTemplateToken::Literal(text.to_string()));
    }
}

fn resolve_feature(
    response: &ZiServiceResponse,
    annotation: &ZiAnnotation,
    name: &str,
    percent: bool,
) -> String {
    if name == "text" {
        return response.text_under(annotation);
    }
    match annotation.feature(name) {
        Some(value) if percent => match value.as_f64() {
            Some(number) => format!("{:.2}%", number * 100.0),
            None => feature_to_string(value),
        },
        Some(value) => feature_to_string(value),
        None => format!("{} not found", name),
    }
}

/// Renders a feature value for a CSV cell.
pub fn feature_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
