//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.
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

use proptest::prelude::*;
use serde_json::json;
use zi_annotate::enrich::{evaluate_template, unescape_lt_amp, ZiAnnotation, ZiServiceResponse};

fn person_response() -> ZiServiceResponse {
    ZiServiceResponse::new("Alice met Bob in Sheffield")
        .with_annotation(
            "Person",
            ZiAnnotation::new(0, 5)
                .with_feature("gender", json!("female"))
                .with_feature("confidence", json!(0.8532)),
        )
        .with_annotation("Person", ZiAnnotation::new(10, 13).with_feature("gender", json!("male")))
}

fn first_person(response: &ZiServiceResponse) -> &ZiAnnotation {
    &response.annotations("Person")[0]
}

#[test]
fn test_template_substitutes_text_and_features() {
    let response = person_response();
    let cell = evaluate_template(&response, first_person(&response), "[Name: ]text[ (]gender[)]");
    assert_eq!(cell, "Name: Alice (female)");
}

#[test]
fn test_template_missing_feature_is_reported() {
    let response = person_response();
    let cell = evaluate_template(&response, first_person(&response), "missingFeature");
    assert_eq!(cell, "missingFeature not found");
}

#[test]
fn test_template_percent_formats_two_decimals() {
    let response = person_response();
    let cell = evaluate_template(&response, first_person(&response), "confidence as %");
    assert_eq!(cell, "85.32%");
}

#[test]
fn test_template_percent_on_text_value_keeps_text() {
    let response = person_response();
    let cell = evaluate_template(&response, first_person(&response), "gender as %");
    assert_eq!(cell, "female");
}

#[test]
fn test_template_non_string_features_render_as_json() {
    let response = ZiServiceResponse::new("x").with_annotation(
        "Token",
        ZiAnnotation::new(0, 1)
            .with_feature("length", json!(1))
            .with_feature("flags", json!(["a", "b"]))
            .with_feature("stop", json!(true)),
    );
    let ann = &response.annotations("Token")[0];
    assert_eq!(evaluate_template(&response, ann, "length[/]flags[/]stop"), "1/[\"a\",\"b\"]/true");
}

#[test]
fn test_template_punctuation_outside_brackets_is_kept() {
    let response = person_response();
    let cell = evaluate_template(&response, first_person(&response), "text, gender!");
    assert_eq!(cell, "Alice, female!");
}

#[test]
fn test_text_under_unescapes_amp_and_lt() {
    let response = ZiServiceResponse::new("A &amp; B &lt;tag>")
        .with_annotation("Span", ZiAnnotation::new(0, 18));
    let ann = &response.annotations("Span")[0];
    assert_eq!(evaluate_template(&response, ann, "text"), "A & B <tag>");
}

#[test]
fn test_unescape_is_single_pass() {
    assert_eq!(unescape_lt_amp("&amp;lt;"), "&lt;");
    assert_eq!(unescape_lt_amp("&gt; &quot;"), "&gt; &quot;");
}

#[test]
fn test_text_under_uses_character_offsets() {
    let response = ZiServiceResponse::new("Zoë and José").with_annotation("Person", ZiAnnotation::new(8, 12));
    let ann = &response.annotations("Person")[0];
    assert_eq!(evaluate_template(&response, ann, "text"), "José");
}

#[test]
fn test_response_json_flattens_features() {
    let body = r#"{
        "text": "Sheffield",
        "entities": {
            "Location": [{"indices": [0, 9], "locType": "city"}]
        }
    }"#;
    let response = ZiServiceResponse::from_json(body).expect("valid response");
    let ann = &response.annotations("Location")[0];
    assert_eq!(evaluate_template(&response, ann, "text[ ]locType"), "Sheffield city");
    assert!(response.annotations("Person").is_empty());
}

proptest! {
    #[test]
    fn prop_bracketed_literal_is_verbatim(literal in "[^\\[\\]\\n]{0,24}") {
        let response = person_response();
        let template = format!("[{}]", literal);
        prop_assert_eq!(evaluate_template(&response, first_person(&response), &template), literal);
    }
}
