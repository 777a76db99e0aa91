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

use zi_annotate::service::details::{details_from_catalogue, ZiServiceCatalogueEntry, ZiServiceDetails};
use zi_annotate::service::metadata::annotation_type_of;
use zi_annotate::service::{ZiClientConfig, ZiServiceMetadata, ZiServiceReply};

const METADATA: &str = r#"{
    "defaultAnnotations": ":Person, :Location,,",
    "additionalAnnotations": "extra:Person, extra:Date , Sentence"
}"#;

#[test]
fn test_metadata_first_selector_per_type_wins() {
    let metadata = ZiServiceMetadata::from_json(METADATA).expect("metadata");
    assert_eq!(
        metadata.selectors(),
        vec![":Person", ":Location", "extra:Person", "extra:Date", "Sentence"]
    );

    let table = metadata.type_selectors();
    assert_eq!(table.get("Person").map(String::as_str), Some(":Person"));
    assert_eq!(table.get("Date").map(String::as_str), Some("extra:Date"));
    assert_eq!(table.get("Sentence").map(String::as_str), Some("Sentence"));
    assert_eq!(table.len(), 4);
}

#[test]
fn test_metadata_without_lists_is_empty() {
    let metadata = ZiServiceMetadata::from_json("{}").expect("metadata");
    assert!(metadata.selectors().is_empty());
    assert!(metadata.type_selectors().is_empty());
    assert!(ZiServiceMetadata::from_json("not json").is_err());
}

#[test]
fn test_annotation_type_of_selector() {
    assert_eq!(annotation_type_of("entities:Person"), "Person");
    assert_eq!(annotation_type_of(":Person"), "Person");
    assert_eq!(annotation_type_of("Person"), "Person");
}

#[test]
fn test_error_message_rendering() {
    assert_eq!(ZiServiceReply::new(400, r#"{"message": "Bad key"}"#).error_message(), "Bad key");
    assert_eq!(ZiServiceReply::new(400, r#"{"message": {"code": 3}}"#).error_message(), r#"{"code":3}"#);
    assert_eq!(ZiServiceReply::new(500, "{}").error_message(), "{}");
    assert_eq!(ZiServiceReply::new(502, "<html>Bad Gateway</html>").error_message(), "<html>Bad Gateway</html>");
}

#[test]
fn test_metadata_url_follows_endpoint() {
    let config = ZiClientConfig::new("https://cloud-api.gate.ac.uk/process/annie/");
    assert_eq!(config.metadata_url(), "https://cloud-api.gate.ac.uk/process/annie/metadata");
}

#[test]
fn test_catalogue_details_render_extra_examples() {
    let catalogue: Vec<ZiServiceCatalogueEntry> = serde_json::from_str(
        r#"[{"slug": "annie", "configs": {"standard": ["Person"], "extra": ["Person #count"]}}]"#,
    )
    .expect("catalogue");

    let details =
        details_from_catalogue(&catalogue, "https://cloud-api.gate.ac.uk/process/annie").expect("listed service");
    assert_eq!(
        details.to_string(),
        "Service annie has the following recommended result specifiers:\n\n    Person\n\n\
         and the following additional examples:\n\n    Person #count\n"
    );
}

#[test]
fn test_annotation_type_details_render_sorted() {
    let metadata = ZiServiceMetadata::from_json(METADATA).expect("metadata");
    let details = ZiServiceDetails::AnnotationTypes {
        endpoint: "http://localhost/process".to_string(),
        types: metadata.annotation_types(),
    };
    let rendered = details.to_string();
    assert!(rendered.starts_with(
        "Service http://localhost/process can return the following annotation types:\n\n    Date\n    Location\n    Person\n    Sentence\n"
    ));
}
