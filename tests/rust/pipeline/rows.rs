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

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

use proptest::prelude::*;
use tempfile::NamedTempFile;
use zi_annotate::dsl::{compile_columns, ZiTypeSelectors};
use zi_annotate::ingest::{ProgressInfo, ZiCsvOptions, ZiRowReader};
use zi_annotate::pipeline::{ZiRowPipeline, ZiRowSelection, ZiRowState, ZiSleeper};
use zi_annotate::record::ZiRowStatus;
use zi_annotate::service::{ZiAnnotationService, ZiServiceReply};
use zi_annotate::{Result, ZiError, ZiRowWriter};

const PERSON_BODY: &str = r#"{"text": "Alice met Bob", "entities": {"Person": [{"indices": [0, 5]}, {"indices": [10, 13]}]}}"#;

/// Replays canned replies and records what was sent.
#[derive(Default)]
struct ScriptedService {
    replies: RefCell<VecDeque<Result<ZiServiceReply>>>,
    fallback: Option<ZiServiceReply>,
    calls: Cell<usize>,
    last_selectors: RefCell<Vec<String>>,
}

impl ScriptedService {
    fn new(replies: Vec<Result<ZiServiceReply>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            ..Self::default()
        }
    }

    fn always(reply: ZiServiceReply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::default()
        }
    }
}

impl ZiAnnotationService for ScriptedService {
    fn annotate(&self, _text: &str, selectors: &[&str]) -> Result<ZiServiceReply> {
        self.calls.set(self.calls.get() + 1);
        *self.last_selectors.borrow_mut() = selectors.iter().map(|s| s.to_string()).collect();
        match self.replies.borrow_mut().pop_front() {
            Some(reply) => reply,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| ZiError::internal("script exhausted")),
        }
    }
}

#[derive(Default)]
struct RecordingSleeper {
    waits: Vec<Duration>,
}

impl ZiSleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.waits.push(duration);
    }
}

fn type_selectors() -> ZiTypeSelectors {
    let mut table = ZiTypeSelectors::new();
    table.insert("Person".to_string(), "entities:Person".to_string());
    table
}

fn pipeline(service: &ScriptedService) -> ZiRowPipeline<&ScriptedService, RecordingSleeper> {
    let columns = compile_columns(["Person", "Person #count"], type_selectors()).expect("columns");
    ZiRowPipeline::new(service, columns).with_sleeper(RecordingSleeper::default())
}

fn ok(reply: ZiServiceReply) -> Result<ZiServiceReply> {
    Ok(reply)
}

fn rate_limited(retry_after: &str) -> ZiServiceReply {
    ZiServiceReply::new(429, r#"{"message": "Too many requests"}"#).with_header("Retry-After", retry_after)
}

#[test]
fn test_success_row_has_derived_values() {
    let service = ScriptedService::new(vec![ok(ZiServiceReply::new(200, PERSON_BODY))]);
    let mut pipeline = pipeline(&service);

    let result = pipeline
        .process_row(vec!["1".to_string()], Some("Alice met Bob"))
        .expect("row");

    assert_eq!(result.status, ZiRowStatus::Success);
    assert_eq!(result.into_fields(), vec!["1", "Success", "Alice;Bob", "2"]);
    assert_eq!(*service.last_selectors.borrow(), vec!["entities:Person"]);
    assert_eq!(pipeline.stats().succeeded, 1);
}

#[test]
fn test_error_reply_uses_message_field() {
    let service = ScriptedService::new(vec![ok(ZiServiceReply::new(400, r#"{"message": "Text too long"}"#))]);
    let mut pipeline = pipeline(&service);

    let result = pipeline.process_row(vec![], Some("...")).expect("row");
    assert_eq!(result.into_fields(), vec!["Error: Text too long", "", ""]);
    assert_eq!(pipeline.stats().failed, 1);
}

#[test]
fn test_error_reply_with_plain_body() {
    let service = ScriptedService::new(vec![ok(ZiServiceReply::new(503, "Service Unavailable"))]);
    let mut pipeline = pipeline(&service);

    let state = pipeline.process_text("hello").expect("state");
    assert_eq!(state, ZiRowState::Error("Service Unavailable".to_string()));
}

#[test]
fn test_undecodable_success_body_is_an_error_row() {
    let service = ScriptedService::new(vec![ok(ZiServiceReply::new(200, "not json"))]);
    let mut pipeline = pipeline(&service);

    let state = pipeline.process_text("hello").expect("state");
    assert_eq!(state, ZiRowState::Error("not json".to_string()));
}

#[test]
fn test_malformed_annotations_of_unused_type_are_ignored() {
    let body = r#"{"text": "Alice met Bob", "entities": {
        "Person": [{"indices": [0, 5]}],
        "Lookup": [{"majorType": "x"}]
    }}"#;
    let service = ScriptedService::new(vec![ok(ZiServiceReply::new(200, body))]);
    let mut pipeline = pipeline(&service);

    let result = pipeline.process_row(vec![], Some("Alice met Bob")).expect("row");
    assert_eq!(result.into_fields(), vec!["Success", "Alice", "1"]);
}

#[test]
fn test_malformed_annotations_of_used_type_fail_the_row() {
    let body = r#"{"text": "Alice met Bob", "entities": {"Person": [{"indices": "0-5"}]}}"#;
    let service = ScriptedService::new(vec![ok(ZiServiceReply::new(200, body))]);
    let mut pipeline = pipeline(&service);

    let state = pipeline.process_text("Alice met Bob").expect("state");
    assert_eq!(
        state,
        ZiRowState::Error("malformed Person annotations in service response".to_string())
    );
}

#[test]
fn test_transport_failure_becomes_row_error() {
    let service = ScriptedService::new(vec![
        Err(ZiError::Http("connection refused".to_string())),
        ok(ZiServiceReply::new(200, PERSON_BODY)),
    ]);
    let mut pipeline = pipeline(&service);

    let first = pipeline.process_row(vec![], Some("a")).expect("row");
    assert_eq!(first.status, ZiRowStatus::Error("connection refused".to_string()));
    let second = pipeline.process_row(vec![], Some("b")).expect("row");
    assert!(second.status.is_success());
    assert_eq!(service.calls.get(), 2);
}

#[test]
fn test_non_transport_error_stops_the_run() {
    let service = ScriptedService::new(vec![Err(ZiError::internal("broken"))]);
    let mut pipeline = pipeline(&service);
    assert!(pipeline.process_text("a").is_err());
}

#[test]
fn test_rate_limited_row_is_resent_after_retry_after() {
    let service = ScriptedService::new(vec![ok(rate_limited("3")), ok(ZiServiceReply::new(200, PERSON_BODY))]);
    let mut pipeline = pipeline(&service);

    let result = pipeline.process_row(vec![], Some("Alice met Bob")).expect("row");
    assert!(result.status.is_success());
    assert_eq!(service.calls.get(), 2);
    assert_eq!(pipeline.sleeper().waits, vec![Duration::from_secs(3)]);
    assert_eq!(pipeline.stats().rate_limit_hits, 1);
    assert_eq!(pipeline.stats().rows, 1);
}

#[test]
fn test_budget_headers_pace_the_next_request() {
    let paced = ZiServiceReply::new(200, PERSON_BODY)
        .with_header("x-gate-rate-limit-calls", "10")
        .with_header("x-gate-rate-limit-reset", "100");
    let service = ScriptedService::new(vec![ok(paced), ok(ZiServiceReply::new(200, PERSON_BODY))]);
    let mut pipeline = pipeline(&service);

    pipeline.process_row(vec![], Some("a")).expect("row");
    assert!(pipeline.sleeper().waits.is_empty());
    let wait = pipeline.pending_wait();
    assert!(wait > Duration::from_secs(10) && wait <= Duration::from_millis(10_500));

    pipeline.process_row(vec![], Some("b")).expect("row");
    assert_eq!(pipeline.sleeper().waits, vec![wait]);
}

#[test]
fn test_too_many_rate_limits_abort_the_run() {
    let service = ScriptedService::always(rate_limited("1"));
    let mut pipeline = pipeline(&service);

    let err = pipeline.process_row(vec![], Some("a")).unwrap_err();
    assert!(matches!(err, ZiError::QuotaExhausted { hits: 6 }));
    assert_eq!(service.calls.get(), 6);
    assert_eq!(pipeline.sleeper().waits.len(), 5);
    assert_eq!(pipeline.stats().rows, 0);
}

#[test]
fn test_rate_limit_hits_accumulate_across_rows() {
    let mut replies: Vec<_> = (0..3).map(|_| ok(rate_limited("1"))).collect();
    replies.push(ok(ZiServiceReply::new(200, PERSON_BODY)));
    replies.extend((0..3).map(|_| ok(rate_limited("1"))));
    let service = ScriptedService::new(replies);
    let mut pipeline = pipeline(&service);

    let first = pipeline.process_row(vec![], Some("a")).expect("row");
    assert!(first.status.is_success());
    assert_eq!(pipeline.stats().rate_limit_hits, 3);

    let err = pipeline.process_row(vec![], Some("b")).unwrap_err();
    assert!(matches!(err, ZiError::QuotaExhausted { hits: 6 }));
    assert_eq!(service.calls.get(), 7);
    assert_eq!(pipeline.sleeper().waits.len(), 5);
    assert_eq!(pipeline.stats().rows, 1);
}

#[test]
fn test_missing_text_field_is_not_sent() {
    let service = ScriptedService::new(vec![]);
    let mut pipeline = pipeline(&service);

    let result = pipeline.process_row(vec!["7".to_string()], None).expect("row");
    assert_eq!(result.into_fields(), vec!["7", "Error: text column missing from row", "", ""]);
    assert_eq!(service.calls.get(), 0);
}

fn input_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write input");
    file
}

#[test]
fn test_run_writes_one_output_row_per_input_row() {
    let input = input_file("id,text,lang\n1,Alice met Bob,en\n2,nothing here,en\n3\n");
    let output = NamedTempFile::new().expect("temp file");
    let service = ScriptedService::new(vec![
        ok(ZiServiceReply::new(200, PERSON_BODY)),
        ok(ZiServiceReply::new(400, r#"{"message": "Bad text"}"#)),
    ]);
    let mut pipeline = pipeline(&service);

    let options = ZiCsvOptions::for_path(input.path(), false);
    let mut reader = ZiRowReader::open(input.path(), &options).expect("reader");
    let selection =
        ZiRowSelection::resolve(&reader, "text", &["id".to_string(), " ".to_string(), "lang".to_string()])
            .expect("selection");
    let mut writer = ZiRowWriter::create(output.path(), "utf-8").expect("writer");

    let mut seen = Vec::new();
    let stats = pipeline
        .run(
            &mut reader,
            &mut writer,
            &selection,
            Some(Box::new(|info: &ProgressInfo| seen.push(info.rows_processed))),
        )
        .expect("run");
    drop(writer);

    assert_eq!(stats.rows, 3);
    assert_eq!(stats.succeeded, 1);
    assert_eq!(stats.failed, 2);
    assert_eq!(seen, vec![1, 2, 3]);

    let written = std::fs::read_to_string(output.path()).expect("read output");
    assert_eq!(
        written,
        "id,lang,status,Person,Person #count\n\
         1,en,Success,Alice;Bob,2\n\
         2,en,Error: Bad text,,\n\
         3,,Error: text column missing from row,,\n"
    );
}

#[test]
fn test_run_without_headers_names_columns_by_position() {
    let input = input_file("a,Alice met Bob\n");
    let output = NamedTempFile::new().expect("temp file");
    let service = ScriptedService::new(vec![ok(ZiServiceReply::new(200, PERSON_BODY))]);
    let mut pipeline = pipeline(&service);

    let options = ZiCsvOptions::for_path(input.path(), false).has_headers(false);
    let mut reader = ZiRowReader::open(input.path(), &options).expect("reader");
    let selection = ZiRowSelection::resolve(&reader, "2", &["1".to_string()]).expect("selection");
    let mut writer = ZiRowWriter::create(output.path(), "utf-8").expect("writer");
    pipeline.run(&mut reader, &mut writer, &selection, None).expect("run");
    drop(writer);

    let written = std::fs::read_to_string(output.path()).expect("read output");
    assert_eq!(written, "Column 1,status,Person,Person #count\na,Success,Alice;Bob,2\n");
}

proptest! {
    #[test]
    fn prop_output_width_is_fixed(statuses in proptest::collection::vec(prop_oneof![Just(200u16), Just(400u16), Just(500u16)], 1..12)) {
        let replies = statuses
            .iter()
            .map(|&status| ok(ZiServiceReply::new(status, if status == 200 { PERSON_BODY } else { "failed" })))
            .collect();
        let service = ScriptedService::new(replies);
        let mut pipeline = pipeline(&service);

        for (idx, status) in statuses.iter().enumerate() {
            let result = pipeline.process_row(vec![idx.to_string()], Some("text")).expect("row");
            prop_assert_eq!(result.width(), 4);
            prop_assert_eq!(result.status.is_success(), *status == 200);
        }
        prop_assert_eq!(service.calls.get(), statuses.len());
    }
}
