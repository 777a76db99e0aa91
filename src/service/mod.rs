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

//! # Annotation Service Module
//!
//! This module talks to the remote text annotation service.
//!
//! ## Module Components
//!
//! - **Client** ([client.rs](client/index.html)): Blocking HTTP client for the
//!   annotate and metadata calls
//! - **Metadata** ([metadata.rs](metadata/index.html)): Turns the advertised
//!   annotation selectors into a type-to-selector table
//! - **Details** ([details.rs](details/index.html)): Describes what a service
//!   can return, for the `details` command
//!
//! The pipeline only depends on the [`ZiAnnotationService`] trait, so it can
//! be driven by a scripted service in tests.

use std::collections::HashMap;

use serde_json::Value;

use crate::enrich::{feature_to_string, ZiServiceResponse};
use crate::errors::Result;

pub mod client;
pub mod details;
pub mod metadata;

pub use client::{ZiClientConfig, ZiCloudClient, ZiCredentials};
pub use details::{ZiServiceCatalogueEntry, ZiServiceDetails};
pub use metadata::ZiServiceMetadata;

/// Status, headers and body of one service reply.
///
/// Header names are stored lowercased.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZiServiceReply {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ZiServiceReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// 429 (rate limit) and 402 (quota) both mean "slow down and resend".
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429 || self.status == 402
    }

    /// Decodes a successful annotation response.
    pub fn response(&self) -> Option<ZiServiceResponse> {
        ZiServiceResponse::from_json(&self.body)
    }

    /// Human-readable message for a failed reply.
    ///
    /// Uses the payload's `message` field when there is one, the compact JSON
    /// payload otherwise, and the raw body when it is not JSON at all.
    pub fn error_message(&self) -> String {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(Value::Object(map)) if map.contains_key("message") => {
                feature_to_string(&map["message"])
            }
            Ok(value) => value.to_string(),
            Err(_) => self.body.clone(),
        }
    }
}

/// A remote service able to annotate one text at a time.
pub trait ZiAnnotationService {
    /// Sends `text` for annotation, requesting the given selectors.
    ///
    /// Any reply, including error statuses, is `Ok`; `Err` means no reply was
    /// obtained at all.
    fn annotate(&self, text: &str, selectors: &[&str]) -> Result<ZiServiceReply>;
}

impl<S: ZiAnnotationService + ?Sized> ZiAnnotationService for &S {
    fn annotate(&self, text: &str, selectors: &[&str]) -> Result<ZiServiceReply> {
        (**self).annotate(text, selectors)
    }
}
