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

use std::collections::HashMap;
use std::time::Duration;

use base64::Engine;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::dsl::ZiTypeSelectors;
use crate::errors::{Result, ZiError};
use crate::service::metadata::ZiServiceMetadata;
use crate::service::{ZiAnnotationService, ZiServiceReply};

pub const MIME_PLAIN: &str = "text/plain";
pub const MIME_HTML: &str = "text/html";

/// API key and password for HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct ZiCredentials {
    pub key: String,
    pub password: String,
}

impl ZiCredentials {
    pub fn new(key: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            password: password.into(),
        }
    }

    pub fn basic_header(&self) -> String {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.key, self.password));
        format!("Basic {}", token)
    }
}

impl std::fmt::Debug for ZiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZiCredentials")
            .field("key", &self.key)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct ZiClientConfig {
    pub endpoint: String,
    pub credentials: Option<ZiCredentials>,
    /// Content type of the texts sent for annotation.
    pub mime_type: String,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ZiClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials: None,
            mime_type: MIME_PLAIN.to_string(),
            timeout: Some(Duration::from_secs(120)),
        }
    }

    pub fn credentials(mut self, credentials: Option<ZiCredentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn html(mut self, html: bool) -> Self {
        self.mime_type = if html { MIME_HTML } else { MIME_PLAIN }.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn metadata_url(&self) -> String {
        format!("{}/metadata", self.endpoint.trim_end_matches('/'))
    }
}

/// Blocking client for a hosted annotation service.
#[derive(Debug)]
pub struct ZiCloudClient {
    config: ZiClientConfig,
    http: Client,
}

impl ZiCloudClient {
    pub fn new(config: ZiClientConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(ZiError::config("service endpoint must not be empty"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(credentials) = &config.credentials {
            let mut value = HeaderValue::from_str(&credentials.basic_header())
                .map_err(|e| ZiError::config(format!("invalid credentials: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ZiClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Fetches the service metadata. Non-200 replies are errors.
    pub fn fetch_metadata(&self) -> Result<ZiServiceMetadata> {
        let url = self.config.metadata_url();
        log::debug!("Fetching service metadata from {}", url);
        let response = self.http.get(&url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ZiError::Http(format!(
                "metadata request to {} returned status {}",
                url,
                status.as_u16()
            )));
        }
        ZiServiceMetadata::from_json(&response.text()?)
    }

    /// Type-to-selector table from the metadata, or an empty table when the
    /// metadata cannot be fetched.
    pub fn type_selectors(&self) -> ZiTypeSelectors {
        match self.fetch_metadata() {
            Ok(metadata) => metadata.type_selectors(),
            Err(e) => {
                log::warn!(
                    "Could not load service metadata ({}), annotation types will use the default set",
                    e
                );
                ZiTypeSelectors::new()
            }
        }
    }
}

impl ZiAnnotationService for ZiCloudClient {
    fn annotate(&self, text: &str, selectors: &[&str]) -> Result<ZiServiceReply> {
        let query: Vec<(&str, &str)> = selectors.iter().map(|sel| ("annotations", *sel)).collect();
        let response = self
            .http
            .post(&self.config.endpoint)
            .query(&query)
            .header(CONTENT_TYPE, self.config.mime_type.as_str())
            .body(text.to_string())
            .send()?;
        into_reply(response)
    }
}

fn into_reply(response: Response) -> Result<ZiServiceReply> {
    let status = response.status().as_u16();
    let headers: HashMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect();
    let body = response.text()?;
    Ok(ZiServiceReply { status, headers, body })
}
