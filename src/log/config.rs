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

use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Configuration for the ZiLogger: console and file output, default level,
/// JSON formatting and size-based file rotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiLogConfig {
    pub default_level: String,
    /// Write records to stderr.
    pub console_enabled: bool,
    /// One JSON object per record instead of text lines.
    pub json_format: bool,
    /// Whether file logging is enabled.
    pub file_enabled: bool,
    /// Optional log file path when file logging is enabled.
    pub file_path: Option<String>,
    /// Rotate the log file once it grows past this size.
    pub max_bytes: Option<u64>,
    /// Number of backup files to keep when rotating.
    pub backup_count: Option<u32>,
}

impl Default for ZiLogConfig {
    fn default() -> Self {
        ZiLogConfig {
            default_level: "INFO".to_string(),
            console_enabled: true,
            json_format: false,
            file_enabled: false,
            file_path: None,
            max_bytes: Some(10 * 1024 * 1024),
            backup_count: Some(7),
        }
    }
}

impl ZiLogConfig {
    pub fn level_filter(&self) -> LevelFilter {
        parse_level(&self.default_level)
    }

    pub fn should_log(&self, level: log::Level) -> bool {
        level <= self.level_filter()
    }
}

/// Parses a level name. Unknown names fall back to INFO.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" | "CRITICAL" => LevelFilter::Error,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Partial logger configuration, as read from a settings file. Fields left
/// unset keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiLogConfigBuilder {
    pub default_level: Option<String>,
    pub console_enabled: Option<bool>,
    pub json_format: Option<bool>,
    pub file_enabled: Option<bool>,
    pub file_path: Option<String>,
    pub max_bytes: Option<u64>,
    pub backup_count: Option<u32>,
}

impl ZiLogConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.default_level = Some(level.into());
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json_format = Some(json);
        self
    }

    pub fn file(mut self, path: impl Into<String>) -> Self {
        self.file_enabled = Some(true);
        self.file_path = Some(path.into());
        self
    }

    pub fn build(self) -> ZiLogConfig {
        let base = ZiLogConfig::default();
        ZiLogConfig {
            default_level: self.default_level.unwrap_or(base.default_level),
            console_enabled: self.console_enabled.unwrap_or(base.console_enabled),
            json_format: self.json_format.unwrap_or(base.json_format),
            file_enabled: self.file_enabled.unwrap_or(base.file_enabled),
            file_path: self.file_path.or(base.file_path),
            max_bytes: self.max_bytes.or(base.max_bytes),
            backup_count: self.backup_count.or(base.backup_count),
        }
    }
}
