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

use chrono::{DateTime, Local};
use log::{Level, Log, Metadata, Record};
use serde_json::{json, Value};

use crate::errors::{Result, ZiError};
use crate::log::config::ZiLogConfig;
use crate::log::handlers::{ZiFileHandler, ZiLogHandler, ZiStderrHandler};

/// Python-style level name.
pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// An owned copy of one `log` record.
#[derive(Clone, Debug)]
pub struct ZiLogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl ZiLogRecord {
    pub fn from_record(record: &Record<'_>) -> Self {
        Self {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            timestamp: Local::now(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "level": level_name(self.level),
            "target": self.target,
            "message": self.message,
        })
    }
}

/// `log` backend writing to stderr and, optionally, a rotating file.
pub struct ZiLogger {
    config: ZiLogConfig,
    handlers: Vec<Box<dyn ZiLogHandler + Send + Sync>>,
}

impl ZiLogger {
    pub fn new(config: ZiLogConfig) -> Self {
        let mut handlers: Vec<Box<dyn ZiLogHandler + Send + Sync>> = Vec::new();
        if config.console_enabled {
            handlers.push(Box::new(ZiStderrHandler::new(config.json_format)));
        }
        if config.file_enabled {
            if let Some(path) = &config.file_path {
                handlers.push(Box::new(ZiFileHandler::new(
                    path.clone(),
                    config.json_format,
                    config.max_bytes,
                    config.backup_count,
                )));
            }
        }
        Self { config, handlers }
    }

    pub fn config(&self) -> &ZiLogConfig {
        &self.config
    }

    /// Installs the logger as the global `log` backend. Only the first call
    /// in a process succeeds.
    pub fn init(config: ZiLogConfig) -> Result<()> {
        let level = config.level_filter();
        log::set_boxed_logger(Box::new(ZiLogger::new(config)))
            .map_err(|e| ZiError::config(format!("logger already installed: {}", e)))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for ZiLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.config.should_log(metadata.level())
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let owned = ZiLogRecord::from_record(record);
        for handler in &self.handlers {
            handler.handle(&owned);
        }
    }

    fn flush(&self) {
        for handler in &self.handlers {
            handler.flush();
        }
    }
}
