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

//! # Zi Error Module
//!
//! This module defines the error types used throughout Zi Annotate for
//! consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors while reading input or writing output
//! - **Csv**: Malformed delimited records
//! - **Http**: Transport failures talking to the annotation service
//! - **Validation**: Invalid column definitions, column names or options
//! - **Config**: Unreadable settings or logger configuration
//! - **Serde**: Serialization/deserialization errors
//! - **QuotaExhausted**: The service kept rate limiting the run
//! - **Internal**: Unexpected internal failures
//!
//! Per-row service failures are *not* errors at this level: they become the
//! status column of that row and the run continues. Only conditions that stop
//! the whole run surface as [`ZiError`].

use std::io;

use thiserror::Error;

/// Convenience result type used throughout Zi Annotate.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for Zi Annotate.
#[derive(Debug, Error)]
pub enum ZiError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Errors raised while reading or writing delimited records.
    #[error("csv error: {0}")]
    Csv(String),

    /// The HTTP call could not be completed.
    #[error("http error: {0}")]
    Http(String),

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Settings or logger configuration could not be loaded.
    #[error("config error: {message}")]
    Config { message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The service rate limited the run more often than allowed.
    #[error("rate limit reached too many times ({hits} hits)")]
    QuotaExhausted { hits: usize },

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<csv::Error> for ZiError {
    fn from(err: csv::Error) -> Self {
        ZiError::Csv(err.to_string())
    }
}

impl From<reqwest::Error> for ZiError {
    fn from(err: reqwest::Error) -> Self {
        ZiError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Config {
            message: err.to_string(),
        }
    }
}

impl ZiError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct configuration errors.
    pub fn config<T: Into<String>>(message: T) -> Self {
        ZiError::Config {
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        ZiError::Internal(message.into())
    }

    /// Whether this error should stop the run rather than mark a single row.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ZiError::Http(_))
    }
}
