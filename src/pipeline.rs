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

//! # Row Pipeline
//!
//! Sends every input row to the annotation service, one at a time and in
//! order, and writes exactly one output row for each.
//!
//! Each row moves through a small state machine:
//!
//! ```text
//! Init ──► Sent ──► Success
//!  ▲         │ ├──► Error
//!  │         │ └──► TransportException (from Init, no reply)
//!  └─ RateLimited ◄┘
//! ```
//!
//! `RateLimited` sleeps and resends the same row. Rate-limit hits are
//! counted over the whole run; once the cap is exceeded the run stops with
//! [`ZiError::QuotaExhausted`] before sending anything else.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use crate::dsl::ZiColumnSpecSet;
use crate::enrich::ZiServiceResponse;
use crate::errors::{Result, ZiError};
use crate::export::ZiRowWriter;
use crate::ingest::{ProgressCallback, ProgressInfo, ZiRowReader};
use crate::metrics::ZiRunStats;
use crate::ratelimit::ZiRateLimiter;
use crate::record::{output_headers, ZiRowResult, ZiRowStatus};
use crate::service::{ZiAnnotationService, ZiServiceReply};

/// Blocks the pipeline between requests.
pub trait ZiSleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZiThreadSleeper;

impl ZiSleeper for ZiThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ZiPipelineConfig {
    /// Rate-limit hits tolerated over the whole run.
    pub max_rate_limit_hits: usize,
    /// Waits longer than this are logged.
    pub wait_log_threshold: Duration,
}

impl Default for ZiPipelineConfig {
    fn default() -> Self {
        Self {
            max_rate_limit_hits: 5,
            wait_log_threshold: Duration::from_secs(5),
        }
    }
}

/// Where a row is in its request cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum ZiRowState {
    Init,
    Sent(ZiServiceReply),
    RateLimited(ZiServiceReply),
    Success(ZiServiceResponse),
    Error(String),
    TransportException(String),
}

impl ZiRowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ZiRowState::Success(_) | ZiRowState::Error(_) | ZiRowState::TransportException(_)
        )
    }
}

/// Input columns used by a run, resolved against the input header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiRowSelection {
    pub text_column: usize,
    pub copy_columns: Vec<usize>,
}

impl ZiRowSelection {
    /// Resolves `--text-column` and `--copy-columns`. Blank copy columns are
    /// ignored.
    pub fn resolve<R: Read>(
        reader: &ZiRowReader<R>,
        text_column: &str,
        copy_columns: &[String],
    ) -> Result<Self> {
        log::info!("Text to be processed is column {}", text_column);
        let text_column = reader.resolve_column(text_column)?;

        let wanted: Vec<&str> = copy_columns
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        log::info!("Copying following columns to output: {:?}", wanted);
        let copy_columns = wanted
            .iter()
            .map(|c| reader.resolve_column(c))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            text_column,
            copy_columns,
        })
    }
}

/// Drives rows through the annotation service.
pub struct ZiRowPipeline<S, Z = ZiThreadSleeper> {
    service: S,
    columns: ZiColumnSpecSet,
    limiter: ZiRateLimiter,
    sleeper: Z,
    config: ZiPipelineConfig,
    pending_wait: Duration,
    stats: ZiRunStats,
}

impl<S: ZiAnnotationService> ZiRowPipeline<S, ZiThreadSleeper> {
    pub fn new(service: S, columns: ZiColumnSpecSet) -> Self {
        Self {
            service,
            columns,
            limiter: ZiRateLimiter::new(),
            sleeper: ZiThreadSleeper,
            config: ZiPipelineConfig::default(),
            pending_wait: Duration::ZERO,
            stats: ZiRunStats::default(),
        }
    }
}

impl<S: ZiAnnotationService, Z: ZiSleeper> ZiRowPipeline<S, Z> {
    pub fn with_sleeper<Z2: ZiSleeper>(self, sleeper: Z2) -> ZiRowPipeline<S, Z2> {
        ZiRowPipeline {
            service: self.service,
            columns: self.columns,
            limiter: self.limiter,
            sleeper,
            config: self.config,
            pending_wait: self.pending_wait,
            stats: self.stats,
        }
    }

    pub fn with_config(mut self, config: ZiPipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_rate_limiter(mut self, limiter: ZiRateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn columns(&self) -> &ZiColumnSpecSet {
        &self.columns
    }

    pub fn stats(&self) -> &ZiRunStats {
        &self.stats
    }

    pub fn sleeper(&self) -> &Z {
        &self.sleeper
    }

    /// Wait applied before the next request.
    pub fn pending_wait(&self) -> Duration {
        self.pending_wait
    }

    /// Runs one text to a terminal state.
    pub fn process_text(&mut self, text: &str) -> Result<ZiRowState> {
        let mut state = ZiRowState::Init;
        while !state.is_terminal() {
            state = self.step(state, text)?;
        }
        Ok(state)
    }

    /// Produces the output row for one input row. `text` is `None` when the
    /// row has no text column, in which case nothing is sent.
    pub fn process_row(&mut self, copied: Vec<String>, text: Option<&str>) -> Result<ZiRowResult> {
        let width = self.columns.len();
        let result = match text {
            None => ZiRowResult::failure(copied, "text column missing from row", width),
            Some(text) => match self.process_text(text)? {
                ZiRowState::Success(response) => {
                    ZiRowResult::success(copied, self.columns.extract_all(&response))
                }
                ZiRowState::Error(message) | ZiRowState::TransportException(message) => {
                    ZiRowResult::failure(copied, message, width)
                }
                other => {
                    return Err(ZiError::internal(format!("row stopped in state {:?}", other)));
                }
            },
        };
        self.stats.record_row(&result.status);
        Ok(result)
    }

    /// Processes every remaining row of `reader` into `writer`, starting with
    /// the header row.
    pub fn run<R: Read, W: Write>(
        &mut self,
        reader: &mut ZiRowReader<R>,
        writer: &mut ZiRowWriter<W>,
        selection: &ZiRowSelection,
        mut progress: Option<ProgressCallback<'_>>,
    ) -> Result<ZiRunStats> {
        let copied_names: Vec<String> = selection
            .copy_columns
            .iter()
            .map(|&c| reader.column_name(c))
            .collect();
        writer.write_header(&output_headers(copied_names, self.columns.headers()))?;

        while let Some(row) = reader.next_row()? {
            let copied = selection
                .copy_columns
                .iter()
                .map(|&c| row.field(c).unwrap_or_default().to_string())
                .collect();
            let result = self.process_row(copied, row.field(selection.text_column))?;
            if let Some(message) = failure_message(&result) {
                log::debug!("Row {} failed: {}", row.index + 1, message);
            }
            writer.write_row(result)?;

            if let Some(callback) = progress.as_mut() {
                callback(&ProgressInfo {
                    rows_processed: row.index + 1,
                    bytes_read: reader.bytes_read(),
                    total_bytes: reader.total_bytes(),
                });
            }
        }

        Ok(self.stats.clone())
    }

    fn step(&mut self, state: ZiRowState, text: &str) -> Result<ZiRowState> {
        let next = match state {
            ZiRowState::Init => self.send(text)?,
            ZiRowState::Sent(reply) => {
                if reply.is_rate_limited() {
                    ZiRowState::RateLimited(reply)
                } else {
                    let outcome = if reply.is_success() {
                        match reply.response() {
                            Some(response) => self.check_response(response),
                            None => ZiRowState::Error(reply.error_message()),
                        }
                    } else {
                        ZiRowState::Error(reply.error_message())
                    };
                    self.pending_wait = self.limiter.next_wait(&reply);
                    outcome
                }
            }
            ZiRowState::RateLimited(reply) => {
                self.stats.rate_limit_hits += 1;
                if self.stats.rate_limit_hits > self.config.max_rate_limit_hits {
                    log::error!("Rate limit reached too many times");
                    return Err(ZiError::QuotaExhausted {
                        hits: self.stats.rate_limit_hits,
                    });
                }
                self.pending_wait = self.limiter.next_wait(&reply);
                ZiRowState::Init
            }
            terminal => terminal,
        };
        Ok(next)
    }

    fn send(&mut self, text: &str) -> Result<ZiRowState> {
        let wait = self.pending_wait;
        if wait > self.config.wait_log_threshold {
            log::info!(
                "Waiting {:.2} seconds before next API call for rate limiting",
                wait.as_secs_f64()
            );
        }
        if !wait.is_zero() {
            self.sleeper.sleep(wait);
            self.stats.record_wait(wait);
        }

        self.limiter.mark_request_start(Instant::now());
        let selectors: Vec<&str> = self.columns.selectors().collect();
        match self.service.annotate(text, &selectors) {
            Ok(reply) => Ok(ZiRowState::Sent(reply)),
            Err(e) if !e.is_fatal() => {
                let message = match e {
                    ZiError::Http(message) => message,
                    other => other.to_string(),
                };
                log::error!("Error making API request: {}", message);
                Ok(ZiRowState::TransportException(message))
            }
            Err(e) => Err(e),
        }
    }

    /// A decoded reply succeeds unless a column needs a type whose
    /// annotations were malformed.
    fn check_response(&self, response: ZiServiceResponse) -> ZiRowState {
        let malformed = self
            .columns
            .annotation_types()
            .find(|annotation_type| response.is_malformed(annotation_type))
            .map(str::to_string);
        match malformed {
            Some(annotation_type) => ZiRowState::Error(format!(
                "malformed {} annotations in service response",
                annotation_type
            )),
            None => ZiRowState::Success(response),
        }
    }
}

fn failure_message(result: &ZiRowResult) -> Option<&str> {
    match &result.status {
        ZiRowStatus::Error(message) => Some(message),
        ZiRowStatus::Success => None,
    }
}
