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

//! # Adaptive Rate Limiting
//!
//! Spreads requests so the remaining call budget reported by the service
//! lasts until its reset time.
//!
//! After every reply the limiter computes how long to wait before the next
//! request starts. Waits are measured start-to-start: time already spent on
//! the request is deducted. A rate-limited reply carrying `retry-after` is
//! honoured as is.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::service::ZiServiceReply;

/// Header names and safety margin used by [`ZiRateLimiter`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiRateLimitConfig {
    /// Calls remaining in the current window.
    pub calls_header: String,
    /// Seconds until the window resets.
    pub reset_header: String,
    pub retry_after_header: String,
    /// Multiplier applied to the computed spacing so the budget is never
    /// quite exhausted.
    pub safety_margin: f64,
}

impl Default for ZiRateLimitConfig {
    fn default() -> Self {
        Self {
            calls_header: "x-gate-rate-limit-calls".to_string(),
            reset_header: "x-gate-rate-limit-reset".to_string(),
            retry_after_header: "retry-after".to_string(),
            safety_margin: 1.05,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiRateLimitState {
    /// Remaining calls reported by the previous reply, `-1` before the first.
    pub previous_remaining_calls: i64,
    pub last_request_start: Option<Instant>,
}

impl Default for ZiRateLimitState {
    fn default() -> Self {
        Self {
            previous_remaining_calls: -1,
            last_request_start: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ZiRateLimiter {
    config: ZiRateLimitConfig,
    state: ZiRateLimitState,
}

impl ZiRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ZiRateLimitConfig) -> Self {
        Self {
            config,
            state: ZiRateLimitState::default(),
        }
    }

    pub fn config(&self) -> &ZiRateLimitConfig {
        &self.config
    }

    pub fn state(&self) -> &ZiRateLimitState {
        &self.state
    }

    /// Records when a request was sent.
    pub fn mark_request_start(&mut self, at: Instant) {
        self.state.last_request_start = Some(at);
    }

    pub fn next_wait(&mut self, reply: &ZiServiceReply) -> Duration {
        self.next_wait_at(reply, Instant::now())
    }

    /// Delay before the next request may start, given that `reply` was
    /// received at `now`.
    pub fn next_wait_at(&mut self, reply: &ZiServiceReply, now: Instant) -> Duration {
        if reply.is_rate_limited() {
            if let Some(retry_after) = self.retry_after(reply) {
                log::info!("Rate limit reached - waiting {} seconds", retry_after);
                return seconds(retry_after);
            }
        }

        let remaining = parse_header::<i64>(reply, &self.config.calls_header);
        let reset = parse_header::<i64>(reply, &self.config.reset_header);
        let (remaining, reset) = match (remaining, reset) {
            (Some(remaining), Some(reset)) => (remaining, reset),
            _ => return Duration::ZERO,
        };

        // More calls left than last time means the window reset in between,
        // or another client shares the budget and has been throttled.
        let previous = self.state.previous_remaining_calls;
        let used = if 0 < previous && previous < remaining {
            remaining - previous
        } else {
            1
        };
        self.state.previous_remaining_calls = remaining;

        let spacing =
            reset as f64 / remaining.max(1) as f64 * used as f64 * self.config.safety_margin;
        let elapsed = self
            .state
            .last_request_start
            .map(|start| now.saturating_duration_since(start).as_secs_f64())
            .unwrap_or(0.0);

        seconds(spacing - elapsed)
    }

    fn retry_after(&self, reply: &ZiServiceReply) -> Option<f64> {
        parse_header::<f64>(reply, &self.config.retry_after_header).filter(|v| v.is_finite())
    }
}

fn parse_header<T: std::str::FromStr>(reply: &ZiServiceReply, name: &str) -> Option<T> {
    reply.header(name).and_then(|v| v.trim().parse().ok())
}

fn seconds(value: f64) -> Duration {
    if value > 0.0 {
        Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}
