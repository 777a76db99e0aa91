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

use std::time::{Duration, Instant};

use zi_annotate::ratelimit::{ZiRateLimitConfig, ZiRateLimiter};
use zi_annotate::service::ZiServiceReply;

fn budget_reply(status: u16, remaining: &str, reset: &str) -> ZiServiceReply {
    ZiServiceReply::new(status, "{}")
        .with_header("X-Gate-Rate-Limit-Calls", remaining)
        .with_header("X-Gate-Rate-Limit-Reset", reset)
}

fn assert_secs(wait: Duration, expected: f64) {
    assert!(
        (wait.as_secs_f64() - expected).abs() < 1e-6,
        "expected {}s, got {}s",
        expected,
        wait.as_secs_f64()
    );
}

#[test]
fn test_budget_spacing_with_single_call_used() {
    let mut limiter = ZiRateLimiter::new();
    let wait = limiter.next_wait_at(&budget_reply(200, "10", "100"), Instant::now());
    assert_secs(wait, 10.5);
}

#[test]
fn test_retry_after_is_returned_verbatim() {
    let mut limiter = ZiRateLimiter::new();
    let reply = budget_reply(429, "0", "3600").with_header("Retry-After", "30");
    let wait = limiter.next_wait_at(&reply, Instant::now());
    assert_eq!(wait, Duration::from_secs(30));
    assert_eq!(limiter.state().previous_remaining_calls, -1);
}

#[test]
fn test_quota_status_also_honours_retry_after() {
    let mut limiter = ZiRateLimiter::new();
    let reply = ZiServiceReply::new(402, "").with_header("retry-after", "2.5");
    assert_eq!(limiter.next_wait(&reply), Duration::from_millis(2500));
}

#[test]
fn test_retry_after_ignored_on_success() {
    let mut limiter = ZiRateLimiter::new();
    let reply = budget_reply(200, "10", "100").with_header("retry-after", "30");
    assert_secs(limiter.next_wait_at(&reply, Instant::now()), 10.5);
}

#[test]
fn test_increase_in_remaining_counts_as_calls_used() {
    let mut limiter = ZiRateLimiter::new();
    let now = Instant::now();
    limiter.next_wait_at(&budget_reply(200, "10", "100"), now);

    // 10 -> 13: three calls charged to this interval.
    let wait = limiter.next_wait_at(&budget_reply(200, "13", "100"), now);
    assert_secs(wait, 100.0 / 13.0 * 3.0 * 1.05);
    assert_eq!(limiter.state().previous_remaining_calls, 13);

    // 13 -> 12: normal consumption, one call.
    let wait = limiter.next_wait_at(&budget_reply(200, "12", "60"), now);
    assert_secs(wait, 60.0 / 12.0 * 1.05);
}

#[test]
fn test_elapsed_request_time_is_deducted() {
    let mut limiter = ZiRateLimiter::new();
    let start = Instant::now();
    limiter.mark_request_start(start);
    let wait = limiter.next_wait_at(&budget_reply(200, "10", "100"), start + Duration::from_secs(4));
    assert_secs(wait, 6.5);

    limiter.mark_request_start(start);
    let wait = limiter.next_wait_at(&budget_reply(200, "9", "10"), start + Duration::from_secs(30));
    assert_eq!(wait, Duration::ZERO);
}

#[test]
fn test_missing_or_bad_headers_mean_no_wait() {
    let mut limiter = ZiRateLimiter::new();
    let now = Instant::now();
    assert_eq!(limiter.next_wait_at(&ZiServiceReply::new(200, "{}"), now), Duration::ZERO);
    assert_eq!(limiter.next_wait_at(&budget_reply(200, "ten", "100"), now), Duration::ZERO);
    assert_eq!(limiter.next_wait_at(&budget_reply(500, "10", "soon"), now), Duration::ZERO);
}

#[test]
fn test_custom_headers_and_margin() {
    let config = ZiRateLimitConfig {
        calls_header: "x-ratelimit-remaining".to_string(),
        reset_header: "x-ratelimit-reset".to_string(),
        safety_margin: 1.0,
        ..ZiRateLimitConfig::default()
    };
    let mut limiter = ZiRateLimiter::with_config(config);
    let reply = ZiServiceReply::new(200, "{}")
        .with_header("x-ratelimit-remaining", "4")
        .with_header("x-ratelimit-reset", "2");
    assert_secs(limiter.next_wait_at(&reply, Instant::now()), 0.5);
}
