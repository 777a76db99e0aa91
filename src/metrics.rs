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

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::record::ZiRowStatus;

/// Counters for one run of the pipeline.
#[derive(Clone, Debug, Serialize, Default, PartialEq)]
pub struct ZiRunStats {
    pub rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub rate_limit_hits: usize,
    pub seconds_waited: f64,
}

impl ZiRunStats {
    pub fn record_row(&mut self, status: &ZiRowStatus) {
        self.rows += 1;
        if status.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn record_wait(&mut self, wait: Duration) {
        self.seconds_waited += wait.as_secs_f64();
    }

    pub fn success_rate(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.rows as f64
        }
    }

    pub fn as_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
