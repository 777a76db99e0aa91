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

//! Local settings file.
//!
//! Stored credentials and logging preferences live in a YAML file, by default
//! `settings.yaml` in the working directory:
//!
//! ```yaml
//! api_key: gc1234
//! api_password: secret
//! logging:
//!   default_level: DEBUG
//!   file_enabled: true
//!   file_path: zi-annotate.log
//! rate_limit:
//!   safety_margin: 1.1
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ZiError};
use crate::log::ZiLogConfigBuilder;
use crate::ratelimit::ZiRateLimitConfig;
use crate::service::ZiCredentials;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.yaml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZiSettings {
    pub api_key: Option<String>,
    pub api_password: Option<String>,
    pub logging: ZiLogConfigBuilder,
    pub rate_limit: ZiRateLimitConfig,
    /// Overrides the run-wide rate-limit hit cap.
    pub max_rate_limit_hits: Option<usize>,
}

impl ZiSettings {
    /// Loads settings from `path`. A missing or empty file gives defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| {
                ZiError::config(format!("invalid settings file {}: {}", path.display(), e))
            })
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() && self.api_password.is_some()
    }

    /// Command-line credentials win when both key and password are given;
    /// otherwise the stored ones are used, if complete.
    pub fn credentials(
        &self,
        cli_key: Option<&str>,
        cli_password: Option<&str>,
    ) -> Option<ZiCredentials> {
        if let (Some(key), Some(password)) = (cli_key, cli_password) {
            return Some(ZiCredentials::new(key, password));
        }
        match (&self.api_key, &self.api_password) {
            (Some(key), Some(password)) => {
                Some(ZiCredentials::new(key.as_str(), password.as_str()))
            }
            _ => None,
        }
    }
}
