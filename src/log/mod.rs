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

//! # Logging Module
//!
//! Backend for the `log` facade. Library code logs with `log::info!` and
//! friends; the binary installs a [`ZiLogger`] once at startup.
//!
//! ## Module Components
//!
//! - **Config** ([config.rs](config/index.html)): Level, console, JSON and file settings
//! - **Core** ([core.rs](core/index.html)): The `log::Log` implementation
//! - **Formatters** ([formatters.rs](formatters/index.html)): Text and JSON line formats
//! - **Handlers** ([handlers.rs](handlers/index.html)): Stderr and rotating file output
//!
//! ## Usage
//!
//! ```rust
//! use zi_annotate::log::{ZiLogConfigBuilder, ZiLogger};
//!
//! ZiLogger::init(ZiLogConfigBuilder::new().level("debug").build())?;
//! log::info!("ready");
//! ```

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;

pub use config::{parse_level, ZiLogConfig, ZiLogConfigBuilder};
pub use self::core::{level_name, ZiLogRecord, ZiLogger};
pub use formatters::{ZiJsonFormatter, ZiTextFormatter};
pub use handlers::{ZiFileHandler, ZiLogHandler, ZiStderrHandler};
