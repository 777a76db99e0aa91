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

//! # Data Export Module
//!
//! This module writes the annotated rows.
//!
//! ## Module Components
//!
//! - **Writer** ([writer.rs](writer/index.html)): Row writer with per-row flushing
//!
//! ## Usage Patterns
//!
//! ```rust
//! use zi_annotate::export::ZiRowWriter;
//! use zi_annotate::record::{output_headers, ZiRowResult};
//!
//! let mut writer = ZiRowWriter::create(&path, "utf-8-sig")?;
//! writer.write_header(&output_headers(["id"], ["Person"]))?;
//! writer.write_row(ZiRowResult::success(vec!["1".into()], vec!["Alice".into()]))?;
//! ```

pub mod writer;

pub use writer::{ZiRowWriter, ZiWriteStats};
