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

//! # Zi Annotate Library
//!
//! Streams the rows of a CSV or TSV file through a remote text annotation
//! service and writes one output row per input row, with columns derived from
//! the returned annotations.
//!
//! ## Module Overview
//!
//! - **dsl**: Column definition parser and compiler
//! - **enrich**: Annotation data model and the feature template evaluator
//! - **service**: Annotation service client, metadata and service details
//! - **ratelimit**: Adaptive pacing from the service's rate-limit headers
//! - **pipeline**: Per-row state machine and the run loop
//! - **ingest**: Input row reading and column resolution
//! - **export**: Output row writing
//! - **record**: Output row and status
//! - **metrics**: Run statistics
//! - **settings**: Local settings file
//! - **log**: `log` facade backend
//!
//! ## Quick Start
//!
//! ```rust
//! use zi_annotate::{compile_columns, ZiClientConfig, ZiCloudClient, ZiCsvOptions,
//!     ZiRowPipeline, ZiRowReader, ZiRowSelection, ZiRowWriter};
//!
//! let client = ZiCloudClient::new(ZiClientConfig::new(endpoint))?;
//! let columns = compile_columns(["Person", "Location #count"], client.type_selectors())?;
//!
//! let mut reader = ZiRowReader::open(&input, &ZiCsvOptions::for_path(&input, false))?;
//! let selection = ZiRowSelection::resolve(&reader, "text", &["id".to_string()])?;
//! let mut writer = ZiRowWriter::create(&output, "utf-8")?;
//!
//! let stats = ZiRowPipeline::new(&client, columns).run(&mut reader, &mut writer, &selection, None)?;
//! ```
//!
//! ## Error Handling
//!
//! Run-stopping failures return `Result<T, ZiError>`. Failures of a single
//! row do not: they are written into that row's status column.

pub mod dsl;
pub mod enrich;
pub mod errors;
pub mod export;
pub mod ingest;
pub mod log;
pub mod metrics;
pub mod pipeline;
pub mod ratelimit;
pub mod record;
pub mod service;
pub mod settings;

pub use errors::{Result, ZiError};

pub use dsl::{
    compile, compile_columns, ZiColumnCompiler, ZiColumnDefinition, ZiColumnKind, ZiColumnParser,
    ZiColumnProgram, ZiColumnSpecSet, ZiCompiledColumn, ZiExtractor, ZiParseResult, ZiTypeSelectors,
};
pub use enrich::{
    evaluate_template, unescape_lt_amp, ZiAnnotation, ZiServiceResponse, ZiTemplate,
    ZiTemplateToken,
};
pub use export::{ZiRowWriter, ZiWriteStats};
pub use ingest::{ProgressCallback, ProgressInfo, ZiCsvOptions, ZiInputRow, ZiRowReader};
pub use metrics::ZiRunStats;
pub use pipeline::{
    ZiPipelineConfig, ZiRowPipeline, ZiRowSelection, ZiRowState, ZiSleeper, ZiThreadSleeper,
};
pub use ratelimit::{ZiRateLimitConfig, ZiRateLimitState, ZiRateLimiter};
pub use record::{output_headers, ZiRowResult, ZiRowStatus};
pub use service::{
    ZiAnnotationService, ZiClientConfig, ZiCloudClient, ZiCredentials, ZiServiceDetails,
    ZiServiceMetadata, ZiServiceReply,
};
pub use settings::ZiSettings;
