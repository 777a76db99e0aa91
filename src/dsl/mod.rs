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

//! # Column Definition Language
//!
//! Output columns are described by short definitions rather than code. Each
//! definition names an annotation type and what to take from it:
//!
//! ```text
//! Person                          text under every Person, ;-joined
//! Person text                     same as above
//! Person present?                 1 or 0
//! Person #count                   number of Person annotations
//! Person [Name: ]text[ (]gender[)]    template per annotation, ;-joined
//! Mentions:Person                 explicit annotation set selector
//! ```
//!
//! ## Architecture
//!
//! - **Parser** ([parser.rs](parser/index.html)): definition string into IR
//! - **IR** ([ir.rs](ir/index.html)): the parsed column definitions
//! - **Compiler** ([compiler.rs](compiler/index.html)): IR plus the service's
//!   type-to-selector table into selectors and extraction functions

pub mod compiler;
pub mod ir;
pub mod parser;

pub use compiler::{
    compile, compile_columns, ZiColumnCompiler, ZiColumnSpecSet, ZiCompiledColumn, ZiExtractor,
    ZiTypeSelectors, VALUE_SEPARATOR,
};
pub use ir::{ZiColumnDefinition, ZiColumnKind, ZiColumnProgram};
pub use parser::{ZiColumnParser, ZiParseResult};
