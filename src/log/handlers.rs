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

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::log::core::ZiLogRecord;
use crate::log::formatters::{ZiJsonFormatter, ZiTextFormatter};

pub trait ZiLogHandler {
    fn handle(&self, record: &ZiLogRecord);

    fn flush(&self) {}
}

fn format_line(record: &ZiLogRecord, json: bool) -> String {
    if json {
        ZiJsonFormatter::format(record)
    } else {
        ZiTextFormatter::format(record)
    }
}

/// Writes to stderr so that stdout stays free for command output.
pub struct ZiStderrHandler {
    json: bool,
}

impl ZiStderrHandler {
    pub fn new(json: bool) -> Self {
        ZiStderrHandler { json }
    }
}

impl ZiLogHandler for ZiStderrHandler {
    fn handle(&self, record: &ZiLogRecord) {
        let line = format_line(record, self.json);
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Appends to a file, rotating it by size: `path` becomes `path.1`,
/// `path.1` becomes `path.2`, and so on up to `backup_count`.
pub struct ZiFileHandler {
    path: PathBuf,
    json: bool,
    max_bytes: Option<u64>,
    backup_count: u32,
    lock: Mutex<()>,
}

impl ZiFileHandler {
    pub fn new(
        path: impl Into<PathBuf>,
        json: bool,
        max_bytes: Option<u64>,
        backup_count: Option<u32>,
    ) -> Self {
        ZiFileHandler {
            path: path.into(),
            json,
            max_bytes,
            backup_count: backup_count.unwrap_or(7),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn backup_path(&self, idx: u32) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{}", idx));
        PathBuf::from(name)
    }

    fn rotate_if_needed(&self) {
        let max_bytes = match self.max_bytes {
            Some(v) => v,
            None => return,
        };
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > max_bytes => {}
            _ => return,
        }

        if self.backup_count == 0 {
            let _ = fs::remove_file(&self.path);
            return;
        }
        for idx in (1..self.backup_count).rev() {
            let from = self.backup_path(idx);
            if from.exists() {
                let _ = fs::rename(&from, self.backup_path(idx + 1));
            }
        }
        let _ = fs::rename(&self.path, self.backup_path(1));
    }
}

impl ZiLogHandler for ZiFileHandler {
    fn handle(&self, record: &ZiLogRecord) {
        let _guard = self.guard();
        self.rotate_if_needed();

        let line = format_line(record, self.json);
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{}", line);
        }
    }
}
