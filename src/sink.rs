// src/sink.rs

//! Per-run log sink: a bounded in-memory ring buffer backed by a file.
//!
//! The file is truncated when the sink opens (each run gets a fresh log,
//! nothing persists across runs of the same script), appended to as output
//! arrives, and periodically *compacted*: rewritten from the ring buffer so
//! on-disk growth stays bounded without losing recent history.
//!
//! Logging is best-effort. Every filesystem error is reported via `tracing`
//! and swallowed — a broken log file must never fail or interrupt the run
//! that produced it.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Default retention window, in appended lines.
pub const MAX_LOG_LINES: usize = 1000;

#[derive(Debug)]
pub struct LogSink {
    path: PathBuf,
    capacity: usize,
    ring: VecDeque<String>,
    file: Option<File>,
    appends_since_compaction: usize,
    closed: bool,
}

impl LogSink {
    /// Open a sink at `path` with the default retention window.
    ///
    /// Parent directories are created as needed and the target file is
    /// truncated. Never fails: on error the sink degrades to in-memory-only
    /// operation after a diagnostic warning.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, MAX_LOG_LINES)
    }

    /// Open a sink with an explicit retention window.
    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let capacity = capacity.max(1);
        let file = create_log_file(&path);
        Self {
            path,
            capacity,
            ring: VecDeque::with_capacity(capacity),
            file,
            appends_since_compaction: 0,
            closed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current ring-buffer contents, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.ring.iter().map(String::as_str)
    }

    /// Append one output line: push it onto the ring (evicting the oldest
    /// entry beyond capacity), write it through to the file, and compact
    /// after every `capacity` appends since the last compaction.
    pub fn append(&mut self, line: &str) {
        if self.closed {
            return;
        }

        if self.ring.len() == self.capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(line.to_string());

        if let Some(file) = self.file.as_mut() {
            if let Err(err) = writeln!(file, "{line}") {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to append to log file"
                );
            }
        }

        self.appends_since_compaction += 1;
        if self.appends_since_compaction >= self.capacity {
            self.compact();
        }
    }

    /// Final flush and release of the file handle, leaving the on-disk file
    /// equal to the ring buffer. Calling `close` again is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.compact();
        if let Some(file) = self.file.take() {
            if let Err(err) = file.sync_all() {
                warn!(path = %self.path.display(), error = %err, "failed to sync log file");
            }
        }
        self.closed = true;
    }

    /// Rewrite the file from the ring buffer alone, dropping anything older
    /// than the retention window from disk. Also serves as a re-open retry
    /// for sinks whose file could not be created earlier.
    fn compact(&mut self) {
        self.file = create_log_file(&self.path);
        if let Some(file) = self.file.as_mut() {
            for line in &self.ring {
                if let Err(err) = writeln!(file, "{line}") {
                    warn!(
                        path = %self.path.display(),
                        error = %err,
                        "failed to rewrite log file during compaction"
                    );
                    break;
                }
            }
        }
        self.appends_since_compaction = 0;
    }
}

fn create_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(
                    path = %parent.display(),
                    error = %err,
                    "failed to create log directory; keeping output in memory only"
                );
                return None;
            }
        }
    }

    match File::create(path) {
        Ok(file) => Some(file),
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "failed to create log file; keeping output in memory only"
            );
            None
        }
    }
}
