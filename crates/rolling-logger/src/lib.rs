//! Rolling Logger
//!
//! A `log` backend for browser apps. Every record is written to the console
//! and the most recent ones are kept in a fixed-size circular buffer so the
//! UI can show what happened lately.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// A formatted log record kept in the ring buffer
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: Level,
    pub message: String,
}

impl LogEntry {
    /// Single console line: `HH:MM:SS.mmm LEVEL [app] message`
    pub fn format_line(&self, app_name: &str) -> String {
        format!("{} {:<5} [{}] {}", self.timestamp, self.level, app_name, self.message)
    }
}

/// Fixed-capacity buffer that drops the oldest entry when full
#[derive(Debug)]
pub struct RingBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries oldest first
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct RollingLogger {
    app_name: String,
    level: LevelFilter,
    buffer: Mutex<RingBuffer>,
}

impl RollingLogger {
    fn new(app_name: &str, capacity: usize, level: LevelFilter) -> Self {
        Self {
            app_name: app_name.to_string(),
            level,
            buffer: Mutex::new(RingBuffer::new(capacity)),
        }
    }

    fn recent(&self) -> Vec<LogEntry> {
        self.buffer
            .lock()
            .map(|buffer| buffer.snapshot())
            .unwrap_or_default()
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry {
            timestamp: chrono::Local::now().format("%H:%M:%S%.3f").to_string(),
            level: record.level(),
            message: record.args().to_string(),
        };
        emit(entry.level, &entry.format_line(&self.app_name));

        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(entry);
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Info => web_sys::console::info_1(&value),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Install the rolling logger as the global `log` backend.
///
/// Only the first call takes effect; later calls return the `SetLoggerError`
/// from `log` and leave the installed logger untouched.
pub fn init_logger(app_name: &str, capacity: usize, level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(app_name, capacity, level));
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

/// Records currently held in the ring buffer, oldest first
pub fn recent_records() -> Vec<LogEntry> {
    LOGGER.get().map(RollingLogger::recent).unwrap_or_default()
}
