//! Logging setup.
//!
//! Log output goes through the `log` facade. [`Logger::init`] installs a
//! `fern` dispatch that always feeds an in-memory buffer of recent lines and,
//! when logging is enabled in the config, also writes to stderr or a file.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;

use crate::config::LoggingConfig;
use crate::constants::LOG_BUFFER_CAPACITY;

/// Shared buffer of recent log lines
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Logger {
    pub fn new() -> Self {
        Self::with_capacity(LOG_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Build a logger from config and install it as the global `log` backend
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let logger = Self::new();
        logger
            .dispatch(config)?
            .apply()
            .context("Failed to install logger")?;
        Ok(logger)
    }

    /// Build the fern dispatch for this buffer without installing it
    pub fn dispatch(&self, config: &LoggingConfig) -> Result<fern::Dispatch> {
        let buffer = self.clone();

        let mut dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{} {:<5} {}] {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(config.level_filter()?)
            .chain(fern::Output::call(move |record| buffer.push(record.args().to_string())));

        if config.enabled {
            dispatch = match &config.file {
                Some(path) => dispatch.chain(
                    fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?,
                ),
                None => dispatch.chain(std::io::stderr()),
            };
        }

        Ok(dispatch)
    }

    fn push(&self, line: String) {
        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() == self.capacity {
                logs.pop_front();
            }
            logs.push_back(line);
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
