//! File logger for the `log` facade.
//!
//! The terminal belongs to the grid, so log lines only ever go to a file.

use anyhow::{Context, Result};
use log::{LevelFilter, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{} {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install the file logger when `path` is set. Returns config warnings.
pub fn init(path: Option<&Path>, level: &str) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    let Some(path) = path else {
        return Ok(warnings);
    };
    let level = LevelFilter::from_str(level.trim()).unwrap_or_else(|_| {
        warnings.push(format!("Unknown log level '{}'; using info", level));
        LevelFilter::Info
    });

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    log::set_boxed_logger(Box::new(FileLogger {
        level,
        file: Mutex::new(file),
    }))
    .context("installing logger")?;
    log::set_max_level(level);
    Ok(warnings)
}
