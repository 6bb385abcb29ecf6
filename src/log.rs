// src/log.rs
//
// File logger behind the `log` facade. Call sites keep the short
// logf!/logd!/logw!/loge! macros; lines land in `<store>/debug.log` as
// `[hh:mm:ss.mmm][LEVEL] message`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use ::log::{LevelFilter, Log, Metadata, Record};

use crate::config::consts::{LOG_ENV, LOG_FILE};

static START: OnceLock<Instant> = OnceLock::new();
static LOGGER: OnceLock<FileLogger> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

pub fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

pub struct FileLogger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLogger {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= ::log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = fmt_elapsed(start().elapsed().as_millis());
        let line = format!("[{elapsed}][{}] {}\n", record.level(), record.args());

        if let Ok(_guard) = self.lock.lock() {
            if let Ok(mut file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
            {
                let _ = file.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {}
}

/// Parse the level named in `FINSIM_LOG` (default: info).
pub fn level_from_env() -> LevelFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the file logger under `store_dir`. Safe to call more than once;
/// only the first call wins.
pub fn init(store_dir: &Path, level: LevelFilter) {
    let _ = fs::create_dir_all(store_dir);
    start();
    let logger = LOGGER.get_or_init(|| FileLogger::new(store_dir.join(LOG_FILE)));
    if ::log::set_logger(logger).is_ok() {
        ::log::set_max_level(level);
    }
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::log::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::log::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::log::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::log::error!($($arg)*)
    };
}
