//! Rolling Logger
//!
//! Date-rolled log files plus an in-memory circular buffer of recent lines.
//!
//! `init_logger_with` installs a `tracing-subscriber` fmt subscriber whose writer
//! appends to `<dir>/<prefix>.<YYYY-MM-DD>.log`, opening a new file when the
//! local date changes and pruning the oldest files beyond `max_files`.
//! Records emitted through the `log` facade are bridged into the same
//! subscriber.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

pub const DEFAULT_MAX_FILES: usize = 7;
pub const DEFAULT_RECENT_LINES: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("log file error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub prefix: String,
    pub max_files: usize,
    pub recent_lines: usize,
    pub level: LevelFilter,
}

impl LoggerOptions {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            max_files: DEFAULT_MAX_FILES,
            recent_lines: DEFAULT_RECENT_LINES,
            level: LevelFilter::INFO,
        }
    }
}

struct Inner {
    dir: PathBuf,
    prefix: String,
    max_files: usize,
    date: NaiveDate,
    file: File,
    recent: VecDeque<String>,
    recent_cap: usize,
    partial: String,
}

impl Inner {
    fn write_dated(&mut self, date: NaiveDate, buf: &[u8]) -> io::Result<usize> {
        if date != self.date {
            self.file = open_for(&self.dir, &self.prefix, date)?;
            self.date = date;
            prune(&self.dir, &self.prefix, self.max_files)?;
        }
        let written = self.file.write(buf)?;
        self.remember(&buf[..written]);
        Ok(written)
    }

    fn remember(&mut self, bytes: &[u8]) {
        if self.recent_cap == 0 {
            return;
        }
        self.partial.push_str(&String::from_utf8_lossy(bytes));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if self.recent.len() == self.recent_cap {
                self.recent.pop_front();
            }
            self.recent.push_back(line.trim_end().to_string());
        }
    }
}

/// Shared writer handed to the subscriber; cloning shares the same file.
#[derive(Clone)]
pub struct RollingWriter {
    inner: Arc<Mutex<Inner>>,
}

impl RollingWriter {
    pub fn new(dir: impl AsRef<Path>, options: &LoggerOptions) -> Result<Self, LoggerError> {
        Self::open_at(dir.as_ref(), options, Local::now().date_naive())
    }

    fn open_at(dir: &Path, options: &LoggerOptions, date: NaiveDate) -> Result<Self, LoggerError> {
        fs::create_dir_all(dir)?;
        let file = open_for(dir, &options.prefix, date)?;
        prune(dir, &options.prefix, options.max_files)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                dir: dir.to_path_buf(),
                prefix: options.prefix.clone(),
                max_files: options.max_files,
                date,
                file,
                recent: VecDeque::with_capacity(options.recent_lines),
                recent_cap: options.recent_lines,
                partial: String::new(),
            })),
        })
    }

    /// Path of the file currently being appended to
    pub fn current_path(&self) -> Option<PathBuf> {
        let inner = self.inner.lock().ok()?;
        Some(inner.dir.join(file_name(&inner.prefix, inner.date)))
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(inner) => inner.recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn write_dated(&self, date: NaiveDate, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log writer poisoned"))?;
        inner.write_dated(date, buf)
    }
}

/// Per-event writer produced by [`RollingWriter`]
pub struct RollingHandle {
    writer: RollingWriter,
}

impl Write for RollingHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write_dated(Local::now().date_naive(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut inner = self
            .writer
            .inner
            .lock()
            .map_err(|_| io::Error::other("log writer poisoned"))?;
        inner.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingHandle;

    fn make_writer(&'a self) -> Self::Writer {
        RollingHandle {
            writer: self.clone(),
        }
    }
}

fn file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}.{}.log", prefix, date.format("%Y-%m-%d"))
}

fn open_for(dir: &Path, prefix: &str, date: NaiveDate) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(file_name(prefix, date)))
}

/// Delete the oldest `<prefix>.*.log` files so at most `max_files` remain.
/// Dates sort lexically, so name order is age order.
fn prune(dir: &Path, prefix: &str, max_files: usize) -> io::Result<()> {
    if max_files == 0 {
        return Ok(());
    }
    let head = format!("{}.", prefix);
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(&head) && name.ends_with(".log"))
        .collect();
    if names.len() <= max_files {
        return Ok(());
    }
    names.sort();
    let excess = names.len() - max_files;
    for name in names.into_iter().take(excess) {
        fs::remove_file(dir.join(name))?;
    }
    Ok(())
}

/// Initialize logging with explicit options. Fails if a global subscriber
/// is already installed.
pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    options: LoggerOptions,
) -> Result<RollingWriter, LoggerError> {
    let writer = RollingWriter::new(log_dir, &options)?;
    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_max_level(options.level)
        .try_init()
        .map_err(|e| LoggerError::Init(e.to_string()))?;
    log::info!("logger initialized: prefix={}", options.prefix);
    Ok(writer)
}
