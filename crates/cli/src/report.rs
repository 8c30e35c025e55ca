//! Per-run log file for the regression harness

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

/// File name prefix of every run log
pub const LOG_PREFIX: &str = "test_results";

/// Exclusively owned log file for one harness run.
///
/// The file is created fresh (never appended to) and closed when the log is
/// dropped or [`finish`](RunLog::finish)ed.
pub struct RunLog {
    writer: BufWriter<File>,
    path: PathBuf,
    timestamp: String,
}

impl RunLog {
    /// Create `dir` if needed and open `test_results_<YYYYMMDD_HHMMSS>.log`.
    ///
    /// A numeric suffix is added when a log for the same second already exists.
    pub fn create<Tz>(dir: &Path, now: DateTime<Tz>) -> io::Result<Self>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        fs::create_dir_all(dir)?;
        let timestamp = now.format("%Y%m%d_%H%M%S").to_string();

        let mut attempt = 0u32;
        let (file, path) = loop {
            let name = match attempt {
                0 => format!("{LOG_PREFIX}_{timestamp}.log"),
                n => format!("{LOG_PREFIX}_{timestamp}_{n}.log"),
            };
            let path = dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (file, path),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        };

        tracing::debug!(path = %path.display(), "Opened run log");

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            timestamp,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp embedded in the file name
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Flush and close the file, returning its path
    pub fn finish(mut self) -> io::Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.path)
    }
}

impl Write for RunLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
