//! File logger for the `log` facade. The terminal belongs to the UI, so
//! records only go anywhere when `--log-file` is given.

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

struct FileLogger {
    level: LevelFilter,
    started: Instant,
    out: Mutex<BufWriter<File>>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(
                out,
                "{elapsed:>9.3} {:<5} {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.flush();
        }
    }
}

/// Install the file logger (truncating `path`) as the global logger.
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let logger = FileLogger {
        level,
        started: Instant::now(),
        out: Mutex::new(BufWriter::new(file)),
    };
    log::set_boxed_logger(Box::new(logger)).context("installing logger")?;
    log::set_max_level(level);
    Ok(())
}

/// Write out anything still buffered; call before exit.
pub fn flush() {
    log::logger().flush();
}
