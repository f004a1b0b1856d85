//! `log` backend for the CLI
//!
//! Every record is appended to a log file in the working directory and
//! echoed to the terminal.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;
use log::{Level, LevelFilter, Log, Metadata, Record};

pub const DEFAULT_LOG_FILE: &str = "filmkit.log";

pub struct Logger {
    file: Mutex<File>,
    level: Level,
}

impl Logger {
    /// Truncates `log_file` and records everything at `level` or above
    pub fn new(log_file: &str, level: Level) -> io::Result<Self> {
        Ok(Logger { file: Mutex::new(File::create(log_file)?), level })
    }

    pub fn write_line(&self, message: &str) -> io::Result<()> {
        let mut file = self.file.lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        writeln!(file, "{}", message)?;
        file.flush()
    }

    /// Installs the global logger; `verbose` lowers the threshold to Debug
    pub fn init_global_logger(log_file: &str, verbose: bool) -> io::Result<()> {
        let (level, filter) = match verbose {
            true => (Level::Debug, LevelFilter::Debug),
            false => (Level::Info, LevelFilter::Info),
        };

        if log::set_boxed_logger(Box::new(Logger::new(log_file, level)?)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }
        log::set_max_level(filter);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.level(), record.args());
        let _ = self.write_line(&line);

        match record.level() {
            Level::Error | Level::Warn => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    // write_line flushes every record
    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filters_records() {
        let path = std::env::temp_dir().join(format!("filmkit-logger-{}.log", std::process::id()));
        let logger = Logger::new(path.to_str().unwrap(), Level::Info).unwrap();

        assert!(logger.enabled(&Metadata::builder().level(Level::Warn).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));

        logger.write_line("[INFO] hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[INFO] hello\n");
        std::fs::remove_file(&path).unwrap();
    }
}
