//! Crash reporting.
//!
//! A fatal frame error is handed to the sink with a timestamp, persisted
//! for post-mortem, and then continues propagating; the sink never
//! swallows the failure.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tracing::warn;

pub trait CrashSink {
    fn record(&mut self, error: &anyhow::Error, at: DateTime<Local>);
}

/// Appends crash records to a text file.
pub struct CrashReportFile {
    path: PathBuf,
}

impl CrashReportFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CrashSink for CrashReportFile {
    fn record(&mut self, error: &anyhow::Error, at: DateTime<Local>) {
        let record = format!("Client crash at {}\n{error:#}\n", at.format("%Y-%m-%d %X"));
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(record.as_bytes()));
        if let Err(e) = result {
            // The crash itself still propagates; losing the record is the
            // best we can do here.
            warn!(path = %self.path.display(), error = %e, "failed to write crash report");
        }
    }
}

/// Keeps crash records in memory; useful for tests.
#[derive(Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn records(&self) -> Vec<String> {
        self.records.lock().expect("crash record lock").clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("crash record lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CrashSink for MemorySink {
    fn record(&mut self, error: &anyhow::Error, at: DateTime<Local>) {
        self.records
            .lock()
            .expect("crash record lock")
            .push(format!("{}: {error:#}", at.format("%Y-%m-%d %X")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_appends_timestamped_records() {
        let path = std::env::temp_dir().join(format!(
            "realm_crash_test_{}.txt",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut sink = CrashReportFile::new(&path);
        let err = anyhow::anyhow!("scene exploded");
        sink.record(&err, Local::now());
        sink.record(&err, Local::now());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("Client crash at").count(), 2);
        assert!(contents.contains("scene exploded"));

        let _ = std::fs::remove_file(&path);
    }
}
