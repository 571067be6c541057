use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::TraceEvent;

/// Best-effort JSONL trace sink. Any I/O problem downgrades to a warning on
/// stderr; tracing never fails the run.
pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self { file: None }
            }
        }
    }

    pub fn log(&self, event: &TraceEvent) {
        let Some(file_mutex) = &self.file else {
            return;
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("Warning: failed to serialize trace event: {}", e);
                return;
            }
        };

        match file_mutex.lock() {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", json) {
                    eprintln!("Warning: failed to write trace event: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Warning: trace logger lock poisoned: {}", e);
            }
        }
    }
}
