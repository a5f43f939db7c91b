//! Out-of-band error channel for anomalies that must not reach the caller.

use std::sync::{Arc, Mutex};

use log::error;

use crate::errors::Error;

pub trait ErrorReporter: Send + Sync {
    /// Records an error for manual investigation. Must not fail or block.
    fn report(&self, error: &Error, context: &str);
}

/// Writes reports to the `error!` log stream.
#[derive(Clone, Default)]
pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn report(&self, error: &Error, context: &str) {
        error!("[reported] {}: {}", context, error);
    }
}

/// Collects reports for assertions in tests.
#[derive(Clone, Default)]
pub struct MockErrorReporter {
    reports: Arc<Mutex<Vec<String>>>,
}

impl MockErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports rendered as `"{context}: {error}"`.
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorReporter for MockErrorReporter {
    fn report(&self, error: &Error, context: &str) {
        self.reports
            .lock()
            .unwrap()
            .push(format!("{}: {}", context, error));
    }
}
