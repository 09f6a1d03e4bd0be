use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::context;
use crate::converter::Value;
use crate::interceptor::{Level, LogSink, Record};

/// A record as seen by the [`RecordingSink`], with the diagnostic context at emission time.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRecord {
    pub logger: String,
    pub level: Level,
    pub message: String,
    pub arguments: Vec<Value>,
    pub cause: Option<String>,
    pub context: BTreeMap<String, String>,
}

impl CapturedRecord {
    pub fn formatted(&self) -> String {
        Record::new(&self.logger, self.level, &self.message, &self.arguments).formatted()
    }
}

/// Sink keeping every record at or above its threshold in memory.
#[derive(Clone)]
pub struct RecordingSink {
    threshold: Level,
    records: Arc<Mutex<Vec<CapturedRecord>>>,
    enabled_checks: Arc<Mutex<usize>>,
}

impl RecordingSink {
    pub fn new(threshold: Level) -> Self {
        Self {
            threshold,
            records: Arc::default(),
            enabled_checks: Arc::default(),
        }
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().map(|x| x.clone()).unwrap_or_default()
    }

    /// Number of times the sink was asked whether a level is enabled.
    pub fn enabled_checks(&self) -> usize {
        self.enabled_checks.lock().map(|x| *x).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl LogSink for RecordingSink {
    fn is_enabled(&self, _logger: &str, level: Level) -> bool {
        if let Ok(mut checks) = self.enabled_checks.lock() {
            *checks += 1;
        }

        self.threshold != Level::Off && level >= self.threshold
    }

    fn log(&self, record: &Record<'_>) {
        if self.threshold == Level::Off || record.level < self.threshold {
            return;
        }

        let captured = CapturedRecord {
            logger: record.logger.to_string(),
            level: record.level,
            message: record.message.to_string(),
            arguments: record.arguments.to_vec(),
            cause: record.cause.map(|x| x.to_string()),
            context: context::snapshot(),
        };

        if let Ok(mut records) = self.records.lock() {
            records.push(captured);
        }
    }
}
