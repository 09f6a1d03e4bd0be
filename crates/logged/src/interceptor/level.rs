use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interceptor::{LogSink, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Off,
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn is_enabled(&self, sink: &dyn LogSink, logger: &str) -> bool {
        match self {
            Level::Off => false,
            level => sink.is_enabled(logger, *level),
        }
    }

    /// Writes the record at this level. The sink applies its own filtering, [`Level::Off`]
    /// never writes.
    pub fn log(&self, sink: &dyn LogSink, record: &Record<'_>) {
        if *self != Level::Off {
            sink.log(&Record { level: *self, ..*record });
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Off => "off",
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }

    pub(crate) fn as_log(&self) -> Option<log::Level> {
        match self {
            Level::Off => None,
            Level::Trace => Some(log::Level::Trace),
            Level::Debug => Some(log::Level::Debug),
            Level::Info => Some(log::Level::Info),
            Level::Warn => Some(log::Level::Warn),
            Level::Error => Some(log::Level::Error),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
