use std::fs;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter as TracingLevelFilter;

use crate::core::Error;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbosityConfiguration {
    Trace,
    Debug,
    #[default]
    Info,
}

impl VerbosityConfiguration {
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            VerbosityConfiguration::Trace => LevelFilter::Trace,
            VerbosityConfiguration::Debug => LevelFilter::Debug,
            VerbosityConfiguration::Info => LevelFilter::Info,
        }
    }

    pub fn tracing_filter(&self) -> TracingLevelFilter {
        match self {
            VerbosityConfiguration::Trace => TracingLevelFilter::TRACE,
            VerbosityConfiguration::Debug => TracingLevelFilter::DEBUG,
            VerbosityConfiguration::Info => TracingLevelFilter::INFO,
        }
    }
}

/// Where intercepted calls are written to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkConfiguration {
    #[default]
    Log,
    Tracing,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub verbosity: VerbosityConfiguration,
    #[serde(default)]
    pub sink: SinkConfiguration,

    #[serde(default)]
    pub logging: logged::Configuration,
}

impl Configuration {
    /// Reads a profile file. Missing fields keep their defaults.
    pub fn from_file(path: &str) -> Result<Self, Error> {
        let data = fs::read(path).map_err(|e| Error::Configuration(format!("could not read profile {}: {}", path, e)))?;

        Self::from_slice(&data)
    }

    fn from_slice(data: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(data).map_err(|e| Error::Configuration(e.to_string()))
    }
}
