use std::env;

use serde::Deserialize;

use crate::core::context::configuration::{Configuration, SinkConfiguration, VerbosityConfiguration};
use crate::core::Error;

const ENVIRONMENT_PREFIX: &str = "LOGGED_";

/// Settings that can be given on top of the profile file, either as `LOGGED_<NAME>`
/// environment variables or as `--<name>=<value>` arguments.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Overrides {
    pub profile: Option<String>,
    pub verbosity: Option<VerbosityConfiguration>,
    pub sink: Option<SinkConfiguration>,
    pub descriptor_cache_capacity: Option<u64>,
}

impl Overrides {
    pub fn from_environment() -> Result<Self, Error> {
        envy::prefixed(ENVIRONMENT_PREFIX)
            .from_env()
            .map_err(|e| Error::Configuration(format!("invalid environment {}", e)))
    }

    pub fn from_arguments() -> Result<Self, Error> {
        Self::parse_arguments(env::args().skip(1))
    }

    /// Arguments must read `--name=value`. Dashes in names are taken as underscores.
    fn parse_arguments(arguments: impl IntoIterator<Item = String>) -> Result<Self, Error> {
        let mut pairs = vec![];
        for argument in arguments {
            let pair = argument
                .strip_prefix("--")
                .and_then(|x| x.split_once('='))
                .filter(|(name, value)| !name.is_empty() && !value.is_empty());

            let Some((name, value)) = pair else {
                return Err(Error::Configuration(format!("invalid argument {}, must be of the form '--name=value'", argument)));
            };

            pairs.push((name.replace('-', "_"), value.to_string()));
        }

        envy::from_iter(pairs).map_err(|e| Error::Configuration(format!("invalid arguments {}", e)))
    }

    /// Values given here win. Missing ones keep `other`'s.
    pub fn or(self, other: Overrides) -> Overrides {
        Overrides {
            profile: self.profile.or(other.profile),
            verbosity: self.verbosity.or(other.verbosity),
            sink: self.sink.or(other.sink),
            descriptor_cache_capacity: self.descriptor_cache_capacity.or(other.descriptor_cache_capacity),
        }
    }

    pub fn apply(self, configuration: &mut Configuration) {
        if let Some(verbosity) = self.verbosity {
            configuration.verbosity = verbosity;
        }
        if let Some(sink) = self.sink {
            configuration.sink = sink;
        }
        if let Some(capacity) = self.descriptor_cache_capacity {
            configuration.logging.descriptor_cache_capacity = capacity;
        }
    }
}
