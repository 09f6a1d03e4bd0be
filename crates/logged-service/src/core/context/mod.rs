use std::sync::Arc;

use logged::{LogFacadeSink, LogSink, TracingSink};

use crate::core::context::configuration::{Configuration, SinkConfiguration};
use crate::core::context::environment::Overrides;
use crate::core::Error;

pub mod configuration;
pub mod environment;

#[derive(Clone)]
pub struct Context {
    pub configuration: Configuration,
}

impl Context {
    pub fn new(configuration: Configuration) -> Context {
        Context { configuration }
    }

    /// Profile file first, then `LOGGED_*` environment variables, then arguments.
    pub fn load() -> Result<Self, Error> {
        let overrides = Overrides::from_arguments()?.or(Overrides::from_environment()?);

        let mut configuration = match overrides.profile.as_deref().filter(|x| !x.is_empty()) {
            Some(path) => Configuration::from_file(path)?,
            None => {
                println!(
                    "No profile file specified, using defaults.
Provide a configuration profile using the `--profile` argument or the `LOGGED_PROFILE` environment variable."
                );
                Configuration::default()
            },
        };

        overrides.apply(&mut configuration);
        Ok(Self::new(configuration))
    }

    /// Sink receiving the records of intercepted calls.
    pub fn sink(&self) -> Arc<dyn LogSink> {
        match self.configuration.sink {
            SinkConfiguration::Log => Arc::new(LogFacadeSink),
            SinkConfiguration::Tracing => Arc::new(TracingSink),
        }
    }
}
