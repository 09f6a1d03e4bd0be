use simple_logger::SimpleLogger;
use tracing_subscriber::EnvFilter;

use crate::core::context::configuration::VerbosityConfiguration;
use crate::core::Error;

/// Installs the `log` and `tracing` backends at the configured verbosity.
/// `RUST_LOG` directives refine the tracing filter.
pub fn install(verbosity: &VerbosityConfiguration) -> Result<(), Error> {
    SimpleLogger::new()
        .with_level(verbosity.level_filter())
        .init()
        .map_err(|e| Error::Configuration(e.to_string()))?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter(verbosity))
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(|e| Error::Configuration(e.to_string()))
}

fn filter(verbosity: &VerbosityConfiguration) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(verbosity.tracing_filter().into())
        .from_env_lossy()
}
