//! Method-call logging.
//!
//! An [`Interceptor`] wraps a call described by a [`CallSite`]: it enriches the diagnostic
//! context for the duration of the call, logs the call with its converted parameters,
//! logs the result or the failure, and restores the context on every exit path.
//!
//! Values are rendered through a [`ConverterRegistry`] that resolves a [`LogConverter`]
//! by walking the runtime type's ancestry (see [`TypeInfo`]).

use thiserror::Error;

pub mod cache;
pub mod context;
pub mod converter;
pub mod interceptor;

mod configuration;
mod macros;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use configuration::{Configuration, SiteConfiguration};
pub use context::{ContextScope, ContextVariable, ContextVariableProducer, FnVariable, StaticVariable};
pub use converter::{ConverterRegistry, FnConverter, LogConverter, Loggable, TypeInfo, Value};
pub use interceptor::{Argument, CallSite, Interceptor, Level, LogFacadeSink, LogSink, LoggingDescriptor, PanicError, Parameter, Record, TracingSink};

#[derive(Error, Debug)]
pub enum Error {
    /// A converter did not declare the types it applies to
    #[error("converter {0} must declare at least one target type")]
    MissingTargetTypes(String),

    #[error("configuration error {0}")]
    Configuration(String),
}
