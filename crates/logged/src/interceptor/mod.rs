//! Call interception.
//!
//! For every call, the [`Interceptor`]:
//! - resolves the [`LoggingDescriptor`] of the call site (cached)
//! - puts context-key parameters and context variables into the diagnostic context
//! - logs the call message with the converted, non-suppressed parameters if the level is enabled
//! - invokes the call
//! - logs `return {}` with the converted result, or `failed` with the failure as cause
//! - restores the diagnostic context, whatever happened
//!
//! The call's own result or failure is handed back unchanged.

use std::any::{Any, TypeId};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::cache::DescriptorCache;
use crate::configuration::Configuration;
use crate::context::{ContextScope, ContextVariableProducer, StaticVariable};
use crate::converter::{ConverterRegistry, Loggable, Value};

mod descriptor;
pub mod event;
mod level;
mod sink;
mod site;

pub use descriptor::{derive_message, LoggingDescriptor};
pub use level::Level;
pub use sink::{LogFacadeSink, LogSink, Record, TracingSink};
pub use site::{CallSite, CallSiteBuilder, Parameter};

/// A call argument. `None` stands for an absent value.
pub type Argument<'a> = Option<&'a dyn Loggable>;

/// Cause attached to the `failed` record when the call panicked.
#[derive(Error, Debug)]
#[error("panicked: {0}")]
pub struct PanicError(pub String);

impl PanicError {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|x| x.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());

        Self(message)
    }
}

pub struct Interceptor {
    converters: Arc<ConverterRegistry>,
    variables: Vec<Arc<dyn ContextVariableProducer>>,
    sink: Arc<dyn LogSink>,

    configuration: Configuration,
    descriptors: DescriptorCache,
}

impl Interceptor {
    pub fn builder(converters: Arc<ConverterRegistry>, sink: Arc<dyn LogSink>) -> InterceptorBuilder {
        InterceptorBuilder {
            converters,
            sink,
            variables: vec![],
            configuration: Configuration::default(),
        }
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn descriptor(&self, site: &CallSite) -> Arc<LoggingDescriptor> {
        self.descriptors.descriptor(site, &self.configuration)
    }

    /// Wraps a fallible call. `arguments` are given in the parameter order of the site.
    ///
    /// A panic raised by the call is logged as a failure and resumed once the diagnostic
    /// context has been restored.
    pub fn around<R, E, F>(&self, site: &CallSite, arguments: &[Argument<'_>], proceed: F) -> Result<R, E>
    where
        R: Loggable,
        E: StdError + 'static,
        F: FnOnce() -> Result<R, E>,
    {
        let mut logging = CallLogging::enter(self, self.descriptor(site), arguments);
        logging.log_call();

        match panic::catch_unwind(AssertUnwindSafe(proceed)) {
            Ok(Ok(result)) => {
                logging.log_result(&result);
                logging.done();
                Ok(result)
            },
            Ok(Err(error)) => {
                logging.log_failure(&error);
                logging.done();
                Err(error)
            },
            Err(payload) => {
                logging.log_failure(&PanicError::from_payload(payload.as_ref()));
                logging.done();
                panic::resume_unwind(payload)
            },
        }
    }

    /// Wraps an infallible call.
    pub fn call<R, F>(&self, site: &CallSite, arguments: &[Argument<'_>], proceed: F) -> R
    where
        R: Loggable,
        F: FnOnce() -> R,
    {
        match self.around::<R, Infallible, _>(site, arguments, || Ok(proceed())) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }
}

pub struct InterceptorBuilder {
    converters: Arc<ConverterRegistry>,
    sink: Arc<dyn LogSink>,
    variables: Vec<Arc<dyn ContextVariableProducer>>,
    configuration: Configuration,
}

impl InterceptorBuilder {
    pub fn variable(mut self, variable: Arc<dyn ContextVariableProducer>) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn build(self) -> Interceptor {
        let mut variables: Vec<Arc<dyn ContextVariableProducer>> = vec![];

        let mut configured: Vec<_> = self.configuration.context.iter().collect();
        configured.sort();
        for (key, value) in configured {
            variables.push(Arc::new(StaticVariable::new(key.as_str(), value.as_str())));
        }
        variables.extend(self.variables);

        Interceptor {
            converters: self.converters,
            variables,
            sink: self.sink,
            descriptors: DescriptorCache::new(self.configuration.descriptor_cache_capacity),
            configuration: self.configuration,
        }
    }
}

/// Logging state of a single intercepted call.
struct CallLogging<'a> {
    interceptor: &'a Interceptor,
    descriptor: Arc<LoggingDescriptor>,
    arguments: &'a [Argument<'a>],

    scope: ContextScope,
}

impl<'a> CallLogging<'a> {
    fn enter(interceptor: &'a Interceptor, descriptor: Arc<LoggingDescriptor>, arguments: &'a [Argument<'a>]) -> Self {
        debug_assert_eq!(
            arguments.len(),
            descriptor.parameters.len(),
            "{} called with a wrong number of arguments",
            descriptor.site
        );

        Self {
            interceptor,
            descriptor,
            arguments,
            scope: ContextScope::enter(),
        }
    }

    fn argument(&self, index: usize) -> Argument<'a> {
        self.arguments.get(index).copied().flatten()
    }

    fn convert(&self, value: Argument<'_>) -> Value {
        self.interceptor.converters.convert(value)
    }

    fn sink(&self) -> &dyn LogSink {
        self.interceptor.sink.as_ref()
    }

    fn log_call(&mut self) {
        self.add_parameter_contexts();
        self.add_context_variables();

        let level = self.descriptor.level;
        let enabled = level.is_enabled(self.sink(), &self.descriptor.logger);
        if !enabled && !self.descriptor.json {
            return;
        }

        let arguments = self.logged_arguments();
        if self.descriptor.json {
            let parameters = self.descriptor.logged_parameters().map(|(_, x)| x);
            let event = event::render(&self.descriptor, parameters.zip(arguments.iter()));
            self.scope.put(event::JSON_CONTEXT_KEY, &event);
        }

        if enabled {
            level.log(self.sink(), &Record::new(&self.descriptor.logger, level, &self.descriptor.message, &arguments));
        }
    }

    /// Context values by key, concatenated in parameter order when a key is bound twice.
    fn collect_parameter_contexts(&self) -> IndexMap<String, String> {
        let mut contexts: IndexMap<String, String> = IndexMap::new();
        for (index, key) in self.descriptor.context_parameters() {
            let converted = self.convert(self.argument(index));
            if converted.is_null() {
                continue;
            }

            let value = converted.to_string();
            match contexts.get_mut(key) {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(&value);
                },
                None => {
                    contexts.insert(key.to_string(), value);
                },
            }
        }

        contexts
    }

    fn add_parameter_contexts(&mut self) {
        for (key, value) in self.collect_parameter_contexts() {
            self.scope.put(&key, &value);
        }
    }

    fn add_context_variables(&mut self) {
        for variable in self.interceptor.variables.iter().filter_map(|x| x.produce()) {
            self.scope.put(&variable.key, &variable.value);
        }
    }

    fn logged_arguments(&self) -> Vec<Value> {
        self.descriptor
            .logged_parameters()
            .map(|(index, _)| self.convert(self.argument(index)))
            .collect()
    }

    fn log_result<R: Loggable>(&self, result: &R) {
        if TypeId::of::<R>() == TypeId::of::<()>() {
            return;
        }

        // written without checking whether the level is enabled, the sink filters
        let converted = [self.convert(Some(result))];
        let level = self.descriptor.level;
        level.log(self.sink(), &Record::new(&self.descriptor.logger, level, "return {}", &converted));
    }

    fn log_failure(&self, error: &(dyn StdError + 'static)) {
        let level = self.descriptor.level;
        level.log(self.sink(), &Record::new(&self.descriptor.logger, level, "failed", &[]).with_cause(error));
    }

    fn done(self) {
        self.scope.restore()
    }
}
