use std::sync::atomic::{AtomicU64, Ordering};

use crate::converter::TypeInfo;
use crate::interceptor::Level;

/// Per-parameter logging flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    /// Excluded from the positional arguments of the call record.
    pub dont_log: bool,
    /// Diagnostic context key receiving the converted value.
    pub context_key: Option<String>,
}

impl Parameter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dont_log: false,
            context_key: None,
        }
    }

    pub fn dont_log(mut self) -> Self {
        self.dont_log = true;
        self
    }

    pub fn context(mut self, key: &str) -> Self {
        self.context_key = Some(key.to_string());
        self
    }
}

static NEXT_SITE_KEY: AtomicU64 = AtomicU64::new(1);

/// Static description of a loggable method: where it is declared, how it is logged and
/// what its parameters are.
#[derive(Debug, Clone)]
pub struct CallSite {
    key: u64,
    id: String,
    declaring_type: &'static TypeInfo,
    method: String,

    pub level: Level,
    pub message: Option<String>,
    pub logger: Option<&'static TypeInfo>,
    pub json: bool,
    pub parameters: Vec<Parameter>,
}

impl CallSite {
    pub fn builder(declaring_type: &'static TypeInfo, method: &str) -> CallSiteBuilder {
        CallSiteBuilder(Self {
            key: 0,
            id: format!("{}::{}", declaring_type.name(), method),
            declaring_type,
            method: method.to_string(),
            level: Level::default(),
            message: None,
            logger: None,
            json: false,
            parameters: vec![],
        })
    }

    /// Identity of this site, distinct for every built site even when methods share a name.
    /// Clones keep the key.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// `<declaring type>::<method>`, the key of configured overrides.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn declaring_type(&self) -> &'static TypeInfo {
        self.declaring_type
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

pub struct CallSiteBuilder(CallSite);

impl CallSiteBuilder {
    pub fn level(mut self, level: Level) -> Self {
        self.0.level = level;
        self
    }

    /// Explicit message template. An empty template means the message is derived from
    /// the method name.
    pub fn message(mut self, message: &str) -> Self {
        self.0.message = Some(message.to_string()).filter(|x| !x.is_empty());
        self
    }

    /// Logger identity to use instead of the declaring type.
    pub fn logger(mut self, logger: &'static TypeInfo) -> Self {
        self.0.logger = Some(logger);
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.0.json = json;
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.0.parameters.push(parameter);
        self
    }

    pub fn build(mut self) -> CallSite {
        self.0.key = NEXT_SITE_KEY.fetch_add(1, Ordering::Relaxed);
        self.0
    }
}
