use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::converter::{LogConverter, Loggable, TypeInfo, Value};
use crate::Error;

/// Two converters claimed the same type. The later one was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub type_name: String,
    pub replaced: String,
    pub kept: String,
}

/// Immutable mapping from type name to converter, built once at startup.
///
/// Registration order is the order converters are handed to the builder; when two
/// converters claim the same type, the last one wins.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<&'static str, Arc<dyn LogConverter>>,
    conflicts: Vec<Conflict>,
}

impl ConverterRegistry {
    pub fn builder() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::default()
    }

    /// Builds the registry from all discovered converters, in iteration order.
    pub fn from_converters<I>(converters: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Arc<dyn LogConverter>>,
    {
        let mut builder = Self::builder();
        for converter in converters {
            builder = builder.register(converter);
        }

        builder.build()
    }

    /// Renders the value with its resolved converter, or as itself when none applies.
    pub fn convert(&self, value: Option<&dyn Loggable>) -> Value {
        let Some(value) = value else { return Value::Null };

        match self.find(value.type_info()) {
            Some(converter) => converter.convert(value),
            None => value.to_value(),
        }
    }

    /// Resolves the converter for the type: the type itself, then its superclass chain,
    /// then its interfaces, depth-first.
    pub fn find(&self, type_info: &TypeInfo) -> Option<&Arc<dyn LogConverter>> {
        if let Some(converter) = self.converters.get(type_info.name()) {
            return Some(converter);
        }

        if let Some(converter) = type_info.superclass().and_then(|x| self.find(x)) {
            return Some(converter);
        }

        type_info.interfaces().iter().find_map(|x| self.find(x))
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    fn add(&mut self, type_info: &'static TypeInfo, converter: Arc<dyn LogConverter>) {
        let kept = converter.name().to_string();
        if let Some(old) = self.converters.insert(type_info.name(), converter) {
            warn!(type_name = type_info.name(), replaced = old.name(), kept = %kept, "ambiguous converters");
            self.conflicts.push(Conflict {
                type_name: type_info.name().to_string(),
                replaced: old.name().to_string(),
                kept,
            });
        }
    }
}

/// Collects converters. Validation is deferred to [`Self::build`] so that a misdeclared
/// converter fails the whole startup.
#[derive(Default)]
pub struct ConverterRegistryBuilder {
    converters: Vec<Arc<dyn LogConverter>>,
}

impl ConverterRegistryBuilder {
    pub fn register(mut self, converter: Arc<dyn LogConverter>) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn build(self) -> Result<ConverterRegistry, Error> {
        let mut registry = ConverterRegistry::default();
        for converter in self.converters {
            debug!(converter = converter.name(), "register converter");

            let types = converter
                .target_types()
                .filter(|x| !x.is_empty())
                .map(|x| x.to_vec())
                .ok_or_else(|| Error::MissingTargetTypes(converter.name().to_string()))?;

            for type_info in types {
                registry.add(type_info, converter.clone());
            }
        }

        Ok(registry)
    }
}
