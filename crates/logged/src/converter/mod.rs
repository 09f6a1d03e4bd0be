//! Rendering of runtime values for logging.
//!
//! A [`LogConverter`] declares the types it applies to. The [`ConverterRegistry`] maps each
//! declared type to its converter and, for a given value, resolves a converter by walking
//! the value's type ancestry: the type itself, then its superclass chain, then its
//! interfaces, depth-first. Values without a converter are rendered as themselves.

use std::fmt;
use std::sync::Arc;

mod registry;
mod types;
mod value;

pub use registry::{Conflict, ConverterRegistry, ConverterRegistryBuilder};
pub use types::{builtin, TypeInfo, OBJECT};
pub use value::{Loggable, Value};

pub trait LogConverter: Send + Sync {
    fn name(&self) -> &str;

    /// Types this converter applies to. `None` means the converter did not declare any,
    /// which the registry rejects.
    fn target_types(&self) -> Option<&[&'static TypeInfo]> {
        None
    }

    fn convert(&self, value: &dyn Loggable) -> Value;
}

type ConvertFn = Box<dyn Fn(&dyn Loggable) -> Value + Send + Sync>;

/// Closure backed converter.
pub struct FnConverter {
    name: String,
    types: Vec<&'static TypeInfo>,
    f: ConvertFn,
}

impl FnConverter {
    pub fn new<F>(name: &str, types: &[&'static TypeInfo], f: F) -> Self
    where
        F: Fn(&dyn Loggable) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            types: types.to_vec(),
            f: Box::new(f),
        }
    }

    /// Converter for a concrete type. Values of another concrete type reaching this converter
    /// through the ancestry walk are rendered as themselves.
    pub fn typed<T, F>(name: &str, types: &[&'static TypeInfo], f: F) -> Self
    where
        T: Loggable,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Self::new(name, types, move |value| match value.as_any().downcast_ref::<T>() {
            Some(x) => f(x),
            None => value.to_value(),
        })
    }

    pub fn into_arc(self) -> Arc<dyn LogConverter> {
        Arc::new(self)
    }
}

impl fmt::Debug for FnConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnConverter").field("name", &self.name).field("types", &self.types).finish()
    }
}

impl LogConverter for FnConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn target_types(&self) -> Option<&[&'static TypeInfo]> {
        if self.types.is_empty() {
            None
        } else {
            Some(&self.types)
        }
    }

    fn convert(&self, value: &dyn Loggable) -> Value {
        (self.f)(value)
    }
}
