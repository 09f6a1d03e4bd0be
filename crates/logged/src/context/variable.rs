/// A key-value pair contributed to the diagnostic context of every intercepted call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextVariable {
    pub key: String,
    pub value: String,
}

impl ContextVariable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Produces the current value of a context variable. Producers may have nothing to
/// contribute, in which case the call's context is left untouched.
pub trait ContextVariableProducer: Send + Sync {
    fn produce(&self) -> Option<ContextVariable>;
}

/// Constant context variable, usually fed from configuration.
#[derive(Debug, Clone)]
pub struct StaticVariable(ContextVariable);

impl StaticVariable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self(ContextVariable::new(key, value))
    }
}

impl ContextVariableProducer for StaticVariable {
    fn produce(&self) -> Option<ContextVariable> {
        Some(self.0.clone())
    }
}

/// Context variable computed on every call.
pub struct FnVariable<F>(F);

impl<F> FnVariable<F>
where
    F: Fn() -> Option<ContextVariable> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> ContextVariableProducer for FnVariable<F>
where
    F: Fn() -> Option<ContextVariable> + Send + Sync,
{
    fn produce(&self) -> Option<ContextVariable> {
        (self.0)()
    }
}
