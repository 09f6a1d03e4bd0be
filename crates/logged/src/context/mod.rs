//! Diagnostic context: a per-thread key-value overlay enriched for the duration of a call.
//!
//! Entries are only ever written through a [`ContextScope`], which remembers the previous
//! value of every key it touches and restores them when it is released. Scopes nest like
//! the calls they belong to, so an inner call never leaks its entries into the outer one.

mod scope;
mod variable;

pub use scope::{get, snapshot, ContextScope};
pub use variable::{ContextVariable, ContextVariableProducer, FnVariable, StaticVariable};
