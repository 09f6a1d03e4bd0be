use chrono::Local;
use serde_json::Map;

use crate::converter::Value;
use crate::interceptor::{LoggingDescriptor, Parameter};

/// Context key holding the structured event of the current call.
pub const JSON_CONTEXT_KEY: &str = "json";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Renders the structured event of a call: its method name, a local timestamp and every
/// logged parameter by name.
pub fn render<'a, I>(descriptor: &LoggingDescriptor, parameters: I) -> String
where
    I: IntoIterator<Item = (&'a Parameter, &'a Value)>,
{
    let mut event = Map::new();
    for (parameter, value) in parameters {
        event.insert(parameter.name.clone(), value.to_json());
    }

    // reserved fields win over parameters of the same name
    event.insert("event".to_string(), serde_json::Value::String(descriptor.method.clone()));
    event.insert(
        "timestamp".to_string(),
        serde_json::Value::String(Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string()),
    );

    serde_json::Value::Object(event).to_string()
}
